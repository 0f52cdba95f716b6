//! Rechenberg's (1+1)-Evolution Strategy with the 1/5th success rule.
//!
//! The oldest evolution strategy: a single parent produces a single
//! offspring per generation by Gaussian mutation with global step size
//! `sigma`, and the better of the two survives. The step size is
//! self-adapted with the classic 1/5th success rule: after each generation
//! `sigma` is multiplied by `exp(eta * (s - 1/5))` where `s` is 1 if the
//! offspring improved on the parent and 0 otherwise. On average, one
//! success in five keeps the step size constant; more successes grow it,
//! fewer shrink it.
//!
//! With a single parent and a single offspring the exploration ability is
//! limited, so the algorithm optionally restarts from a fresh uniform sample
//! when the step size collapses or the value stagnates.
//!
//! # References
//!
//! \[1\] [Evolution
//! Strategies](https://link.springer.com/chapter/10.1007%2F978-3-662-43505-2_44)
//! (Algorithm 44.3)
//!
//! \[2\] [Evolution strategies -- A comprehensive
//! introduction](https://link.springer.com/article/10.1023/A:1015059928466)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{
    convert, storage::StorageMut, ComplexField as _, DimName, Dyn, IsContiguous, OVector, Vector,
    U1,
};
use num_traits::{One, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{uniform::SampleUniform, Distribution, StandardNormal};

use crate::core::{Domain, Function, NanToInf as _, Optimizer, Problem, RealField};

/// Options for [`OnePlusOneEs`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct OnePlusOneEsOptions<P: Problem> {
    /// Initial global step size (mutation strength). Default: `0.1`.
    sigma: P::Field,
    /// Learning rate of the step size. Default: `1 / sqrt(n + 1)` where `n`
    /// is the dimensionality of the problem. Must be positive.
    eta: Option<P::Field>,
    /// Whether to restart from a fresh uniform sample when the step size
    /// collapses or the value stagnates. Default: `true`.
    restarts: bool,
    /// Step size below which a restart is triggered. Default: square root of
    /// the machine epsilon (see [`RealField::EPSILON_SQRT`](crate::RealField::EPSILON_SQRT)).
    sigma_threshold: P::Field,
    /// Number of generations over which stagnation is detected. Must be
    /// positive. Default: `10 + 30 * n`.
    stagnation: Option<usize>,
    /// Improvement of the value over the stagnation window below which a
    /// restart is triggered. Default: `1e-10`.
    fitness_diff: P::Field,
}

impl<P: Problem> Default for OnePlusOneEsOptions<P> {
    fn default() -> Self {
        Self {
            sigma: convert(0.1),
            eta: None,
            restarts: true,
            sigma_threshold: P::Field::EPSILON_SQRT,
            stagnation: None,
            fitness_diff: convert(1e-10),
        }
    }
}

/// (1+1)-Evolution Strategy optimizer.
///
/// See [module](self) documentation for more details.
///
/// Every call to [`opt_next`](Optimizer::opt_next) costs one function
/// evaluation (two on the very first call, which also evaluates the initial
/// point, and one more on an iteration that triggers a restart).
pub struct OnePlusOneEs<P: Problem, R = StdRng> {
    options: OnePlusOneEsOptions<P>,
    eta: P::Field,
    stagnation: usize,
    sigma: P::Field,
    candidate: OVector<P::Field, Dyn>,
    best: Option<P::Field>,
    history: Vec<P::Field>,
    n_restarts: usize,
    rng: R,
}

impl<P: Problem> OnePlusOneEs<P, StdRng> {
    /// Initializes the (1+1)-ES with default options and a non-deterministic
    /// random seed.
    pub fn new(p: &P, dom: &Domain<P::Field>) -> Self {
        Self::with_options(p, dom, StdRng::from_entropy(), OnePlusOneEsOptions::default())
    }
}

impl<P: Problem, R: Rng> OnePlusOneEs<P, R> {
    /// Initializes the (1+1)-ES with given random number generator.
    ///
    /// Seeding the generator explicitly makes the whole optimization process
    /// reproducible.
    pub fn with_rng(p: &P, dom: &Domain<P::Field>, rng: R) -> Self {
        Self::with_options(p, dom, rng, OnePlusOneEsOptions::default())
    }

    /// Initializes the (1+1)-ES with given options.
    pub fn with_options(
        _: &P,
        dom: &Domain<P::Field>,
        rng: R,
        options: OnePlusOneEsOptions<P>,
    ) -> Self {
        let n = dom.dim();

        let eta = options
            .eta
            .unwrap_or_else(|| P::Field::one() / convert::<_, P::Field>(n as f64 + 1.0).sqrt());
        assert!(eta > P::Field::zero(), "eta must be positive");

        let stagnation = options.stagnation.unwrap_or(10 + 30 * n);
        assert!(stagnation > 0, "stagnation window must be positive");

        Self {
            eta,
            stagnation,
            sigma: options.sigma,
            options,
            candidate: OVector::zeros_generic(Dyn(n), U1::name()),
            best: None,
            history: Vec::new(),
            n_restarts: 0,
            rng,
        }
    }

    /// Gets the current step size.
    pub fn sigma(&self) -> P::Field {
        self.sigma
    }

    /// Gets the number of restarts performed so far.
    pub fn n_restarts(&self) -> usize {
        self.n_restarts
    }

    /// Resets the internal state of the algorithm.
    pub fn reset(&mut self) {
        self.sigma = self.options.sigma;
        self.best = None;
        self.history.clear();
        self.n_restarts = 0;
    }
}

impl<F: Function, R: Rng> Optimizer<F> for OnePlusOneEs<F, R>
where
    StandardNormal: Distribution<F::Field>,
    F::Field: SampleUniform,
{
    const NAME: &'static str = "(1+1)-ES";

    type Error = std::convert::Infallible;

    fn opt_next<Sx>(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, Self::Error>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        let fifth: F::Field = convert(0.2);

        let mut best = match self.best {
            Some(best) => best,
            None => f.apply(x).nan_to_inf(),
        };

        // Sample and evaluate one offspring.
        let Self {
            candidate,
            sigma,
            rng,
            ..
        } = self;

        candidate.iter_mut().zip(x.iter()).for_each(|(cj, xj)| {
            let step: F::Field = StandardNormal.sample(rng);
            *cj = *xj + step * *sigma;
        });

        let not_feasible = dom.project(candidate);
        let value = f.apply(candidate).nan_to_inf();
        let success = value < best;

        // 1/5th success rule.
        let indicator = if success {
            F::Field::one()
        } else {
            F::Field::zero()
        };
        self.sigma *= (self.eta * (indicator - fifth)).exp();

        debug!(
            "offspring value = {}{}\tparent = {}\tsigma = {}",
            value,
            if not_feasible { " (projected)" } else { "" },
            best,
            self.sigma
        );

        if success {
            x.copy_from(&self.candidate);
            best = value;
        }

        self.history.push(best);

        if self.options.restarts {
            let len = self.history.len();
            let stagnated = len >= self.stagnation
                && self.history[len - self.stagnation] - self.history[len - 1]
                    < self.options.fitness_diff;

            if self.sigma < self.options.sigma_threshold || stagnated {
                dom.sample(x, &mut self.rng);
                best = f.apply(x).nan_to_inf();

                self.sigma = self.options.sigma;
                self.history.clear();
                self.history.push(best);
                self.n_restarts += 1;

                debug!("restart #{}: value = {}", self.n_restarts, best);
            }
        }

        self.best = Some(best);
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::*;

    #[test]
    fn sphere() {
        let f = Sphere::new(4);
        let dom = f.domain();

        let optimizer = OnePlusOneEs::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![10.0, -10.0, 10.0, -10.0];

        optimize(&f, &dom, optimizer, x, 0.0, 10_000, 1e-6).unwrap();
    }

    #[test]
    fn rosenbrock() {
        let f = ExtendedRosenbrock::new(2);
        let dom = Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0]);

        let optimizer = OnePlusOneEs::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![-10.0, -5.0];

        optimize(&f, &dom, optimizer, x, 0.0, 20_000, 1e-2).unwrap();
    }

    #[test]
    fn step_size_adapts() {
        let f = Sphere::new(2);
        let dom = f.domain();

        let mut options = OnePlusOneEsOptions::default();
        options.set_restarts(false);

        let mut optimizer =
            OnePlusOneEs::with_options(&f, &dom, StdRng::seed_from_u64(3), options);
        let sigma0 = optimizer.sigma();

        let mut x = nalgebra::dvector![10.0, 10.0];
        for _ in 0..1000 {
            optimizer.opt_next(&f, &dom, &mut x).unwrap();
        }

        // Near the optimum the step size must have shrunk considerably.
        assert!(optimizer.sigma() < sigma0);
    }

    #[test]
    #[should_panic(expected = "stagnation window must be positive")]
    fn zero_stagnation_window_is_rejected() {
        let f = Sphere::new(2);
        let dom = f.domain();

        let mut options = OnePlusOneEsOptions::default();
        options.set_stagnation(Some(0));

        OnePlusOneEs::with_options(&f, &dom, StdRng::seed_from_u64(3), options);
    }

    #[test]
    fn restarts_on_stagnation() {
        // A constant function can never improve, so the stagnation window
        // must eventually trigger a restart.
        struct Flat;

        impl Problem for Flat {
            type Field = f64;

            fn domain(&self) -> Domain<Self::Field> {
                Domain::rect(vec![-1.0], vec![1.0])
            }
        }

        impl Function for Flat {
            fn apply<Sx>(&self, _x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
            where
                Sx: nalgebra::storage::Storage<Self::Field, Dyn> + IsContiguous,
            {
                1.0
            }
        }

        let f = Flat;
        let dom = f.domain();

        let mut optimizer = OnePlusOneEs::with_rng(&f, &dom, StdRng::seed_from_u64(3));

        let mut x = nalgebra::dvector![0.0];
        for _ in 0..200 {
            optimizer.opt_next(&f, &dom, &mut x).unwrap();
        }

        assert!(optimizer.n_restarts() > 0);
    }
}
