//! Annealed random hill climbing.
//!
//! A combination of [random hill climbing](crate::algo::hill_climber) with
//! the Metropolis acceptance criterion known from [simulated
//! annealing](https://en.wikipedia.org/wiki/Simulated_annealing). Candidates
//! are generated exactly as in random hill climbing, but a worse candidate
//! is still accepted with probability `exp((current - candidate) / t)` where
//! `t` is the current temperature. The temperature follows a geometric
//! cooling schedule, so the process starts as a nearly free random walk and
//! gradually turns into greedy hill climbing.
//!
//! The accepted point is the *walking* point of the algorithm. The point
//! reported from each iteration is the best point found so far, which is
//! tracked separately and is never lost by accepting a worse candidate.
//!
//! # References
//!
//! \[1\] [Optimization by Simulated
//! Annealing](https://www.science.org/doi/10.1126/science.220.4598.671)
//!
//! \[2\] [Nature-Inspired Metaheuristic
//! Algorithms](https://dl.acm.org/doi/10.5555/1628847)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{
    convert, storage::StorageMut, ComplexField as _, DimName, Dyn, IsContiguous, OVector,
    RealField as _, Vector, U1,
};
use num_traits::{One, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::core::{Domain, Function, NanToInf as _, Optimizer, Problem};

/// Options for [`AnnealedHillClimber`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct AnnealedHillClimberOptions<P: Problem> {
    /// Step-size factor. The standard deviation of the Gaussian step in
    /// dimension *i* is `sigma * magnitude[i]`. Default: `0.1`.
    sigma: P::Field,
    /// Initial temperature. Default: `1.0`.
    temperature: P::Field,
    /// Multiplicative cooling factor applied to the temperature after every
    /// iteration. Must be in `(0, 1)`. Default: `0.99`.
    cooling: P::Field,
    /// Lower bound for the temperature. Once reached, the algorithm behaves
    /// as plain greedy hill climbing. Default: `1e-12`.
    min_temperature: P::Field,
}

impl<P: Problem> Default for AnnealedHillClimberOptions<P> {
    fn default() -> Self {
        Self {
            sigma: convert(0.1),
            temperature: convert(1.0),
            cooling: convert(0.99),
            min_temperature: convert(1e-12),
        }
    }
}

/// Annealed random hill climbing optimizer.
///
/// See [module](self) documentation for more details.
///
/// Every call to [`opt_next`](Optimizer::opt_next) costs one function
/// evaluation (two on the very first call, which also evaluates the initial
/// point).
pub struct AnnealedHillClimber<P: Problem, R = StdRng> {
    options: AnnealedHillClimberOptions<P>,
    scale: OVector<P::Field, Dyn>,
    current: OVector<P::Field, Dyn>,
    candidate: OVector<P::Field, Dyn>,
    current_value: Option<P::Field>,
    best: OVector<P::Field, Dyn>,
    best_value: P::Field,
    temperature: P::Field,
    rng: R,
}

impl<P: Problem> AnnealedHillClimber<P, StdRng> {
    /// Initializes annealed hill climbing with default options and a
    /// non-deterministic random seed.
    pub fn new(p: &P, dom: &Domain<P::Field>) -> Self {
        Self::with_options(
            p,
            dom,
            StdRng::from_entropy(),
            AnnealedHillClimberOptions::default(),
        )
    }
}

impl<P: Problem, R: Rng> AnnealedHillClimber<P, R> {
    /// Initializes annealed hill climbing with given random number
    /// generator.
    ///
    /// Seeding the generator explicitly makes the whole optimization process
    /// reproducible.
    pub fn with_rng(p: &P, dom: &Domain<P::Field>, rng: R) -> Self {
        Self::with_options(p, dom, rng, AnnealedHillClimberOptions::default())
    }

    /// Initializes annealed hill climbing with given options.
    pub fn with_options(
        _: &P,
        dom: &Domain<P::Field>,
        rng: R,
        options: AnnealedHillClimberOptions<P>,
    ) -> Self {
        assert!(
            options.cooling > P::Field::zero() && options.cooling < P::Field::one(),
            "cooling factor must be in (0, 1)"
        );

        let dim = Dyn(dom.dim());

        Self {
            scale: dom.magnitude() * options.sigma,
            temperature: options.temperature,
            options,
            current: OVector::zeros_generic(dim, U1::name()),
            candidate: OVector::zeros_generic(dim, U1::name()),
            current_value: None,
            best: OVector::zeros_generic(dim, U1::name()),
            best_value: convert(f64::INFINITY),
            rng,
        }
    }

    /// Gets the current temperature.
    pub fn temperature(&self) -> P::Field {
        self.temperature
    }

    /// Resets the internal state of the algorithm, including the temperature
    /// schedule.
    pub fn reset(&mut self) {
        self.current_value = None;
        self.best_value = convert(f64::INFINITY);
        self.temperature = self.options.temperature;
    }
}

impl<F: Function, R: Rng> Optimizer<F> for AnnealedHillClimber<F, R>
where
    StandardNormal: Distribution<F::Field>,
{
    const NAME: &'static str = "Annealed hill climber";

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
        let Self {
            options,
            scale,
            current,
            candidate,
            current_value,
            best,
            best_value,
            temperature,
            rng,
        } = self;

        let current_val = match *current_value {
            Some(value) => value,
            None => {
                // The initial point becomes both the walking point and the
                // best-so-far.
                current.copy_from(x);
                best.copy_from(x);

                let value = f.apply(x).nan_to_inf();
                *best_value = value;
                value
            }
        };

        // Gaussian step around the walking point, scaled per dimension.
        candidate
            .iter_mut()
            .zip(current.iter())
            .zip(scale.iter())
            .for_each(|((cj, xj), sj)| {
                let step: F::Field = StandardNormal.sample(rng);
                *cj = *xj + step * *sj;
            });

        dom.project(candidate);
        let value = f.apply(candidate).nan_to_inf();

        let accepted = if value < current_val {
            true
        } else if value.is_finite() {
            // Metropolis criterion.
            let prob = ((current_val - value) / *temperature).exp();
            convert::<_, F::Field>(rng.gen::<f64>()) < prob
        } else {
            false
        };

        debug!(
            "candidate value = {}\tcurrent = {}\tt = {}\taccepted = {}",
            value, current_val, temperature, accepted
        );

        if accepted {
            current.copy_from(candidate);
            *current_value = Some(value);

            if value < *best_value {
                best.copy_from(candidate);
                *best_value = value;
            }
        } else {
            *current_value = Some(current_val);
        }

        // Cool down.
        *temperature = (*temperature * options.cooling).max(options.min_temperature);

        // Report the best point found so far.
        x.copy_from(best);
        Ok(*best_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::*;

    #[test]
    fn sphere() {
        let f = Sphere::new(2);
        let dom = Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0]);

        let optimizer = AnnealedHillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![10.0, -10.0];

        optimize(&f, &dom, optimizer, x, 0.0, 10_000, 1e-2).unwrap();
    }

    #[test]
    fn rastrigin() {
        // Multimodal function where greedy hill climbing gets stuck. The
        // basin around the initial point bottoms out slightly above 31.8, so
        // any better value requires escaping it. A hot start and slow cooling
        // keep the walk mobile long enough to hop basins.
        let f = Rastrigin::new(2);
        let dom = f.domain();

        let mut options = AnnealedHillClimberOptions::default();
        options.set_temperature(10.0).set_cooling(0.999);

        let optimizer =
            AnnealedHillClimber::with_options(&f, &dom, StdRng::seed_from_u64(42), options);
        let x = nalgebra::dvector![4.0, -4.0];

        let mut best = f64::INFINITY;
        iter(&f, &dom, optimizer, x, 5000, |_, _, value, _| best = value).unwrap();

        assert!(best < 31.0);
    }

    #[test]
    fn reported_value_never_increases() {
        let f = Rastrigin::new(2);
        let dom = f.domain();

        let mut values = Vec::new();

        let optimizer = AnnealedHillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(3));
        let x = nalgebra::dvector![3.0, 3.0];

        iter(&f, &dom, optimizer, x, 1000, |_, _, value, _| {
            values.push(value);
        })
        .unwrap();

        assert!(values.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn cooling_schedule() {
        let f = Sphere::new(2);
        let dom = f.domain();

        let mut optimizer = AnnealedHillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(3));
        let t0 = optimizer.temperature();

        let mut x = nalgebra::dvector![1.0, 1.0];
        for _ in 0..10 {
            optimizer.opt_next(&f, &dom, &mut x).unwrap();
        }

        assert!(optimizer.temperature() < t0);
    }
}
