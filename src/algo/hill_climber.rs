//! Random hill climbing.
//!
//! [Random hill
//! climbing](https://en.wikipedia.org/wiki/Hill_climbing#Variants) keeps a
//! single point and repeatedly perturbs it with an isotropic Gaussian step,
//! accepting the perturbed point if and only if it improves the function
//! value. The step in every dimension is scaled by the expected
//! [magnitude](crate::Domain::magnitude) of the corresponding variable, so
//! the same step-size factor works for problems with differently scaled
//! variables.
//!
//! Greedy acceptance makes the algorithm converge quickly into the nearest
//! local minimum and stay there. For multimodal functions, see
//! [annealing](crate::algo::annealing), which escapes local minima by
//! occasionally accepting worse points.
//!
//! # References
//!
//! \[1\] [Artificial Intelligence: A Modern
//! Approach](https://dl.acm.org/doi/10.5555/1671238) (Section 4.1.1)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{
    convert, storage::StorageMut, DimName, Dyn, IsContiguous, OVector, Vector, U1,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::core::{Domain, Function, NanToInf as _, Optimizer, Problem};

/// Options for [`HillClimber`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct HillClimberOptions<P: Problem> {
    /// Step-size factor. The standard deviation of the Gaussian step in
    /// dimension *i* is `sigma * magnitude[i]`. Default: `0.1`.
    sigma: P::Field,
}

impl<P: Problem> Default for HillClimberOptions<P> {
    fn default() -> Self {
        Self {
            sigma: convert(0.1),
        }
    }
}

/// Random hill climbing optimizer.
///
/// See [module](self) documentation for more details.
///
/// Every call to [`opt_next`](Optimizer::opt_next) costs one function
/// evaluation (two on the very first call, which also evaluates the initial
/// point).
pub struct HillClimber<P: Problem, R = StdRng> {
    options: HillClimberOptions<P>,
    scale: OVector<P::Field, Dyn>,
    candidate: OVector<P::Field, Dyn>,
    best: Option<P::Field>,
    rng: R,
}

impl<P: Problem> HillClimber<P, StdRng> {
    /// Initializes hill climbing with default options and a
    /// non-deterministic random seed.
    pub fn new(p: &P, dom: &Domain<P::Field>) -> Self {
        Self::with_options(p, dom, StdRng::from_entropy(), HillClimberOptions::default())
    }
}

impl<P: Problem, R: Rng> HillClimber<P, R> {
    /// Initializes hill climbing with given random number generator.
    ///
    /// Seeding the generator explicitly makes the whole optimization process
    /// reproducible.
    pub fn with_rng(p: &P, dom: &Domain<P::Field>, rng: R) -> Self {
        Self::with_options(p, dom, rng, HillClimberOptions::default())
    }

    /// Initializes hill climbing with given options.
    pub fn with_options(
        _: &P,
        dom: &Domain<P::Field>,
        rng: R,
        options: HillClimberOptions<P>,
    ) -> Self {
        let dim = Dyn(dom.dim());

        Self {
            scale: dom.magnitude() * options.sigma,
            options,
            candidate: OVector::zeros_generic(dim, U1::name()),
            best: None,
            rng,
        }
    }

    /// Resets the internal state of the algorithm.
    pub fn reset(&mut self) {
        self.best = None;
    }
}

impl<F: Function, R: Rng> Optimizer<F> for HillClimber<F, R>
where
    StandardNormal: Distribution<F::Field>,
{
    const NAME: &'static str = "Hill climber";

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
            scale,
            candidate,
            best,
            rng,
            ..
        } = self;

        let best_value = match *best {
            Some(value) => value,
            None => f.apply(x).nan_to_inf(),
        };

        // Gaussian step around the best point, scaled per dimension.
        candidate
            .iter_mut()
            .zip(x.iter())
            .zip(scale.iter())
            .for_each(|((cj, xj), sj)| {
                let step: F::Field = StandardNormal.sample(rng);
                *cj = *xj + step * *sj;
            });

        let not_feasible = dom.project(candidate);
        let value = f.apply(candidate).nan_to_inf();

        debug!(
            "candidate value = {}{}\tbest = {}",
            value,
            if not_feasible { " (projected)" } else { "" },
            best_value
        );

        if value < best_value {
            x.copy_from(candidate);
            self.best = Some(value);
            Ok(value)
        } else {
            self.best = Some(best_value);
            Ok(best_value)
        }
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

        let optimizer = HillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![10.0, -10.0, 10.0, -10.0];

        optimize(&f, &dom, optimizer, x, 0.0, 10_000, 1e-3).unwrap();
    }

    #[test]
    fn rosenbrock_makes_progress() {
        let f = ExtendedRosenbrock::new(2);
        let dom = Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0]);

        let mut values = Vec::new();

        let optimizer = HillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(3));
        let x = nalgebra::dvector![-10.0, -5.0];

        iter(&f, &dom, optimizer, x, 500, |_, _, value, _| {
            values.push(value);
        })
        .unwrap();

        values.dedup();

        assert!(values.len() > 1, "no progress");
        assert!(
            values.windows(2).all(|pair| pair[1] <= pair[0]),
            "value increase"
        );
    }

    #[test]
    fn respects_bounds() {
        let f = Sphere::new(2);
        let dom = Domain::rect(vec![1.0, 1.0], vec![2.0, 2.0]);

        let optimizer = HillClimber::with_rng(&f, &dom, StdRng::seed_from_u64(8));
        let x = nalgebra::dvector![2.0, 2.0];

        let mut last = x.clone_owned();
        iter(&f, &dom, optimizer, x, 100, |_, x, _, _| {
            last.copy_from(x);
        })
        .unwrap();

        assert!(!dom.project(&mut last));
    }
}
