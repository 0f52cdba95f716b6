//! Pure random search.
//!
//! [Random search](https://en.wikipedia.org/wiki/Random_search) in its purest
//! form: every iteration draws an independent uniform sample from the domain
//! and keeps it if and only if it improves the best value found so far. There
//! is no adaptation whatsoever, which makes the algorithm immune to
//! deceptive landscapes and embarrassingly simple, but also very slow on
//! anything of even moderate dimensionality. It is included mainly as a
//! baseline for comparisons.
//!
//! # References
//!
//! \[1\] [Random Optimization](https://doi.org/10.1007/BF01068590)
//!
//! \[2\] [Nature-Inspired Metaheuristic
//! Algorithms](https://dl.acm.org/doi/10.5555/1628847)

use log::debug;
use nalgebra::{storage::StorageMut, DimName, Dyn, IsContiguous, OVector, Vector, U1};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::uniform::SampleUniform;

use crate::core::{Domain, Function, NanToInf as _, Optimizer, Problem};

/// Pure random search optimizer.
///
/// See [module](self) documentation for more details.
///
/// Every call to [`opt_next`](Optimizer::opt_next) costs one function
/// evaluation (two on the very first call, which also evaluates the initial
/// point).
pub struct RandomSearch<F: Problem, R = StdRng> {
    candidate: OVector<F::Field, Dyn>,
    best: Option<F::Field>,
    rng: R,
}

impl<F: Problem> RandomSearch<F, StdRng> {
    /// Initializes random search with a non-deterministic random seed.
    pub fn new(_f: &F, dom: &Domain<F::Field>) -> Self {
        Self::with_rng(_f, dom, StdRng::from_entropy())
    }
}

impl<F: Problem, R: Rng> RandomSearch<F, R> {
    /// Initializes random search with given random number generator.
    ///
    /// Seeding the generator explicitly makes the whole optimization process
    /// reproducible.
    pub fn with_rng(_f: &F, dom: &Domain<F::Field>, rng: R) -> Self {
        Self {
            candidate: OVector::zeros_generic(Dyn(dom.dim()), U1::name()),
            best: None,
            rng,
        }
    }

    /// Resets the internal state of the algorithm.
    pub fn reset(&mut self) {
        self.best = None;
    }
}

impl<F: Function, R: Rng> Optimizer<F> for RandomSearch<F, R>
where
    F::Field: SampleUniform,
{
    const NAME: &'static str = "Random search";

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
        let best = match self.best {
            Some(best) => best,
            None => {
                // The initial point is the first candidate.
                let value = f.apply(x).nan_to_inf();
                self.best = Some(value);
                value
            }
        };

        dom.sample(&mut self.candidate, &mut self.rng);
        let value = f.apply(&self.candidate).nan_to_inf();

        debug!("sampled value = {}\tbest = {}", value, best);

        if value < best {
            x.copy_from(&self.candidate);
            self.best = Some(value);
            Ok(value)
        } else {
            Ok(best)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::*;

    #[test]
    fn sphere() {
        let f = Sphere::new(2);
        let dom = Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0]);

        let optimizer = RandomSearch::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![5.0, 5.0];

        optimize(&f, &dom, optimizer, x, 0.0, 1000, 1.0).unwrap();
    }

    #[test]
    fn best_value_never_increases() {
        let f = ExtendedRosenbrock::new(2);
        let dom = Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0]);

        let mut values = Vec::new();

        let optimizer = RandomSearch::with_rng(&f, &dom, StdRng::seed_from_u64(3));
        let x = nalgebra::dvector![10.0, 10.0];

        iter(&f, &dom, optimizer, x, 100, |_, _, value, _| {
            values.push(value);
        })
        .unwrap();

        assert!(values.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}
