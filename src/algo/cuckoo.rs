//! Cuckoo search global optimization algorithm.
//!
//! [Cuckoo search](https://en.wikipedia.org/wiki/Cuckoo_search) is an
//! optimization algorithm inspired by brood parasitism of cuckoo species. It is
//! a combination of local search around current individuals and far-field
//! randomization to escape local optima. It is to some extent similar to
//! [differential
//! evolution](https://en.wikipedia.org/wiki/Differential_evolution).
//!
//! # References
//!
//! \[1\] [Engineering Optimisation by Cuckoo
//! Search](https://arxiv.org/abs/1005.2908)
//!
//! \[2\] [Nature-Inspired Metaheuristic
//! Algorithms](https://dl.acm.org/doi/10.5555/1628847)

use getset::{CopyGetters, Getters, Setters};
use log::debug;
use nalgebra::{
    convert, storage::StorageMut, ComplexField as _, DimName, Dyn, IsContiguous, OVector, Vector,
    U1,
};
use num_traits::Zero;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{uniform::SampleUniform, Distribution, StandardNormal, Uniform};
use thiserror::Error;

use crate::{
    core::{Domain, Function, NanToInf as _, Optimizer, Problem},
    population::{Population, PopulationInit, PopulationSize, UniformInit},
};

/// Direction when performing local search for an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalWalkDirection {
    /// Individuals are attracted to the best individual in the population.
    TowardsBest,
    /// The direction is influenced only by magnitudes of the variables.
    Scaled,
}

/// Options for [`Cuckoo`] optimizer.
#[derive(Debug, Clone, CopyGetters, Getters, Setters)]
pub struct CuckooOptions<F: Problem, I: PopulationInit<F>> {
    /// Population size. Default: adaptive (see [`PopulationSize`]).
    #[getset(get_copy = "pub", set = "pub")]
    population_size: PopulationSize,
    /// Population initializer. Default: [`UniformInit`].
    #[getset(get = "pub")]
    population_init: I,
    /// Scale factor when doing local search. Default: `0.05`.
    #[getset(get_copy = "pub", set = "pub")]
    scale_factor: F::Field,
    /// Probability of abandoning a nest (i.e., doing far-field randomization).
    /// Default: `0.25`.
    #[getset(get_copy = "pub", set = "pub")]
    abandon_prob: f64,
    /// Fraction of the population that is immune to far-field randomization.
    /// Default: `0.15`.
    #[getset(get_copy = "pub", set = "pub")]
    elite_fraction: f64,
    /// Local search direction. Default: scaled (see [`LocalWalkDirection`]).
    #[getset(get_copy = "pub", set = "pub")]
    local_walk_dir: LocalWalkDirection,
}

impl<F: Problem, I: PopulationInit<F>> CuckooOptions<F, I> {
    /// Initializes the options with given population initializer.
    pub fn with_population_init(population_init: I) -> Self {
        Self {
            population_size: PopulationSize::Adaptive,
            population_init,
            scale_factor: convert(0.05),
            abandon_prob: 0.25,
            elite_fraction: 0.15,
            local_walk_dir: LocalWalkDirection::Scaled,
        }
    }
}

impl<F: Problem> Default for CuckooOptions<F, UniformInit>
where
    F::Field: SampleUniform,
{
    fn default() -> Self {
        Self::with_population_init(UniformInit::default())
    }
}

/// Cuckoo search optimizer. See [module](self) documentation for more details.
pub struct Cuckoo<F: Problem, I: PopulationInit<F> = UniformInit, R = StdRng> {
    options: CuckooOptions<F, I>,
    population: Population<F>,
    next_gen: Population<F>,
    magnitude: OVector<F::Field, Dyn>,
    rand_perm1: Vec<usize>,
    rand_perm2: Vec<usize>,
    best: OVector<F::Field, Dyn>,
    temp: OVector<F::Field, Dyn>,
    elite_size: usize,
    rng: R,
}

impl<F: Function> Cuckoo<F, UniformInit, StdRng>
where
    F::Field: SampleUniform,
{
    /// Initializes cuckoo search with default options and a non-deterministic
    /// random seed.
    pub fn new(f: &F, dom: &Domain<F::Field>) -> Self {
        Self::with_options(f, dom, StdRng::from_entropy(), CuckooOptions::default())
    }
}

impl<F: Function, R: Rng> Cuckoo<F, UniformInit, R>
where
    F::Field: SampleUniform,
{
    /// Initializes cuckoo search with given random number generator.
    pub fn with_rng(f: &F, dom: &Domain<F::Field>, rng: R) -> Self {
        Self::with_options(f, dom, rng, CuckooOptions::default())
    }
}

impl<F: Function, I: PopulationInit<F>, R: Rng> Cuckoo<F, I, R> {
    /// Initializes cuckoo search with given options.
    pub fn with_options(
        f: &F,
        dom: &Domain<F::Field>,
        mut rng: R,
        options: CuckooOptions<F, I>,
    ) -> Self {
        let population_size = options.population_size.get(dom);
        let elite_fraction = options.elite_fraction;
        let dim = Dyn(dom.dim());

        let population = Population::new(
            f,
            dom,
            &mut rng,
            &options.population_init,
            options.population_size,
        );
        let next_gen = Population::zeros(dom, options.population_size);

        Self {
            options,
            population,
            next_gen,
            magnitude: dom.magnitude().clone_owned(),
            rand_perm1: (0..population_size).collect(),
            rand_perm2: (0..population_size).collect(),
            best: OVector::zeros_generic(dim, U1::name()),
            temp: OVector::zeros_generic(dim, U1::name()),
            elite_size: 1.max((elite_fraction * (population_size as f64)) as usize),
            rng,
        }
    }

    /// Gets the current population.
    pub fn population(&self) -> &Population<F> {
        &self.population
    }

    /// Resets the internal state of the algorithm.
    pub fn reset(&mut self, f: &F, dom: &Domain<F::Field>) {
        self.population
            .reinit(f, dom, &mut self.rng, &self.options.population_init);
    }
}

/// Error returned from [`Cuckoo`] optimizer.
#[derive(Debug, Error)]
pub enum CuckooError {
    /// All individuals in the population got a non-finite function value.
    #[error("whole population is invalid")]
    InvalidPopulation,
}

impl<F: Function, I: PopulationInit<F>, R: Rng> Optimizer<F> for Cuckoo<F, I, R>
where
    StandardNormal: Distribution<F::Field>,
    F::Field: SampleUniform,
{
    const NAME: &'static str = "Cuckoo";

    type Error = CuckooError;

    fn opt_next<Sx>(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, Self::Error>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        let CuckooOptions {
            scale_factor,
            abandon_prob,
            local_walk_dir,
            ..
        } = self.options;

        let elite_size = self.elite_size;

        let Self {
            population,
            next_gen,
            magnitude,
            rand_perm1,
            rand_perm2,
            best,
            temp,
            rng,
            ..
        } = self;

        best.copy_from(&*population.iter_sorted().next().unwrap());

        for (x, mut next) in population.iter().zip(next_gen.iter_mut()) {
            // Perform local random walk.
            temp.copy_from(&x);

            match local_walk_dir {
                LocalWalkDirection::TowardsBest => {
                    temp.sub_to(&*best, &mut *next);
                }
                LocalWalkDirection::Scaled => {
                    next.copy_from(magnitude);
                }
            }

            *next *= scale_factor;
            next.apply(|uj| *uj *= rng.sample(StandardNormal));
            *next += &*temp;

            // Make sure that the candidate is in domain.
            next.clamp(dom);

            // Evaluate and replace if better.
            let value = next.eval(f).nan_to_inf();
            if value < x.value() {
                // Accept the candidate, just update the value.
                next.set_value(value);
            } else {
                // Reject the candidate, copy the old individual.
                next.copy_from(&x);
                next.set_value(x.value());
            }
        }

        rand_perm(rand_perm1, rng);
        rand_perm(rand_perm2, rng);

        // Sort the temporary population to be able to determine elite just
        // using the elite size.
        next_gen.sort();

        for (i, (x, mut next)) in next_gen
            .iter_sorted()
            .zip(population.iter_mut())
            .enumerate()
        {
            // Perform biased far-field random walk.
            next.copy_from(&*next_gen.get(rand_perm1[i]).unwrap());
            temp.copy_from(&*next_gen.get(rand_perm2[i]).unwrap());
            *next -= &*temp;
            next.apply(|uj| {
                *uj = if rng.gen_bool(abandon_prob) {
                    F::Field::zero()
                } else {
                    *uj * convert(rng.gen_range(0f64..=1.0))
                }
            });
            temp.copy_from(&x);
            *next += &*temp;

            // Make sure that the candidate is in domain.
            next.clamp(dom);

            // Evaluate and determine whether to abandon the nest. Replace if
            // it is better or it has been discovered while not being in the
            // elite.
            let value = next.eval(f).nan_to_inf();
            if value.is_finite()
                && (value < x.value() || (rng.gen_bool(abandon_prob) && i >= elite_size))
            {
                // Accept the candidate, just update the value.
                next.set_value(value);
            } else {
                // Reject the candidate, copy the old individual.
                next.copy_from(&x);
                next.set_value(x.value());
            }
        }

        population.sort();

        let report = population.report();

        debug!(
            "best value = {}\taverage value = {}\tvalid/invalid ratio = {}:{}",
            report.best(),
            report.avg(),
            report.valid(),
            report.invalid(),
        );

        if report.valid() == 0 {
            return Err(CuckooError::InvalidPopulation);
        }

        // Assign the best individual.
        let best = population.iter_sorted().next().unwrap();
        x.copy_from(&best);

        Ok(best.value())
    }
}

fn rand_perm<R: Rng + ?Sized>(perm: &mut [usize], rng: &mut R) {
    // Based on https://en.wikipedia.org/wiki/Permutation#Algorithms_to_generate_permutations.
    for i in 0..perm.len() {
        let d = Uniform::new_inclusive(0, i).sample(rng);
        perm[i] = perm[d];
        perm[d] = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::*;

    #[test]
    fn rosenbrock() {
        let n = 4;

        let f = ExtendedRosenbrock::new(n);
        let dom = f.domain();

        for x in f.initials() {
            let mut values = Vec::new();

            let optimizer = Cuckoo::with_rng(&f, &dom, StdRng::seed_from_u64(42));
            iter(&f, &dom, optimizer, x, 250, |_, _, value, _| {
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
    }

    #[test]
    fn sphere() {
        let f = Sphere::new(4);
        let dom = f.domain();

        let optimizer = Cuckoo::with_rng(&f, &dom, StdRng::seed_from_u64(42));
        let x = nalgebra::dvector![10.0, -10.0, 10.0, -10.0];

        optimize(&f, &dom, optimizer, x, 0.0, 250, 1e-3).unwrap();
    }

    #[test]
    fn recovers_from_invalid_initial_population() {
        // The initial individuals all evaluate to NaN, every later candidate
        // is finite. The finite candidates must replace the invalid nests
        // instead of being rejected by a NaN comparison.
        struct NanStart {
            calls: std::cell::Cell<usize>,
        }

        impl Problem for NanStart {
            type Field = f64;

            fn domain(&self) -> Domain<Self::Field> {
                Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0])
            }
        }

        impl Function for NanStart {
            fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
            where
                Sx: nalgebra::storage::Storage<Self::Field, Dyn> + IsContiguous,
            {
                let call = self.calls.get();
                self.calls.set(call + 1);

                if call < 4 {
                    f64::NAN
                } else {
                    x.norm_squared()
                }
            }
        }

        let f = NanStart {
            calls: std::cell::Cell::new(0),
        };
        let dom = f.domain();

        let mut options = CuckooOptions::default();
        options.set_population_size(PopulationSize::Fixed(4));

        let mut optimizer = Cuckoo::with_options(&f, &dom, StdRng::seed_from_u64(42), options);

        let mut x = nalgebra::dvector![0.0, 0.0];
        let value = optimizer.opt_next(&f, &dom, &mut x).unwrap();

        assert!(value.is_finite());
        assert_eq!(optimizer.population().report().invalid(), 0);
    }
}
