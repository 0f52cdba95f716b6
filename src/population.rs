//! Abstractions and types for population-based algorithms.
//!
//! The most important type is [`Population`].

use std::{
    cmp::Ordering,
    ops::{Deref, DerefMut},
};

use getset::CopyGetters;
use nalgebra::{
    convert, storage::StorageMut, ComplexField as _, DimName, Dyn, IsContiguous, OVector, Vector,
    U1,
};
use num_traits::Zero;
use rand::Rng;
use rand_distr::uniform::SampleUniform;

use crate::core::{Domain, Function, NanToInf as _, Problem, RealField};

/// Population in a population-based optimization algorithm.
///
/// There are two important invariants that the population must satisfy:
///
/// 1. Points of individuals and their corresponding function values must
///    match. That is, it must not happen that an individual is changed
///    without updating its value (see
///    [`IndividualMut::set_value`](IndividualMut::set_value)).
/// 2. Before calling [`iter_sorted`](Population::iter_sorted) the population
///    must be sorted using [`sort`](Population::sort).
///
/// Violating any of these invariants results in panic in debug builds.
#[allow(clippy::len_without_is_empty)]
pub struct Population<F: Problem> {
    individuals: Vec<OVector<F::Field, Dyn>>,
    values: Vec<F::Field>,
    sorted: Vec<usize>,
    sorted_dirty: bool,
}

impl<F: Problem> Population<F> {
    /// Creates new population with given initializer.
    pub fn new<R: Rng + ?Sized, I: PopulationInit<F>>(
        f: &F,
        dom: &Domain<F::Field>,
        rng: &mut R,
        initializer: &I,
        size: PopulationSize,
    ) -> Self
    where
        F: Function,
    {
        let size = size.get(dom);
        let dim = Dyn(dom.dim());

        let mut individuals = vec![OVector::zeros_generic(dim, U1::name()); size];
        initializer.init_all(f, dom, rng, individuals.iter_mut());

        let values = vec![F::Field::zero(); size];
        let sorted = (0..size).collect();

        let mut this = Self {
            individuals,
            values,
            sorted,
            sorted_dirty: true,
        };

        this.eval(f);
        this.sort();
        this
    }

    /// Creates new population initialized with zeros.
    ///
    /// This is usually useful for creating an additional population used for
    /// storing the next generation if the current one needs to be preserved.
    pub fn zeros(dom: &Domain<F::Field>, size: PopulationSize) -> Self {
        let size = size.get(dom);
        let dim = Dyn(dom.dim());

        let individuals = vec![OVector::zeros_generic(dim, U1::name()); size];
        let values = vec![F::Field::zero(); size];
        let sorted = (0..size).collect();

        Self {
            individuals,
            values,
            sorted,
            sorted_dirty: false,
        }
    }

    /// Recreates the population with new individuals with given initializer.
    pub fn reinit<R: Rng + ?Sized, I: PopulationInit<F>>(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        rng: &mut R,
        initializer: &I,
    ) where
        F: Function,
    {
        initializer.init_all(f, dom, rng, self.individuals.iter_mut());
        self.eval(f);
        self.sort();
    }

    /// Gets the size of the population.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Iterates over the population in order sorted by function value from
    /// low to high.
    ///
    /// # Panics
    ///
    /// Panics if [`iter_mut`](Population::iter_mut) or
    /// [`get_mut`](Population::get_mut) was called without calling
    /// [`sort`](Population::sort) afterwards. This is the responsibility of
    /// the optimization algorithm.
    pub fn iter_sorted(&self) -> IterSorted<'_, F> {
        debug_assert!(
            !self.sorted_dirty,
            "population is supposedly not sorted - this is a bug in the algorithm used"
        );
        IterSorted {
            individuals: &self.individuals,
            values: &self.values,
            sorted: self.sorted.iter(),
        }
    }

    /// Iterates over the population immutably.
    pub fn iter(&self) -> Iter<'_, F> {
        Iter {
            inner: self.individuals.iter().zip(self.values.iter()),
        }
    }

    /// Iterates over the population mutably.
    ///
    /// **Important:** It is necessary to call [`sort`](Population::sort)
    /// before using (or allowing possibility of using)
    /// [`iter_sorted`](Population::iter_sorted).
    pub fn iter_mut(&mut self) -> IterMut<'_, F> {
        self.sorted_dirty = true;

        IterMut {
            inner: self.individuals.iter_mut().zip(self.values.iter_mut()),
        }
    }

    /// Gets an individual on specified index immutably.
    pub fn get(&self, index: usize) -> Option<Individual<'_, F>> {
        match (self.individuals.get(index), self.values.get(index)) {
            (Some(x), Some(&value)) => Some(Individual { x, value }),
            _ => None,
        }
    }

    /// Gets an individual on specified index mutably.
    ///
    /// **Important:** It is necessary to call [`sort`](Population::sort)
    /// before using (or allowing possibility of using)
    /// [`iter_sorted`](Population::iter_sorted).
    pub fn get_mut(&mut self, index: usize) -> Option<IndividualMut<'_, F>> {
        self.sorted_dirty = true;

        match (self.individuals.get_mut(index), self.values.get_mut(index)) {
            (Some(x), Some(value)) => Some(IndividualMut {
                x,
                value,
                dirty: false,
            }),
            _ => None,
        }
    }

    /// Evaluates the whole population and stores the function values.
    ///
    /// Non-finite values (including NaN) are stored as positive infinity so
    /// that they compare as worse than any finite value.
    pub fn eval(&mut self, f: &F)
    where
        F: Function,
    {
        for (x, value) in self.individuals.iter().zip(self.values.iter_mut()) {
            *value = f.apply(x).nan_to_inf();
        }
    }

    /// Sorts the whole population ordered by function values of individuals
    /// from low to high.
    ///
    /// Individuals with non-finite value are ordered last regardless of the
    /// actual value.
    pub fn sort(&mut self) {
        let values = &self.values;
        self.sorted.sort_unstable_by(|lhs, rhs| {
            let lhs = values[*lhs];
            let rhs = values[*rhs];
            if lhs.is_finite() && rhs.is_finite() {
                lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
            } else if lhs.is_finite() {
                Ordering::Less
            } else if rhs.is_finite() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });

        self.sorted_dirty = false;
    }

    /// Creates a simple report about the population in its current state.
    pub fn report(&self) -> PopulationReport<F> {
        PopulationReport::new(self)
    }
}

/// An individual from a population returned by [`get`](Population::get),
/// [`iter_sorted`](Population::iter_sorted) and [`iter`](Population::iter).
pub struct Individual<'a, F: Problem> {
    x: &'a OVector<F::Field, Dyn>,
    value: F::Field,
}

impl<'a, F: Problem> Individual<'a, F> {
    /// Gets the function value of the individual.
    pub fn value(&self) -> F::Field {
        self.value
    }
}

impl<F: Problem> Deref for Individual<'_, F> {
    type Target = OVector<F::Field, Dyn>;

    fn deref(&self) -> &Self::Target {
        self.x
    }
}

/// Immutable iterator over a [population](`Population`).
///
/// For sorted version, see [`iter_sorted`](Population::iter_sorted).
pub struct Iter<'a, F: Problem> {
    inner: std::iter::Zip<
        std::slice::Iter<'a, OVector<F::Field, Dyn>>,
        std::slice::Iter<'a, F::Field>,
    >,
}

impl<'a, F: Problem> Iterator for Iter<'a, F> {
    type Item = Individual<'a, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let (x, value) = self.inner.next()?;
        Some(Individual { x, value: *value })
    }
}

/// Immutable iterator over a [population](`Population`) sorted by function
/// value from low to high.
///
/// For *un*sorted version, see [`iter`](Population::iter).
pub struct IterSorted<'a, F: Problem> {
    individuals: &'a [OVector<F::Field, Dyn>],
    values: &'a [F::Field],
    sorted: std::slice::Iter<'a, usize>,
}

impl<'a, F: Problem> Iterator for IterSorted<'a, F> {
    type Item = Individual<'a, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.sorted.next()?;
        Some(Individual {
            x: &self.individuals[index],
            value: self.values[index],
        })
    }
}

/// An individual from a population returned by
/// [`get_mut`](Population::get_mut) and [`iter_mut`](Population::iter_mut).
///
/// **Important:** This type holds an information whether the individual is
/// *dirty* and supposedly needs reevaluation and updating the value through
/// [`set_value`](IndividualMut::set_value). The individual is marked as
/// dirty whenever the underlying vector is accessed through [`DerefMut`]. It
/// is the responsibility of the algorithm to update the value before
/// dropping if any mutable dereference happened, otherwise it panics when
/// dropped (in debug builds).
pub struct IndividualMut<'a, F: Problem> {
    x: &'a mut OVector<F::Field, Dyn>,
    value: &'a mut F::Field,
    dirty: bool,
}

impl<'a, F: Problem> IndividualMut<'a, F> {
    /// Gets the function value of the individual.
    pub fn value(&self) -> F::Field {
        *self.value
    }

    /// Sets the function value of the individual.
    ///
    /// This unmarks the individual as dirty.
    ///
    /// **Important:** Dirty individuals cause panic when they are dropped.
    pub fn set_value(&mut self, value: F::Field) {
        *self.value = value;
        self.dirty = false;
    }

    /// Evaluates the individual.
    ///
    /// **Important:** This method does *not* unmark the individual as dirty.
    /// This needs to be done through [`set_value`](IndividualMut::set_value).
    pub fn eval(&self, f: &F) -> F::Field
    where
        F: Function,
    {
        f.apply(&*self.x)
    }

    /// Clamps the individual to be within the bounds of given domain.
    ///
    /// **Important:** This marks the individual as dirty.
    pub fn clamp(&mut self, dom: &Domain<F::Field>) {
        dom.project(self.x);
        self.dirty = true;
    }
}

impl<F: Problem> Deref for IndividualMut<'_, F> {
    type Target = OVector<F::Field, Dyn>;

    fn deref(&self) -> &Self::Target {
        self.x
    }
}

impl<F: Problem> DerefMut for IndividualMut<'_, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dirty = true;
        self.x
    }
}

impl<F: Problem> Drop for IndividualMut<'_, F> {
    fn drop(&mut self) {
        debug_assert!(
            !self.dirty,
            "individual has supposedly obsolete value - this is a bug in the algorithm used"
        );
    }
}

/// Mutable iterator over a [population](`Population`).
pub struct IterMut<'a, F: Problem> {
    inner: std::iter::Zip<
        std::slice::IterMut<'a, OVector<F::Field, Dyn>>,
        std::slice::IterMut<'a, F::Field>,
    >,
}

impl<'a, F: Problem> Iterator for IterMut<'a, F> {
    type Item = IndividualMut<'a, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let (x, value) = self.inner.next()?;

        Some(IndividualMut {
            x,
            value,
            dirty: false,
        })
    }
}

/// A simple report about the population in its current state returned by
/// [`report`](Population::report) method.
#[derive(Debug, Clone, CopyGetters)]
#[get_copy = "pub"]
pub struct PopulationReport<F: Problem> {
    /// Function value of the best individual in the population.
    best: F::Field,
    /// Average function value of all individuals that have finite value.
    avg: F::Field,
    /// Number of individuals having a finite value.
    valid: usize,
    /// Number of individuals *not* having a finite value.
    invalid: usize,
}

impl<F: Problem> PopulationReport<F> {
    fn new(population: &Population<F>) -> Self {
        let mut best = convert(f64::INFINITY);
        let mut sum = F::Field::zero();
        let mut valid = 0;
        let mut invalid = 0;

        for value in population.values.iter().copied() {
            if value < best {
                best = value;
            }

            if value.is_finite() {
                sum += value;
                valid += 1;
            } else {
                invalid += 1;
            }
        }

        Self {
            best,
            avg: sum / convert(valid.max(1) as f64),
            valid,
            invalid,
        }
    }
}

/// Trait defining an initialization of a population.
pub trait PopulationInit<F: Problem> {
    /// Initializes one individual in the population.
    fn init<R: Rng + ?Sized, S>(
        &self,
        f: &F,
        dom: &Domain<F::Field>,
        rng: &mut R,
        x: &mut Vector<F::Field, Dyn, S>,
    ) where
        S: StorageMut<F::Field, Dyn> + IsContiguous;

    /// Initializes the whole population.
    fn init_all<'pop, R: Rng + ?Sized, I, S>(
        &self,
        f: &F,
        dom: &Domain<F::Field>,
        rng: &mut R,
        population: I,
    ) where
        I: Iterator<Item = &'pop mut Vector<F::Field, Dyn, S>>,
        S: StorageMut<F::Field, Dyn> + IsContiguous + 'pop,
    {
        for x in population {
            self.init(f, dom, rng, x);
        }
    }
}

/// Initializes the population with uniform distribution within the bounds,
/// with a magnitude-based range in unbounded dimensions (see
/// [`Domain::sample`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformInit(());

impl UniformInit {
    /// Creates the population initializer.
    pub fn new() -> Self {
        Self(())
    }
}

impl<F: Problem> PopulationInit<F> for UniformInit
where
    F::Field: SampleUniform,
{
    fn init<R: Rng + ?Sized, S>(
        &self,
        _f: &F,
        dom: &Domain<F::Field>,
        rng: &mut R,
        x: &mut Vector<F::Field, Dyn, S>,
    ) where
        S: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        dom.sample(x, rng);
    }
}

/// Setting for population size.
#[derive(Debug, Clone, Copy)]
pub enum PopulationSize {
    /// Fixed number of individuals.
    Fixed(usize),
    /// Number of individuals is based on the dimensionality of the problem.
    /// The concrete heuristic is unspecified, but it is some nonlinear
    /// function with decreasing speed of growth.
    Adaptive,
}

impl PopulationSize {
    /// Gets the determined number of individuals in the population,
    /// potentially influenced by the problem dimensionality.
    ///
    /// It is guaranteed that the population is of size at least 2.
    pub fn get<T: RealField + Copy>(&self, dom: &Domain<T>) -> usize {
        let size = match self {
            PopulationSize::Fixed(size) => *size,
            PopulationSize::Adaptive => {
                // A nonlinearly increasing function with a reasonable minimum.
                let size = 10.0 + 5.0 * (dom.dim() as f64).sqrt();
                // Round the size towards infinity to a multiplier of 5.
                let size = (size / 5.0).ceil() * 5.0;
                size as usize
            }
        };

        // The population should be always at least two individuals.
        size.max(2)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::testing::Sphere;

    #[test]
    fn adaptive_size_is_reasonable() {
        let small = Domain::<f64>::unconstrained(2);
        let large = Domain::<f64>::unconstrained(100);

        let small = PopulationSize::Adaptive.get(&small);
        let large = PopulationSize::Adaptive.get(&large);

        assert!(small >= 2);
        assert!(large > small);
        assert!(large < 100);
    }

    #[test]
    fn sorted_iteration() {
        let f = Sphere::new(2);
        let dom = f.domain();
        let mut rng = StdRng::seed_from_u64(2);

        let population = Population::new(
            &f,
            &dom,
            &mut rng,
            &UniformInit::new(),
            PopulationSize::Fixed(10),
        );

        let values = population
            .iter_sorted()
            .map(|individual| individual.value())
            .collect::<Vec<_>>();

        assert_eq!(values.len(), 10);
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn values_match_individuals() {
        let f = Sphere::new(3);
        let dom = f.domain();
        let mut rng = StdRng::seed_from_u64(3);

        let population = Population::new(
            &f,
            &dom,
            &mut rng,
            &UniformInit::new(),
            PopulationSize::Adaptive,
        );

        for individual in population.iter() {
            assert_eq!(individual.value(), f.apply(&*individual));
        }
    }

    #[test]
    fn eval_stores_non_finite_as_infinity() {
        struct Nan;

        impl Problem for Nan {
            type Field = f64;

            fn domain(&self) -> Domain<Self::Field> {
                Domain::rect(vec![-1.0], vec![1.0])
            }
        }

        impl Function for Nan {
            fn apply<Sx>(&self, _x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
            where
                Sx: nalgebra::storage::Storage<Self::Field, Dyn> + IsContiguous,
            {
                f64::NAN
            }
        }

        let f = Nan;
        let dom = f.domain();
        let mut rng = StdRng::seed_from_u64(2);

        let population =
            Population::new(&f, &dom, &mut rng, &UniformInit::new(), PopulationSize::Fixed(3));

        // Stored values must compare as worse than any finite value, which
        // NaN would not.
        assert!(population.iter().all(|x| x.value() == f64::INFINITY));
        assert_eq!(population.report().invalid(), 3);
    }
}
