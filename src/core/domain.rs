//! Problem domain definition (dimensionality, bound constraints).

use std::iter::FromIterator;

use na::{Dim, DimName};
use nalgebra as na;
use nalgebra::{storage::StorageMut, OVector, Vector};
use num_traits::{One, Zero};
use rand::Rng;
use rand_distr::{uniform::SampleUniform, Distribution, Uniform};

use crate::analysis::estimate_magnitude_from_bounds;
use crate::core::RealField;

/// Factor applied to the magnitude of a variable when sampling in an
/// unbounded direction.
const UNBOUNDED_SAMPLE_FACTOR: f64 = 10.0;

/// Domain for a problem.
///
/// The domain is a rectangular region given by lower and upper bounds for
/// every variable, where both can be infinite. Next to the bounds, the domain
/// holds the expected magnitude of every variable, either estimated from the
/// bounds or provided via [`Domain::with_magnitude`]. Stochastic algorithms
/// use the magnitude to scale their perturbations, so providing a realistic
/// value may be crucial for "poorly scaled" problems with highly varying
/// magnitudes of its variables.
#[derive(Clone)]
pub struct Domain<T: RealField + Copy> {
    lower: OVector<T, na::Dyn>,
    upper: OVector<T, na::Dyn>,
    magnitude: OVector<T, na::Dyn>,
}

impl<T: RealField + Copy> Domain<T> {
    /// Creates unconstrained domain with given dimensionality.
    pub fn unconstrained(dim: usize) -> Self {
        assert!(dim > 0, "empty domain");

        let inf = T::from_subset(&f64::INFINITY);
        let one = T::one();
        let n = na::Dyn(dim);

        Self {
            lower: OVector::from_element_generic(n, na::Const::<1>, -inf),
            upper: OVector::from_element_generic(n, na::Const::<1>, inf),
            magnitude: OVector::from_element_generic(n, na::Const::<1>, one),
        }
    }

    /// Creates rectangular domain with given lower and upper bounds.
    ///
    /// Positive and negative infinity can be used to indicate a value
    /// unbounded in that dimension and direction. If the entire domain is
    /// unconstrained, use [`Domain::unconstrained`] instead.
    pub fn rect(lower: Vec<T>, upper: Vec<T>) -> Self {
        assert!(
            lower.len() == upper.len(),
            "lower and upper have different size"
        );

        let dim = lower.len();
        assert!(dim > 0, "empty domain");

        let magnitude = lower
            .iter()
            .copied()
            .zip(upper.iter().copied())
            .map(|(l, u)| estimate_magnitude_from_bounds(l, u));

        let dim = na::Dyn(dim);
        let magnitude = OVector::from_iterator_generic(dim, na::U1::name(), magnitude);
        let lower = OVector::from_iterator_generic(dim, na::U1::name(), lower);
        let upper = OVector::from_iterator_generic(dim, na::U1::name(), upper);

        Self {
            lower,
            upper,
            magnitude,
        }
    }

    /// Sets a custom expected magnitude for every variable.
    pub fn with_magnitude(mut self, magnitude: Vec<T>) -> Self {
        assert!(
            magnitude.len() == self.lower.nrows(),
            "magnitude has invalid dimension"
        );
        assert!(
            magnitude.iter().all(|m| *m > T::zero()),
            "magnitude must be positive"
        );

        let dim = na::Dyn(self.lower.nrows());
        self.magnitude = OVector::from_iterator_generic(dim, na::U1::name(), magnitude);
        self
    }

    /// Gets the dimensionality of the domain.
    pub fn dim(&self) -> usize {
        self.lower.nrows()
    }

    /// Gets the lower bounds.
    pub fn lower(&self) -> &OVector<T, na::Dyn> {
        &self.lower
    }

    /// Gets the upper bounds.
    pub fn upper(&self) -> &OVector<T, na::Dyn> {
        &self.upper
    }

    /// Gets the expected magnitude of the variables.
    pub fn magnitude(&self) -> &OVector<T, na::Dyn> {
        &self.magnitude
    }

    /// Projects given point into the domain.
    ///
    /// Returns true if the point was clamped in at least one dimension.
    pub fn project<D, Sx>(&self, x: &mut Vector<T, D, Sx>) -> bool
    where
        D: Dim,
        Sx: StorageMut<T, D>,
    {
        let mut not_feasible = false;

        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(x.iter_mut())
            .for_each(|((li, ui), xi)| {
                if &*xi < li {
                    *xi = *li;
                    not_feasible = true;
                } else if &*xi > ui {
                    *xi = *ui;
                    not_feasible = true;
                }
            });

        not_feasible
    }

    /// Projects given point into the domain in given dimension.
    pub fn project_in<D, Sx>(&self, x: &mut Vector<T, D, Sx>, i: usize) -> bool
    where
        D: Dim,
        Sx: StorageMut<T, D>,
    {
        let li = self.lower[(i, 0)];
        let ui = self.upper[(i, 0)];
        let xi = &mut x[(i, 0)];

        if *xi < li {
            *xi = li;
            true
        } else if *xi > ui {
            *xi = ui;
            true
        } else {
            false
        }
    }

    /// Samples a point in the domain with uniform distribution.
    ///
    /// For a dimension unbounded in some direction, the missing bound is
    /// replaced by a multiple of the magnitude of that variable.
    pub fn sample<D, Sx, R>(&self, x: &mut Vector<T, D, Sx>, rng: &mut R)
    where
        D: Dim,
        Sx: StorageMut<T, D>,
        R: Rng + ?Sized,
        T: SampleUniform,
    {
        let factor = T::from_subset(&UNBOUNDED_SAMPLE_FACTOR);

        x.iter_mut()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .zip(self.magnitude.iter())
            .for_each(|((xi, (li, ui)), mi)| {
                let li = if li.is_finite() { *li } else { -*mi * factor };
                let ui = if ui.is_finite() {
                    *ui
                } else {
                    (*mi * factor).max(li + *mi)
                };

                *xi = Uniform::new_inclusive(li, ui).sample(rng);
            });
    }
}

impl<T: RealField + Copy> FromIterator<(T, T)> for Domain<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let (lower, upper): (Vec<_>, Vec<_>) = iter.into_iter().unzip();
        Self::rect(lower, upper)
    }
}

impl<T: RealField + Copy> FromIterator<T> for Domain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let magnitude = iter.into_iter().collect::<Vec<_>>();
        Self::unconstrained(magnitude.len()).with_magnitude(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn project_clamps_to_bounds() {
        let dom = Domain::rect(vec![-1.0, 0.0], vec![1.0, 10.0]);

        let mut x = nalgebra::dvector![-2.0, 5.0];
        assert!(dom.project(&mut x));
        assert_eq!(x.as_slice(), &[-1.0, 5.0]);

        let mut x = nalgebra::dvector![0.5, 5.0];
        assert!(!dom.project(&mut x));
    }

    #[test]
    fn project_in_clamps_single_dimension() {
        let dom = Domain::rect(vec![-1.0, 0.0], vec![1.0, 10.0]);

        let mut x = nalgebra::dvector![-2.0, 15.0];
        assert!(dom.project_in(&mut x, 0));
        assert_eq!(x.as_slice(), &[-1.0, 15.0]);

        assert!(dom.project_in(&mut x, 1));
        assert_eq!(x.as_slice(), &[-1.0, 10.0]);

        assert!(!dom.project_in(&mut x, 1));
    }

    #[test]
    fn sample_within_bounds() {
        let dom = Domain::rect(vec![-1.0, 100.0], vec![1.0, 200.0]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut x = nalgebra::dvector![0.0, 0.0];

        for _ in 0..100 {
            dom.sample(&mut x, &mut rng);
            assert!(!dom.project(&mut x.clone()));
        }
    }

    #[test]
    fn sample_unbounded_is_finite() {
        let dom = Domain::<f64>::unconstrained(3);
        let mut rng = StdRng::seed_from_u64(7);
        let mut x = nalgebra::dvector![0.0, 0.0, 0.0];

        for _ in 0..100 {
            dom.sample(&mut x, &mut rng);
            assert!(x.iter().all(|xi| xi.is_finite()));
        }
    }

    #[test]
    fn magnitude_from_bounds() {
        let dom = Domain::rect(vec![-1e2, -1e-3], vec![1e2, 1e-3]);
        assert_eq!(dom.magnitude()[0], 1e2);
        assert_eq!(dom.magnitude()[1], 1e-3);
    }
}
