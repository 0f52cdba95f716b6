use crate::core::domain::Domain;

/// Trait implemented by real numbers usable as the field of a problem.
pub trait RealField: nalgebra::RealField {
    /// Square root of the machine epsilon of the type. Useful as a tolerance
    /// below which differences of function values are indistinguishable from
    /// numerical noise.
    const EPSILON_SQRT: Self;
}

impl RealField for f32 {
    const EPSILON_SQRT: Self = 0.00034526698;
}

impl RealField for f64 {
    const EPSILON_SQRT: Self = 0.000000014901161193847656;
}

pub(crate) trait NanToInf {
    /// Maps any non-finite value to positive infinity so that comparisons
    /// against finite values behave as "worse than anything".
    fn nan_to_inf(self) -> Self;
}

impl<T: nalgebra::RealField> NanToInf for T {
    fn nan_to_inf(self) -> Self {
        if self.is_finite() {
            self
        } else {
            // Not finite also covers NaN and negative infinity.
            T::from_subset(&f64::INFINITY)
        }
    }
}

/// The base trait for [`Function`](super::function::Function).
///
/// A problem defines the scalar type of its variables and its
/// [domain](Domain), that is, dimensionality and optional bound constraints.
pub trait Problem {
    /// Type of the field, usually f32 or f64.
    type Field: RealField + Copy;

    /// Gets the domain (dimensionality and bound constraints) of the problem.
    fn domain(&self) -> Domain<Self::Field>;
}
