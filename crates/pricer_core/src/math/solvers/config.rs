//! Solver configuration types.

use num_traits::Float;

/// Default minimum pivot magnitude accepted during elimination.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-15;

/// Configuration for direct tridiagonal elimination.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for the tolerance (e.g., `f64`)
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::TridiagonalConfig;
///
/// let config: TridiagonalConfig<f64> = TridiagonalConfig::default();
/// assert_eq!(config.pivot_tolerance, 1e-15);
///
/// let custom = TridiagonalConfig::new(1e-12);
/// assert!(custom.pivot_tolerance > config.pivot_tolerance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TridiagonalConfig<T: Float> {
    /// Smallest pivot magnitude the forward sweep will divide by.
    ///
    /// Any `|b[0]|` or `|b[i] - a[i]·c'[i-1]|` below this value aborts the
    /// solve with `LinearSolverError::SingularSystem`.
    pub pivot_tolerance: T,
}

impl<T: Float> Default for TridiagonalConfig<T> {
    /// Default values:
    /// - `pivot_tolerance`: 1e-15
    fn default() -> Self {
        Self {
            pivot_tolerance: T::from(DEFAULT_PIVOT_TOLERANCE).unwrap_or_else(T::epsilon),
        }
    }
}

impl<T: Float> TridiagonalConfig<T> {
    /// Create a new configuration with the given pivot tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `pivot_tolerance <= 0`.
    pub fn new(pivot_tolerance: T) -> Self {
        assert!(
            pivot_tolerance > T::zero(),
            "pivot_tolerance must be positive"
        );
        Self { pivot_tolerance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: TridiagonalConfig<f64> = TridiagonalConfig::default();
        assert!((config.pivot_tolerance - 1e-15).abs() < 1e-30);
    }

    #[test]
    fn test_new_config() {
        let config: TridiagonalConfig<f64> = TridiagonalConfig::new(1e-10);
        assert_eq!(config.pivot_tolerance, 1e-10);
    }

    #[test]
    #[should_panic(expected = "pivot_tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: TridiagonalConfig<f64> = TridiagonalConfig::new(0.0);
    }

    #[test]
    fn test_config_with_f32() {
        let config: TridiagonalConfig<f32> = TridiagonalConfig::default();
        assert!(config.pivot_tolerance > 0.0);
    }
}
