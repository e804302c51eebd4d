//! Error types for the finite-difference engine.

use pricer_core::types::LinearSolverError;
use thiserror::Error;

use crate::config::ConfigError;

/// Finite-difference pricing errors.
///
/// # Variants
/// - `LinearSolve`: the tridiagonal solve failed; carries the solver's error unchanged
/// - `Config`: the engine configuration is invalid
/// - `InvalidSpot`: the evaluation spot is not finite and positive
///
/// # Examples
/// ```
/// use pricer_core::types::LinearSolverError;
/// use pricer_pde::PdeError;
///
/// let err: PdeError = LinearSolverError::invalid_argument("empty system").into();
/// assert_eq!(err.to_string(), "Invalid argument: empty system");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PdeError {
    /// Failure inside the tridiagonal solve.
    #[error(transparent)]
    LinearSolve(#[from] LinearSolverError),

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Evaluation spot is not finite and positive.
    #[error("Invalid spot price: S0 = {0}")]
    InvalidSpot(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_solve_is_transparent() {
        let inner = LinearSolverError::SingularSystem {
            index: 3,
            pivot: 1e-17,
        };
        let err = PdeError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err, PdeError::LinearSolve(inner));
    }

    #[test]
    fn test_config_error_wrapped() {
        let err: PdeError = ConfigError::InvalidTimeSteps(0).into();
        assert!(err.to_string().starts_with("Invalid configuration:"));
    }
}
