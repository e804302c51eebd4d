//! Error types for structured error handling.
//!
//! This module provides:
//! - `LinearSolverError`: Errors from direct linear-system solvers

use thiserror::Error;

/// Direct linear solver errors.
///
/// Raised synchronously by the tridiagonal solver. A singular system signals a
/// badly constructed discretisation rather than a transient condition, so
/// callers are expected to propagate it unchanged.
///
/// # Variants
/// - `InvalidArgument`: Empty system or coefficient vectors of differing lengths
/// - `SingularSystem`: A pivot fell below the numerical tolerance during elimination
///
/// # Examples
/// ```
/// use pricer_core::types::LinearSolverError;
///
/// let err = LinearSolverError::SingularSystem { index: 0, pivot: 0.0 };
/// assert!(format!("{}", err).contains("row 0"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinearSolverError {
    /// Mismatched or degenerate input sizes.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pivot magnitude below tolerance during forward elimination.
    #[error("Singular system: pivot {pivot:e} at row {index}")]
    SingularSystem {
        /// Row at which elimination broke down
        index: usize,
        /// Offending pivot value
        pivot: f64,
    },
}

impl LinearSolverError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if the error is a singular-system failure.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularSystem { .. })
    }
}
