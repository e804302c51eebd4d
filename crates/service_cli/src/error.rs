//! CLI error types.

use pricer_core::types::LinearSolverError;
use pricer_models::analytical::AnalyticalError;
use pricer_models::instruments::InstrumentError;
use pricer_pde::PdeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `pricer` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line argument or prompt answer.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// CLI configuration file problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine parameters rejected.
    #[error("Engine configuration error: {0}")]
    EngineConfig(#[from] pricer_pde::ConfigError),

    /// Finite-difference pricing failure.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PdeError),

    /// Tridiagonal solver failure outside the engine.
    #[error("Linear solver error: {0}")]
    Solver(#[from] LinearSolverError),

    /// Invalid payoff definition.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    /// Invalid closed-form model inputs.
    #[error("Analytical model error: {0}")]
    Analytical(#[from] AnalyticalError),

    /// Validation cases exceeded the tolerance.
    #[error("{failed} of {total} validation cases exceeded tolerance {tolerance}")]
    ValidationFailed {
        /// Number of failing cases.
        failed: usize,
        /// Number of cases run.
        total: usize,
        /// Absolute error tolerance.
        tolerance: f64,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
