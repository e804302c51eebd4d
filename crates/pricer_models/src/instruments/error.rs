//! Instrument error types.
//!
//! This module provides structured error handling for payoff construction
//! and parsing.

use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidStrike`: Strike price is non-positive or not finite
/// - `UnknownPayoffType`: Payoff name could not be parsed
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid strike price (non-positive or not finite).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Unrecognised payoff type name.
    #[error("Unknown payoff type '{0}': expected call or put")]
    UnknownPayoffType(String),
}
