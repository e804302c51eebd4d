//! Analytical pricing formulas for European options.
//!
//! Closed-form Black-Scholes prices and Greeks, used as the reference
//! against which finite-difference results are checked.

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::{BlackScholes, Greeks};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
