//! Payoff definitions.
//!
//! # Types
//!
//! - [`Payoff`]: capability trait with a single pure `evaluate(spot)` operation
//! - [`PayoffType`]: Call / Put tag with exact intrinsic value
//! - [`VanillaPayoff`]: strike-carrying European payoff
//!
//! # Examples
//!
//! ```
//! use pricer_models::instruments::{Payoff, PayoffType, VanillaPayoff};
//!
//! let call = VanillaPayoff::new(PayoffType::Call, 100.0).unwrap();
//! assert_eq!(call.evaluate(110.0), 10.0);
//! ```

mod error;
mod payoff;

pub use error::InstrumentError;
pub use payoff::{Payoff, PayoffType, VanillaPayoff};
