//! # Pricer Models (L2: Business Logic)
//!
//! Payoff definitions and closed-form reference prices.
//!
//! This crate provides:
//! - The [`Payoff`](instruments::Payoff) capability consumed by the
//!   finite-difference engine
//! - Vanilla call and put payoffs
//! - Black-Scholes prices and Greeks for validation
//!
//! ## Example
//!
//! ```
//! use pricer_models::analytical::BlackScholes;
//! use pricer_models::instruments::{Payoff, VanillaPayoff};
//!
//! let call = VanillaPayoff::call(100.0).unwrap();
//! assert_eq!(call.evaluate(105.0), 5.0);
//!
//! let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
//! assert!(bs.price_call(call.strike(), 1.0) > 10.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
