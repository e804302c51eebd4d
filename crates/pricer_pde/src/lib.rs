//! # Pricer PDE (L3: Engine)
//!
//! Theta-scheme finite-difference pricing of European options under
//! Black-Scholes dynamics.
//!
//! The Black-Scholes equation is solved backward from the terminal payoff on
//! a uniform grid in `x = ln S`, with Dirichlet boundaries that are
//! re-evaluated each step and one tridiagonal solve per time step.
//!
//! ## Modules
//!
//! - [`config`]: validated engine parameters and the theta weight
//! - [`grid`]: uniform log-spot grid
//! - [`scheme`]: implicit and explicit operator assembly
//! - [`boundary`]: edge values and right-edge classification
//! - [`engine`]: the backward march
//! - [`result`]: price and Greeks post-processing
//!
//! ## Example
//!
//! ```
//! use pricer_models::instruments::VanillaPayoff;
//! use pricer_pde::{PdeConfig, PdeEngine, ThetaScheme};
//!
//! let config = PdeConfig::builder()
//!     .maturity(0.5)
//!     .rate(0.03)
//!     .volatility(0.25)
//!     .s_max(400.0)
//!     .scheme(ThetaScheme::Implicit)
//!     .space_steps(200)
//!     .time_steps(500)
//!     .build()
//!     .unwrap();
//!
//! let mut engine = PdeEngine::new(config);
//! let put = VanillaPayoff::put(100.0).unwrap();
//! let result = engine.solve(&put, 100.0).unwrap();
//! assert!(result.delta < 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod boundary;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod result;
pub mod scheme;

pub use config::{ConfigError, PdeConfig, PdeConfigBuilder, ThetaScheme};
pub use engine::PdeEngine;
pub use error::PdeError;
pub use result::{PricingResult, ValueGrid};
