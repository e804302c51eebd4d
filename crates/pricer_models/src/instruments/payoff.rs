//! Terminal payoff definitions.
//!
//! A payoff maps the spot at maturity to the option's terminal value. The
//! finite-difference engine only needs that one pure operation, so it is
//! modelled as the [`Payoff`] capability trait rather than a hierarchy.

use std::fmt;
use std::str::FromStr;

use super::error::InstrumentError;

/// Terminal payoff capability.
///
/// Implementations must be pure and deterministic, and are only evaluated
/// for `spot > 0`.
///
/// Any `Fn(f64) -> f64` is a payoff, which makes ad-hoc payoffs easy to
/// price:
///
/// ```
/// use pricer_models::instruments::Payoff;
///
/// let digital = |spot: f64| if spot > 100.0 { 1.0 } else { 0.0 };
/// assert_eq!(digital.evaluate(120.0), 1.0);
/// ```
pub trait Payoff {
    /// Terminal value for the given spot.
    fn evaluate(&self, spot: f64) -> f64;
}

impl<F> Payoff for F
where
    F: Fn(f64) -> f64,
{
    #[inline]
    fn evaluate(&self, spot: f64) -> f64 {
        self(spot)
    }
}

/// Type of vanilla option payoff.
///
/// # Variants
/// - `Call`: max(S - K, 0)
/// - `Put`: max(K - S, 0)
///
/// # Examples
/// ```
/// use pricer_models::instruments::PayoffType;
///
/// let call: PayoffType = "call".parse().unwrap();
/// assert_eq!(call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(PayoffType::Put.intrinsic(110.0, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PayoffType {
    /// Call option: max(S - K, 0)
    Call,
    /// Put option: max(K - S, 0)
    Put,
}

impl PayoffType {
    /// Exact intrinsic value for given spot and strike.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            PayoffType::Call => (spot - strike).max(0.0),
            PayoffType::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns whether this payoff is a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, PayoffType::Call)
    }

    /// Returns whether this payoff is a put.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, PayoffType::Put)
    }
}

impl fmt::Display for PayoffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffType::Call => write!(f, "call"),
            PayoffType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for PayoffType {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" | "1" => Ok(PayoffType::Call),
            "put" | "p" | "0" => Ok(PayoffType::Put),
            _ => Err(InstrumentError::UnknownPayoffType(s.to_string())),
        }
    }
}

/// Vanilla European payoff with a fixed strike.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{Payoff, VanillaPayoff};
///
/// let put = VanillaPayoff::put(100.0).unwrap();
/// assert_eq!(put.evaluate(80.0), 20.0);
/// assert_eq!(put.evaluate(120.0), 0.0);
///
/// assert!(VanillaPayoff::call(-5.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaPayoff {
    payoff_type: PayoffType,
    strike: f64,
}

impl VanillaPayoff {
    /// Creates a vanilla payoff.
    ///
    /// # Errors
    /// - `InstrumentError::InvalidStrike` if strike is not finite and positive
    pub fn new(payoff_type: PayoffType, strike: f64) -> Result<Self, InstrumentError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        Ok(Self {
            payoff_type,
            strike,
        })
    }

    /// Creates a call payoff max(S - K, 0).
    pub fn call(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(PayoffType::Call, strike)
    }

    /// Creates a put payoff max(K - S, 0).
    pub fn put(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(PayoffType::Put, strike)
    }

    /// Returns the payoff type.
    #[inline]
    pub fn payoff_type(&self) -> PayoffType {
        self.payoff_type
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }
}

impl Payoff for VanillaPayoff {
    #[inline]
    fn evaluate(&self, spot: f64) -> f64 {
        self.payoff_type.intrinsic(spot, self.strike)
    }
}
