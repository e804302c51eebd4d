//! Black-Scholes pricing model for European options.
//!
//! This module provides the Black-Scholes model for pricing European
//! call and put options with analytical Greeks, including a continuous
//! dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use crate::instruments::PayoffType;

/// Expiries at or below this are treated as already expired.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price (S)
    spot: f64,
    /// Risk-free interest rate (r)
    rate: f64,
    /// Continuous dividend yield (q)
    dividend_yield: f64,
    /// Volatility (σ)
    volatility: f64,
}

/// Price and first-order sensitivities of a European option.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// Option value
    pub price: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂σ
    pub vega: f64,
    /// ∂V/∂t (calendar time, usually negative)
    pub theta: f64,
    /// ∂V/∂r
    pub rho: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model with no dividends.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, may be negative)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or not finite
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or not finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0, 0.05, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0).is_err());
    /// ```
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }

        Ok(Self {
            spot,
            rate,
            dividend_yield: 0.0,
            volatility,
        })
    }

    /// Returns a copy of the model with a continuous dividend yield.
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Computes the d1 term of the Black-Scholes formula.
    ///
    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    ///
    /// Returns ±100 (or 0 at the money) once the option has expired.
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return if self.spot > strike {
                100.0
            } else if self.spot < strike {
                -100.0
            } else {
                0.0
            };
        }

        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility)
            * expiry;

        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// Computes the d2 term of the Black-Scholes formula.
    ///
    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes European call option price.
    ///
    /// Returns intrinsic value at expiry.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    /// assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-3);
    /// ```
    #[inline]
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (self.spot - strike).max(0.0);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);

        self.spot * self.carry(expiry) * norm_cdf(d1)
            - strike * self.discount(expiry) * norm_cdf(d2)
    }

    /// Computes European put option price.
    ///
    /// Returns intrinsic value at expiry.
    #[inline]
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (strike - self.spot).max(0.0);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);

        strike * self.discount(expiry) * norm_cdf(-d2)
            - self.spot * self.carry(expiry) * norm_cdf(-d1)
    }

    /// Prices either side of a vanilla European option.
    #[inline]
    pub fn price(&self, payoff_type: PayoffType, strike: f64, expiry: f64) -> f64 {
        match payoff_type {
            PayoffType::Call => self.price_call(strike, expiry),
            PayoffType::Put => self.price_put(strike, expiry),
        }
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = e^(-qT)·N(d₁)
    /// - Put Delta = e^(-qT)·(N(d₁) - 1)
    #[inline]
    pub fn delta(&self, strike: f64, expiry: f64, is_call: bool) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return match (is_call, self.spot > strike, self.spot < strike) {
                (true, true, _) => 1.0,
                (false, _, true) => -1.0,
                _ => 0.0,
            };
        }

        let n_d1 = norm_cdf(self.d1(strike, expiry));
        let carry = self.carry(expiry);
        if is_call {
            carry * n_d1
        } else {
            carry * (n_d1 - 1.0)
        }
    }

    /// Computes Gamma (∂²V/∂S²), identical for calls and puts.
    ///
    /// Gamma = e^(-qT)·φ(d₁) / (S·σ·√T)
    #[inline]
    pub fn gamma(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        self.carry(expiry) * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega (∂V/∂σ), identical for calls and puts.
    ///
    /// Vega = S·e^(-qT)·√T·φ(d₁)
    #[inline]
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        self.spot * self.carry(expiry) * expiry.sqrt() * norm_pdf(d1)
    }

    /// Computes Theta (∂V/∂t), the rate of change in calendar time.
    ///
    /// - Call: -(S·e^(-qT)·σ·φ(d₁))/(2√T) - r·K·e^(-rT)·N(d₂) + q·S·e^(-qT)·N(d₁)
    /// - Put: -(S·e^(-qT)·σ·φ(d₁))/(2√T) + r·K·e^(-rT)·N(-d₂) - q·S·e^(-qT)·N(-d₁)
    #[inline]
    pub fn theta(&self, strike: f64, expiry: f64, is_call: bool) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let carried_spot = self.spot * self.carry(expiry);
        let discounted_strike = strike * self.discount(expiry);

        let decay = -(carried_spot * self.volatility * norm_pdf(d1)) / (2.0 * expiry.sqrt());

        if is_call {
            decay - self.rate * discounted_strike * norm_cdf(d2)
                + self.dividend_yield * carried_spot * norm_cdf(d1)
        } else {
            decay + self.rate * discounted_strike * norm_cdf(-d2)
                - self.dividend_yield * carried_spot * norm_cdf(-d1)
        }
    }

    /// Computes Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = -K·T·e^(-rT)·N(-d₂)
    #[inline]
    pub fn rho(&self, strike: f64, expiry: f64, is_call: bool) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d2 = self.d2(strike, expiry);
        let scale = strike * expiry * self.discount(expiry);

        if is_call {
            scale * norm_cdf(d2)
        } else {
            -scale * norm_cdf(-d2)
        }
    }

    /// Computes price and all first-order Greeks in one call.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    /// use pricer_models::instruments::PayoffType;
    ///
    /// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    /// let greeks = bs.greeks(PayoffType::Put, 100.0, 1.0);
    /// assert!(greeks.delta < 0.0);
    /// assert!(greeks.gamma > 0.0);
    /// ```
    pub fn greeks(&self, payoff_type: PayoffType, strike: f64, expiry: f64) -> Greeks {
        let is_call = payoff_type.is_call();
        Greeks {
            price: self.price(payoff_type, strike, expiry),
            delta: self.delta(strike, expiry, is_call),
            gamma: self.gamma(strike, expiry),
            vega: self.vega(strike, expiry),
            theta: self.theta(strike, expiry, is_call),
            rho: self.rho(strike, expiry, is_call),
        }
    }

    #[inline]
    fn discount(&self, expiry: f64) -> f64 {
        (-self.rate * expiry).exp()
    }

    #[inline]
    fn carry(&self, expiry: f64) -> f64 {
        (-self.dividend_yield * expiry).exp()
    }
}
