//! Finite-difference engine configuration.
//!
//! This module provides the immutable [`PdeConfig`] and its validating
//! builder, together with the [`ThetaScheme`] time-stepping weight.

use std::fmt;

/// Ratio `s_max / s_min` of the log grid.
pub const S_MIN_RATIO: f64 = 3000.0;

/// Default number of space nodes.
pub const DEFAULT_SPACE_STEPS: usize = 250;

/// Default number of time steps.
pub const DEFAULT_TIME_STEPS: usize = 2500;

/// Minimum number of space nodes (one interior node).
pub const MIN_SPACE_STEPS: usize = 3;

/// Time-stepping weight of the generalized theta scheme.
///
/// - `Explicit`: θ = 0 (conditionally stable)
/// - `CrankNicolson`: θ = 0.5 (second order in time)
/// - `Implicit`: θ = 1 (fully implicit, first order in time)
/// - `Custom`: any θ in [0, 1]
///
/// # Examples
///
/// ```rust
/// use pricer_pde::config::ThetaScheme;
///
/// assert_eq!(ThetaScheme::CrankNicolson.weight(), 0.5);
/// assert_eq!(ThetaScheme::from_weight(1.0), ThetaScheme::Implicit);
/// assert_eq!(ThetaScheme::from_weight(0.7).weight(), 0.7);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThetaScheme {
    /// Forward Euler, θ = 0.
    Explicit,
    /// Crank-Nicolson, θ = 0.5.
    #[default]
    CrankNicolson,
    /// Backward Euler, θ = 1.
    Implicit,
    /// Arbitrary weight.
    Custom(f64),
}

impl ThetaScheme {
    /// Returns the implicit weight θ.
    #[inline]
    pub fn weight(&self) -> f64 {
        match self {
            ThetaScheme::Explicit => 0.0,
            ThetaScheme::CrankNicolson => 0.5,
            ThetaScheme::Implicit => 1.0,
            ThetaScheme::Custom(theta) => *theta,
        }
    }

    /// Maps a weight onto the matching named preset, or `Custom`.
    pub fn from_weight(theta: f64) -> Self {
        if theta == 0.0 {
            ThetaScheme::Explicit
        } else if theta == 0.5 {
            ThetaScheme::CrankNicolson
        } else if theta == 1.0 {
            ThetaScheme::Implicit
        } else {
            ThetaScheme::Custom(theta)
        }
    }
}

impl fmt::Display for ThetaScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThetaScheme::Explicit => write!(f, "explicit"),
            ThetaScheme::CrankNicolson => write!(f, "crank-nicolson"),
            ThetaScheme::Implicit => write!(f, "implicit"),
            ThetaScheme::Custom(theta) => write!(f, "theta={}", theta),
        }
    }
}

/// Configuration error for the finite-difference engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required parameter was never set on the builder.
    MissingParameter(&'static str),
    /// Invalid parameter value with name and description.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
    /// Theta weight outside [0, 1].
    InvalidThetaWeight(f64),
    /// Fewer than three space nodes.
    InvalidSpaceSteps(usize),
    /// Zero time steps.
    InvalidTimeSteps(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(name) => {
                write!(f, "Invalid parameter '{}': must be specified", name)
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter '{}': {}", name, value)
            }
            Self::InvalidThetaWeight(theta) => {
                write!(f, "Invalid theta weight {}: must be in range [0, 1]", theta)
            }
            Self::InvalidSpaceSteps(n) => {
                write!(
                    f,
                    "Invalid space step count {}: need at least {} nodes",
                    n, MIN_SPACE_STEPS
                )
            }
            Self::InvalidTimeSteps(m) => {
                write!(f, "Invalid time step count {}: must be at least 1", m)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Finite-difference engine configuration.
///
/// Immutable once built. Use [`PdeConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pde::config::{PdeConfig, ThetaScheme};
///
/// let config = PdeConfig::builder()
///     .maturity(1.0)
///     .rate(0.05)
///     .volatility(0.2)
///     .s_max(500.0)
///     .scheme(ThetaScheme::CrankNicolson)
///     .space_steps(250)
///     .time_steps(2500)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.dt(), 1.0 / 2500.0);
/// assert!((config.s_min() - 500.0 / 3000.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PdeConfigFields"))]
pub struct PdeConfig {
    /// Time to maturity in years (T).
    maturity: f64,
    /// Continuously compounded risk-free rate (r).
    rate: f64,
    /// Volatility (σ).
    volatility: f64,
    /// Upper edge of the spot grid.
    s_max: f64,
    /// Time-stepping weight.
    scheme: ThetaScheme,
    /// Number of space nodes (N).
    space_steps: usize,
    /// Number of time steps (M).
    time_steps: usize,
    /// Whether to estimate theta from the penultimate time layer.
    compute_theta: bool,
}

impl PdeConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> PdeConfigBuilder {
        PdeConfigBuilder::default()
    }

    /// Returns the time to maturity.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the upper edge of the spot grid.
    #[inline]
    pub fn s_max(&self) -> f64 {
        self.s_max
    }

    /// Returns the lower edge of the spot grid, `s_max / 3000`.
    #[inline]
    pub fn s_min(&self) -> f64 {
        self.s_max / S_MIN_RATIO
    }

    /// Returns the time-stepping scheme.
    #[inline]
    pub fn scheme(&self) -> ThetaScheme {
        self.scheme
    }

    /// Returns the implicit weight θ.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.scheme.weight()
    }

    /// Returns the number of space nodes.
    #[inline]
    pub fn space_steps(&self) -> usize {
        self.space_steps
    }

    /// Returns the number of time steps.
    #[inline]
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Returns whether theta is estimated.
    #[inline]
    pub fn compute_theta(&self) -> bool {
        self.compute_theta
    }

    /// Returns the time step `T / M`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.time_steps as f64
    }

    /// Returns the log-space step `(ln s_max - ln s_min) / (N - 1)`.
    #[inline]
    pub fn dx(&self) -> f64 {
        (self.s_max.ln() - self.s_min().ln()) / (self.space_steps - 1) as f64
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `maturity`, `volatility` or `s_max` is not finite and positive
    /// - `rate` is not finite
    /// - θ is outside [0, 1]
    /// - fewer than 3 space nodes or no time steps
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("maturity", self.maturity)?;
        positive("volatility", self.volatility)?;
        positive("s_max", self.s_max)?;
        if !self.rate.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "rate",
                value: format!("{} is not finite", self.rate),
            });
        }

        let theta = self.scheme.weight();
        if !(0.0..=1.0).contains(&theta) {
            return Err(ConfigError::InvalidThetaWeight(theta));
        }
        if self.space_steps < MIN_SPACE_STEPS {
            return Err(ConfigError::InvalidSpaceSteps(self.space_steps));
        }
        if self.time_steps == 0 {
            return Err(ConfigError::InvalidTimeSteps(self.time_steps));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value: format!("{} must be finite and positive", value),
        })
    }
}

/// Builder for [`PdeConfig`].
///
/// Market and contract parameters are required; the grid defaults to
/// Crank-Nicolson on 250 space nodes and 2500 time steps.
///
/// # Examples
///
/// ```rust
/// use pricer_pde::config::PdeConfig;
///
/// let result = PdeConfig::builder().maturity(1.0).rate(0.05).s_max(400.0).build();
/// assert!(result.is_err()); // volatility missing
/// ```
#[derive(Clone, Debug)]
pub struct PdeConfigBuilder {
    maturity: Option<f64>,
    rate: Option<f64>,
    volatility: Option<f64>,
    s_max: Option<f64>,
    scheme: ThetaScheme,
    space_steps: usize,
    time_steps: usize,
    compute_theta: bool,
}

impl Default for PdeConfigBuilder {
    fn default() -> Self {
        Self {
            maturity: None,
            rate: None,
            volatility: None,
            s_max: None,
            scheme: ThetaScheme::default(),
            space_steps: DEFAULT_SPACE_STEPS,
            time_steps: DEFAULT_TIME_STEPS,
            compute_theta: false,
        }
    }
}

impl PdeConfigBuilder {
    /// Sets the time to maturity in years.
    #[inline]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the upper edge of the spot grid.
    #[inline]
    pub fn s_max(mut self, s_max: f64) -> Self {
        self.s_max = Some(s_max);
        self
    }

    /// Sets the time-stepping scheme.
    #[inline]
    pub fn scheme(mut self, scheme: ThetaScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the time-stepping weight directly.
    #[inline]
    pub fn theta(mut self, theta: f64) -> Self {
        self.scheme = ThetaScheme::from_weight(theta);
        self
    }

    /// Sets the number of space nodes (N ≥ 3).
    #[inline]
    pub fn space_steps(mut self, space_steps: usize) -> Self {
        self.space_steps = space_steps;
        self
    }

    /// Sets the number of time steps (M ≥ 1).
    #[inline]
    pub fn time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Enables the penultimate-layer theta estimate.
    #[inline]
    pub fn compute_theta(mut self, compute_theta: bool) -> Self {
        self.compute_theta = compute_theta;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required parameter is missing or any
    /// value fails [`PdeConfig::validate`].
    pub fn build(self) -> Result<PdeConfig, ConfigError> {
        let config = PdeConfig {
            maturity: self
                .maturity
                .ok_or(ConfigError::MissingParameter("maturity"))?,
            rate: self.rate.ok_or(ConfigError::MissingParameter("rate"))?,
            volatility: self
                .volatility
                .ok_or(ConfigError::MissingParameter("volatility"))?,
            s_max: self.s_max.ok_or(ConfigError::MissingParameter("s_max"))?,
            scheme: self.scheme,
            space_steps: self.space_steps,
            time_steps: self.time_steps,
            compute_theta: self.compute_theta,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Unvalidated field set read by serde; converted through the builder.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PdeConfigFields {
    maturity: f64,
    rate: f64,
    volatility: f64,
    s_max: f64,
    #[serde(default)]
    scheme: ThetaScheme,
    #[serde(default = "default_space_steps")]
    space_steps: usize,
    #[serde(default = "default_time_steps")]
    time_steps: usize,
    #[serde(default)]
    compute_theta: bool,
}

#[cfg(feature = "serde")]
fn default_space_steps() -> usize {
    DEFAULT_SPACE_STEPS
}

#[cfg(feature = "serde")]
fn default_time_steps() -> usize {
    DEFAULT_TIME_STEPS
}

#[cfg(feature = "serde")]
impl TryFrom<PdeConfigFields> for PdeConfig {
    type Error = ConfigError;

    fn try_from(fields: PdeConfigFields) -> Result<Self, Self::Error> {
        PdeConfig::builder()
            .maturity(fields.maturity)
            .rate(fields.rate)
            .volatility(fields.volatility)
            .s_max(fields.s_max)
            .scheme(fields.scheme)
            .space_steps(fields.space_steps)
            .time_steps(fields.time_steps)
            .compute_theta(fields.compute_theta)
            .build()
    }
}
