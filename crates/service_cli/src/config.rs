//! CLI configuration management.
//!
//! Handles loading of `pricer.toml` with `PRICER_*` environment variable
//! overrides. Every key is optional; a missing file yields the defaults.
//!
//! ```toml
//! log_level = "info"
//!
//! [output]
//! format = "table"
//! precision = 5
//!
//! [engine]
//! theta = 0.5
//! space_steps = 250
//! time_steps = 2500
//! s_max_multiplier = 4.0
//!
//! [validation]
//! tolerance = 0.05
//! ```

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output rendering for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
    /// CSV with header row
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "Unknown format: {}. Supported: table, json, csv",
                other
            )),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format
    pub format: OutputFormat,
    /// Decimal places for fixed-point output
    pub precision: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            precision: 5,
        }
    }
}

/// Default engine grid used when the command line does not override it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Theta-scheme weight
    pub theta: f64,
    /// Number of space nodes
    pub space_steps: usize,
    /// Number of time steps
    pub time_steps: usize,
    /// `S_max = multiplier × K` when no explicit S_max is given
    pub s_max_multiplier: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            theta: 0.5,
            space_steps: pricer_pde::config::DEFAULT_SPACE_STEPS,
            time_steps: pricer_pde::config::DEFAULT_TIME_STEPS,
            s_max_multiplier: 4.0,
        }
    }
}

/// Validation suite settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Maximum absolute error against the closed form
    pub tolerance: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Engine defaults
    #[serde(default)]
    pub engine: EngineSettings,

    /// Validation suite settings
    #[serde(default)]
    pub validation: ValidationSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputSettings::default(),
            engine: EngineSettings::default(),
            validation: ValidationSettings::default(),
        }
    }
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Recognised keys: `PRICER_LOG_LEVEL`, `PRICER_OUTPUT_FORMAT`,
    /// `PRICER_OUTPUT_PRECISION`, `PRICER_ENGINE_THETA`,
    /// `PRICER_ENGINE_SPACE_STEPS`, `PRICER_ENGINE_TIME_STEPS`,
    /// `PRICER_ENGINE_S_MAX_MULTIPLIER` and `PRICER_VALIDATION_TOLERANCE`.
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Values that fail to parse are collected into
    /// `ConfigError::Validation` rather than ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        if let Some(log_level) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(format) = parse_override(&lookup, "PRICER_OUTPUT_FORMAT", &mut errors) {
            self.output.format = format;
        }
        if let Some(precision) = parse_override(&lookup, "PRICER_OUTPUT_PRECISION", &mut errors) {
            self.output.precision = precision;
        }
        if let Some(theta) = parse_override(&lookup, "PRICER_ENGINE_THETA", &mut errors) {
            self.engine.theta = theta;
        }
        if let Some(n) = parse_override(&lookup, "PRICER_ENGINE_SPACE_STEPS", &mut errors) {
            self.engine.space_steps = n;
        }
        if let Some(m) = parse_override(&lookup, "PRICER_ENGINE_TIME_STEPS", &mut errors) {
            self.engine.time_steps = m;
        }
        if let Some(multiplier) =
            parse_override(&lookup, "PRICER_ENGINE_S_MAX_MULTIPLIER", &mut errors)
        {
            self.engine.s_max_multiplier = multiplier;
        }
        if let Some(tolerance) =
            parse_override(&lookup, "PRICER_VALIDATION_TOLERANCE", &mut errors)
        {
            self.validation.tolerance = tolerance;
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.output.precision > 15 {
            errors.push(format!(
                "output.precision {} exceeds maximum allowed (15)",
                self.output.precision
            ));
        }

        if !(0.0..=1.0).contains(&self.engine.theta) {
            errors.push(format!(
                "engine.theta {} must be in range [0, 1]",
                self.engine.theta
            ));
        }

        if self.engine.space_steps < pricer_pde::config::MIN_SPACE_STEPS {
            errors.push(format!(
                "engine.space_steps {} must be at least {}",
                self.engine.space_steps,
                pricer_pde::config::MIN_SPACE_STEPS
            ));
        }

        if self.engine.time_steps == 0 {
            errors.push("engine.time_steps must be greater than 0".to_string());
        }

        if !(self.engine.s_max_multiplier > 1.0 && self.engine.s_max_multiplier.is_finite()) {
            errors.push(format!(
                "engine.s_max_multiplier {} must be finite and greater than 1",
                self.engine.s_max_multiplier
            ));
        }

        if !(self.validation.tolerance > 0.0 && self.validation.tolerance.is_finite()) {
            errors.push(format!(
                "validation.tolerance {} must be finite and positive",
                self.validation.tolerance
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (if present) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_override<T, F>(lookup: &F, key: &str, errors: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(format!("{}='{}' could not be parsed: {}", key, raw, e));
            None
        }
    }
}

/// Configuration error type
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file
    Io(String),
    /// Parse error in config file
    Parse(String),
    /// Validation error
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Validation(errors) => write!(f, "Validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {}
