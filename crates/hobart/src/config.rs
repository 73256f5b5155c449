//! Configuration
//!
//! One TOML document with a section per concern:
//!
//! ```toml
//! [screen]
//! min_dollar_volume = 10000000.0
//! require_fundamentals = true
//!
//! [reversal]
//! lookback_months = 13
//! min_universe = 50
//! pool_fraction = 0.3
//! basket_size = 10
//! min_price = 5.0
//!
//! [residual]
//! window = 252
//! regression_window = 21
//! score_mode = "legacy"
//! single_precision = false
//! min_universe = 100
//! basket_size = 10
//! min_price = 5.0
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown.
//!
//! `screen.min_price` (unset by default) applies to both strategies. The
//! reversal strategy's own `min_price` takes precedence when set; leaving
//! both unset disables the price floor for it.

use hobart_data::CoarseScreenConfig;
use hobart_factors::{FactorConfig, ResidualMomentumConfig, ReversalMomentumConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Reversal-adjusted momentum strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReversalStrategyConfig {
    /// Factor parameters
    #[serde(flatten)]
    pub factor: ReversalMomentumConfig,
    /// Ready instruments required, exclusive (default: 50)
    pub min_universe: usize,
    /// Share of the ranking forming each of the winner and loser pools (default: 0.3)
    pub pool_fraction: f64,
    /// Instruments per basket (default: 10)
    pub basket_size: usize,
    /// Coarse price floor, exclusive (default: 5.0)
    pub min_price: Option<f64>,
}

impl Default for ReversalStrategyConfig {
    fn default() -> Self {
        Self {
            factor: ReversalMomentumConfig::default(),
            min_universe: 50,
            pool_fraction: 0.3,
            basket_size: 10,
            min_price: Some(5.0),
        }
    }
}

/// Residual momentum strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualStrategyConfig {
    /// Factor parameters
    #[serde(flatten)]
    pub factor: ResidualMomentumConfig,
    /// Ready instruments required, exclusive (default: 100)
    pub min_universe: usize,
    /// Instruments per basket (default: 10)
    pub basket_size: usize,
    /// Last price an instrument needs to be ranked, exclusive (default: 5.0)
    pub min_price: f64,
}

impl Default for ResidualStrategyConfig {
    fn default() -> Self {
        Self {
            factor: ResidualMomentumConfig::default(),
            min_universe: 100,
            basket_size: 10,
            min_price: 5.0,
        }
    }
}

/// Logging parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (default: "info")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HobartConfig {
    /// Coarse universe screen
    pub screen: CoarseScreenConfig,
    /// Reversal-adjusted momentum strategy
    pub reversal: ReversalStrategyConfig,
    /// Residual momentum strategy
    pub residual: ResidualStrategyConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl HobartConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen.min_dollar_volume >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "screen.min_dollar_volume must be non-negative, got {}",
                self.screen.min_dollar_volume
            )));
        }
        self.reversal.validate()?;
        self.residual.validate()
    }
}

fn invalid_factor(e: hobart_factors::ScoreError) -> ConfigError {
    ConfigError::Invalid(e.to_string())
}

impl ReversalStrategyConfig {
    /// Check the factor window, pool fraction and basket size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.factor.validate().map_err(invalid_factor)?;
        if !(self.pool_fraction > 0.0 && self.pool_fraction <= 0.5) {
            return Err(ConfigError::Invalid(format!(
                "reversal.pool_fraction must be in (0, 0.5], got {}",
                self.pool_fraction
            )));
        }
        if self.basket_size == 0 {
            return Err(ConfigError::Invalid(
                "reversal.basket_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ResidualStrategyConfig {
    /// Check the factor windows and basket size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.factor.validate().map_err(invalid_factor)?;
        if self.basket_size == 0 {
            return Err(ConfigError::Invalid(
                "residual.basket_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<config dir>/hobart/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hobart").join("config.toml"))
}
