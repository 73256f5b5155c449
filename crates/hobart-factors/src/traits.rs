//! Core trait definitions for factors.
//!
//! Every factor describes itself through [`Factor`]; score computation is an
//! inherent method on each factor because the inputs differ (a price window
//! for reversal momentum, an asset and a market return window for residual
//! momentum).

use crate::error::Result;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Sampling frequency of a factor's input observations.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFrequency {
    /// One observation per trading day
    #[display("daily")]
    Daily,
    /// One observation per calendar month
    #[display("monthly")]
    Monthly,
}

/// A cross-sectional ranking factor.
pub trait Factor: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this factor.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Human-readable description of what this factor measures.
    fn description(&self) -> &str;

    /// Frequency of the observations the factor consumes.
    fn frequency(&self) -> DataFrequency;

    /// Number of observations each instrument needs before it can be scored.
    fn lookback(&self) -> usize;

    /// Names of the input series the factor reads.
    fn required_inputs(&self) -> &[&str];
}

/// Configuration for a factor.
pub trait FactorConfig: Default + Clone + Send + Sync + std::fmt::Debug {
    /// Check that the parameters describe a computable factor.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A factor that supports runtime configuration.
pub trait ConfigurableFactor: Factor + Sized {
    /// Configuration type for this factor.
    type Config: FactorConfig;

    /// Create a new factor with the given configuration.
    ///
    /// The configuration is not validated; see [`ConfigurableFactor::try_with_config`].
    fn with_config(config: Self::Config) -> Self;

    /// Create a new factor after validating the configuration.
    fn try_with_config(config: Self::Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}
