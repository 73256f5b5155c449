//! Error types for strategy construction and replay.

use crate::config::ConfigError;
use hobart_data::DataError;
use hobart_factors::ScoreError;
use thiserror::Error;

/// Errors that stop a strategy from being built or replayed.
///
/// Per-instrument scoring failures never surface here; they exclude the
/// instrument from its cycle and are reported in the
/// [`SelectionOutcome`](crate::SelectionOutcome).
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Invalid factor parameters
    #[error("Factor error: {0}")]
    Factor(#[from] ScoreError),

    /// Input data could not be read
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The residual strategy was replayed without a market index
    #[error("Residual momentum needs a market index")]
    MissingMarket,
}
