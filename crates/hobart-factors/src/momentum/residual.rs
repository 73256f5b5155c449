//! Residual Momentum Factor
//!
//! Regresses an instrument's most recent daily returns on the market's over
//! the same days (`asset = beta * market + alpha + e`) and compounds what the
//! market model leaves unexplained.
//!
//! Two quantities can be compounded, selected by [`ResidualScoreMode`]:
//!
//! - [`ResidualScoreMode::Legacy`] compounds the solver's aggregate residual,
//!   the sum of squared residuals. With a single aggregate value the score
//!   equals it.
//! - [`ResidualScoreMode::Cumulative`] compounds the per-day residuals,
//!   `prod(1 + e_t) - 1`, the cumulative residual return.

use crate::error::{Result, ScoreError};
use crate::regression::{OlsFit, market_model};
use crate::series::ReturnSeries;
use crate::traits::{ConfigurableFactor, DataFrequency, Factor, FactorConfig};
use crate::window::RollingWindow;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which regression residual quantity is compounded into the score
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualScoreMode {
    /// Compound the sum of squared residuals
    #[default]
    #[display("legacy")]
    Legacy,
    /// Compound the per-observation residual returns
    #[display("cumulative")]
    Cumulative,
}

/// Configuration for the residual momentum factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualMomentumConfig {
    /// Daily returns kept per instrument (default: 252 = 12 months)
    pub window: usize,
    /// Most recent returns used in the regression (default: 21 = 1 month)
    pub regression_window: usize,
    /// Residual quantity to compound (default: legacy)
    pub score_mode: ResidualScoreMode,
    /// Round inputs through `f32` before fitting (default: false)
    pub single_precision: bool,
}

impl Default for ResidualMomentumConfig {
    fn default() -> Self {
        Self {
            window: 252,
            regression_window: 21,
            score_mode: ResidualScoreMode::Legacy,
            single_precision: false,
        }
    }
}

impl FactorConfig for ResidualMomentumConfig {
    fn validate(&self) -> Result<()> {
        // Two coefficients need at least three observations to leave a residual
        if self.regression_window < 3 {
            return Err(ScoreError::InvalidParameter(format!(
                "regression_window must be at least 3, got {}",
                self.regression_window
            )));
        }
        if self.regression_window > self.window {
            return Err(ScoreError::InvalidParameter(format!(
                "regression_window {} exceeds return window {}",
                self.regression_window, self.window
            )));
        }
        Ok(())
    }
}

/// Residual momentum score and the fit it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualScore {
    /// Ranking score
    pub score: f64,
    /// Market beta of the fit
    pub slope: f64,
    /// Intercept of the fit
    pub intercept: f64,
    /// Sum of squared residuals of the fit
    pub ssr: f64,
}

/// Residual momentum relative to a market return series
#[derive(Debug, Clone, Default)]
pub struct ResidualMomentumFactor {
    config: ResidualMomentumConfig,
}

impl ResidualMomentumFactor {
    /// Create an empty return series sized for this factor.
    ///
    /// Used for both instruments and the market index.
    pub fn new_series(&self) -> Result<ReturnSeries> {
        ReturnSeries::new(self.config.window)
    }

    /// Score an instrument against the market.
    ///
    /// Both windows must be ready. The most recent `regression_window`
    /// returns of each are aligned by recency.
    pub fn score(&self, asset: &RollingWindow, market: &RollingWindow) -> Result<ResidualScore> {
        for window in [asset, market] {
            if !window.is_ready() || window.len() < self.config.regression_window {
                return Err(ScoreError::InsufficientData {
                    required: self.config.window,
                    actual: window.len(),
                });
            }
        }
        let n = self.config.regression_window;
        self.score_returns(&asset.most_recent(n), &market.most_recent(n))
    }

    /// Score chronological return slices.
    ///
    /// Only the last `regression_window` values of each slice are used.
    pub fn score_returns(&self, asset: &[f64], market: &[f64]) -> Result<ResidualScore> {
        if asset.len() != market.len() {
            return Err(ScoreError::DimensionMismatch {
                expected: market.len(),
                actual: asset.len(),
            });
        }
        let n = self.config.regression_window;
        if asset.len() < n {
            return Err(ScoreError::InsufficientData {
                required: n,
                actual: asset.len(),
            });
        }

        let start = asset.len() - n;
        let (asset, market) = if self.config.single_precision {
            (narrow(&asset[start..]), narrow(&market[start..]))
        } else {
            (asset[start..].to_vec(), market[start..].to_vec())
        };

        let fit = market_model(&asset, &market)?;
        let score = self.compound(&fit);
        if !score.is_finite() {
            return Err(ScoreError::NonFinite("residual score"));
        }

        Ok(ResidualScore {
            score,
            slope: fit.slope(),
            intercept: fit.intercept(),
            ssr: fit.ssr,
        })
    }

    fn compound(&self, fit: &OlsFit) -> f64 {
        match self.config.score_mode {
            ResidualScoreMode::Legacy => compound([fit.ssr]),
            ResidualScoreMode::Cumulative => compound(fit.residuals.iter().copied()),
        }
    }
}

/// `prod(1 + v) - 1`
fn compound(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(1.0, |acc, v| acc * (1.0 + v)) - 1.0
}

fn narrow(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&v| f64::from(v as f32)).collect()
}

impl Factor for ResidualMomentumFactor {
    fn name(&self) -> &str {
        "residual_momentum"
    }

    fn description(&self) -> &str {
        "Compounded market-model residual over the most recent month"
    }

    fn frequency(&self) -> DataFrequency {
        DataFrequency::Daily
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn required_inputs(&self) -> &[&str] {
        &["symbol", "date", "adjusted_close", "market_return"]
    }
}

impl ConfigurableFactor for ResidualMomentumFactor {
    type Config = ResidualMomentumConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
