//! Reversal-Adjusted Momentum Factor
//!
//! Reads a window of month-end prices, newest-first: `p[0]` is the latest
//! close and `p[n-1]` the oldest. The latest month is skipped everywhere:
//!
//! - `yearly_return = (p[1] - p[n-1]) / p[n-1]`, the pre-filter
//! - `r_k = (p[k] - p[k+1]) / p[k+1]` for `k = 1..=n-2`
//! - `momentum = prod(1 + r_k)^(1 / (n-2)) - 1`, the geometric mean monthly return
//!
//! With the default 13-price window this is the 12-month return ending one
//! month ago and the 11-month geometric mean return before the latest month.

use crate::error::{Result, ScoreError};
use crate::traits::{ConfigurableFactor, DataFrequency, Factor, FactorConfig};
use crate::window::RollingWindow;
use serde::{Deserialize, Serialize};

/// Configuration for the reversal-adjusted momentum factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReversalMomentumConfig {
    /// Number of month-end prices in the window (default: 13)
    pub lookback_months: usize,
}

impl Default for ReversalMomentumConfig {
    fn default() -> Self {
        Self {
            lookback_months: 13,
        }
    }
}

impl FactorConfig for ReversalMomentumConfig {
    fn validate(&self) -> Result<()> {
        // Skipping the latest month still has to leave at least one return
        if self.lookback_months < 3 {
            return Err(ScoreError::InvalidParameter(format!(
                "lookback_months must be at least 3, got {}",
                self.lookback_months
            )));
        }
        Ok(())
    }
}

/// Score pair for one instrument in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReversalScore {
    /// Return from the oldest price to the price one month ago
    pub yearly_return: f64,
    /// Geometric mean monthly return over the same span
    pub momentum: f64,
}

/// Reversal-adjusted momentum over a monthly price window
#[derive(Debug, Clone, Default)]
pub struct ReversalMomentumFactor {
    config: ReversalMomentumConfig,
}

impl ReversalMomentumFactor {
    /// Create an empty price window sized for this factor.
    pub fn new_window(&self) -> Result<RollingWindow> {
        RollingWindow::new(self.config.lookback_months)
    }

    /// Score a ready price window.
    ///
    /// # Errors
    /// * [`ScoreError::InsufficientData`] if the window is not full yet
    /// * [`ScoreError::ZeroPrice`] if a denominator price is zero
    /// * [`ScoreError::NonFinite`] if a price or the result is not finite
    pub fn score(&self, window: &RollingWindow) -> Result<ReversalScore> {
        if !window.is_ready() {
            return Err(ScoreError::InsufficientData {
                required: self.config.lookback_months,
                actual: window.len(),
            });
        }
        self.score_prices(&window.to_sequence())
    }

    /// Score a newest-first price slice.
    ///
    /// Only the first `lookback_months` prices are read.
    pub fn score_prices(&self, prices: &[f64]) -> Result<ReversalScore> {
        let n = self.config.lookback_months;
        if prices.len() < n {
            return Err(ScoreError::InsufficientData {
                required: n,
                actual: prices.len(),
            });
        }
        let prices = &prices[..n];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(ScoreError::NonFinite("price window"));
        }

        let oldest = denominator(prices, n - 1)?;
        let yearly_return = (prices[1] - oldest) / oldest;

        let exponent = 1.0 / (n - 2) as f64;
        let momentum = monthly_returns(prices)?
            .into_iter()
            .map(|r| (1.0 + r).powf(exponent))
            .product::<f64>()
            - 1.0;

        if !momentum.is_finite() || !yearly_return.is_finite() {
            return Err(ScoreError::NonFinite("momentum"));
        }

        Ok(ReversalScore {
            yearly_return,
            momentum,
        })
    }
}

/// Month-over-month returns that skip the latest month.
///
/// For a newest-first slice of `n` prices returns `r_1..r_{n-2}` where
/// `r_k = (p[k] - p[k+1]) / p[k+1]`.
pub fn monthly_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 3 {
        return Err(ScoreError::InsufficientData {
            required: 3,
            actual: prices.len(),
        });
    }
    (1..prices.len() - 1)
        .map(|k| {
            let base = denominator(prices, k + 1)?;
            Ok((prices[k] - base) / base)
        })
        .collect()
}

fn denominator(prices: &[f64], position: usize) -> Result<f64> {
    let price = prices[position];
    if price == 0.0 {
        return Err(ScoreError::ZeroPrice { position });
    }
    Ok(price)
}

impl Factor for ReversalMomentumFactor {
    fn name(&self) -> &str {
        "reversal_momentum"
    }

    fn description(&self) -> &str {
        "11-month geometric mean return skipping the latest month"
    }

    fn frequency(&self) -> DataFrequency {
        DataFrequency::Monthly
    }

    fn lookback(&self) -> usize {
        self.config.lookback_months
    }

    fn required_inputs(&self) -> &[&str] {
        &["symbol", "date", "adjusted_close"]
    }
}

impl ConfigurableFactor for ReversalMomentumFactor {
    type Config = ReversalMomentumConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EXAMPLE: [f64; 13] = [
        110.0, 108.0, 107.0, 105.0, 104.0, 103.0, 101.0, 100.0, 99.0, 98.0, 97.0, 96.0, 95.0,
    ];

    fn ready_window(prices_newest_first: &[f64]) -> RollingWindow {
        let mut window = RollingWindow::new(prices_newest_first.len()).unwrap();
        for price in prices_newest_first.iter().rev() {
            window.append(*price);
        }
        window
    }

    #[test]
    fn test_factor_metadata() {
        let factor = ReversalMomentumFactor::default();
        assert_eq!(factor.name(), "reversal_momentum");
        assert_eq!(factor.frequency(), DataFrequency::Monthly);
        assert_eq!(factor.lookback(), 13);
        assert!(factor.required_inputs().contains(&"adjusted_close"));
    }

    #[test]
    fn test_example_window() {
        let factor = ReversalMomentumFactor::default();
        let score = factor.score(&ready_window(&EXAMPLE)).unwrap();

        assert_relative_eq!(score.yearly_return, 13.0 / 95.0, epsilon = 1e-12);
        assert_relative_eq!(score.yearly_return, 0.1368, epsilon = 1e-4);

        // The monthly returns telescope to p[1] / p[12]
        let expected = (108.0_f64 / 95.0).powf(1.0 / 11.0) - 1.0;
        assert_relative_eq!(score.momentum, expected, epsilon = 1e-12);
        assert_relative_eq!(score.momentum, 0.011_727_7, epsilon = 1e-7);
    }

    #[test]
    fn test_latest_month_ignored() {
        let factor = ReversalMomentumFactor::default();
        let mut shocked = EXAMPLE;
        shocked[0] = 1_000.0;

        let base = factor.score_prices(&EXAMPLE).unwrap();
        let score = factor.score_prices(&shocked).unwrap();
        assert_eq!(base, score);
    }

    #[test]
    fn test_not_ready() {
        let factor = ReversalMomentumFactor::default();
        let mut window = factor.new_window().unwrap();
        for price in &EXAMPLE[..12] {
            window.append(*price);
        }
        assert_eq!(
            factor.score(&window),
            Err(ScoreError::InsufficientData {
                required: 13,
                actual: 12
            })
        );
    }

    #[test]
    fn test_zero_denominator() {
        let factor = ReversalMomentumFactor::default();

        let mut prices = EXAMPLE;
        prices[12] = 0.0;
        assert_eq!(
            factor.score_prices(&prices),
            Err(ScoreError::ZeroPrice { position: 12 })
        );

        let mut prices = EXAMPLE;
        prices[5] = 0.0;
        assert_eq!(
            factor.score_prices(&prices),
            Err(ScoreError::ZeroPrice { position: 5 })
        );
    }

    #[test]
    fn test_latest_zero_price_is_not_a_denominator() {
        let factor = ReversalMomentumFactor::default();
        let mut prices = EXAMPLE;
        prices[0] = 0.0;
        assert!(factor.score_prices(&prices).is_ok());
    }

    #[test]
    fn test_negative_gross_return_is_non_finite() {
        let factor = ReversalMomentumFactor::default();
        let mut prices = EXAMPLE;
        prices[3] = -50.0;
        assert!(matches!(
            factor.score_prices(&prices),
            Err(ScoreError::NonFinite(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        let config = ReversalMomentumConfig { lookback_months: 2 };
        assert!(ReversalMomentumFactor::try_with_config(config).is_err());

        let config = ReversalMomentumConfig { lookback_months: 7 };
        let factor = ReversalMomentumFactor::try_with_config(config).unwrap();
        assert_eq!(factor.config().lookback_months, 7);
        assert_eq!(factor.new_window().unwrap().capacity(), 7);
    }

    #[test]
    fn test_monthly_returns_skip_latest() {
        let returns = monthly_returns(&EXAMPLE).unwrap();
        assert_eq!(returns.len(), 11);
        assert_relative_eq!(returns[0], (108.0 - 107.0) / 107.0, epsilon = 1e-15);
        assert_relative_eq!(returns[10], (96.0 - 95.0) / 95.0, epsilon = 1e-15);
    }
}
