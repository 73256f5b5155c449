//! Coarse universe screen
//!
//! Stands in for the coarse selection a data vendor performs: a liquidity
//! floor, an optional price floor and the vendor's fundamentals-coverage
//! flag. The flag is trusted as given; fundamentals are never inspected.

use crate::panel::CoarseRecord;
use serde::{Deserialize, Serialize};

/// Configuration for the coarse screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoarseScreenConfig {
    /// Minimum daily dollar volume, exclusive (default: 10,000,000)
    pub min_dollar_volume: f64,
    /// Minimum adjusted price, exclusive (default: none)
    pub min_price: Option<f64>,
    /// Require the fundamentals-coverage flag (default: true)
    pub require_fundamentals: bool,
}

impl Default for CoarseScreenConfig {
    fn default() -> Self {
        Self {
            min_dollar_volume: 10_000_000.0,
            min_price: None,
            require_fundamentals: true,
        }
    }
}

/// Filters daily records down to the eligible universe
#[derive(Debug, Clone, Default)]
pub struct CoarseScreen {
    config: CoarseScreenConfig,
}

impl CoarseScreen {
    /// Create a screen.
    pub const fn new(config: CoarseScreenConfig) -> Self {
        Self { config }
    }

    /// Same screen with a price floor.
    pub fn with_min_price(mut self, min_price: Option<f64>) -> Self {
        self.config.min_price = min_price;
        self
    }

    /// The screen configuration.
    pub const fn config(&self) -> &CoarseScreenConfig {
        &self.config
    }

    /// Whether a single record is eligible.
    pub fn passes(&self, record: &CoarseRecord) -> bool {
        if self.config.require_fundamentals && !record.has_fundamentals {
            return false;
        }
        if record.dollar_volume <= self.config.min_dollar_volume {
            return false;
        }
        self.config
            .min_price
            .is_none_or(|floor| record.adjusted_close > floor)
    }

    /// Eligible records, in input order.
    pub fn apply<'a>(&self, records: &'a [CoarseRecord]) -> Vec<&'a CoarseRecord> {
        records.iter().filter(|r| self.passes(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(symbol: &str, price: f64, dollar_volume: f64, fundamentals: bool) -> CoarseRecord {
        CoarseRecord {
            date: NaiveDate::from_ymd_opt(2017, 3, 1).unwrap(),
            symbol: symbol.to_string(),
            adjusted_close: price,
            dollar_volume,
            has_fundamentals: fundamentals,
        }
    }

    #[test]
    fn test_default_screen() {
        let screen = CoarseScreen::default();
        assert!(screen.passes(&record("AAA", 3.0, 2e7, true)));
        assert!(!screen.passes(&record("BBB", 30.0, 1e7, true)));
        assert!(!screen.passes(&record("CCC", 30.0, 5e7, false)));
    }

    #[test]
    fn test_price_floor() {
        let screen = CoarseScreen::default().with_min_price(Some(5.0));
        let records = vec![
            record("AAA", 5.0, 2e7, true),
            record("BBB", 5.01, 2e7, true),
            record("CCC", 50.0, 2e7, true),
        ];
        let eligible: Vec<&str> = screen
            .apply(&records)
            .into_iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(eligible, vec!["BBB", "CCC"]);
    }

    #[test]
    fn test_fundamentals_not_required() {
        let screen = CoarseScreen::new(CoarseScreenConfig {
            require_fundamentals: false,
            ..Default::default()
        });
        assert!(screen.passes(&record("AAA", 10.0, 2e7, false)));
    }
}
