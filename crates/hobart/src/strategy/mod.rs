//! Strategies driven one trading day at a time.
//!
//! A driver calls, for every trading day in order:
//!
//! 1. [`Strategy::on_market`] with the market index close
//! 2. [`Strategy::on_universe`] with the day's coarse records
//! 3. [`Strategy::on_data`] with the currently held instruments
//! 4. [`Strategy::on_month_start`] on the first trading day of a month
//!
//! Because the month-start signal comes last, a month's selection happens at
//! the next day's universe evaluation and is traded at that day's tick.

pub mod residual;
pub mod reversal;

pub use residual::ResidualMomentumStrategy;
pub use reversal::ReversalMomentumStrategy;

use crate::allocation::{RebalancePlan, plan_rebalance};
use crate::config::HobartConfig;
use crate::error::StrategyError;
use crate::rebalance::StrategyContext;
use crate::selection::SelectionOutcome;
use chrono::NaiveDate;
use hobart_data::{CoarseRecord, Month};
use hobart_factors::{ResidualScore, ReversalScore, ScoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The available strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Reversal-adjusted price momentum on month-start prices
    Reversal,
    /// Residual momentum on daily returns against the market
    Residual,
}

impl StrategyKind {
    /// All kinds.
    pub const ALL: [Self; 2] = [Self::Reversal, Self::Residual];

    /// Name of the factor the strategy ranks on.
    pub const fn factor_name(self) -> &'static str {
        match self {
            Self::Reversal => "reversal_momentum",
            Self::Residual => "residual_momentum",
        }
    }

    /// Whether the strategy needs a market index.
    pub const fn needs_market(self) -> bool {
        matches!(self, Self::Residual)
    }

    /// Build the strategy from a configuration.
    pub fn build(self, config: &HobartConfig) -> Result<Box<dyn Strategy>, StrategyError> {
        Ok(match self {
            Self::Reversal => Box::new(ReversalMomentumStrategy::from_config(config)?),
            Self::Residual => Box::new(ResidualMomentumStrategy::from_config(config)?),
        })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reversal => write!(f, "reversal"),
            Self::Residual => write!(f, "residual"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reversal" | "reversal_momentum" | "momentum" => Ok(Self::Reversal),
            "residual" | "residual_momentum" => Ok(Self::Residual),
            other => Err(format!(
                "unknown strategy '{other}', expected 'reversal' or 'residual'"
            )),
        }
    }
}

/// Current factor score of one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "factor", rename_all = "snake_case")]
pub enum SymbolScore {
    /// Reversal-adjusted momentum
    Reversal(ReversalScore),
    /// Residual momentum
    Residual(ResidualScore),
}

/// A monthly long/short strategy
pub trait Strategy {
    /// Strategy name.
    fn name(&self) -> &str;

    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Record the market index close for `date`.
    fn on_market(&mut self, _date: NaiveDate, _close: f64) {}

    /// Evaluate the day's universe.
    ///
    /// Returns the selection outcome on the day a selection is made.
    fn on_universe(&mut self, date: NaiveDate, records: &[CoarseRecord])
    -> Option<SelectionOutcome>;

    /// Portfolio tick: trade a pending selection against the held set.
    fn on_data(&mut self, date: NaiveDate, held: &BTreeSet<String>) -> Option<RebalancePlan> {
        let selection = self.context_mut().take_ready()?;
        let plan = plan_rebalance(&selection, held);
        tracing::info!(
            strategy = self.name(),
            %date,
            long = selection.long.len(),
            short = selection.short.len(),
            liquidations = plan.liquidations.len(),
            "Rebalancing"
        );
        Some(plan)
    }

    /// Month-start signal. Returns false if `month` was already signalled.
    fn on_month_start(&mut self, month: Month) -> bool {
        let accepted = self.context_mut().on_month_start(month);
        if accepted {
            tracing::debug!(strategy = self.name(), %month, "Month start");
        }
        accepted
    }

    /// Score one instrument from the strategy's current windows.
    fn score_symbol(&self, symbol: &str) -> Result<SymbolScore, ScoreError>;

    /// Instruments with a window.
    fn tracked(&self) -> usize;

    /// Rebalance state.
    fn context(&self) -> &StrategyContext;

    /// Mutable rebalance state.
    fn context_mut(&mut self) -> &mut StrategyContext;
}

/// Sort scored instruments into symbol order.
pub(crate) fn by_symbol<T>(mut scores: Vec<(String, T)>) -> Vec<(String, T)> {
    scores.sort_by(|a, b| a.0.cmp(&b.0));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("reversal", StrategyKind::Reversal)]
    #[case("Residual", StrategyKind::Residual)]
    #[case("residual_momentum", StrategyKind::Residual)]
    fn test_parse_kind(#[case] input: &str, #[case] expected: StrategyKind) {
        assert_eq!(input.parse::<StrategyKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert!("value".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_kind_metadata() {
        for kind in StrategyKind::ALL {
            assert!(hobart_factors::get_factor_info(kind.factor_name()).is_some());
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
        assert!(StrategyKind::Residual.needs_market());
        assert!(!StrategyKind::Reversal.needs_market());
    }

    #[test]
    fn test_build_from_default_config() {
        let config = HobartConfig::default();
        for kind in StrategyKind::ALL {
            let strategy = kind.build(&config).unwrap();
            assert_eq!(strategy.kind(), kind);
            assert_eq!(strategy.tracked(), 0);
        }
    }
}
