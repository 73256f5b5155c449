//! Ranking and basket selection.
//!
//! Both selectors take the scores of the instruments that are ready this
//! cycle, in symbol order, and return at most `basket_size` names per side.
//! Sorts are stable so ties keep symbol order.

use crate::config::{ResidualStrategyConfig, ReversalStrategyConfig};
use chrono::NaiveDate;
use hobart_data::Month;
use hobart_factors::{ReversalScore, ScoreError};
use serde::Serialize;

/// Long and short baskets for one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Instruments to buy
    pub long: Vec<String>,
    /// Instruments to sell short
    pub short: Vec<String>,
}

impl Selection {
    /// True when neither basket has members.
    pub fn is_empty(&self) -> bool {
        self.long.is_empty() && self.short.is_empty()
    }

    /// True when both baskets have members; only then is a rebalance issued.
    pub fn is_tradable(&self) -> bool {
        !self.long.is_empty() && !self.short.is_empty()
    }

    /// Whether `symbol` is in either basket.
    pub fn contains(&self, symbol: &str) -> bool {
        self.long.iter().chain(&self.short).any(|s| s == symbol)
    }

    /// Every selected symbol, long first.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.long.iter().chain(&self.short).map(String::as_str)
    }
}

/// Everything a universe evaluation produced
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Day of the evaluation
    pub date: NaiveDate,
    /// Month the evaluation belongs to
    pub month: Month,
    /// Instruments that passed the coarse screen
    pub eligible: usize,
    /// Instruments that were scored and ranked
    pub ranked: usize,
    /// Ready instruments dropped because their score could not be computed
    pub excluded: Vec<(String, ScoreError)>,
    /// The baskets
    pub selection: Selection,
}

/// Pick reversal-adjusted momentum baskets.
///
/// Ranks by yearly return, takes the top and bottom `pool_fraction` as
/// winners and losers, then goes long the lowest-momentum winners and short
/// the highest-momentum losers. The short basket keeps ascending momentum
/// order.
pub fn select_reversal(
    mut scores: Vec<(String, ReversalScore)>,
    rules: &ReversalStrategyConfig,
) -> Selection {
    let n = scores.len();
    if n <= rules.min_universe {
        tracing::info!(
            universe = n,
            required = rules.min_universe,
            "Too few ready instruments for reversal momentum"
        );
        return Selection::default();
    }

    scores.sort_by(|a, b| b.1.yearly_return.total_cmp(&a.1.yearly_return));
    let pool = (n as f64 * rules.pool_fraction).floor() as usize;

    let mut winners: Vec<&(String, ReversalScore)> = scores[..pool].iter().collect();
    let mut losers: Vec<&(String, ReversalScore)> = scores[n - pool..].iter().collect();
    winners.sort_by(|a, b| a.1.momentum.total_cmp(&b.1.momentum));
    losers.sort_by(|a, b| a.1.momentum.total_cmp(&b.1.momentum));

    let long = winners
        .iter()
        .take(rules.basket_size)
        .map(|(symbol, _)| symbol.clone())
        .collect();
    let short = losers
        .iter()
        .skip(losers.len().saturating_sub(rules.basket_size))
        .map(|(symbol, _)| symbol.clone())
        .collect();

    Selection { long, short }
}

/// Pick residual momentum baskets.
///
/// Ranks by score descending; the first `basket_size` go long and the last
/// `basket_size` not already long go short, in ranking order.
pub fn select_residual(mut scores: Vec<(String, f64)>, rules: &ResidualStrategyConfig) -> Selection {
    let n = scores.len();
    if n <= rules.min_universe {
        tracing::info!(
            universe = n,
            required = rules.min_universe,
            "Too few ready instruments for residual momentum"
        );
        return Selection::default();
    }

    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let long: Vec<String> = scores
        .iter()
        .take(rules.basket_size)
        .map(|(symbol, _)| symbol.clone())
        .collect();
    // Never reach back into the long basket when the universe is small
    let short_len = rules.basket_size.min(n - long.len());
    let short = scores[n - short_len..]
        .iter()
        .map(|(symbol, _)| symbol.clone())
        .collect();

    Selection { long, short }
}
