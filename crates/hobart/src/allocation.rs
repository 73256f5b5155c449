//! Equal-weight target allocation.
//!
//! A [`RebalancePlan`] is an instruction set, not an execution: every long
//! gets `+1/|long|`, every short `-1/|short|`, and held instruments outside
//! both baskets are liquidated.

use crate::selection::Selection;
use serde::Serialize;
use std::collections::BTreeSet;

/// Target portfolio weight for one instrument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetWeight {
    /// Instrument identifier
    pub symbol: String,
    /// Signed fraction of portfolio value
    pub weight: f64,
}

/// Orders for one rebalance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RebalancePlan {
    /// Target weights, longs first
    pub targets: Vec<TargetWeight>,
    /// Held instruments to close out, sorted
    pub liquidations: Vec<String>,
}

impl RebalancePlan {
    /// True when the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.liquidations.is_empty()
    }

    /// Sum of target weights.
    pub fn net_exposure(&self) -> f64 {
        self.targets.iter().map(|t| t.weight).sum()
    }

    /// Sum of absolute target weights.
    pub fn gross_exposure(&self) -> f64 {
        self.targets.iter().map(|t| t.weight.abs()).sum()
    }

    /// Update a held set as if the plan had been filled.
    pub fn apply(&self, held: &mut BTreeSet<String>) {
        for symbol in &self.liquidations {
            held.remove(symbol);
        }
        held.extend(self.targets.iter().map(|t| t.symbol.clone()));
    }
}

/// Build the plan that moves `held` to an equal-weight long/short book.
///
/// Returns an empty plan unless both baskets are non-empty.
pub fn plan_rebalance(selection: &Selection, held: &BTreeSet<String>) -> RebalancePlan {
    if !selection.is_tradable() {
        return RebalancePlan::default();
    }

    let long_weight = 1.0 / selection.long.len() as f64;
    let short_weight = -1.0 / selection.short.len() as f64;

    let targets = selection
        .long
        .iter()
        .map(|symbol| (symbol, long_weight))
        .chain(selection.short.iter().map(|symbol| (symbol, short_weight)))
        .map(|(symbol, weight)| TargetWeight {
            symbol: symbol.clone(),
            weight,
        })
        .collect();

    let liquidations = held
        .iter()
        .filter(|symbol| !selection.contains(symbol))
        .cloned()
        .collect();

    RebalancePlan {
        targets,
        liquidations,
    }
}
