//! Monthly rebalance trigger.
//!
//! ```text
//! Idle --month start--> AwaitingSelection --universe--> ReadyToTrade --tick--> Idle
//!                                  \--empty basket--> Idle
//! ```

use crate::selection::Selection;
use hobart_data::Month;

/// Where a strategy is in its monthly cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RebalanceState {
    /// Nothing pending
    #[default]
    Idle,
    /// A month started; the next universe evaluation selects
    AwaitingSelection,
    /// Baskets selected; the next portfolio tick trades them
    ReadyToTrade(Selection),
}

/// Rebalance state plus the month that last triggered it
#[derive(Debug, Clone, Default)]
pub struct StrategyContext {
    state: RebalanceState,
    last_triggered: Option<Month>,
}

impl StrategyContext {
    /// Fresh idle context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub const fn state(&self) -> &RebalanceState {
        &self.state
    }

    /// Month of the most recent accepted month-start signal.
    pub const fn last_triggered(&self) -> Option<Month> {
        self.last_triggered
    }

    /// True while waiting for a universe evaluation.
    pub fn is_awaiting(&self) -> bool {
        self.state == RebalanceState::AwaitingSelection
    }

    /// Signal the start of `month`.
    ///
    /// Returns false and changes nothing when `month` was already signalled.
    /// A selection still pending from an earlier month is dropped.
    pub fn on_month_start(&mut self, month: Month) -> bool {
        if self.last_triggered == Some(month) {
            return false;
        }
        if let RebalanceState::ReadyToTrade(stale) = &self.state {
            tracing::warn!(
                %month,
                long = stale.long.len(),
                short = stale.short.len(),
                "Dropping untraded selection"
            );
        }
        self.last_triggered = Some(month);
        self.state = RebalanceState::AwaitingSelection;
        true
    }

    /// Hand over the baskets of the pending evaluation.
    ///
    /// Moves to `ReadyToTrade` when both baskets have members, otherwise back
    /// to `Idle`. Ignored unless awaiting.
    pub fn complete_selection(&mut self, selection: Selection) {
        if !self.is_awaiting() {
            return;
        }
        self.state = if selection.is_tradable() {
            RebalanceState::ReadyToTrade(selection)
        } else {
            RebalanceState::Idle
        };
    }

    /// Take the baskets to trade, returning to `Idle`.
    pub fn take_ready(&mut self) -> Option<Selection> {
        match std::mem::take(&mut self.state) {
            RebalanceState::ReadyToTrade(selection) => Some(selection),
            other => {
                self.state = other;
                None
            }
        }
    }
}
