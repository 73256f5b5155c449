//! Reversal-adjusted momentum strategy.
//!
//! Windows hold one price per month: the adjusted close on the first
//! universe evaluation after a month-start signal. Only instruments that
//! pass the coarse screen (including its price floor) that day receive a
//! price, so an instrument that drops out of the universe keeps its window
//! but falls behind.

use super::{Strategy, StrategyKind, SymbolScore, by_symbol};
use crate::config::{HobartConfig, ReversalStrategyConfig};
use crate::error::StrategyError;
use crate::rebalance::StrategyContext;
use crate::selection::{SelectionOutcome, select_reversal};
use chrono::NaiveDate;
use hobart_data::{CoarseRecord, CoarseScreen, CoarseScreenConfig, Month};
use hobart_factors::{
    ConfigurableFactor, ReversalMomentumFactor, RollingWindow, ScoreError,
};
use std::collections::BTreeMap;

/// Monthly reversal-adjusted momentum long/short
#[derive(Debug, Clone)]
pub struct ReversalMomentumStrategy {
    factor: ReversalMomentumFactor,
    rules: ReversalStrategyConfig,
    screen: CoarseScreen,
    empty_window: RollingWindow,
    windows: BTreeMap<String, RollingWindow>,
    context: StrategyContext,
}

impl ReversalMomentumStrategy {
    /// Create the strategy.
    ///
    /// The price floor is `rules.min_price`, falling back to the screen's.
    pub fn new(
        rules: ReversalStrategyConfig,
        screen: CoarseScreenConfig,
    ) -> Result<Self, StrategyError> {
        rules.validate()?;
        let factor = ReversalMomentumFactor::try_with_config(rules.factor.clone())?;
        let empty_window = factor.new_window()?;
        let min_price = rules.min_price.or(screen.min_price);
        let screen = CoarseScreen::new(screen).with_min_price(min_price);
        Ok(Self {
            factor,
            rules,
            screen,
            empty_window,
            windows: BTreeMap::new(),
            context: StrategyContext::new(),
        })
    }

    /// Create the strategy from the `[screen]` and `[reversal]` sections.
    pub fn from_config(config: &HobartConfig) -> Result<Self, StrategyError> {
        Self::new(config.reversal.clone(), config.screen.clone())
    }

    /// Selection rules.
    pub const fn rules(&self) -> &ReversalStrategyConfig {
        &self.rules
    }

    /// Monthly price window of `symbol`.
    pub fn window(&self, symbol: &str) -> Option<&RollingWindow> {
        self.windows.get(symbol)
    }
}

impl Strategy for ReversalMomentumStrategy {
    fn name(&self) -> &str {
        "reversal_momentum"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Reversal
    }

    fn on_universe(
        &mut self,
        date: NaiveDate,
        records: &[CoarseRecord],
    ) -> Option<SelectionOutcome> {
        if !self.context.is_awaiting() {
            return None;
        }

        let eligible = self.screen.apply(records);
        let mut scores = Vec::new();
        let mut excluded = Vec::new();

        for record in &eligible {
            let window = self
                .windows
                .entry(record.symbol.clone())
                .or_insert_with(|| self.empty_window.clone());
            window.append(record.adjusted_close);
            if !window.is_ready() {
                continue;
            }
            match self.factor.score(window) {
                Ok(score) => scores.push((record.symbol.clone(), score)),
                Err(e) => {
                    tracing::warn!(symbol = %record.symbol, %date, error = %e, "Excluding instrument");
                    excluded.push((record.symbol.clone(), e));
                }
            }
        }

        let ranked = scores.len();
        let selection = select_reversal(by_symbol(scores), &self.rules);
        tracing::info!(
            %date,
            eligible = eligible.len(),
            ranked,
            long = selection.long.len(),
            short = selection.short.len(),
            "Reversal momentum selection"
        );
        self.context.complete_selection(selection.clone());

        Some(SelectionOutcome {
            date,
            month: Month::of(date),
            eligible: eligible.len(),
            ranked,
            excluded,
            selection,
        })
    }

    fn score_symbol(&self, symbol: &str) -> Result<SymbolScore, ScoreError> {
        let window = self.windows.get(symbol).ok_or(ScoreError::InsufficientData {
            required: self.rules.factor.lookback_months,
            actual: 0,
        })?;
        self.factor.score(window).map(SymbolScore::Reversal)
    }

    fn tracked(&self) -> usize {
        self.windows.len()
    }

    fn context(&self) -> &StrategyContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StrategyContext {
        &mut self.context
    }
}
