//! Residual momentum strategy.
//!
//! Every universe evaluation feeds the day's adjusted close of each screened
//! instrument into its return series; the market index close arrives through
//! [`Strategy::on_market`]. At a selection the instruments of the day's
//! universe that are ready and priced above the floor are regressed on the
//! market and ranked.

use super::{Strategy, StrategyKind, SymbolScore, by_symbol};
use crate::config::{HobartConfig, ResidualStrategyConfig};
use crate::error::StrategyError;
use crate::rebalance::StrategyContext;
use crate::selection::{Selection, SelectionOutcome, select_residual};
use chrono::NaiveDate;
use hobart_data::{CoarseRecord, CoarseScreen, CoarseScreenConfig, Month};
use hobart_factors::{ConfigurableFactor, ResidualMomentumFactor, ReturnSeries, ScoreError};
use std::collections::BTreeMap;

/// Monthly residual momentum long/short
#[derive(Debug, Clone)]
pub struct ResidualMomentumStrategy {
    factor: ResidualMomentumFactor,
    rules: ResidualStrategyConfig,
    screen: CoarseScreen,
    empty_series: ReturnSeries,
    market: ReturnSeries,
    series: BTreeMap<String, ReturnSeries>,
    context: StrategyContext,
}

impl ResidualMomentumStrategy {
    /// Create the strategy.
    ///
    /// The screen's own price floor applies to the daily updates; the
    /// ranking floor is `rules.min_price`.
    pub fn new(
        rules: ResidualStrategyConfig,
        screen: CoarseScreenConfig,
    ) -> Result<Self, StrategyError> {
        rules.validate()?;
        let factor = ResidualMomentumFactor::try_with_config(rules.factor.clone())?;
        let empty_series = factor.new_series()?;
        Ok(Self {
            market: empty_series.clone(),
            factor,
            rules,
            screen: CoarseScreen::new(screen),
            empty_series,
            series: BTreeMap::new(),
            context: StrategyContext::new(),
        })
    }

    /// Create the strategy from the `[screen]` and `[residual]` sections.
    pub fn from_config(config: &HobartConfig) -> Result<Self, StrategyError> {
        Self::new(config.residual.clone(), config.screen.clone())
    }

    /// Selection rules.
    pub const fn rules(&self) -> &ResidualStrategyConfig {
        &self.rules
    }

    /// Market return series.
    pub const fn market(&self) -> &ReturnSeries {
        &self.market
    }

    /// Return series of `symbol`.
    pub fn series(&self, symbol: &str) -> Option<&ReturnSeries> {
        self.series.get(symbol)
    }

    fn rankable(&self, series: &ReturnSeries) -> bool {
        series.is_ready()
            && series
                .last_price()
                .is_some_and(|price| price > self.rules.min_price)
    }
}

impl Strategy for ResidualMomentumStrategy {
    fn name(&self) -> &str {
        "residual_momentum"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Residual
    }

    fn on_market(&mut self, _date: NaiveDate, close: f64) {
        self.market.update(close);
    }

    fn on_universe(
        &mut self,
        date: NaiveDate,
        records: &[CoarseRecord],
    ) -> Option<SelectionOutcome> {
        let eligible = self.screen.apply(records);
        for record in &eligible {
            self.series
                .entry(record.symbol.clone())
                .or_insert_with(|| self.empty_series.clone())
                .update(record.adjusted_close);
        }

        if !self.context.is_awaiting() {
            return None;
        }

        let mut scores = Vec::new();
        let mut excluded = Vec::new();

        if self.market.is_ready() {
            for record in &eligible {
                let Some(series) = self.series.get(&record.symbol) else {
                    continue;
                };
                if !self.rankable(series) {
                    continue;
                }
                match self.factor.score(series.returns(), self.market.returns()) {
                    Ok(score) => scores.push((record.symbol.clone(), score.score)),
                    Err(e) => {
                        tracing::warn!(symbol = %record.symbol, %date, error = %e, "Excluding instrument");
                        excluded.push((record.symbol.clone(), e));
                    }
                }
            }
        } else {
            tracing::warn!(
                %date,
                returns = self.market.returns().len(),
                required = self.market.returns().capacity(),
                "Market return window not ready, skipping selection"
            );
        }

        let ranked = scores.len();
        let selection = if ranked > 0 {
            select_residual(by_symbol(scores), &self.rules)
        } else {
            Selection::default()
        };
        tracing::info!(
            %date,
            eligible = eligible.len(),
            ranked,
            long = selection.long.len(),
            short = selection.short.len(),
            "Residual momentum selection"
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
        let series = self.series.get(symbol).ok_or(ScoreError::InsufficientData {
            required: self.rules.factor.window,
            actual: 0,
        })?;
        self.factor
            .score(series.returns(), self.market.returns())
            .map(SymbolScore::Residual)
    }

    fn tracked(&self) -> usize {
        self.series.len()
    }

    fn context(&self) -> &StrategyContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StrategyContext {
        &mut self.context
    }
}
