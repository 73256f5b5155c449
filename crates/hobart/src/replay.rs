//! Historical replay driver.
//!
//! Walks a price panel one trading day at a time and makes the calls a live
//! host would make, in the order documented on [`Strategy`]. The replay keeps
//! the held set by applying each [`RebalancePlan`] as if it filled; there are
//! no fills, prices or cash.

use crate::allocation::RebalancePlan;
use crate::error::StrategyError;
use crate::selection::{Selection, SelectionOutcome};
use crate::strategy::Strategy;
use chrono::NaiveDate;
use hobart_data::{CoarseRecord, MarketIndex, Month, PricePanel, TradingCalendar};
use hobart_output::{CycleExport, ReportBuilder, ReportError, RunSummary, TargetExport};
use std::collections::{BTreeMap, BTreeSet};

/// One selection and the rebalance it led to
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRecord {
    /// The universe evaluation that selected
    pub outcome: SelectionOutcome,
    /// The plan issued at the same day's portfolio tick, if any
    pub plan: Option<RebalancePlan>,
}

impl CycleRecord {
    /// The baskets.
    pub const fn selection(&self) -> &Selection {
        &self.outcome.selection
    }

    /// Export form.
    pub fn to_export(&self, strategy: &str) -> CycleExport {
        let (targets, liquidations) = match &self.plan {
            Some(plan) => (
                plan.targets
                    .iter()
                    .map(|t| TargetExport {
                        symbol: t.symbol.clone(),
                        weight: t.weight,
                    })
                    .collect(),
                plan.liquidations.clone(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        CycleExport {
            strategy: strategy.to_string(),
            date: self.outcome.date,
            month: self.outcome.month.to_string(),
            eligible: self.outcome.eligible,
            ranked: self.outcome.ranked,
            excluded: self.outcome.excluded.len(),
            long: self.outcome.selection.long.clone(),
            short: self.outcome.selection.short.clone(),
            targets,
            liquidations,
        }
    }
}

/// Result of a replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Strategy name
    pub strategy: String,
    /// First trading day
    pub start: Option<NaiveDate>,
    /// Last trading day
    pub end: Option<NaiveDate>,
    /// Trading days replayed
    pub days: usize,
    /// Every selection, in time order
    pub cycles: Vec<CycleRecord>,
    /// Instruments held at the end
    pub held: BTreeSet<String>,
}

impl ReplayOutcome {
    /// Number of rebalances issued.
    pub fn rebalances(&self) -> usize {
        self.cycles.iter().filter(|c| c.plan.is_some()).count()
    }

    /// Cycles in export form.
    pub fn to_exports(&self) -> Vec<CycleExport> {
        self.cycles
            .iter()
            .map(|c| c.to_export(&self.strategy))
            .collect()
    }

    /// Per-cycle summary.
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(
            self.strategy.clone(),
            self.start,
            self.end,
            self.days,
            &self.to_exports(),
        )
    }

    /// JSON report carrying the summary and the final holdings.
    pub fn report(&self) -> Result<hobart_output::Report, ReportError> {
        let contents = serde_json::json!({
            "summary": self.summary(),
            "rebalances": self.rebalances(),
            "held": self.held,
        });
        let mut builder = ReportBuilder::new()
            .strategy(self.strategy.clone())
            .days(self.days)
            .contents(contents);
        if let (Some(start), Some(end)) = (self.start, self.end) {
            builder = builder.period(start, end);
        }
        builder.build()
    }
}

/// Day-by-day replay of a universe feed
#[derive(Debug, Clone, Default)]
pub struct Replay {
    days: BTreeMap<NaiveDate, Vec<CoarseRecord>>,
    calendar: TradingCalendar,
    market: Option<MarketIndex>,
}

impl Replay {
    /// Build a replay from a price panel and an optional market index.
    pub fn new(panel: &PricePanel, market: Option<MarketIndex>) -> Result<Self, StrategyError> {
        let days = panel.records_by_date()?;
        Ok(Self::from_days(days, market))
    }

    /// Build a replay from records in any order.
    ///
    /// A symbol listed twice on the same day keeps its last record.
    pub fn from_records(
        records: impl IntoIterator<Item = CoarseRecord>,
        market: Option<MarketIndex>,
    ) -> Self {
        let mut by_day: BTreeMap<NaiveDate, BTreeMap<String, CoarseRecord>> = BTreeMap::new();
        for record in records {
            let day = by_day.entry(record.date).or_default();
            if let Some(replaced) = day.insert(record.symbol.clone(), record) {
                tracing::warn!(
                    symbol = %replaced.symbol,
                    date = %replaced.date,
                    "Duplicate record, keeping the last"
                );
            }
        }
        let days = by_day
            .into_iter()
            .map(|(date, records)| (date, records.into_values().collect()))
            .collect();
        Self::from_days(days, market)
    }

    fn from_days(days: BTreeMap<NaiveDate, Vec<CoarseRecord>>, market: Option<MarketIndex>) -> Self {
        let calendar = TradingCalendar::new(days.keys().copied());
        Self {
            days,
            calendar,
            market,
        }
    }

    /// Trading days in the feed.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when the feed has no trading days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The trading calendar.
    pub const fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    /// Replay every day.
    pub fn run(&self, strategy: &mut dyn Strategy) -> Result<ReplayOutcome, StrategyError> {
        self.run_with_progress(strategy, |_, _| {})
    }

    /// Replay every day, calling `progress` with the count of finished days.
    pub fn run_with_progress(
        &self,
        strategy: &mut dyn Strategy,
        mut progress: impl FnMut(usize, NaiveDate),
    ) -> Result<ReplayOutcome, StrategyError> {
        if strategy.kind().needs_market() && self.market.is_none() {
            return Err(StrategyError::MissingMarket);
        }

        let start = self.days.keys().next().copied();
        let end = self.days.keys().next_back().copied();
        tracing::info!(
            strategy = strategy.name(),
            days = self.days.len(),
            start = ?start,
            end = ?end,
            "Starting replay"
        );

        // Market closes up to and including each trading day, in order
        let mut market = self
            .market
            .iter()
            .flat_map(|index| index.closes())
            .peekable();

        let mut held = BTreeSet::new();
        let mut cycles = Vec::new();

        for (index, (date, records)) in self.days.iter().enumerate() {
            while let Some((day, close)) = market.next_if(|(day, _)| day <= date) {
                strategy.on_market(day, close);
            }

            let outcome = strategy.on_universe(*date, records);
            let plan = strategy.on_data(*date, &held);
            if let Some(plan) = &plan {
                plan.apply(&mut held);
            }

            match outcome {
                Some(outcome) => cycles.push(CycleRecord { outcome, plan }),
                None if plan.is_some() => {
                    tracing::warn!(%date, "Rebalance without a same-day selection");
                }
                None => {}
            }

            if self.calendar.is_month_start(*date) {
                strategy.on_month_start(Month::of(*date));
            }
            progress(index + 1, *date);
        }

        let outcome = ReplayOutcome {
            strategy: strategy.name().to_string(),
            start,
            end,
            days: self.days.len(),
            cycles,
            held,
        };
        tracing::info!(
            strategy = %outcome.strategy,
            cycles = outcome.cycles.len(),
            rebalances = outcome.rebalances(),
            held = outcome.held.len(),
            "Replay finished"
        );
        Ok(outcome)
    }
}
