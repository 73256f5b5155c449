//! Per-cycle run summary.
//!
//! Renders the selections of a run as an ASCII table for the terminal or as
//! Markdown.

use crate::export::CycleExport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleSummary {
    /// Day of the selection.
    pub date: NaiveDate,

    /// Month of the selection.
    pub month: String,

    /// Instruments that passed the coarse screen.
    pub eligible: usize,

    /// Instruments ranked.
    pub ranked: usize,

    /// Instruments excluded by a scoring error.
    pub excluded: usize,

    /// Long basket size.
    pub long: usize,

    /// Short basket size.
    pub short: usize,

    /// Liquidations issued.
    pub liquidations: usize,

    /// Whether the cycle was traded.
    pub traded: bool,
}

impl From<&CycleExport> for CycleSummary {
    fn from(cycle: &CycleExport) -> Self {
        Self {
            date: cycle.date,
            month: cycle.month.clone(),
            eligible: cycle.eligible,
            ranked: cycle.ranked,
            excluded: cycle.excluded,
            long: cycle.long.len(),
            short: cycle.short.len(),
            liquidations: cycle.liquidations.len(),
            traded: cycle.traded(),
        }
    }
}

/// Summary of a strategy run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Strategy name.
    pub strategy: String,

    /// First trading day replayed.
    pub start: Option<NaiveDate>,

    /// Last trading day replayed.
    pub end: Option<NaiveDate>,

    /// Trading days replayed.
    pub days: usize,

    /// One row per selection cycle.
    pub cycles: Vec<CycleSummary>,
}

impl RunSummary {
    /// Build a summary from exported cycles.
    pub fn new(
        strategy: impl Into<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        days: usize,
        cycles: &[CycleExport],
    ) -> Self {
        Self {
            strategy: strategy.into(),
            start,
            end,
            days,
            cycles: cycles.iter().map(CycleSummary::from).collect(),
        }
    }

    /// Cycles that produced a rebalance.
    pub fn traded_cycles(&self) -> usize {
        self.cycles.iter().filter(|c| c.traded).count()
    }

    /// Mean number of ranked instruments per cycle.
    pub fn average_ranked(&self) -> f64 {
        if self.cycles.is_empty() {
            return 0.0;
        }
        self.cycles.iter().map(|c| c.ranked as f64).sum::<f64>() / self.cycles.len() as f64
    }

    fn period(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("{} to {}", start, end),
            _ => "empty".to_string(),
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRun Summary: {}\n", self.strategy));
        output.push_str(&format!(
            "Period: {} ({} trading days)\n",
            self.period(),
            self.days
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:<8} {:>9} {:>8} {:>9} {:>6} {:>6} {:>8} {:>7}\n",
            "Date", "Month", "Eligible", "Ranked", "Excluded", "Long", "Short", "Liquid.", "Traded"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for cycle in &self.cycles {
            output.push_str(&format!(
                "{:<12} {:<8} {:>9} {:>8} {:>9} {:>6} {:>6} {:>8} {:>7}\n",
                cycle.date.to_string(),
                cycle.month,
                cycle.eligible,
                cycle.ranked,
                cycle.excluded,
                cycle.long,
                cycle.short,
                cycle.liquidations,
                if cycle.traded { "yes" } else { "no" }
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Cycles: {}  Traded: {}  Avg. ranked: {:.1}\n",
            self.cycles.len(),
            self.traded_cycles(),
            self.average_ranked()
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Run Summary: {}\n\n", self.strategy));
        output.push_str(&format!(
            "**Period:** {} ({} trading days)\n\n",
            self.period(),
            self.days
        ));
        output.push_str("| Date | Month | Eligible | Ranked | Excluded | Long | Short | Liquidations | Traded |\n");
        output.push_str("|------|-------|---------:|-------:|---------:|-----:|------:|-------------:|:------:|\n");
        for cycle in &self.cycles {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                cycle.date,
                cycle.month,
                cycle.eligible,
                cycle.ranked,
                cycle.excluded,
                cycle.long,
                cycle.short,
                cycle.liquidations,
                if cycle.traded { "yes" } else { "no" }
            ));
        }
        output
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} cycles over {} trading days, {} traded",
            self.strategy,
            self.cycles.len(),
            self.days,
            self.traded_cycles()
        )
    }
}
