//! Run reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A report of one strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Strategy that was run.
    pub strategy: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// First trading day replayed.
    pub start: Option<NaiveDate>,

    /// Last trading day replayed.
    pub end: Option<NaiveDate>,

    /// Trading days replayed.
    pub days: usize,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(strategy: String, days: usize, contents: serde_json::Value) -> Self {
        Self {
            strategy,
            timestamp: Utc::now(),
            start: None,
            end: None,
            days,
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    strategy: Option<String>,
    period: Option<(NaiveDate, NaiveDate)>,
    days: usize,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy name.
    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Set the replayed period.
    pub const fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some((start, end));
        self
    }

    /// Set the number of trading days.
    pub const fn days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: serde_json::Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let strategy = self.strategy.ok_or(ReportError::MissingField("strategy"))?;
        let mut report = Report::new(
            strategy,
            self.days,
            self.contents.unwrap_or(serde_json::Value::Null),
        );
        if let Some((start, end)) = self.period {
            report.start = Some(start);
            report.end = Some(end);
        }
        Ok(report)
    }
}
