//! Export of selections and target weights.
//!
//! JSON output keeps one object per cycle. CSV output flattens every cycle
//! into [`SelectionRow`]s: one per basket member and one per liquidation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::PrettyJson => write!(f, "pretty-json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Target weight for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetExport {
    /// Instrument symbol.
    pub symbol: String,

    /// Signed portfolio weight.
    pub weight: f64,
}

/// One selection cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleExport {
    /// Strategy name.
    pub strategy: String,

    /// Day of the selection.
    pub date: NaiveDate,

    /// Month the selection belongs to, `YYYY-MM`.
    pub month: String,

    /// Instruments that passed the coarse screen.
    pub eligible: usize,

    /// Instruments that were ranked.
    pub ranked: usize,

    /// Ready instruments excluded by a scoring error.
    pub excluded: usize,

    /// Long basket in selection order.
    pub long: Vec<String>,

    /// Short basket in selection order.
    pub short: Vec<String>,

    /// Target weights; empty when the cycle was not traded.
    pub targets: Vec<TargetExport>,

    /// Held instruments closed out.
    pub liquidations: Vec<String>,
}

impl CycleExport {
    /// Whether a rebalance was issued for this cycle.
    pub fn traded(&self) -> bool {
        !self.targets.is_empty()
    }

    fn weight_of(&self, symbol: &str) -> Option<f64> {
        self.targets
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.weight)
    }

    /// Flatten into CSV rows.
    pub fn to_rows(&self) -> Vec<SelectionRow> {
        let mut rows = Vec::with_capacity(
            self.long.len() + self.short.len() + self.liquidations.len(),
        );
        for (side, basket) in [("long", &self.long), ("short", &self.short)] {
            for (i, symbol) in basket.iter().enumerate() {
                rows.push(SelectionRow {
                    strategy: self.strategy.clone(),
                    date: self.date,
                    month: self.month.clone(),
                    side: side.to_string(),
                    rank: Some(i + 1),
                    symbol: symbol.clone(),
                    weight: self.weight_of(symbol),
                });
            }
        }

        rows.extend(self.liquidations.iter().map(|symbol| SelectionRow {
            strategy: self.strategy.clone(),
            date: self.date,
            month: self.month.clone(),
            side: "liquidate".to_string(),
            rank: None,
            symbol: symbol.clone(),
            weight: Some(0.0),
        }));
        rows
    }
}

/// Flat CSV record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionRow {
    /// Strategy name.
    pub strategy: String,

    /// Day of the selection.
    pub date: NaiveDate,

    /// Month of the selection.
    pub month: String,

    /// `long`, `short` or `liquidate`.
    pub side: String,

    /// Position in the basket, from 1.
    pub rank: Option<usize>,

    /// Instrument symbol.
    pub symbol: String,

    /// Target weight, if the cycle was traded.
    pub weight: Option<f64>,
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn rows_to_csv(rows: &[SelectionRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for CycleExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(&self.to_rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<CycleExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<SelectionRow> = self.iter().flat_map(CycleExport::to_rows).collect();
                rows_to_csv(&rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
