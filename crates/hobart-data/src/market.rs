//! Market index closes.
//!
//! The residual momentum strategy regresses every instrument on the daily
//! returns of a broad market index. The index is supplied as a two-column
//! CSV (`date`, `close`); `adjusted_close` is accepted in place of `close`
//! so a single-symbol price panel can be reused.

use crate::error::{DataError, Result};
use crate::panel::parse_date;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Daily closes of the market index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketIndex {
    closes: BTreeMap<NaiveDate, f64>,
}

impl MarketIndex {
    /// Load index closes from a CSV file with a header row.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("market index not found: {}", path.display()),
            )));
        }
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Self::from_frame(frame)
    }

    /// Build from a DataFrame with `date` and `close` (or `adjusted_close`).
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        if frame.column("date").is_err() {
            return Err(DataError::MissingColumn("date".to_string()));
        }
        let price_column = ["close", "adjusted_close"]
            .into_iter()
            .find(|name| frame.column(name).is_ok())
            .ok_or_else(|| DataError::MissingColumn("close".to_string()))?;

        let frame = frame
            .lazy()
            .select([
                col("date").cast(DataType::String),
                col(price_column).cast(DataType::Float64).alias("close"),
            ])
            .sort(["date"], SortMultipleOptions::default())
            .collect()?;

        let dates = frame.column("date")?.as_materialized_series().str()?;
        let closes = frame.column("close")?.as_materialized_series().f64()?;

        let mut out = BTreeMap::new();
        for (date, close) in dates.into_iter().zip(closes) {
            if let (Some(date), Some(close)) = (date, close) {
                out.insert(parse_date(date)?, close);
            }
        }
        if out.is_empty() {
            return Err(DataError::MissingData {
                symbol: "market".to_string(),
                reason: "index file has no closes".to_string(),
            });
        }
        Ok(Self { closes: out })
    }

    /// Build directly from dated closes.
    pub fn from_closes(closes: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self {
            closes: closes.into_iter().collect(),
        }
    }

    /// Close on `date`, if the index traded that day.
    pub fn close(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    /// All closes, oldest first.
    pub fn closes(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.closes.iter().map(|(d, c)| (*d, *c))
    }

    /// Number of closes.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// True when there are no closes.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}
