//! Daily price panel.
//!
//! Loads a long-format panel (`date, symbol, adjusted_close, volume` and an
//! optional `has_fundamentals` flag) into a polars DataFrame, derives
//! `dollar_volume`, and hands it out as per-day [`CoarseRecord`]s in time
//! order, which is how strategies consume it.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Columns every panel must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "symbol", "adjusted_close", "volume"];

/// One instrument on one trading day, as seen by coarse selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseRecord {
    /// Trading day
    pub date: NaiveDate,
    /// Instrument identifier
    pub symbol: String,
    /// Split and dividend adjusted close
    pub adjusted_close: f64,
    /// Adjusted close times traded volume
    pub dollar_volume: f64,
    /// Vendor flag: fundamentals coverage exists for this instrument
    pub has_fundamentals: bool,
}

/// Long-format daily price panel
#[derive(Debug, Clone)]
pub struct PricePanel {
    frame: DataFrame,
}

impl PricePanel {
    /// Load a panel from a CSV file with a header row.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("price panel not found: {}", path.display()),
            )));
        }
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        tracing::debug!(path = %path.display(), rows = frame.height(), "Loaded price panel");
        Self::from_frame(frame)
    }

    /// Build a panel from an existing DataFrame.
    ///
    /// Normalises column types, adds `dollar_volume`, defaults
    /// `has_fundamentals` to true when absent, and sorts by date then symbol.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        for name in REQUIRED_COLUMNS {
            if frame.column(name).is_err() {
                return Err(DataError::MissingColumn(name.to_string()));
            }
        }
        let has_flag = frame.column("has_fundamentals").is_ok();

        let mut lf = frame.lazy().with_columns([
            col("date").cast(DataType::String),
            col("symbol").cast(DataType::String),
            col("adjusted_close").cast(DataType::Float64),
            col("volume").cast(DataType::Float64),
        ]);
        if !has_flag {
            lf = lf.with_column(lit(true).alias("has_fundamentals"));
        }

        let frame = lf
            .with_column((col("adjusted_close") * col("volume")).alias("dollar_volume"))
            .sort(["date", "symbol"], SortMultipleOptions::default())
            .collect()?;

        Ok(Self { frame })
    }

    /// The underlying DataFrame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// True when the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Distinct symbols, sorted.
    pub fn symbols(&self) -> Result<Vec<String>> {
        let symbols = self.frame.column("symbol")?.as_materialized_series().str()?;
        let mut out: Vec<String> = symbols
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }

    /// All rows as records, sorted by date then symbol.
    ///
    /// Rows without a price are dropped. A symbol listed twice on the same
    /// day is a parse error.
    pub fn records(&self) -> Result<Vec<CoarseRecord>> {
        let dates = self.frame.column("date")?.as_materialized_series().str()?;
        let symbols = self.frame.column("symbol")?.as_materialized_series().str()?;
        let prices = self
            .frame
            .column("adjusted_close")?
            .as_materialized_series()
            .f64()?;
        let volumes = self
            .frame
            .column("dollar_volume")?
            .as_materialized_series()
            .f64()?;
        let flags = flag_values(self.frame.column("has_fundamentals")?)?;

        let mut records = Vec::with_capacity(self.frame.height());
        let mut previous: Option<(NaiveDate, &str)> = None;
        let rows = dates
            .into_iter()
            .zip(symbols)
            .zip(prices)
            .zip(volumes)
            .zip(flags);
        for ((((date, symbol), price), dollar_volume), flag) in rows {
            let (Some(date), Some(symbol)) = (date, symbol) else {
                return Err(DataError::Parse(
                    "panel row without date or symbol".to_string(),
                ));
            };
            let day = parse_date(date)?;
            if previous == Some((day, symbol)) {
                return Err(DataError::Parse(format!(
                    "duplicate row for {symbol} on {day}"
                )));
            }
            previous = Some((day, symbol));
            let Some(adjusted_close) = price else {
                tracing::debug!(symbol, date, "Dropping row without price");
                continue;
            };
            records.push(CoarseRecord {
                date: day,
                symbol: symbol.to_string(),
                adjusted_close,
                dollar_volume: dollar_volume.unwrap_or(0.0),
                has_fundamentals: flag.unwrap_or(false),
            });
        }
        Ok(records)
    }

    /// Records grouped by trading day, days ascending.
    pub fn records_by_date(&self) -> Result<BTreeMap<NaiveDate, Vec<CoarseRecord>>> {
        let mut days: BTreeMap<NaiveDate, Vec<CoarseRecord>> = BTreeMap::new();
        for record in self.records()? {
            days.entry(record.date).or_default().push(record);
        }
        Ok(days)
    }

    /// Price history of one symbol, oldest first.
    pub fn history(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let history: Vec<(NaiveDate, f64)> = self
            .records()?
            .into_iter()
            .filter(|r| r.symbol == symbol)
            .map(|r| (r.date, r.adjusted_close))
            .collect();
        if history.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "symbol not present in panel".to_string(),
            });
        }
        Ok(history)
    }
}

/// Parse an ISO date, ignoring any time-of-day suffix.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    let day = value.trim().get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| DataError::InvalidDate(value.to_string()))
}

fn flag_values(column: &Column) -> Result<Vec<Option<bool>>> {
    let series = column.as_materialized_series();
    match series.dtype() {
        DataType::Boolean => Ok(series.bool()?.into_iter().collect()),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.map(parse_flag).transpose())
            .collect(),
        _ => {
            let ints = series.cast(&DataType::Int64)?;
            Ok(ints.i64()?.into_iter().map(|v| v.map(|x| x != 0)).collect())
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(DataError::Parse(format!(
            "invalid has_fundamentals flag '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_frame() -> DataFrame {
        df! {
            "date" => ["2016-01-05", "2016-01-04", "2016-01-04", "2016-02-01"],
            "symbol" => ["AAA", "BBB", "AAA", "AAA"],
            "adjusted_close" => [10.5, 20.0, 10.0, 11.0],
            "volume" => [1_000_000i64, 2_000_000, 1_500_000, 900_000],
        }
        .unwrap()
    }

    #[test]
    fn test_missing_column() {
        let frame = df! {
            "date" => ["2016-01-04"],
            "symbol" => ["AAA"],
            "adjusted_close" => [10.0],
        }
        .unwrap();
        assert!(matches!(
            PricePanel::from_frame(frame),
            Err(DataError::MissingColumn(c)) if c == "volume"
        ));
    }

    #[test]
    fn test_records_sorted_with_dollar_volume() {
        let panel = PricePanel::from_frame(sample_frame()).unwrap();
        let records = panel.records().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].symbol, "AAA");
        assert_eq!(records[1].symbol, "BBB");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2016, 1, 4).unwrap());
        assert_relative_eq!(records[0].dollar_volume, 15_000_000.0);
        assert!(records.iter().all(|r| r.has_fundamentals));
    }

    #[test]
    fn test_grouping_and_history() {
        let panel = PricePanel::from_frame(sample_frame()).unwrap();
        let days = panel.records_by_date().unwrap();
        assert_eq!(days.len(), 3);

        let history = panel.history("AAA").unwrap();
        let prices: Vec<f64> = history.iter().map(|(_, p)| *p).collect();
        assert_eq!(prices, vec![10.0, 10.5, 11.0]);

        assert!(matches!(
            panel.history("ZZZ"),
            Err(DataError::MissingData { .. })
        ));
        assert_eq!(panel.symbols().unwrap(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let frame = df! {
            "date" => ["2019-01-02", "2019-01-03", "2019-01-03"],
            "symbol" => ["AAA", "AAA", "AAA"],
            "adjusted_close" => [10.0, 11.0, 11.5],
            "volume" => [1.0, 1.0, 1.0],
        }
        .unwrap();
        let panel = PricePanel::from_frame(frame).unwrap();
        assert!(matches!(panel.records(), Err(DataError::Parse(_))));
        assert!(matches!(panel.records_by_date(), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_string_flags() {
        let frame = df! {
            "date" => ["2016-01-04", "2016-01-04"],
            "symbol" => ["AAA", "BBB"],
            "adjusted_close" => [10.0, 20.0],
            "volume" => [1.0, 2.0],
            "has_fundamentals" => ["true", "no"],
        }
        .unwrap();
        let records = PricePanel::from_frame(frame).unwrap().records().unwrap();
        assert!(records[0].has_fundamentals);
        assert!(!records[1].has_fundamentals);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2016-01-04 00:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2016, 1, 4).unwrap()
        );
        assert!(matches!(
            parse_date("04/01/2016"),
            Err(DataError::InvalidDate(_))
        ));
    }
}
