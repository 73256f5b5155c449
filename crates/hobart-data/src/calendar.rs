//! Trading calendar derived from the dates present in a panel.

use chrono::{Datelike, NaiveDate, Weekday};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A calendar month
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display("{year:04}-{month:02}")]
pub struct Month {
    /// Calendar year
    pub year: i32,
    /// Month of the year, 1-12
    pub month: u32,
}

impl Month {
    /// Create a month.
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::of(date)
    }
}

/// Ordered set of trading days
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingCalendar {
    days: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// Build a calendar from any collection of dates; duplicates are removed.
    pub fn new(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        let days: BTreeSet<NaiveDate> = days.into_iter().collect();
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Trading days in ascending order.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when the calendar has no trading days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First trading day of every month in the calendar.
    ///
    /// The calendar's first day counts only when no earlier trading day of
    /// its month can exist (earlier days are weekends or New Year's Day); a
    /// panel starting mid-month never observed that month's start.
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .copied()
            .filter(|day| self.is_month_start(*day))
            .collect()
    }

    /// True if `day` is a trading day and the first of its month.
    pub fn is_month_start(&self, day: NaiveDate) -> bool {
        match self.days.binary_search(&day) {
            Ok(0) => opens_month(day),
            Ok(index) => Month::of(self.days[index - 1]) != Month::of(day),
            Err(_) => false,
        }
    }

    /// Months whose first trading day is in the calendar, ascending.
    pub fn months(&self) -> Vec<Month> {
        self.month_starts().into_iter().map(Month::of).collect()
    }
}

/// True when no trading day of the same month can precede `day`: every
/// earlier day of the month falls on a weekend or is New Year's Day.
fn opens_month(day: NaiveDate) -> bool {
    (1..day.day()).all(|d| {
        let earlier = day.with_day(d).unwrap_or(day);
        matches!(earlier.weekday(), Weekday::Sat | Weekday::Sun)
            || (earlier.month() == 1 && d == 1)
    })
}
