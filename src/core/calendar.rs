//! Calendar normalisation shared by every aggregator.
//!
//! All month bucketing goes through [`MonthKey`], so range queries, month labels and
//! in-memory grouping agree on what "this month" means. Dates are plain calendar
//! dates; "today" is taken in the local timezone.

use crate::errors::{Error, Result};
use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt;

/// Three-letter month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first: NaiveDate,
}

impl MonthKey {
    /// Builds a key from a year and a 1-based month. `None` if the month is out of range.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Calendar year
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Month number, 1 through 12
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// Zero-based month index, 0 through 11
    #[must_use]
    pub fn index(self) -> usize {
        self.first.month0() as usize
    }

    /// First day of the month (inclusive lower bound of range queries)
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first
    }

    /// The following month; December rolls over into January of the next year.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// The preceding month; January rolls back to December of the previous year.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
        }
    }

    /// Whether `date` falls in `[first_day, next().first_day)`.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first && date < self.next().first
    }

    /// Three-letter label, e.g. `"Jan"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        MONTH_LABELS[self.index()]
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
/// `Error::InvalidDate` if the string is not a valid calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
