//! Monthly aggregation for the income-vs-expenses chart.
//!
//! One pass over a user's entries fills twelve calendar-month buckets for the year of
//! `today`. Each bucket carries income, expenses and the derived savings figure.

use crate::core::{
    calendar::{MONTH_LABELS, MonthKey},
    ledger::{Direction, LedgerEntry},
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Number of leading months used as the forecast baseline (January–April).
pub const BASELINE_MONTHS: usize = 4;

/// Income, expenses and savings for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// Month label, e.g. `"Jan"`
    pub name: String,
    /// Total income (non-negative)
    pub income: f64,
    /// Total expenses (non-negative)
    pub expenses: f64,
    /// `income - expenses`, may be negative
    pub savings: f64,
}

impl MonthlyBucket {
    /// An empty bucket.
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self::new(name, 0.0, 0.0)
    }

    /// A bucket with savings derived from income and expenses.
    #[must_use]
    pub fn new(name: &str, income: f64, expenses: f64) -> Self {
        Self {
            name: name.to_string(),
            income,
            expenses,
            savings: income - expenses,
        }
    }

    /// Adds one entry's magnitude to the matching side and re-derives savings.
    pub fn record(&mut self, entry: &LedgerEntry) {
        match entry.direction {
            Direction::Income => self.income += entry.magnitude(),
            Direction::Expense => self.expenses += entry.magnitude(),
        }
        self.savings = self.income - self.expenses;
    }

    /// Whether anything was recorded
    #[must_use]
    pub fn has_activity(&self) -> bool {
        self.income > 0.0 || self.expenses > 0.0
    }
}

/// Twelve monthly buckets for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverview {
    /// Calendar year
    pub year: i32,
    /// Zero-based index of the current month
    pub current_month: usize,
    /// January through December
    pub months: Vec<MonthlyBucket>,
}

impl YearOverview {
    /// Bucket by label (`"Jan"` … `"Dec"`).
    #[must_use]
    pub fn month(&self, label: &str) -> Option<&MonthlyBucket> {
        self.months.iter().find(|bucket| bucket.name == label)
    }

    /// The baseline window (January–April).
    #[must_use]
    pub fn baseline(&self) -> &[MonthlyBucket] {
        &self.months[..BASELINE_MONTHS.min(self.months.len())]
    }

    /// Bucket for the month containing `today`.
    #[must_use]
    pub fn current(&self) -> &MonthlyBucket {
        &self.months[self.current_month]
    }

    /// Months strictly before the current one.
    #[must_use]
    pub fn elapsed(&self) -> &[MonthlyBucket] {
        &self.months[..self.current_month]
    }
}

/// Buckets entries into the twelve months of `today`'s year.
///
/// Entries from other years are ignored. The current month is filled in the same pass
/// as the others.
#[must_use]
pub fn aggregate_year(entries: &[LedgerEntry], today: NaiveDate) -> YearOverview {
    let year = today.year();
    let mut months: Vec<MonthlyBucket> = MONTH_LABELS
        .iter()
        .map(|label| MonthlyBucket::empty(label))
        .collect();

    for entry in entries.iter().filter(|e| e.date.year() == year) {
        months[entry.month().index()].record(entry);
    }

    YearOverview {
        year,
        current_month: MonthKey::of(today).index(),
        months,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn jan_feb_entries() -> Vec<LedgerEntry> {
        vec![
            entry(1, 75000.0, "income", Some("Income"), "2025-01-15"),
            entry(2, -15000.0, "expense", Some("Housing"), "2025-01-05"),
            entry(3, -23500.0, "expense", Some("Food"), "2025-01-12"),
            entry(4, 75000.0, "income", Some("Income"), "2025-02-15"),
            entry(5, -36800.0, "expense", Some("Housing"), "2025-02-05"),
        ]
    }

    #[test]
    fn test_january_bucket() {
        let overview = aggregate_year(&jan_feb_entries(), date(2025, 5, 10));
        let jan = overview.month("Jan").unwrap();
        assert_eq!(*jan, MonthlyBucket::new("Jan", 75000.0, 38500.0));
        assert_eq!(jan.savings, 36500.0);

        let feb = overview.month("Feb").unwrap();
        assert_eq!(feb.savings, 38200.0);
    }

    #[test]
    fn test_savings_is_income_minus_expenses_for_every_bucket() {
        let mut entries = jan_feb_entries();
        entries.push(entry(6, -90000.0, "expense", Some("Housing"), "2025-03-01"));
        entries.push(entry(7, 12.5, "expense", None, "2025-07-01"));

        let overview = aggregate_year(&entries, date(2025, 8, 1));
        assert_eq!(overview.months.len(), 12);
        for bucket in &overview.months {
            assert_eq!(bucket.savings, bucket.income - bucket.expenses);
        }
        assert_eq!(overview.month("Mar").unwrap().savings, -90000.0);
        // Positive amount counts as income even when labelled expense
        assert_eq!(overview.month("Jul").unwrap().income, 12.5);
    }

    #[test]
    fn test_negative_income_row_counts_as_income() {
        let entries = vec![entry(1, -500.0, "income", None, "2025-01-10")];
        let overview = aggregate_year(&entries, date(2025, 1, 20));
        let jan = overview.month("Jan").unwrap();
        assert_eq!(jan.income, 500.0);
        assert_eq!(jan.expenses, 0.0);
    }

    #[test]
    fn test_other_years_are_ignored() {
        let entries = vec![
            entry(1, 1000.0, "income", None, "2024-01-10"),
            entry(2, 2000.0, "income", None, "2025-01-10"),
        ];
        let overview = aggregate_year(&entries, date(2025, 3, 1));
        assert_eq!(overview.year, 2025);
        assert_eq!(overview.month("Jan").unwrap().income, 2000.0);
    }

    #[test]
    fn test_current_month_and_windows() {
        let entries = vec![
            entry(1, 3000.0, "income", None, "2025-06-02"),
            entry(2, -1000.0, "expense", None, "2025-06-20"),
        ];
        let overview = aggregate_year(&entries, date(2025, 6, 25));
        assert_eq!(overview.current().name, "Jun");
        assert_eq!(overview.current().savings, 2000.0);
        assert_eq!(overview.elapsed().len(), 5);

        let baseline: Vec<&str> = overview.baseline().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(baseline, vec!["Jan", "Feb", "Mar", "Apr"]);
    }

    #[test]
    fn test_has_activity() {
        assert!(!MonthlyBucket::empty("Jan").has_activity());
        assert!(MonthlyBucket::new("Jan", 0.0, 10.0).has_activity());
    }
}
