//! Category aggregation for the expense breakdown chart.
//!
//! Current-month expenses are summed per category and each slice gets a colour from a
//! fixed palette. With nothing to show, the breakdown falls back to a fixed sample set
//! that is marked [`DataOrigin::Sample`] so it cannot be mistaken for real spending.

use crate::{
    core::{
        DataOrigin,
        calendar::MonthKey,
        ledger::{LedgerEntry, OTHER_CATEGORY},
        store::Store,
        transaction::{TransactionQuery, fetch_entries},
    },
    errors::Result,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Display colour per known category. Anything else uses the `Other` colour.
pub const CATEGORY_COLORS: [(&str, &str); 7] = [
    ("Housing", "#4527A0"),
    ("Food", "#9575CD"),
    ("Transportation", "#673AB7"),
    ("Entertainment", "#7E57C2"),
    ("Bills", "#5E35B1"),
    ("Dining", "#B39DDB"),
    (OTHER_CATEGORY, "#D1C4E9"),
];

const OTHER_COLOR: &str = "#D1C4E9";

/// Placeholder slices shown when there are no expenses this month.
const SAMPLE_SLICES: [(&str, f64); 5] = [
    ("Housing", 15000.0),
    ("Food", 8000.0),
    ("Transportation", 5000.0),
    ("Bills", 3000.0),
    ("Dining", 4000.0),
];

/// Colour for a category name.
#[must_use]
pub fn category_color(name: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(category, _)| *category == name)
        .map_or(OTHER_COLOR, |(_, color)| color)
}

/// One slice of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    /// Category label
    pub name: String,
    /// Summed absolute amount
    pub value: f64,
    /// Hex colour
    pub color: &'static str,
}

impl CategorySlice {
    fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: category_color(name),
        }
    }
}

/// Per-category totals for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Slices in first-seen order
    pub slices: Vec<CategorySlice>,
    /// Whether the slices are real or placeholders
    pub origin: DataOrigin,
}

impl CategoryBreakdown {
    /// The fixed placeholder breakdown.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            slices: SAMPLE_SLICES
                .iter()
                .map(|(name, value)| CategorySlice::new(name, *value))
                .collect(),
            origin: DataOrigin::Sample,
        }
    }

    /// Sum of all slices
    #[must_use]
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|slice| slice.value).sum()
    }

    /// Percentage of the total taken by `name`, 0 if unknown or the total is 0.
    #[must_use]
    pub fn share(&self, name: &str) -> f64 {
        let total = self.total();
        if total == 0.0 {
            return 0.0;
        }
        self.slices
            .iter()
            .find(|slice| slice.name == name)
            .map_or(0.0, |slice| slice.value / total * 100.0)
    }

    /// Whether these are placeholder values
    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.origin == DataOrigin::Sample
    }
}

/// Groups expense entries by category.
///
/// Callers pass the current month's expense rows; every entry contributes its absolute
/// amount. An empty input yields [`CategoryBreakdown::sample`].
#[must_use]
pub fn aggregate_by_category(entries: &[LedgerEntry]) -> CategoryBreakdown {
    if entries.is_empty() {
        return CategoryBreakdown::sample();
    }

    let mut slices: Vec<CategorySlice> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let name = entry.category_label();
        if let Some(&idx) = positions.get(name) {
            slices[idx].value += entry.magnitude();
        } else {
            positions.insert(name, slices.len());
            slices.push(CategorySlice::new(name, entry.magnitude()));
        }
    }

    CategoryBreakdown {
        slices,
        origin: DataOrigin::Actual,
    }
}

/// Fetches the user's expenses for the month containing `today` and aggregates them.
pub async fn fetch_category_breakdown(
    store: &Store,
    user_id: &str,
    today: NaiveDate,
) -> Result<CategoryBreakdown> {
    let query = TransactionQuery::for_user(user_id)
        .month(MonthKey::of(today))
        .expenses_only();
    let entries: Vec<LedgerEntry> = fetch_entries(store, &query)
        .await?
        .into_iter()
        .filter(|entry| !entry.is_income())
        .collect();
    Ok(aggregate_by_category(&entries))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_empty_input_gives_sample_breakdown() {
        let breakdown = aggregate_by_category(&[]);
        assert!(breakdown.is_sample());
        assert_eq!(breakdown.slices.len(), 5);
        assert_eq!(breakdown.total(), 35000.0);
        assert_eq!(breakdown.slices[0].name, "Housing");
        assert_eq!(breakdown.slices[0].color, "#4527A0");
    }

    #[test]
    fn test_sums_absolute_amounts_per_category() {
        let entries = vec![
            entry(1, -15000.0, "expense", Some("Housing"), "2025-03-05"),
            entry(2, -1200.0, "expense", Some("Food"), "2025-03-06"),
            entry(3, -800.0, "expense", Some("Food"), "2025-03-09"),
            entry(4, -300.0, "expense", None, "2025-03-10"),
            entry(5, -200.0, "expense", Some("Gadgets"), "2025-03-11"),
        ];

        let breakdown = aggregate_by_category(&entries);
        assert_eq!(breakdown.origin, DataOrigin::Actual);

        let names: Vec<&str> = breakdown.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Housing", "Food", "Other", "Gadgets"]);
        assert_eq!(breakdown.slices[1].value, 2000.0);
        assert_eq!(breakdown.slices[2].value, 300.0);
        assert_eq!(breakdown.total(), 17500.0);
    }

    #[test]
    fn test_unknown_category_uses_other_color() {
        assert_eq!(category_color("Gadgets"), "#D1C4E9");
        assert_eq!(category_color("Other"), "#D1C4E9");
        assert_eq!(category_color("Dining"), "#B39DDB");
    }

    #[test]
    fn test_share() {
        let entries = vec![
            entry(1, -750.0, "expense", Some("Housing"), "2025-03-05"),
            entry(2, -250.0, "expense", Some("Food"), "2025-03-06"),
        ];
        let breakdown = aggregate_by_category(&entries);
        assert_eq!(breakdown.share("Housing"), 75.0);
        assert_eq!(breakdown.share("Food"), 25.0);
        assert_eq!(breakdown.share("Bills"), 0.0);
    }

    #[tokio::test]
    async fn test_fetch_category_breakdown_uses_current_month_expenses() -> Result<()> {
        let store = setup_test_store().await?;
        insert_income(&store, "alice", "Salary", 75000.0, "Income", date(2025, 3, 15)).await?;
        insert_expense(&store, "alice", "Rent", 15000.0, "Housing", date(2025, 3, 5)).await?;
        insert_expense(&store, "alice", "Groceries", 900.0, "Food", date(2025, 3, 8)).await?;
        // Previous month, must not count
        insert_expense(&store, "alice", "Groceries", 500.0, "Food", date(2025, 2, 20)).await?;

        let breakdown = fetch_category_breakdown(&store, "alice", date(2025, 3, 20)).await?;
        assert!(!breakdown.is_sample());
        assert_eq!(breakdown.total(), 15900.0);

        let empty_month = fetch_category_breakdown(&store, "alice", date(2025, 6, 1)).await?;
        assert!(empty_month.is_sample());
        Ok(())
    }
}
