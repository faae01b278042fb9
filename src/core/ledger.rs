//! Ingestion of raw transaction rows into ledger entries.
//!
//! A stored row says which way money moved twice: once through the sign of `amount`
//! and once through its `type` label, and nothing keeps the two in agreement. Ingestion
//! folds both into a single [`Direction`] so the aggregators never look at either field
//! again. Rows that cannot be bucketed (no date, non-finite amount) and help-desk rows
//! (`type = "support"`) are dropped here.

use crate::{core::calendar::MonthKey, entities::transaction};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

/// `type` label of income rows
pub const KIND_INCOME: &str = "income";
/// `type` label of expense rows
pub const KIND_EXPENSE: &str = "expense";
/// `type` label of help-desk tickets stored in the same table
pub const KIND_SUPPORT: &str = "support";

/// Category used when a row has none
pub const OTHER_CATEGORY: &str = "Other";

/// Which way money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl Direction {
    /// Classifies a row: income if it is labelled income OR its amount is positive,
    /// expense otherwise.
    ///
    /// A negative amount labelled `"income"` therefore counts as income.
    #[must_use]
    pub fn classify(kind: &str, amount: f64) -> Self {
        if kind == KIND_INCOME || amount > 0.0 {
            Self::Income
        } else {
            Self::Expense
        }
    }

    /// The `type` label written for this direction
    #[must_use]
    pub const fn as_kind(self) -> &'static str {
        match self {
            Self::Income => KIND_INCOME,
            Self::Expense => KIND_EXPENSE,
        }
    }
}

/// A transaction row that survived ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Store id
    pub id: i64,
    /// Row title
    pub title: String,
    /// Signed amount as stored
    pub amount: f64,
    /// Derived direction
    pub direction: Direction,
    /// Category as stored (may be blank)
    pub category: Option<String>,
    /// Calendar date
    pub date: NaiveDate,
    /// Part of the sample data set
    pub is_default: bool,
}

impl LedgerEntry {
    /// Converts a stored row, or `None` if the row should not take part in aggregation.
    #[must_use]
    pub fn from_model(model: &transaction::Model) -> Option<Self> {
        if model.kind == KIND_SUPPORT {
            trace!("Skipping support row {}", model.id);
            return None;
        }
        let Some(date) = model.date else {
            trace!("Skipping row {} without a date", model.id);
            return None;
        };
        if !model.amount.is_finite() {
            trace!("Skipping row {} with non-finite amount", model.id);
            return None;
        }

        Some(Self {
            id: model.id,
            title: model.title.clone(),
            amount: model.amount,
            direction: Direction::classify(&model.kind, model.amount),
            category: model.category.clone(),
            date,
            is_default: model.is_default,
        })
    }

    /// Absolute value of the amount
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Month this entry falls in
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    /// Category label with blanks mapped to `"Other"`
    #[must_use]
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => OTHER_CATEGORY,
        }
    }

    /// Whether this entry moves money in
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }
}

/// Converts stored rows into ledger entries, dropping the ones that cannot be used.
#[must_use]
pub fn ingest(models: &[transaction::Model]) -> Vec<LedgerEntry> {
    models.iter().filter_map(LedgerEntry::from_model).collect()
}

/// Sums magnitudes per direction: `(income, expenses)`.
#[must_use]
pub fn totals<'a, I>(entries: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    entries
        .into_iter()
        .fold((0.0, 0.0), |(income, expenses), entry| match entry.direction {
            Direction::Income => (income + entry.magnitude(), expenses),
            Direction::Expense => (income, expenses + entry.magnitude()),
        })
}
