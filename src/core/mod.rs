//! Core business logic - framework-agnostic reads, aggregation and forecasting.
//!
//! Data flows from the transaction accessor into the category, monthly and summary
//! aggregators; the monthly buckets feed the forecast. [`dashboard`] runs the whole
//! pipeline once and [`refresh`] keeps re-running it while a user is signed in.

/// Month normalisation shared by all aggregators
pub mod calendar;
/// Expense breakdown per category
pub mod category;
/// One full fetch-and-recompute of the dashboard
pub mod dashboard;
/// May–December projection
pub mod forecast;
/// Row ingestion and direction classification
pub mod ledger;
/// Twelve-month buckets
pub mod monthly;
/// Declared monthly salary
pub mod profile;
/// Live refresh controller
pub mod refresh;
/// Text rendering of dashboard figures
pub mod report;
/// Store client and change feed
pub mod store;
/// Headline summary metrics
pub mod summary;
/// Transaction reads and writes
pub mod transaction;

use serde::Serialize;

/// Whether a figure was computed from the user's data or is a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataOrigin {
    /// Computed from stored transactions
    Actual,
    /// Fixed placeholder, not derived from any data
    Sample,
}

/// A value together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Labeled<T> {
    /// The value
    pub value: T,
    /// Where it came from
    pub origin: DataOrigin,
}
