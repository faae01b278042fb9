//! Shared test utilities for `BudgetPulse`.
//!
//! This module provides common helper functions for setting up an in-memory store
//! and building transaction rows with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        ledger::LedgerEntry,
        store::Store,
        transaction::{NewTransaction, create_transaction},
    },
    entities::transaction,
    errors::Result,
};
use chrono::NaiveDate;

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_store() -> Result<Store> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(Store::new(db))
}

/// Shorthand for a valid calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds a stored row without touching the database.
///
/// # Defaults
/// * `title`: `"Tx {id}"`
/// * `user_id`: `"alice"`
/// * `is_default`: false
pub fn model(
    id: i64,
    amount: f64,
    kind: &str,
    category: Option<&str>,
    date: &str,
) -> transaction::Model {
    transaction::Model {
        id,
        title: format!("Tx {id}"),
        amount,
        kind: kind.to_string(),
        category: category.map(str::to_string),
        date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        user_id: "alice".to_string(),
        is_default: false,
    }
}

/// Same as [`model`], ingested into a ledger entry.
pub fn entry(
    id: i64,
    amount: f64,
    kind: &str,
    category: Option<&str>,
    date: &str,
) -> LedgerEntry {
    LedgerEntry::from_model(&model(id, amount, kind, category, date)).unwrap()
}

/// Inserts an expense through the accessor. `amount` may be given positive.
pub async fn insert_expense(
    store: &Store,
    user_id: &str,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<transaction::Model> {
    create_transaction(
        store,
        NewTransaction::expense(user_id, title, amount, category, date),
    )
    .await
}

/// Inserts an income row through the accessor.
pub async fn insert_income(
    store: &Store,
    user_id: &str,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<transaction::Model> {
    create_transaction(
        store,
        NewTransaction::income(user_id, title, amount, category, date),
    )
    .await
}
