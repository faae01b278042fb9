//! Transaction entity - Represents every income and expense row a user records.
//!
//! Each transaction has a `title`, signed `amount`, a `type` label (`income`, `expense`
//! or the legacy `support`), a free-text `category`, a calendar `date` and the owning
//! `user_id`. Rows seeded on first login carry `is_default = true`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier, assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short description shown in transaction lists (e.g. "Salary", "Rent")
    pub title: String,
    /// Signed amount (positive for income, negative for expenses)
    pub amount: f64,
    /// Direction label: `"income"`, `"expense"` or `"support"`
    #[sea_orm(column_name = "type")]
    pub kind: String,
    /// Free-text category label; blank or missing means "Other"
    pub category: Option<String>,
    /// Calendar date of the transaction, no time component
    pub date: Option<Date>,
    /// Owner of the row
    pub user_id: String,
    /// Whether this row is part of the first-visit sample data
    pub is_default: bool,
}

/// Transactions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
