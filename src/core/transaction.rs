//! Transaction business logic - the read/write accessor over the `transactions` table.
//!
//! Reads are expressed as a [`TransactionQuery`] (user, date range, sign, category,
//! ordering, row limit) and always filter by the owning user. Writes go through
//! [`create_transaction`], [`delete_transaction`] and [`seed_sample_data`], which publish
//! change events on the [`Store`] so live dashboards refresh.

use crate::{
    core::{
        calendar::MonthKey,
        ledger::{self, Direction, LedgerEntry},
        store::{ChangeKind, Store, Table},
    },
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    PaginatorTrait, QueryOrder, QuerySelect, Select, Set, TransactionTrait, prelude::*,
};
use tracing::{debug, info, instrument};

/// A filtered read against the transaction store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    user_id: String,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    expenses_only: bool,
    category: Option<String>,
    newest_first: bool,
    limit: Option<u64>,
}

impl TransactionQuery {
    /// All transactions of one user.
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Rows dated on or after `date`.
    #[must_use]
    pub const fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Rows dated strictly before `date`.
    #[must_use]
    pub const fn until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    /// Rows inside one calendar month.
    #[must_use]
    pub fn month(self, month: MonthKey) -> Self {
        self.since(month.first_day()).until(month.next().first_day())
    }

    /// Only rows with a negative amount.
    #[must_use]
    pub const fn expenses_only(mut self) -> Self {
        self.expenses_only = true;
        self
    }

    /// Only rows with exactly this category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Order by date, most recent first.
    #[must_use]
    pub const fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Return at most `limit` rows.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The user this query is scoped to
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn to_select(&self) -> Select<Transaction> {
        let mut select =
            Transaction::find().filter(transaction::Column::UserId.eq(self.user_id.as_str()));

        if let Some(since) = self.since {
            select = select.filter(transaction::Column::Date.gte(since));
        }
        if let Some(until) = self.until {
            select = select.filter(transaction::Column::Date.lt(until));
        }
        if self.expenses_only {
            select = select.filter(transaction::Column::Amount.lt(0.0));
        }
        if let Some(category) = &self.category {
            select = select.filter(transaction::Column::Category.eq(category.as_str()));
        }

        select = if self.newest_first {
            select
                .order_by_desc(transaction::Column::Date)
                .order_by_desc(transaction::Column::Id)
        } else {
            select.order_by_asc(transaction::Column::Id)
        };

        if let Some(limit) = self.limit {
            select = select.limit(limit);
        }
        select
    }
}

/// Runs a query and returns the raw rows.
///
/// # Errors
/// `Error::MissingUser` if the query has no user, `Error::Database` on store failure.
#[instrument(skip(store))]
pub async fn fetch_transactions(
    store: &Store,
    query: &TransactionQuery,
) -> Result<Vec<transaction::Model>> {
    if query.user_id.trim().is_empty() {
        return Err(Error::MissingUser);
    }
    let rows = query.to_select().all(store.db()).await?;
    debug!("Fetched {} transactions for {}", rows.len(), query.user_id);
    Ok(rows)
}

/// Runs a query and ingests the rows, dropping the ones aggregation cannot use.
pub async fn fetch_entries(store: &Store, query: &TransactionQuery) -> Result<Vec<LedgerEntry>> {
    let rows = fetch_transactions(store, query).await?;
    Ok(ledger::ingest(&rows))
}

/// The most recent transactions of a user, newest first.
pub async fn recent_transactions(
    store: &Store,
    user_id: &str,
    limit: u64,
) -> Result<Vec<LedgerEntry>> {
    let query = TransactionQuery::for_user(user_id).newest_first().limit(limit);
    fetch_entries(store, &query).await
}

/// Input for [`create_transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Owner
    pub user_id: String,
    /// Short description
    pub title: String,
    /// Amount; only its magnitude is used, the sign comes from `direction`
    pub amount: f64,
    /// Income or expense
    pub direction: Direction,
    /// Category label
    pub category: Option<String>,
    /// Calendar date
    pub date: NaiveDate,
}

impl NewTransaction {
    /// An income row.
    #[must_use]
    pub fn income(user_id: &str, title: &str, amount: f64, category: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            title: title.to_string(),
            amount,
            direction: Direction::Income,
            category: Some(category.to_string()),
            date,
        }
    }

    /// An expense row.
    #[must_use]
    pub fn expense(user_id: &str, title: &str, amount: f64, category: &str, date: NaiveDate) -> Self {
        Self {
            direction: Direction::Expense,
            ..Self::income(user_id, title, amount, category, date)
        }
    }

    /// Stored amount: positive for income, negative for expenses.
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Income => self.amount.abs(),
            Direction::Expense => -self.amount.abs(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.amount == 0.0 || !self.amount.is_finite() {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        if self.user_id.trim().is_empty() {
            return Err(Error::MissingUser);
        }
        Ok(())
    }

    fn into_active_model(self, is_default: bool) -> transaction::ActiveModel {
        let amount = self.signed_amount();
        transaction::ActiveModel {
            title: Set(self.title),
            amount: Set(amount),
            kind: Set(self.direction.as_kind().to_string()),
            category: Set(self.category),
            date: Set(Some(self.date)),
            user_id: Set(self.user_id),
            is_default: Set(is_default),
            ..Default::default()
        }
    }
}

/// Inserts a transaction. The store assigns the id.
///
/// The amount sign and `type` label are written from the same [`Direction`], so rows
/// created here never disagree with themselves.
#[instrument(skip(store))]
pub async fn create_transaction(store: &Store, new: NewTransaction) -> Result<transaction::Model> {
    new.validate()?;
    let user_id = new.user_id.clone();

    let created = new.into_active_model(false).insert(store.db()).await?;
    info!(
        "Created transaction {} for {}: type='{}', amount={}",
        created.id, user_id, created.kind, created.amount
    );

    store.notify(Table::Transactions, &user_id, ChangeKind::Insert);
    Ok(created)
}

/// Deletes one of the user's transactions.
///
/// # Errors
/// `Error::TransactionNotFound` if no row with this id belongs to the user.
#[instrument(skip(store))]
pub async fn delete_transaction(store: &Store, user_id: &str, transaction_id: i64) -> Result<()> {
    let row = Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(store.db())
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    row.delete(store.db()).await?;
    info!("Deleted transaction {} for {}", transaction_id, user_id);

    store.notify(Table::Transactions, user_id, ChangeKind::Delete);
    Ok(())
}

/// Sample rows inserted on a new user's first dashboard visit:
/// `(month, day, title, amount, category)`, negative amounts are expenses.
const SAMPLE_ROWS: [(u32, u32, &str, f64, &str); 20] = [
    (1, 15, "Salary", 75000.0, "Income"),
    (1, 5, "Rent", -15000.0, "Housing"),
    (1, 12, "Groceries", -12000.0, "Food"),
    (1, 18, "Utilities", -5000.0, "Bills"),
    (1, 25, "Dining Out", -6000.0, "Dining"),
    (2, 15, "Salary", 75000.0, "Income"),
    (2, 5, "Rent", -15000.0, "Housing"),
    (2, 10, "Groceries", -11500.0, "Food"),
    (2, 18, "Utilities", -4800.0, "Bills"),
    (2, 22, "Dining Out", -5500.0, "Dining"),
    (3, 15, "Salary", 75000.0, "Income"),
    (3, 5, "Rent", -15000.0, "Housing"),
    (3, 11, "Groceries", -12200.0, "Food"),
    (3, 18, "Utilities", -5100.0, "Bills"),
    (3, 24, "Dining Out", -6200.0, "Dining"),
    (4, 15, "Salary", 75000.0, "Income"),
    (4, 5, "Rent", -15000.0, "Housing"),
    (4, 9, "Groceries", -11800.0, "Food"),
    (4, 18, "Utilities", -5000.0, "Bills"),
    (4, 27, "Dining Out", -5900.0, "Dining"),
];

/// Whether the user already has the sample rows.
pub async fn has_sample_data(store: &Store, user_id: &str) -> Result<bool> {
    let count = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::IsDefault.eq(true))
        .count(store.db())
        .await?;
    Ok(count > 0)
}

/// Inserts the January–April sample rows for `year` unless the user already has them.
///
/// Returns the number of rows inserted (0 when already seeded). All rows go in one
/// database transaction.
#[instrument(skip(store))]
pub async fn seed_sample_data(store: &Store, user_id: &str, year: i32) -> Result<usize> {
    if user_id.trim().is_empty() {
        return Err(Error::MissingUser);
    }
    if has_sample_data(store, user_id).await? {
        debug!("Sample data already present for {}", user_id);
        return Ok(0);
    }

    let txn = store.db().begin().await?;
    for (month, day, title, amount, category) in SAMPLE_ROWS {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Error::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        })?;
        let row = if amount > 0.0 {
            NewTransaction::income(user_id, title, amount, category, date)
        } else {
            NewTransaction::expense(user_id, title, amount, category, date)
        };
        row.into_active_model(true).insert(&txn).await?;
    }
    txn.commit().await?;

    info!("Seeded {} sample transactions for {}", SAMPLE_ROWS.len(), user_id);
    store.notify(Table::Transactions, user_id, ChangeKind::Insert);
    Ok(SAMPLE_ROWS.len())
}

/// Client-side filter used by the transaction list (search box, category picker,
/// date picker).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// Exact category; `"all"` disables the filter
    pub category: Option<String>,
    /// Exact date
    pub date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Entries matching every set criterion, in input order.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [LedgerEntry]) -> Vec<&'a LedgerEntry> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = self.category.as_deref().filter(|c| *c != "all");

        entries
            .iter()
            .filter(|entry| {
                needle
                    .as_ref()
                    .is_none_or(|n| entry.title.to_lowercase().contains(n.as_str()))
            })
            .filter(|entry| category.is_none_or(|c| entry.category.as_deref() == Some(c)))
            .filter(|entry| self.date.is_none_or(|d| entry.date == d))
            .collect()
    }
}
