//! The dashboard pipeline: fetch everything once, recompute every aggregate.
//!
//! Nothing is cached between runs; each call to [`load_dashboard`] produces a fresh
//! [`DashboardSnapshot`] from the store's current contents.

use crate::{
    core::{
        category::{CategoryBreakdown, fetch_category_breakdown},
        forecast::{Baseline, Forecast, project},
        ledger::LedgerEntry,
        monthly::{YearOverview, aggregate_year},
        profile::monthly_salary,
        store::Store,
        summary::{DashboardSummary, summarize},
        transaction::{TransactionQuery, fetch_entries, recent_transactions},
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

/// Every figure the dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// User the snapshot belongs to
    pub user_id: String,
    /// Date the snapshot was computed for
    pub today: NaiveDate,
    /// When the snapshot was computed
    pub computed_at: DateTime<Utc>,
    /// Summary cards
    pub summary: DashboardSummary,
    /// Twelve monthly buckets of the current year
    pub year: YearOverview,
    /// May–December projection
    pub forecast: Forecast,
    /// Current-month expense breakdown
    pub categories: CategoryBreakdown,
    /// Most recent transactions
    pub recent: Vec<LedgerEntry>,
    /// Declared salary used by the forecast, if any
    pub monthly_salary: Option<f64>,
}

/// Fetches the user's data and recomputes every aggregate for `today`.
#[instrument(skip(store))]
pub async fn load_dashboard(
    store: &Store,
    user_id: &str,
    today: NaiveDate,
    recent_limit: u64,
) -> Result<DashboardSnapshot> {
    let entries = fetch_entries(store, &TransactionQuery::for_user(user_id)).await?;
    let salary = monthly_salary(store, user_id).await?;
    let categories = fetch_category_breakdown(store, user_id, today).await?;
    let recent = recent_transactions(store, user_id, recent_limit).await?;

    let year = aggregate_year(&entries, today);
    let forecast = project(&Baseline::from_months(year.baseline(), salary));
    let summary = summarize(&entries, today);

    debug!(
        "Dashboard for {} recomputed from {} entries",
        user_id,
        entries.len()
    );

    Ok(DashboardSnapshot {
        user_id: user_id.to_string(),
        today,
        computed_at: Utc::now(),
        summary,
        year,
        forecast,
        categories,
        recent,
        monthly_salary: salary,
    })
}

/// What a dashboard view holds between refreshes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    /// Last successfully computed snapshot
    pub snapshot: Option<DashboardSnapshot>,
    /// No fetch has finished yet
    pub loading: bool,
    /// Transient notification from the most recent failed fetch
    pub notice: Option<String>,
    /// Number of fetches that have finished, successful or not
    pub refreshes: u64,
}

impl DashboardState {
    /// State before the first fetch completes.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Records the outcome of a fetch.
    ///
    /// A failure keeps the previous snapshot and sets `notice`; a success replaces the
    /// snapshot and clears it.
    pub fn apply(&mut self, result: Result<DashboardSnapshot>) {
        self.loading = false;
        self.refreshes += 1;
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.notice = None;
            }
            Err(e) => {
                self.notice = Some(format!("Failed to refresh dashboard: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{DataOrigin, profile::set_monthly_salary, transaction::seed_sample_data};
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_jan_feb_end_to_end() -> Result<()> {
        let store = setup_test_store().await?;
        insert_income(&store, "alice", "Salary", 75000.0, "Income", date(2025, 1, 15)).await?;
        insert_expense(&store, "alice", "Rent", 20000.0, "Housing", date(2025, 1, 5)).await?;
        insert_expense(&store, "alice", "Groceries", 18500.0, "Food", date(2025, 1, 12)).await?;
        insert_income(&store, "alice", "Salary", 75000.0, "Income", date(2025, 2, 15)).await?;
        insert_expense(&store, "alice", "Rent", 20000.0, "Housing", date(2025, 2, 5)).await?;
        insert_expense(&store, "alice", "Groceries", 16800.0, "Food", date(2025, 2, 12)).await?;

        let snapshot = load_dashboard(&store, "alice", date(2025, 2, 20), 5).await?;

        let jan = snapshot.year.month("Jan").unwrap();
        assert_eq!(jan.income, 75000.0);
        assert_eq!(jan.expenses, 38500.0);
        assert_eq!(jan.savings, 36500.0);

        // No salary override: baseline is the two-month average
        assert_eq!(snapshot.monthly_salary, None);
        assert_eq!(snapshot.forecast.baseline.income, 75000.0);
        assert_eq!(snapshot.forecast.baseline.expenses, 37650.0);
        assert_eq!(snapshot.forecast.month("May").unwrap().income, 79500.0);

        assert_eq!(snapshot.summary.income, 75000.0);
        assert_eq!(snapshot.summary.expenses, 36800.0);
        assert_eq!(snapshot.summary.balance, 74700.0);
        assert_eq!(snapshot.categories.origin, DataOrigin::Actual);
        assert_eq!(snapshot.categories.total(), 36800.0);
        assert_eq!(snapshot.recent.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_salary_override_flows_into_forecast() -> Result<()> {
        let store = setup_test_store().await?;
        seed_sample_data(&store, "alice", 2025).await?;
        set_monthly_salary(&store, "alice", Some(100_000.0)).await?;

        let snapshot = load_dashboard(&store, "alice", date(2025, 6, 1), 5).await?;
        assert!(snapshot.forecast.baseline.salary_override);
        assert_eq!(snapshot.forecast.month("May").unwrap().income, 106_000.0);
        // June has no expenses yet
        assert!(snapshot.categories.is_sample());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_user_gets_zeroed_dashboard() -> Result<()> {
        let store = setup_test_store().await?;
        let snapshot = load_dashboard(&store, "nobody", date(2025, 3, 3), 5).await?;
        assert_eq!(snapshot.summary.balance, 0.0);
        assert!(snapshot.year.months.iter().all(|m| !m.has_activity()));
        assert!(snapshot.categories.is_sample());
        assert!(snapshot.recent.is_empty());
        assert!(!snapshot.forecast.budget_warning);
        Ok(())
    }

    #[tokio::test]
    async fn test_state_keeps_last_snapshot_on_failure() -> Result<()> {
        let store = setup_test_store().await?;
        let snapshot = load_dashboard(&store, "alice", date(2025, 3, 3), 5).await?;

        let mut state = DashboardState::loading();
        assert!(state.loading);

        state.apply(Ok(snapshot.clone()));
        assert!(!state.loading);
        assert_eq!(state.refreshes, 1);
        assert!(state.notice.is_none());

        state.apply(Err(Error::MissingUser));
        assert_eq!(state.refreshes, 2);
        assert_eq!(state.snapshot, Some(snapshot));
        assert!(state.notice.unwrap().contains("No signed-in user"));
        Ok(())
    }
}
