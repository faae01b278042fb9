//! Headline metrics for the dashboard summary cards.
//!
//! Balance is the signed sum of every entry. Income, expenses and the savings rate
//! come from the current calendar month and are compared against the previous month.

use crate::core::{
    DataOrigin, Labeled,
    calendar::MonthKey,
    forecast::round_half_up,
    ledger::{self, LedgerEntry},
};
use chrono::NaiveDate;
use serde::Serialize;

/// Value shown as the balance change. There is no real computation behind it.
pub const SAMPLE_BALANCE_CHANGE: f64 = 10.5;

/// Income and expenses for one period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodTotals {
    /// Total income
    pub income: f64,
    /// Total expenses (positive)
    pub expenses: f64,
}

impl PeriodTotals {
    /// Totals of the entries dated inside `month`.
    #[must_use]
    pub fn for_month(entries: &[LedgerEntry], month: MonthKey) -> Self {
        let (income, expenses) = ledger::totals(entries.iter().filter(|e| month.contains(e.date)));
        Self { income, expenses }
    }

    /// Savings rate of this period in whole percent.
    #[must_use]
    pub fn savings_rate(&self) -> f64 {
        savings_rate(self.income, self.expenses)
    }
}

/// `round((income - expenses) / income * 100)`, or 0 without income.
#[must_use]
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    if income > 0.0 {
        round_half_up((income - expenses) / income * 100.0)
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`, 0 when `previous` is not positive.
#[must_use]
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Figures behind the four summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Signed sum of every entry
    pub balance: f64,
    /// Current-month income
    pub income: f64,
    /// Current-month expenses
    pub expenses: f64,
    /// Current-month savings rate, whole percent
    pub savings_rate: f64,
    /// Balance change; always a sample value
    pub balance_change: Labeled<f64>,
    /// Income change vs previous month, percent
    pub income_change: f64,
    /// Expense change vs previous month, percent
    pub expense_change: f64,
    /// Savings rate difference vs previous month, percentage points
    pub savings_change: f64,
    /// Current-month expenses exceed current-month income
    pub overspending: bool,
}

/// Computes the summary for the month containing `today`.
#[must_use]
pub fn summarize(entries: &[LedgerEntry], today: NaiveDate) -> DashboardSummary {
    let current_month = MonthKey::of(today);
    let current = PeriodTotals::for_month(entries, current_month);
    let previous = PeriodTotals::for_month(entries, current_month.previous());

    let balance = entries.iter().map(|entry| entry.amount).sum();

    let rate = current.savings_rate();
    let previous_rate = previous.savings_rate();
    let savings_change = if previous_rate > 0.0 {
        rate - previous_rate
    } else {
        0.0
    };

    DashboardSummary {
        balance,
        income: current.income,
        expenses: current.expenses,
        savings_rate: rate,
        balance_change: Labeled {
            value: SAMPLE_BALANCE_CHANGE,
            origin: DataOrigin::Sample,
        },
        income_change: percent_change(current.income, previous.income),
        expense_change: percent_change(current.expenses, previous.expenses),
        savings_change,
        overspending: current.expenses > current.income,
    }
}
