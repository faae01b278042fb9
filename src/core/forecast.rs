//! Forecast of income, expenses and savings for May through December.
//!
//! The baseline is the average of the January–April buckets that saw any activity;
//! a declared monthly salary replaces the income average outright. Each forecast month
//! `i` (1-indexed) grows the baseline linearly: income by 3% and expenses by 2% per
//! step of `i - 3`.

use crate::core::{
    calendar::MONTH_LABELS,
    monthly::{BASELINE_MONTHS, MonthlyBucket},
};
use serde::Serialize;

/// Monthly income growth applied per step
pub const INCOME_GROWTH: f64 = 0.03;
/// Monthly expense growth applied per step
pub const EXPENSE_GROWTH: f64 = 0.02;
/// First forecast month, 1-indexed (May)
pub const FIRST_FORECAST_MONTH: u32 = 5;
/// Offset subtracted from the month number to get the growth step
const GROWTH_OFFSET: u32 = 3;

/// Averages the forecast starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    /// Average monthly income, or the salary override
    pub income: f64,
    /// Average monthly expenses
    pub expenses: f64,
    /// Number of baseline months that had activity
    pub active_months: usize,
    /// Whether `income` came from the declared salary
    pub salary_override: bool,
}

impl Baseline {
    /// Builds the baseline from the first four monthly buckets.
    ///
    /// Months without any income or expenses are left out of the averages. A positive
    /// `salary` replaces the income average; it is not blended with it.
    #[must_use]
    pub fn from_months(months: &[MonthlyBucket], salary: Option<f64>) -> Self {
        let (income, expenses, active_months) = months
            .iter()
            .take(BASELINE_MONTHS)
            .filter(|bucket| bucket.has_activity())
            .fold((0.0, 0.0, 0_usize), |(i, e, n), bucket| {
                (i + bucket.income, e + bucket.expenses, n + 1)
            });

        let (avg_income, avg_expenses) = if active_months > 0 {
            #[allow(clippy::cast_precision_loss)]
            let n = active_months as f64;
            (income / n, expenses / n)
        } else {
            (0.0, 0.0)
        };

        match salary.filter(|s| s.is_finite() && *s > 0.0) {
            Some(salary) => Self {
                income: salary,
                expenses: avg_expenses,
                active_months,
                salary_override: true,
            },
            None => Self {
                income: avg_income,
                expenses: avg_expenses,
                active_months,
                salary_override: false,
            },
        }
    }
}

/// Projected buckets for May–December.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Baseline the projection started from
    pub baseline: Baseline,
    /// May through December
    pub months: Vec<MonthlyBucket>,
    /// Some projected month spends more than it earns
    pub budget_warning: bool,
}

impl Forecast {
    /// Projected bucket by label.
    #[must_use]
    pub fn month(&self, label: &str) -> Option<&MonthlyBucket> {
        self.months.iter().find(|bucket| bucket.name == label)
    }
}

/// Rounds half up, matching how the dashboard has always rounded projections
/// (`2.5 -> 3`, `-2.5 -> -2`).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Growth factor for 1-indexed month `month` at `rate` per step.
#[must_use]
pub fn growth_factor(month: u32, rate: f64) -> f64 {
    1.0 + rate * f64::from(month.saturating_sub(GROWTH_OFFSET))
}

/// Projects May through December from `baseline`.
#[must_use]
pub fn project(baseline: &Baseline) -> Forecast {
    let months: Vec<MonthlyBucket> = (FIRST_FORECAST_MONTH..=12)
        .map(|month| {
            let income = round_half_up(baseline.income * growth_factor(month, INCOME_GROWTH));
            let expenses =
                round_half_up(baseline.expenses * growth_factor(month, EXPENSE_GROWTH));
            MonthlyBucket::new(MONTH_LABELS[(month - 1) as usize], income, expenses)
        })
        .collect();

    let budget_warning = months.iter().any(|bucket| bucket.expenses > bucket.income);

    Forecast {
        baseline: *baseline,
        months,
        budget_warning,
    }
}
