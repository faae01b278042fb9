//! Text rendering of dashboard figures.
//!
//! Everything here is pure formatting over already-computed values, so the daemon log
//! and any other text surface render the dashboard the same way. Amounts use Indian
//! digit grouping (`1,25,000`).

use crate::core::{
    DataOrigin,
    category::CategoryBreakdown,
    dashboard::DashboardSnapshot,
    forecast::Forecast,
    ledger::LedgerEntry,
    monthly::YearOverview,
    summary::DashboardSummary,
};
use std::fmt::Write;

/// Warning shown when any projected month spends more than it earns
pub const BUDGET_WARNING: &str = "Predicted expenses exceed income in future months";

/// Marker appended to placeholder figures
const SAMPLE_MARKER: &str = "(sample data)";

/// Groups the digits of a whole number the Indian way: the last three digits, then
/// pairs (`125000` -> `1,25,000`).
#[must_use]
pub fn group_en_in(whole: u64) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Formats an amount with a currency symbol.
///
/// Whole amounts print without decimals; anything else prints two. Negative amounts
/// get a leading minus before the symbol.
///
/// # Arguments
/// * `value` - Amount to format
/// * `symbol` - Currency symbol, e.g. `"₹"`
///
/// # Returns
/// Formatted string like `"₹1,25,000"` or `"-₹120.50"`
#[must_use]
pub fn format_amount(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{symbol}-");
    }

    // Cast safety: the value is finite and abs() is non-negative; amounts beyond u64
    // cents saturate, which is acceptable for display.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    let whole = group_en_in(cents / 100);

    match cents % 100 {
        0 => format!("{sign}{symbol}{whole}"),
        fraction => format!("{sign}{symbol}{whole}.{fraction:02}"),
    }
}

/// Formats a percentage change with an explicit sign, one decimal place.
#[must_use]
pub fn format_change(percent: f64) -> String {
    if percent >= 0.0 {
        format!("+{percent:.1}%")
    } else {
        format!("{percent:.1}%")
    }
}

/// Text bar for a percentage, e.g. `[████░░░░░░]`. Values are clamped to 0–100.
#[must_use]
pub fn format_share_bar(percent: f64, bar_length: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);

    // Cast safety: clamped ∈ [0, 100] and bar_length is small.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * bar_length as f64).round() as usize;
    let empty = bar_length.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

fn origin_suffix(origin: DataOrigin) -> &'static str {
    match origin {
        DataOrigin::Actual => "",
        DataOrigin::Sample => " (sample)",
    }
}

/// The four summary cards.
#[must_use]
pub fn format_summary(summary: &DashboardSummary, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total balance: {} ({}{})",
        format_amount(summary.balance, symbol),
        format_change(summary.balance_change.value),
        origin_suffix(summary.balance_change.origin)
    );
    let _ = writeln!(
        out,
        "Monthly income: {} ({} vs last month)",
        format_amount(summary.income, symbol),
        format_change(summary.income_change)
    );
    let _ = writeln!(
        out,
        "Monthly expenses: {} ({} vs last month)",
        format_amount(summary.expenses, symbol),
        format_change(summary.expense_change)
    );
    let _ = writeln!(
        out,
        "Savings rate: {:.0}% ({:+.0} pts vs last month)",
        summary.savings_rate, summary.savings_change
    );
    if summary.overspending {
        let _ = writeln!(out, "Warning: expenses exceed income this month");
    }
    out
}

/// The expense breakdown, one line per category with its share of the total.
#[must_use]
pub fn format_breakdown(breakdown: &CategoryBreakdown, symbol: &str) -> String {
    let mut out = String::new();
    if breakdown.is_sample() {
        let _ = writeln!(out, "Expenses by category {SAMPLE_MARKER}");
    } else {
        let _ = writeln!(out, "Expenses by category");
    }

    for slice in &breakdown.slices {
        let share = breakdown.share(&slice.name);
        let _ = writeln!(
            out,
            "  {:<15} {:>12} {} {share:.1}%",
            slice.name,
            format_amount(slice.value, symbol),
            format_share_bar(share, 10)
        );
    }
    out
}

/// Income, expenses and savings for every month up to and including the current one.
#[must_use]
pub fn format_year(year: &YearOverview, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Income vs expenses {}", year.year);
    for bucket in year.months.iter().take(year.current_month + 1) {
        let _ = writeln!(
            out,
            "  {}  in {:>12}  out {:>12}  saved {:>12}",
            bucket.name,
            format_amount(bucket.income, symbol),
            format_amount(bucket.expenses, symbol),
            format_amount(bucket.savings, symbol)
        );
    }
    out
}

/// The May–December projection, with the budget warning when it applies.
#[must_use]
pub fn format_forecast(forecast: &Forecast, symbol: &str) -> String {
    let mut out = String::new();
    let source = if forecast.baseline.salary_override {
        "declared salary"
    } else {
        "average income"
    };
    let _ = writeln!(out, "Forecast (income from {source})");

    for bucket in &forecast.months {
        let _ = writeln!(
            out,
            "  {}  in {:>12}  out {:>12}  saved {:>12}",
            bucket.name,
            format_amount(bucket.income, symbol),
            format_amount(bucket.expenses, symbol),
            format_amount(bucket.savings, symbol)
        );
    }
    if forecast.budget_warning {
        let _ = writeln!(out, "Warning: {BUDGET_WARNING}");
    }
    out
}

/// The recent-transactions list.
#[must_use]
pub fn format_recent(entries: &[LedgerEntry], symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recent transactions");
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return out;
    }
    for entry in entries {
        let signed = if entry.is_income() {
            entry.magnitude()
        } else {
            -entry.magnitude()
        };
        let _ = writeln!(
            out,
            "  {}  {:<20} {:>12}  {}",
            entry.date,
            entry.title,
            format_amount(signed, symbol),
            entry.category_label()
        );
    }
    out
}

/// The whole dashboard as one block of text.
#[must_use]
pub fn format_dashboard(snapshot: &DashboardSnapshot, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard for {} ({})", snapshot.user_id, snapshot.today);
    out.push_str(&format_summary(&snapshot.summary, symbol));
    out.push('\n');
    out.push_str(&format_year(&snapshot.year, symbol));
    out.push('\n');
    out.push_str(&format_forecast(&snapshot.forecast, symbol));
    out.push('\n');
    out.push_str(&format_breakdown(&snapshot.categories, symbol));
    out.push('\n');
    out.push_str(&format_recent(&snapshot.recent, symbol));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        category::aggregate_by_category,
        forecast::{Baseline, project},
        monthly::MonthlyBucket,
        summary::summarize,
    };
    use crate::test_utils::*;

    #[test]
    fn test_group_en_in() {
        assert_eq!(group_en_in(0), "0");
        assert_eq!(group_en_in(999), "999");
        assert_eq!(group_en_in(1000), "1,000");
        assert_eq!(group_en_in(125_000), "1,25,000");
        assert_eq!(group_en_in(12_345_678), "1,23,45,678");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(75000.0, "₹"), "₹75,000");
        assert_eq!(format_amount(-120.5, "₹"), "-₹120.50");
        assert_eq!(format_amount(0.0, "$"), "$0");
        assert_eq!(format_amount(-0.001, "$"), "$0");
        assert_eq!(format_amount(f64::NAN, "₹"), "₹-");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(10.5), "+10.5%");
        assert_eq!(format_change(0.0), "+0.0%");
        assert_eq!(format_change(-3.26), "-3.3%");
    }

    #[test]
    fn test_format_share_bar() {
        assert_eq!(format_share_bar(50.0, 10), "[█████░░░░░]");
        assert_eq!(format_share_bar(150.0, 4), "[████]");
        assert_eq!(format_share_bar(-5.0, 4), "[░░░░]");
    }

    #[test]
    fn test_format_summary_marks_sample_balance_change() {
        let entries = vec![
            entry(1, 1000.0, "income", None, "2025-03-01"),
            entry(2, -1500.0, "expense", None, "2025-03-02"),
        ];
        let text = format_summary(&summarize(&entries, date(2025, 3, 20)), "₹");
        assert!(text.contains("Total balance: -₹500 (+10.5% (sample))"));
        assert!(text.contains("Monthly expenses: ₹1,500"));
        assert!(text.contains("Warning: expenses exceed income this month"));
    }

    #[test]
    fn test_format_breakdown_labels_sample_data() {
        let sample = format_breakdown(&aggregate_by_category(&[]), "₹");
        assert!(sample.starts_with("Expenses by category (sample data)"));
        assert!(sample.contains("₹15,000"));

        let actual = format_breakdown(
            &aggregate_by_category(&[entry(1, -300.0, "expense", Some("Food"), "2025-03-02")]),
            "₹",
        );
        assert!(!actual.contains("sample"));
        assert!(actual.contains("100.0%"));
    }

    #[test]
    fn test_format_forecast_warning() {
        let months = vec![MonthlyBucket::new("Jan", 10000.0, 12000.0)];
        let text = format_forecast(&project(&Baseline::from_months(&months, None)), "₹");
        assert!(text.contains(BUDGET_WARNING));
        assert!(text.contains("average income"));

        let text = format_forecast(&project(&Baseline::from_months(&months, Some(50000.0))), "₹");
        assert!(!text.contains(BUDGET_WARNING));
        assert!(text.contains("declared salary"));
        assert!(text.contains("₹53,000"));
    }

    #[test]
    fn test_format_recent() {
        assert!(format_recent(&[], "₹").contains("(none)"));

        let entries = vec![entry(7, -250.0, "expense", None, "2025-03-02")];
        let text = format_recent(&entries, "₹");
        assert!(text.contains("2025-03-02"));
        assert!(text.contains("Tx 7"));
        assert!(text.contains("-₹250"));
        assert!(text.contains("Other"));
    }

    #[tokio::test]
    async fn test_format_dashboard() -> crate::errors::Result<()> {
        let store = setup_test_store().await?;
        insert_income(&store, "alice", "Salary", 75000.0, "Income", date(2025, 3, 15)).await?;
        let snapshot =
            crate::core::dashboard::load_dashboard(&store, "alice", date(2025, 3, 20), 5).await?;

        let text = format_dashboard(&snapshot, "₹");
        assert!(text.starts_with("Dashboard for alice (2025-03-20)"));
        assert!(text.contains("Income vs expenses 2025"));
        assert!(text.contains("Mar  in"));
        assert!(text.contains("Forecast"));
        assert!(text.contains("Salary"));
        Ok(())
    }
}
