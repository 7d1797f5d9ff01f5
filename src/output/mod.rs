//! Plain-text rendering of ledger results.

use itertools::Itertools;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{
    expense::ExpenseRow,
    report::{MonthlySummary, RangeReport},
};

pub const NO_EXPENSES: &str = "No expenses found.";

pub fn added(row: &ExpenseRow) -> String {
    format!(
        "Added expense {}: {} {} on {}",
        row.id, row.amount, row.category, row.date
    )
}

pub fn expenses(rows: &[ExpenseRow]) -> String {
    if rows.is_empty() {
        return NO_EXPENSES.to_string();
    }

    let id = column_width("ID", rows.iter().map(|row| row.id.as_str()));
    let category = column_width("Category", rows.iter().map(|row| row.category.as_str()));

    let header = format!(
        "{:>id$}  {:<10}  {:>10}  {:<category$}  Description",
        "ID", "Date", "Amount", "Category"
    );
    let lines = rows.iter().map(|row| {
        format!(
            "{:>id$}  {:<10}  {:>10}  {:<category$}  {}",
            row.id, row.date, row.amount, row.category, row.description
        )
    });

    std::iter::once(header)
        .chain(lines)
        .join("\n")
        .trim_end()
        .to_string()
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .chain([header.len()])
        .max()
        .unwrap_or(0)
}

/// Rounds half away from zero; `Decimal`'s own precision formatting truncates.
fn rounded(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

pub fn monthly_summary(summary: &MonthlySummary) -> String {
    let head = format!(
        "Summary for {}\n  Total:        {:.2}\n  Transactions: {}\n  Average:      {:.2}\n\nBy category:",
        summary.month.as_str(),
        rounded(summary.total, 2),
        summary.count,
        rounded(summary.average, 2),
    );

    let width = column_width("", summary.categories.iter().map(|c| c.category.as_str()));
    let lines = summary.categories.iter().map(|category| {
        format!(
            "  {:<width$}  {:>10.2}  {:>5.1}%",
            category.category,
            rounded(category.subtotal, 2),
            rounded(category.percentage, 1),
        )
    });

    std::iter::once(head).chain(lines).join("\n")
}

pub fn no_month_data(month: &str) -> String {
    format!("No expenses recorded for {month}.")
}

pub fn range_report(report: &RangeReport) -> String {
    if report.count == 0 {
        return NO_EXPENSES.to_string();
    }

    let head = format!(
        "Total:        {:.2}\nTransactions: {}\n\nMost common categories:",
        rounded(report.total, 2),
        report.count
    );
    let lines = report
        .categories
        .iter()
        .map(|(category, count)| format!("  {category}: {count}"));

    std::iter::once(head).chain(lines).join("\n")
}

pub fn exported(count: usize, destination: &std::path::Path) -> String {
    format!("Exported {count} expenses to {}", destination.display())
}

pub fn chart_unavailable(feature: &str) -> String {
    format!("Plotting is unavailable: this build was compiled without the `{feature}` feature.")
}
