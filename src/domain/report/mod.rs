use std::collections::BTreeMap;

use chrono::NaiveDate;
use itertools::Itertools;
use log::warn;
use rust_decimal::Decimal;

use super::{
    error::{Error, Result},
    expense::{ExpenseRow, DATE_FORMAT},
    filter::{DateRange, Filter},
};

/// A calendar month in canonical `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMonth(String);

impl YearMonth {
    pub fn parse(month: &str) -> Result<Self> {
        let trimmed = month.trim();

        NaiveDate::parse_from_str(&format!("{trimmed}-01"), DATE_FORMAT)
            .ok()
            .filter(|first| first.format("%Y-%m").to_string() == trimmed)
            .map(|_| Self(trimmed.to_string()))
            .ok_or_else(|| Error::InvalidMonth(month.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn contains(&self, row: &ExpenseRow) -> bool {
        row.date
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub subtotal: Decimal,
    /// Share of the month total, `0` when the total is zero.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub categories: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReport {
    pub total: Decimal,
    pub count: usize,
    /// Rows per category, most common first.
    pub categories: Vec<(String, usize)>,
}

/// Filters, then sorts by date descending. Equal dates keep file order.
pub fn list(rows: Vec<ExpenseRow>, limit: Option<usize>, filter: &Filter) -> Vec<ExpenseRow> {
    let mut rows = filter.apply(rows);
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    rows
}

/// Returns `Ok(None)` when the month has no usable rows.
pub fn monthly_summary(
    rows: Vec<ExpenseRow>,
    month: &YearMonth,
) -> Result<Option<MonthlySummary>> {
    let amounts: Vec<_> = with_amounts(rows.into_iter().filter(|row| month.contains(row))).collect();

    if amounts.is_empty() {
        return Ok(None);
    }

    let total = checked_sum(amounts.iter().map(|(_, amount)| *amount))?;
    let count = amounts.len();

    let categories = sum_by(amounts, |row| row.category.clone())?
        .into_iter()
        .map(|(category, subtotal)| {
            Ok(CategoryTotal {
                percentage: percentage(subtotal, total)?,
                category,
                subtotal,
            })
        })
        .collect::<Result<_>>()?;

    Ok(Some(MonthlySummary {
        month: month.clone(),
        total,
        count,
        average: total / Decimal::from(count),
        categories,
    }))
}

pub fn range_report(rows: Vec<ExpenseRow>, range: &DateRange) -> Result<RangeReport> {
    let rows = range.apply(rows);

    let mut categories: Vec<(String, usize)> = Vec::new();
    for row in &rows {
        match categories.iter_mut().find(|(category, _)| *category == row.category) {
            Some((_, count)) => *count += 1,
            None => categories.push((row.category.clone(), 1)),
        }
    }

    Ok(RangeReport {
        total: checked_sum(with_amounts(rows.iter().cloned()).map(|(_, amount)| amount))?,
        count: rows.len(),
        categories: categories
            .into_iter()
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .collect(),
    })
}

/// `(category, total)` pairs for charting, largest first.
pub fn category_breakdown(
    rows: Vec<ExpenseRow>,
    range: &DateRange,
) -> Result<Vec<(String, Decimal)>> {
    sum_by(with_amounts(range.apply(rows).into_iter()), |row| row.category.clone())
}

/// `(day, total)` pairs for every day present in the data, oldest first.
pub fn time_series(rows: Vec<ExpenseRow>) -> Result<Vec<(String, Decimal)>> {
    let mut days: BTreeMap<String, Decimal> = BTreeMap::new();

    for (row, amount) in with_amounts(rows.into_iter()) {
        let day = days.entry(row.date).or_insert(Decimal::ZERO);
        *day = day.checked_add(amount).ok_or(Error::AmountOverflow)?;
    }

    Ok(days.into_iter().collect())
}

fn percentage(part: Decimal, total: Decimal) -> Result<Decimal> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }

    part.checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(Error::AmountOverflow)
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |sum, amount| {
        sum.checked_add(amount).ok_or(Error::AmountOverflow)
    })
}

/// Pairs each row with its parsed amount, skipping rows whose amount is not a number.
fn with_amounts(
    rows: impl Iterator<Item = ExpenseRow>,
) -> impl Iterator<Item = (ExpenseRow, Decimal)> {
    rows.filter_map(|row| match row.amount() {
        Some(amount) => Some((row, amount)),
        None => {
            warn!("skipping expense {}: amount `{}` is not a number", row.id, row.amount);
            None
        }
    })
}

/// Sums amounts per key, largest first. Equal sums keep first-seen order.
fn sum_by(
    amounts: impl IntoIterator<Item = (ExpenseRow, Decimal)>,
    key: impl Fn(&ExpenseRow) -> String,
) -> Result<Vec<(String, Decimal)>> {
    let mut sums: Vec<(String, Decimal)> = Vec::new();

    for (row, amount) in amounts {
        let key = key(&row);
        match sums.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, sum)) => *sum = sum.checked_add(amount).ok_or(Error::AmountOverflow)?,
            None => sums.push((key, amount)),
        }
    }

    Ok(sums.into_iter().sorted_by(|(_, a), (_, b)| b.cmp(a)).collect())
}
