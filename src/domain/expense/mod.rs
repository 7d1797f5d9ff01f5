use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One line of the expense file, exactly as stored.
///
/// Fields are kept as strings: the file is edited by hand, so nothing here is
/// trusted until an aggregation actually needs a value (see [`ExpenseRow::amount`]).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl ExpenseRow {
    pub fn new(id: u64, expense: &NewExpense) -> Self {
        Self {
            id: id.to_string(),
            date: expense.date.format(DATE_FORMAT).to_string(),
            amount: format!("{:.2}", expense.amount),
            category: expense.category.clone(),
            description: expense.description.clone(),
        }
    }

    /// The id, if it is a positive integer.
    pub fn id(&self) -> Option<u64> {
        self.id.trim().parse().ok().filter(|&id| id > 0)
    }

    pub fn amount(&self) -> Option<Decimal> {
        parse_decimal(self.amount.trim())
    }
}

/// A validated expense that has not been assigned an id yet.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
}

impl NewExpense {
    pub fn parse(date: &str, amount: &str, category: &str, description: &str) -> Result<Self> {
        let amount = parse_decimal(amount.trim())
            .ok_or_else(|| Error::InvalidAmount(amount.to_string()))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Ok(Self {
            date: parse_date(date)?,
            amount,
            category: category.trim().to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// Parses a canonical, zero padded `YYYY-MM-DD` date.
///
/// Non-padded input such as `2025-1-5` is rejected: date bounds are compared
/// as strings, which only orders correctly for the canonical form.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let trimmed = date.trim();

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == trimmed)
        .ok_or_else(|| Error::InvalidDate(date.to_string()))
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
