use super::{
    error::Result,
    expense::{parse_date, ExpenseRow},
};

/// Inclusive date bounds, compared against the stored `YYYY-MM-DD` strings.
///
/// Bounds are validated as canonical dates on construction, which is what
/// makes the lexicographic comparison chronological.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: Option<String>,
    end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let canonical = |bound: &str| parse_date(bound).map(|_| bound.trim().to_string());

        Ok(Self {
            start: start.map(canonical).transpose()?,
            end: end.map(canonical).transpose()?,
        })
    }

    pub fn contains(&self, row: &ExpenseRow) -> bool {
        self.contains_date(&row.date)
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.start.as_deref().map_or(true, |start| date >= start)
            && self.end.as_deref().map_or(true, |end| date <= end)
    }

    pub fn apply(&self, rows: Vec<ExpenseRow>) -> Vec<ExpenseRow> {
        rows.into_iter().filter(|row| self.contains(row)).collect()
    }
}

/// Category and date restriction shared by listing, export and plotting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filter {
    category: Option<String>,
    range: DateRange,
}

impl Filter {
    pub fn new(category: Option<&str>, range: DateRange) -> Self {
        Self {
            category: category.map(|category| category.trim().to_lowercase()),
            range,
        }
    }

    pub fn matches(&self, row: &ExpenseRow) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| row.category.trim().to_lowercase() == category)
            && self.range.contains(row)
    }

    pub fn apply(&self, rows: Vec<ExpenseRow>) -> Vec<ExpenseRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}
