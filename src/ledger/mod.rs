use std::path::Path;

use fs_err as fs;
use log::info;
use rust_decimal::Decimal;

use crate::{
    domain::{
        expense::{ExpenseRow, NewExpense},
        filter::{DateRange, Filter},
        report::{self, MonthlySummary, RangeReport, YearMonth},
    },
    error::{Error, Result},
    store::{self, Store},
};

/// Request/response operations over a fresh snapshot of the [`Store`].
pub struct Ledger {
    store: Store,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records a validated expense under the next free id.
    pub fn add(&self, expense: &NewExpense) -> Result<ExpenseRow> {
        let row = ExpenseRow::new(self.store.next_id()?, expense);
        self.store.append(&row)?;
        Ok(row)
    }

    pub fn list(&self, limit: Option<usize>, filter: &Filter) -> Result<Vec<ExpenseRow>> {
        Ok(report::list(self.store.read_all()?, limit, filter))
    }

    pub fn monthly_summary(&self, month: &YearMonth) -> Result<Option<MonthlySummary>> {
        Ok(report::monthly_summary(self.store.read_all()?, month)?)
    }

    pub fn range_report(&self, range: &DateRange) -> Result<RangeReport> {
        Ok(report::range_report(self.store.read_all()?, range)?)
    }

    /// Writes the filtered rows to `destination` in the store format and
    /// returns how many were written.
    pub fn export(&self, destination: &Path, filter: &Filter) -> Result<usize> {
        if is_same_file(self.store.path(), destination) {
            return Err(Error::ExportOverwritesStore(destination.to_path_buf()));
        }

        let rows = filter.apply(self.store.read_all()?);
        store::write(&rows, destination)?;

        info!("exported {} expenses to {}", rows.len(), destination.display());
        Ok(rows.len())
    }

    pub fn category_breakdown(&self, range: &DateRange) -> Result<Vec<(String, Decimal)>> {
        Ok(report::category_breakdown(self.store.read_all()?, range)?)
    }

    pub fn time_series(&self) -> Result<Vec<(String, Decimal)>> {
        Ok(report::time_series(self.store.read_all()?)?)
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tempfile::{tempdir, TempDir};

    use super::*;

    fn ledger() -> (TempDir, Ledger) {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(Store::new(dir.path().join("expenses.csv")));
        (dir, ledger)
    }

    fn add(ledger: &Ledger, date: &str, amount: &str, category: &str) -> ExpenseRow {
        let expense = NewExpense::parse(date, amount, category, "").unwrap();
        ledger.add(&expense).unwrap()
    }

    #[test]
    fn first_expense_is_listed_with_id_one() {
        let (_dir, ledger) = ledger();
        let expense = NewExpense::parse("2025-11-01", "250", "Food", "lunch").unwrap();

        ledger.add(&expense).unwrap();

        let listed = ledger.list(Some(10), &Filter::default()).unwrap();
        assert_eq!(
            listed,
            vec![ExpenseRow {
                id: "1".into(),
                date: "2025-11-01".into(),
                amount: "250.00".into(),
                category: "Food".into(),
                description: "lunch".into(),
            }]
        );
    }

    #[test]
    fn ids_are_assigned_in_call_order_without_gaps() {
        let (_dir, ledger) = ledger();

        let ids: Vec<_> = (0..5)
            .map(|day| add(&ledger, &format!("2025-11-0{}", 9 - day), "1", "A").id)
            .collect();

        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn ids_continue_after_the_largest_existing_one() {
        let (dir, ledger) = ledger();
        fs::write(
            dir.path().join("expenses.csv"),
            "id,date,amount,category,description\n\
             1,2025-11-01,1.00,A,\n\
             3,2025-11-01,1.00,A,\n\
             4,2025-11-01,1.00,A,\n",
        )
        .unwrap();

        assert_eq!(add(&ledger, "2025-11-02", "1", "A").id, "5");
        assert_eq!(add(&ledger, "2025-11-02", "1", "A").id, "6");
    }

    #[test]
    fn list_on_an_empty_store_is_empty() {
        let (_dir, ledger) = ledger();
        assert!(ledger.list(None, &Filter::default()).unwrap().is_empty());
    }

    #[test]
    fn november_summary() {
        let (_dir, ledger) = ledger();
        add(&ledger, "2025-11-01", "100", "Food");
        add(&ledger, "2025-11-05", "50", "Food");
        add(&ledger, "2025-11-07", "30", "Transport");
        add(&ledger, "2025-12-01", "70", "Transport");

        let summary = ledger
            .monthly_summary(&YearMonth::parse("2025-11").unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(summary.total, dec!(180.00));
        assert_eq!(summary.categories[0].subtotal, dec!(150.00));
        assert_eq!(summary.categories[0].percentage.round_dp(1), dec!(83.3));
        assert_eq!(summary.categories[1].subtotal, dec!(30.00));
        assert_eq!(summary.categories[1].percentage.round_dp(1), dec!(16.7));
    }

    #[test]
    fn printed_summary_rounds_shares_to_one_decimal() {
        let (_dir, ledger) = ledger();
        add(&ledger, "2025-11-01", "100", "Food");
        add(&ledger, "2025-11-05", "50", "Food");
        add(&ledger, "2025-11-07", "30", "Transport");

        let summary = ledger
            .monthly_summary(&YearMonth::parse("2025-11").unwrap())
            .unwrap()
            .unwrap();
        let text = crate::output::monthly_summary(&summary);

        assert!(text.contains("Total:        180.00"));
        assert!(text.contains("Average:      60.00"));
        assert!(text.contains("  Food           150.00   83.3%"));
        assert!(text.contains("  Transport       30.00   16.7%"));
    }

    #[test]
    fn export_round_trips_the_filtered_rows() {
        let (dir, ledger) = ledger();
        add(&ledger, "2025-10-30", "12", "Food");
        add(&ledger, "2025-11-01", "250", "Food");
        add(&ledger, "2025-11-02", "30", "Transport");
        add(&ledger, "2025-11-03", "7.5", "food");

        let filter = Filter::new(
            Some("FOOD"),
            DateRange::new(Some("2025-11-01"), None).unwrap(),
        );
        let destination = dir.path().join("november-food.csv");

        let written = ledger.export(&destination, &filter).unwrap();

        let expected = filter.apply(ledger.list(None, &Filter::default()).unwrap());
        let exported = Store::new(&destination).read_all().unwrap();

        assert_eq!(written, 2);
        assert_eq!(expected.len(), written);
        assert_eq!(exported.len(), written);
        for row in &expected {
            assert!(exported.contains(row));
        }
    }

    #[test]
    fn export_refuses_to_overwrite_the_store() {
        let (dir, ledger) = ledger();
        add(&ledger, "2025-11-01", "1", "A");

        let result = ledger.export(&dir.path().join("expenses.csv"), &Filter::default());

        assert!(matches!(result, Err(Error::ExportOverwritesStore(_))));
        assert_eq!(ledger.list(None, &Filter::default()).unwrap().len(), 1);
    }

    #[test]
    fn chart_series() {
        let (_dir, ledger) = ledger();
        add(&ledger, "2025-11-02", "10", "Food");
        add(&ledger, "2025-11-01", "5", "Rent");
        add(&ledger, "2025-11-02", "2.5", "Rent");

        assert_eq!(
            ledger.category_breakdown(&DateRange::default()).unwrap(),
            [("Food".to_string(), dec!(10)), ("Rent".to_string(), dec!(7.5))]
        );
        assert_eq!(
            ledger.time_series().unwrap(),
            [
                ("2025-11-01".to_string(), dec!(5)),
                ("2025-11-02".to_string(), dec!(12.5)),
            ]
        );
    }
}
