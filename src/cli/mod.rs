use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{
    error::Result,
    filter::{DateRange, Filter},
};

#[derive(Parser, Debug)]
#[command(name = "spendlog", version, about = "Keep a plain CSV log of your expenses")]
pub struct Opts {
    #[arg(
        short,
        long,
        env = "SPENDLOG_FILE",
        default_value = "expenses.csv",
        value_name = "FILE",
        help = "The expense file to read and append to"
    )]
    pub file: PathBuf,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Log more (-v info, -vv debug)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense
    Add {
        #[arg(allow_negative_numbers = true, help = "Amount spent; negative for refunds")]
        amount: String,
        category: String,
        description: Option<String>,
        #[arg(short, long, value_name = "YYYY-MM-DD", help = "Defaults to today")]
        date: Option<String>,
    },
    /// Show the most recent expenses
    List {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Summarize a month, or count expenses per category over a date range
    Report {
        #[arg(short, long, value_name = "YYYY-MM", conflicts_with_all = ["start", "end"])]
        month: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Copy matching expenses to another CSV file
    Export {
        destination: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Chart totals per category or per day
    Plot {
        #[arg(value_enum, default_value_t = PlotKind::Category)]
        kind: PlotKind,
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotKind {
    Category,
    Daily,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    #[arg(long, value_name = "YYYY-MM-DD", help = "Earliest date to include")]
    start: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD", help = "Latest date to include")]
    end: Option<String>,
}

impl RangeArgs {
    pub fn to_range(&self) -> Result<DateRange> {
        DateRange::new(self.start.as_deref(), self.end.as_deref())
    }
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    #[arg(short, long, help = "Only this category (case-insensitive)")]
    category: Option<String>,
    #[command(flatten)]
    range: RangeArgs,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<Filter> {
        Ok(Filter::new(self.category.as_deref(), self.range.to_range()?))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::try_parse_from(["spendlog"].iter().chain(args)).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Opts::command().debug_assert();
    }

    #[test]
    fn add_accepts_negative_amounts() {
        let opts = parse(&["-f", "x.csv", "add", "-12.5", "Books", "refund"]);

        match opts.cmd {
            Command::Add {
                amount,
                category,
                description,
                date,
            } => {
                assert_eq!(amount, "-12.5");
                assert_eq!(category, "Books");
                assert_eq!(description.as_deref(), Some("refund"));
                assert_eq!(date, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(opts.file, PathBuf::from("x.csv"));
    }

    #[test]
    fn list_defaults_to_ten() {
        match parse(&["list", "--category", "food", "--start", "2025-11-01"]).cmd {
            Command::List { limit, filter } => {
                assert_eq!(limit, 10);
                assert_eq!(
                    filter.to_filter().unwrap(),
                    Filter::new(Some("food"), DateRange::new(Some("2025-11-01"), None).unwrap())
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn report_month_excludes_range() {
        let args = ["spendlog", "report", "--month", "2025-11", "--start", "2025-11-01"];
        assert!(Opts::try_parse_from(args).is_err());
    }

    #[test]
    fn malformed_range_is_a_validation_error() {
        match parse(&["plot", "daily", "--end", "yesterday"]).cmd {
            Command::Plot { kind, range } => {
                assert_eq!(kind, PlotKind::Daily);
                assert!(range.to_range().is_err());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
