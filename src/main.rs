mod chart;
mod cli;
mod domain;
mod error;
mod ledger;
mod output;
mod store;

use std::io::Write;

use chrono::Local;
use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::{
    cli::{Command, Opts, PlotKind},
    domain::{
        expense::{NewExpense, DATE_FORMAT},
        report::YearMonth,
    },
    error::Result,
    ledger::Ledger,
    store::Store,
};

fn main() {
    let opts = Opts::parse();
    init_logger(opts.verbose);

    if let Err(err) = run(opts) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }

    builder
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn run(opts: Opts) -> Result<()> {
    let ledger = Ledger::new(Store::new(opts.file));

    match opts.cmd {
        Command::Add {
            amount,
            category,
            description,
            date,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string());
            let expense = NewExpense::parse(
                &date,
                &amount,
                &category,
                description.as_deref().unwrap_or_default(),
            )?;

            let row = ledger.add(&expense)?;
            println!("{}", output::added(&row));
        }
        Command::List { limit, filter } => {
            let rows = ledger.list(Some(limit), &filter.to_filter()?)?;
            println!("{}", output::expenses(&rows));
        }
        Command::Report { month, range } => match month {
            Some(month) => {
                let month = YearMonth::parse(&month)?;
                match ledger.monthly_summary(&month)? {
                    Some(summary) => println!("{}", output::monthly_summary(&summary)),
                    None => println!("{}", output::no_month_data(month.as_str())),
                }
            }
            None => {
                let report = ledger.range_report(&range.to_range()?)?;
                println!("{}", output::range_report(&report));
            }
        },
        Command::Export {
            destination,
            filter,
        } => {
            let count = ledger.export(&destination, &filter.to_filter()?)?;
            println!("{}", output::exported(count, &destination));
        }
        Command::Plot { kind, range } => {
            let Some(renderer) = chart::renderer() else {
                println!("{}", output::chart_unavailable(chart::FEATURE));
                return Ok(());
            };

            let (title, series) = match kind {
                PlotKind::Category => (
                    "Spending by category",
                    ledger.category_breakdown(&range.to_range()?)?,
                ),
                PlotKind::Daily => {
                    let range = range.to_range()?;
                    let series: Vec<_> = ledger
                        .time_series()?
                        .into_iter()
                        .filter(|(day, _)| range.contains_date(day))
                        .collect();
                    ("Spending per day", series)
                }
            };

            if series.is_empty() {
                println!("{}", output::NO_EXPENSES);
            } else {
                print!("{}", renderer.render(title, &series));
            }
        }
    }

    Ok(())
}
