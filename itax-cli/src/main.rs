use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use itax_cli::csv_loader;
use itax_cli::report::{
    ComparisonReport, HraReport, IncomeTaxReport, SectionsReport, TablesReport, TdsReport,
};
use itax_cli::utils::parse_amount;
use itax_core::calculations::{calculate_annual_summary, calculate_monthly_exemption, resolve_tds};
use itax_core::{RateTables, RegimeName, SectionCategory};
use itax_data::RateTableLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Indian income tax, TDS/TCS and HRA calculator.
///
/// Uses the built-in FY 2025-26 rate tables unless `--tables` points at a
/// directory of rate-table CSV files.
#[derive(Debug, Parser)]
#[command(name = "itax", version)]
struct Cli {
    /// Directory holding regimes.csv, slabs.csv, surcharges.csv and
    /// sections.csv.
    #[arg(long, global = true, value_name = "DIR")]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Income tax on a taxable income; compares both regimes unless one is named.
    IncomeTax {
        /// Taxable income in rupees, e.g. 12,00,000.
        #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
        income: Decimal,

        /// `old` or `new`.
        #[arg(long)]
        regime: Option<RegimeName>,
    },

    /// Withholding or collection on a single payment.
    Tds {
        /// Payment amount in rupees.
        #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Decimal,

        /// Section code, e.g. 194C or 206C(1G).
        #[arg(long)]
        section: String,

        /// The payee has not furnished a PAN.
        #[arg(long)]
        no_pan: bool,
    },

    /// List the sections in the rate table.
    Sections {
        /// `tds` or `tcs`.
        #[arg(long, value_parser = parse_category)]
        category: Option<SectionCategory>,
    },

    /// HRA exemption for each month in a CSV file, with annual totals.
    Hra {
        /// CSV with columns month,salary,hra_received,rent_paid,is_metro.
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Load and validate a rate-table directory.
    CheckTables {
        dir: PathBuf,
    },
}

fn parse_category(s: &str) -> Result<SectionCategory, String> {
    SectionCategory::parse(s).ok_or_else(|| format!("expected tds or tcs, got '{s}'"))
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
/// * Writes to stderr so reports on stdout can be piped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── table loading ───────────────────────────────────────────────────────────

fn load_tables(dir: Option<&Path>) -> anyhow::Result<RateTables> {
    match dir {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading rate tables from disk");
            RateTableLoader::load_dir(dir)
                .with_context(|| format!("loading rate tables from {}", dir.display()))
        }
        None => RateTables::fy2025_26().context("building built-in FY 2025-26 tables"),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::IncomeTax { income, regime } => {
            let tables = load_tables(cli.tables.as_deref())?;
            match regime {
                Some(name) => {
                    let result = tables.compute_income_tax(income, name)?;
                    let report = IncomeTaxReport {
                        label: &tables.regime(name).label,
                        result: &result,
                    };
                    println!("{report}");
                }
                None => {
                    let comparison = tables.compare_regimes(income)?;
                    println!(
                        "{}",
                        ComparisonReport {
                            tables: &tables,
                            comparison: &comparison,
                        }
                    );
                }
            }
        }

        Command::Tds {
            amount,
            section,
            no_pan,
        } => {
            let tables = load_tables(cli.tables.as_deref())?;
            let section = tables.section(&section)?;
            let result = resolve_tds(amount, section, !no_pan)?;
            println!(
                "{}",
                TdsReport {
                    section,
                    result: &result,
                }
            );
        }

        Command::Sections { category } => {
            let tables = load_tables(cli.tables.as_deref())?;
            let sections = match category {
                Some(category) => tables.sections_in(category).collect(),
                None => tables.sections().iter().collect(),
            };
            println!("{}", SectionsReport { sections });
        }

        Command::Hra { file } => {
            let inputs = csv_loader::load_from_file(&file)
                .with_context(|| format!("reading HRA months from {}", file.display()))?;
            let months: Vec<_> = inputs.iter().map(calculate_monthly_exemption).collect();
            let summary = calculate_annual_summary(&months)
                .with_context(|| format!("totalling HRA months from {}", file.display()))?;
            println!(
                "{}",
                HraReport {
                    months: &months,
                    summary: &summary,
                }
            );
        }

        Command::CheckTables { dir } => {
            let tables = RateTableLoader::load_dir(&dir)
                .with_context(|| format!("checking rate tables in {}", dir.display()))?;
            println!("{}", TablesReport(&tables));

            let builtin = RateTables::fy2025_26()?;
            if tables.financial_year() == builtin.financial_year() && tables != builtin {
                info!(
                    financial_year = tables.financial_year(),
                    "tables differ from the built-in set for the same year"
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn negative_income_reaches_the_calculator() {
        let cli = Cli::try_parse_from(["itax", "income-tax", "--income", "-5"])
            .expect("negative amount parses");

        let Command::IncomeTax { income, regime } = cli.command else {
            panic!("expected income-tax, got {:?}", cli.command);
        };
        assert_eq!(income, dec!(-5));
        assert_eq!(regime, None);

        let tables = RateTables::fy2025_26().unwrap();
        assert!(tables.compare_regimes(income).is_err());
    }

    #[test]
    fn negative_payment_parses_for_tds() {
        let cli = Cli::try_parse_from([
            "itax", "tds", "--amount", "-30000", "--section", "194c", "--no-pan",
        ])
        .expect("negative amount parses");

        let Command::Tds {
            amount,
            section,
            no_pan,
        } = cli.command
        else {
            panic!("expected tds, got {:?}", cli.command);
        };
        assert_eq!(amount, dec!(-30000));
        assert_eq!(section, "194c");
        assert!(no_pan);
    }

    #[test]
    fn tds_uses_the_looked_up_section() {
        let tables = RateTables::fy2025_26().unwrap();
        let section = tables.section(" 194c ").unwrap();

        let result = resolve_tds(dec!(30000), section, false).unwrap();

        assert_eq!(result.section_code, "194C");
        assert_eq!(result.tds_amount, dec!(6000));
    }
}
