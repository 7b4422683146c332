mod commands;
mod input;
mod output;
mod settings;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::fuel::FuelArgs;
use commands::interchange::{ExportArgs, ImportArgs};
use commands::loan::LoanArgs;
use commands::payments::PaymentsArgs;
use commands::report::ReportArgs;
use settings::Settings;

/// Vehicle ownership cost and fuel efficiency calculations
#[derive(Parser)]
#[command(
    name = "autolog",
    version,
    about = "Vehicle ownership cost and fuel efficiency calculations",
    long_about = "A CLI for tracking what a vehicle really costs, with decimal precision. \
                  Validates fill-ups and charges, summarises loans, backfills financing \
                  payments and reports per-vehicle ownership cost over JSON records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Settings file (defaults to ./autolog.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Loan payment, total interest and interest paid to date
    Loan(LoanArgs),
    /// Validate a fill-up or charge and derive its efficiency
    Fuel(FuelArgs),
    /// Generate loan and lease payments due up to today
    Payments(PaymentsArgs),
    /// Ownership cost report for one vehicle or the whole fleet
    Report(ReportArgs),
    /// Validate an import payload, collecting per-record errors
    Import(ImportArgs),
    /// Normalise vehicle records to the export shape
    Export(ExportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(2);
        }
    };
    if cli.today.is_some() {
        settings.today = cli.today;
    }
    settings::init_tracing(&settings);
    let today = settings.today();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Fuel(args) => commands::fuel::run_fuel(args),
        Commands::Payments(args) => commands::payments::run_payments(args, today),
        Commands::Report(args) => commands::report::run_report(args, today),
        Commands::Import(args) => commands::interchange::run_import(args),
        Commands::Export(args) => commands::interchange::run_export(args),
        Commands::Version => {
            println!("autolog {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
