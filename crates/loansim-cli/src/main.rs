mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::compare::CompareArgs;
use commands::investment::InvestmentArgs;
use commands::optimize::OptimizeArgs;
use commands::rates::RatesArgs;
use commands::stress::StressArgs;
use commands::variable_rate::VariableRateArgs;

/// Mortgage loan simulations with decimal precision
#[derive(Parser)]
#[command(
    name = "loansim",
    version,
    about = "Mortgage loan simulations with decimal precision",
    long_about = "A CLI for mortgage borrowers and brokers: affordability, \
                  variable-rate projections, duration/down-payment optimization, \
                  rental-investment cash flow, stress tests, and multi-offer \
                  comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// How much can a borrower afford at a given rate and duration
    Affordability(AffordabilityArgs),
    /// Project yearly payments under a drifting rate
    VariableRate(VariableRateArgs),
    /// Search durations and down payments for the cheapest viable loan
    Optimize(OptimizeArgs),
    /// Rental-investment cash flow and yearly checkpoints
    Investment(InvestmentArgs),
    /// Apply the fixed crisis scenarios to a borrower's position
    StressTest(StressArgs),
    /// Rank bank offers on a fixed principal by total cost
    CompareOffers(CompareArgs),
    /// Show the current bank-rate board (fallback quotes without sources)
    Rates(RatesArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Affordability(args) => commands::affordability::run(args),
        Commands::VariableRate(args) => commands::variable_rate::run(args),
        Commands::Optimize(args) => commands::optimize::run(args),
        Commands::Investment(args) => commands::investment::run(args),
        Commands::StressTest(args) => commands::stress::run(args),
        Commands::CompareOffers(args) => commands::compare::run(args),
        Commands::Rates(args) => commands::rates::run(args),
        Commands::Version => {
            println!("loansim {}", env!("CARGO_PKG_VERSION"));
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
