use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loansim_core::simulation::optimizer::{self, OptimizationInput};

use crate::input;

/// Arguments for the duration/down-payment optimizer
#[derive(Args)]
pub struct OptimizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Recurring monthly charges
    #[arg(long)]
    pub charges: Option<Decimal>,

    /// Property price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Annual nominal rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Shortest duration to consider, in months
    #[arg(long)]
    pub duration_min: Option<u32>,

    /// Longest duration to consider, in months
    #[arg(long)]
    pub duration_max: Option<u32>,
}

pub fn run(args: OptimizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let opt_input: OptimizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        OptimizationInput {
            monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            monthly_charges: args.charges.ok_or("--charges is required (or provide --input)")?,
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            duration_min_months: args
                .duration_min
                .ok_or("--duration-min is required (or provide --input)")?,
            duration_max_months: args
                .duration_max
                .ok_or("--duration-max is required (or provide --input)")?,
        }
    };

    let result = optimizer::optimize_loan(&opt_input)?;
    Ok(serde_json::to_value(result)?)
}
