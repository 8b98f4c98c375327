use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loansim_core::simulation::variable_rate::{self, VariableRateInput};

use crate::input;

/// Arguments for the variable-rate simulation
#[derive(Args)]
pub struct VariableRateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Recurring monthly charges
    #[arg(long)]
    pub charges: Option<Decimal>,

    /// Initial annual rate in percent
    #[arg(long)]
    pub initial_rate: Option<Decimal>,

    /// Total loan duration in months
    #[arg(long)]
    pub duration: Option<u32>,

    /// Fixed-rate period in months
    #[arg(long)]
    pub fixed_period: Option<u32>,

    /// Annual rate increment in percentage points
    #[arg(long)]
    pub increment: Option<Decimal>,
}

pub fn run(args: VariableRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let vr_input: VariableRateInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        VariableRateInput {
            monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            monthly_charges: args.charges.ok_or("--charges is required (or provide --input)")?,
            initial_rate_pct: args
                .initial_rate
                .ok_or("--initial-rate is required (or provide --input)")?,
            total_duration_months: args
                .duration
                .ok_or("--duration is required (or provide --input)")?,
            fixed_period_months: args
                .fixed_period
                .ok_or("--fixed-period is required (or provide --input)")?,
            annual_increment_pct: args
                .increment
                .ok_or("--increment is required (or provide --input)")?,
        }
    };

    let result = variable_rate::simulate_variable_rate(&vr_input)?;
    Ok(serde_json::to_value(result)?)
}
