use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loansim_core::simulation::stress::{self, StressTestInput};

use crate::input;

/// Arguments for the borrower stress test
#[derive(Args)]
pub struct StressArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Recurring monthly charges
    #[arg(long)]
    pub charges: Option<Decimal>,

    /// Loan payment being stress-tested
    #[arg(long)]
    pub payment: Option<Decimal>,
}

pub fn run(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stress_input: StressTestInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        StressTestInput {
            monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            monthly_charges: args.charges.ok_or("--charges is required (or provide --input)")?,
            current_payment: args.payment.ok_or("--payment is required (or provide --input)")?,
        }
    };

    let result = stress::run_stress_test(&stress_input)?;
    Ok(serde_json::to_value(result)?)
}
