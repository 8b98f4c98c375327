use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use loansim_core::simulation::affordability::{self, AffordabilityInput};

use crate::input;

/// Arguments for the affordability calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Other monthly income (rent, alimony)
    #[arg(long, default_value = "0")]
    pub other_income: Decimal,

    /// Recurring monthly charges
    #[arg(long)]
    pub charges: Option<Decimal>,

    /// Maximum payment-to-income ratio
    #[arg(long, default_value = "0.33")]
    pub effort_ratio: Decimal,

    /// Annual nominal rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan duration in months
    #[arg(long)]
    pub duration: Option<u32>,

    /// Cash down payment (widens the purchasing budget)
    #[arg(long)]
    pub down_payment: Option<Decimal>,
}

pub fn run(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AffordabilityInput {
            monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            other_income: args.other_income,
            monthly_charges: args.charges.ok_or("--charges is required (or provide --input)")?,
            effort_ratio: args.effort_ratio,
            annual_rate_pct: args.rate.unwrap_or(dec!(3.5)),
            duration_months: args.duration.unwrap_or(240),
            down_payment: args.down_payment,
        }
    };

    let result = affordability::calculate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
