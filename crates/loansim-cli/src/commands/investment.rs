use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loansim_core::simulation::investment::{self, InvestmentInput};

use crate::input;

/// Arguments for the rental-investment simulation
#[derive(Args)]
pub struct InvestmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cash down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual nominal rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan duration in months
    #[arg(long)]
    pub duration: Option<u32>,

    /// Expected monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Monthly running charges
    #[arg(long, default_value = "0")]
    pub charges: Decimal,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub annual_tax: Decimal,
}

pub fn run(args: InvestmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inv_input: InvestmentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        InvestmentInput {
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down_payment,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            duration_months: args.duration.ok_or("--duration is required (or provide --input)")?,
            monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
            monthly_charges: args.charges,
            annual_tax: args.annual_tax,
        }
    };

    let result = investment::simulate_investment(&inv_input)?;
    Ok(serde_json::to_value(result)?)
}
