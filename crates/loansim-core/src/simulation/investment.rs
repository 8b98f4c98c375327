use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::{annuity_payment, monthly_rate};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct};
use crate::LoanSimResult;

/// Checkpoint years for rental projections.
const CHECKPOINT_YEARS: [u32; 4] = [5, 10, 15, 20];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a buy-to-let simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub property_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub annual_rate_pct: RatePct,
    pub duration_months: u32,
    pub monthly_rent: Money,
    #[serde(default)]
    pub monthly_charges: Money,
    #[serde(default)]
    pub annual_tax: Money,
}

/// Position at a 5/10/15/20-year mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentCheckpoint {
    pub year: u32,
    pub cumulative_cash_flow: Money,
    /// Linear approximation, same convention as the variable-rate model.
    pub remaining_principal: Money,
    pub equity: Money,
}

/// Output of `simulate_investment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub principal: Money,
    pub monthly_payment: Money,
    /// Rent minus payment, charges, and the monthly share of the annual tax.
    pub monthly_cash_flow: Money,
    pub gross_yield_pct: Decimal,
    /// Checkpoints that fall within the loan duration, ordered by year.
    pub projections: Vec<InvestmentCheckpoint>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate a rental purchase: loan payment, net monthly cash flow, and the
/// position at the standard year marks.
pub fn simulate_investment(
    input: &InvestmentInput,
) -> LoanSimResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();

    validate(input)?;

    let principal = input.property_price - input.down_payment;
    let payment = annuity_payment(
        principal,
        monthly_rate(input.annual_rate_pct),
        input.duration_months,
    );
    let cash_flow =
        input.monthly_rent - payment - input.monthly_charges - input.annual_tax / dec!(12);
    let gross_yield = input.monthly_rent * dec!(12) / input.property_price * dec!(100);

    let total = Decimal::from(input.duration_months);
    let mut projections = Vec::new();
    for year in CHECKPOINT_YEARS {
        let months = year * 12;
        if months > input.duration_months {
            break;
        }
        let remaining = principal * (Decimal::ONE - Decimal::from(months) / total);
        projections.push(InvestmentCheckpoint {
            year,
            cumulative_cash_flow: round_money(cash_flow * Decimal::from(months)),
            remaining_principal: round_money(remaining),
            equity: round_money(input.property_price - remaining),
        });
    }

    let result = InvestmentResult {
        principal: round_money(principal),
        monthly_payment: round_money(payment),
        monthly_cash_flow: round_money(cash_flow),
        gross_yield_pct: round_money(gross_yield),
        projections,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental investment simulation (net cash flow, yearly checkpoints)",
        &serde_json::json!({
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "duration_months": input.duration_months,
            "checkpoint_years": CHECKPOINT_YEARS,
        }),
        vec![
            "Remaining principal at checkpoints is interpolated linearly, not an exact \
             amortization balance"
                .to_string(),
        ],
        elapsed,
        result,
    ))
}

fn validate(input: &InvestmentInput) -> LoanSimResult<()> {
    if input.duration_months == 0 || input.duration_months > super::MAX_DURATION_MONTHS {
        return Err(LoanSimError::InvalidInput {
            field: "duration_months".into(),
            reason: format!(
                "duration must be in (0, {}] months",
                super::MAX_DURATION_MONTHS
            ),
        });
    }
    if input.property_price <= Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "property_price".into(),
            reason: "price must be > 0".into(),
        });
    }
    if input.down_payment < Decimal::ZERO || input.down_payment >= input.property_price {
        return Err(LoanSimError::InvalidInput {
            field: "down_payment".into(),
            reason: "down payment must be in [0, price)".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "rate must be >= 0".into(),
        });
    }
    if input.monthly_rent < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "rent must be >= 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
