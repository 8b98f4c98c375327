use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::{annuity_principal, monthly_rate};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct, Ratio};
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for an affordability calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_income: Money,
    /// Rental income, alimony, etc. Counted at face value.
    #[serde(default)]
    pub other_income: Money,
    pub monthly_charges: Money,
    /// Maximum payment-to-income ratio. Banks cap at 33%.
    #[serde(default = "default_effort_ratio")]
    pub effort_ratio: Ratio,
    pub annual_rate_pct: RatePct,
    pub duration_months: u32,
    /// Cash brought upfront; only widens the purchasing budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
}

fn default_effort_ratio() -> Ratio {
    dec!(0.33)
}

/// Output of `calculate_affordability`. All monetary fields are rounded
/// to cents; `insufficient_capacity` means charges already eat the whole
/// effort-capped income and every other field is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub max_monthly_payment: Money,
    pub borrowable_principal: Money,
    pub total_cost: Money,
    pub cost_of_credit: Money,
    pub purchasing_budget: Money,
    pub insufficient_capacity: bool,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// How much can this borrower afford?
///
/// Max payment = (income + other income) × effort ratio − charges, then the
/// annuity present-value formula converts it into a borrowable principal.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> LoanSimResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let down_payment = input.down_payment.unwrap_or(Decimal::ZERO);
    let max_payment =
        (input.monthly_income + input.other_income) * input.effort_ratio - input.monthly_charges;

    let result = if max_payment <= Decimal::ZERO {
        warnings.push(
            "Charges exceed the effort-capped income; no borrowing capacity".to_string(),
        );
        AffordabilityResult {
            max_monthly_payment: Decimal::ZERO,
            borrowable_principal: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            cost_of_credit: Decimal::ZERO,
            purchasing_budget: round_money(down_payment),
            insufficient_capacity: true,
        }
    } else {
        let r = monthly_rate(input.annual_rate_pct);
        let principal = annuity_principal(max_payment, r, input.duration_months);
        let total_cost = max_payment * Decimal::from(input.duration_months);

        AffordabilityResult {
            max_monthly_payment: round_money(max_payment),
            borrowable_principal: round_money(principal),
            total_cost: round_money(total_cost),
            cost_of_credit: round_money(total_cost - principal),
            purchasing_budget: round_money(principal + down_payment),
            insufficient_capacity: false,
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Affordability (annuity present value of the effort-capped payment)",
        &serde_json::json!({
            "effort_ratio": input.effort_ratio.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "duration_months": input.duration_months,
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn validate(input: &AffordabilityInput) -> LoanSimResult<()> {
    if input.duration_months == 0 || input.duration_months > super::MAX_DURATION_MONTHS {
        return Err(LoanSimError::InvalidInput {
            field: "duration_months".into(),
            reason: format!(
                "duration must be in (0, {}] months",
                super::MAX_DURATION_MONTHS
            ),
        });
    }
    if input.effort_ratio <= Decimal::ZERO || input.effort_ratio > Decimal::ONE {
        return Err(LoanSimError::InvalidInput {
            field: "effort_ratio".into(),
            reason: "effort ratio must be in (0, 1]".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "rate must be >= 0".into(),
        });
    }
    if input.monthly_income < Decimal::ZERO || input.monthly_charges < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "monthly_income".into(),
            reason: "income and charges must be >= 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
