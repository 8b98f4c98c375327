use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::{annuity_payment, annuity_principal, monthly_rate, STANDARD_EFFORT_CAP};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct};
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a variable-rate simulation: a rate fixed for an initial period,
/// then drifting upward by a constant annual increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRateInput {
    pub monthly_income: Money,
    pub monthly_charges: Money,
    pub initial_rate_pct: RatePct,
    pub total_duration_months: u32,
    pub fixed_period_months: u32,
    /// Added to the annual rate for each elapsed year.
    pub annual_increment_pct: RatePct,
}

/// One yearly checkpoint of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// 1-based year number.
    pub year: u32,
    pub effective_rate_pct: RatePct,
    /// Linear approximation of the outstanding balance, not an exact
    /// amortization figure.
    pub remaining_principal: Money,
    pub remaining_months: u32,
    pub monthly_payment: Money,
}

/// Output of `simulate_variable_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRateResult {
    /// Effort-capped payment used to size the loan.
    pub initial_payment: Money,
    /// Principal the initial payment services over the fixed period.
    pub reference_principal: Money,
    /// One entry per full year, ordered by increasing year.
    pub projections: Vec<YearlyProjection>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project yearly payments under a drifting rate.
///
/// The reference principal is the annuity present value of the effort-capped
/// payment at the initial rate over the fixed period; each year's balance is
/// interpolated linearly from it and the payment recomputed at that year's
/// rate over the months still to run.
pub fn simulate_variable_rate(
    input: &VariableRateInput,
) -> LoanSimResult<ComputationOutput<VariableRateResult>> {
    let start = Instant::now();

    validate(input)?;

    let max_payment = input.monthly_income * STANDARD_EFFORT_CAP - input.monthly_charges;
    if max_payment <= Decimal::ZERO {
        return Err(LoanSimError::InsufficientData(
            "charges exceed the effort-capped income; nothing to simulate".into(),
        ));
    }

    let initial_monthly = monthly_rate(input.initial_rate_pct);
    let reference_principal =
        annuity_principal(max_payment, initial_monthly, input.fixed_period_months);

    let total = Decimal::from(input.total_duration_months);
    let years = input.total_duration_months / 12;
    let mut projections = Vec::with_capacity(years as usize);

    for k in 0..years {
        let elapsed_months = k * 12;
        let remaining_months = input.total_duration_months - elapsed_months;
        let effective_rate =
            input.initial_rate_pct + input.annual_increment_pct * Decimal::from(k);

        // Balance is interpolated linearly rather than amortized exactly.
        let remaining =
            reference_principal * (Decimal::ONE - Decimal::from(elapsed_months) / total);
        let payment = annuity_payment(remaining, monthly_rate(effective_rate), remaining_months);

        projections.push(YearlyProjection {
            year: k + 1,
            effective_rate_pct: round_money(effective_rate),
            remaining_principal: round_money(remaining),
            remaining_months,
            monthly_payment: round_money(payment),
        });
    }

    let result = VariableRateResult {
        initial_payment: round_money(max_payment),
        reference_principal: round_money(reference_principal),
        projections,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Variable-rate projection (linear balance approximation, yearly re-pricing)",
        &serde_json::json!({
            "initial_rate_pct": input.initial_rate_pct.to_string(),
            "annual_increment_pct": input.annual_increment_pct.to_string(),
            "fixed_period_months": input.fixed_period_months,
            "total_duration_months": input.total_duration_months,
        }),
        vec![
            "Remaining principal is interpolated linearly, not an exact amortization balance"
                .to_string(),
        ],
        elapsed,
        result,
    ))
}

fn validate(input: &VariableRateInput) -> LoanSimResult<()> {
    if input.total_duration_months == 0
        || input.total_duration_months > super::MAX_DURATION_MONTHS
    {
        return Err(LoanSimError::InvalidInput {
            field: "total_duration_months".into(),
            reason: format!(
                "duration must be in (0, {}] months",
                super::MAX_DURATION_MONTHS
            ),
        });
    }
    if input.fixed_period_months == 0 || input.fixed_period_months > input.total_duration_months {
        return Err(LoanSimError::InvalidInput {
            field: "fixed_period_months".into(),
            reason: "fixed period must be in (0, total duration]".into(),
        });
    }
    if input.initial_rate_pct < Decimal::ZERO || input.annual_increment_pct < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "initial_rate_pct".into(),
            reason: "rates must be >= 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
