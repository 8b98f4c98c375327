use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::{annuity_payment, monthly_rate, STANDARD_EFFORT_CAP};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct, Ratio};
use crate::LoanSimResult;

/// Down-payment grid: 0% to 30% in 5-point steps.
const DOWN_PAYMENT_STEPS_PCT: [u32; 7] = [0, 5, 10, 15, 20, 25, 30];

/// Alternatives reported alongside the optimum.
const MAX_ALTERNATIVES: usize = 4;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the duration × down-payment search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub monthly_income: Money,
    pub monthly_charges: Money,
    pub property_price: Money,
    pub annual_rate_pct: RatePct,
    pub duration_min_months: u32,
    pub duration_max_months: u32,
}

/// One viable grid cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationCandidate {
    pub duration_months: u32,
    pub down_payment_pct: u32,
    pub down_payment_amount: Money,
    pub monthly_payment: Money,
    pub effort_ratio: Ratio,
    pub total_cost: Money,
}

/// Output of `optimize_loan`. `optimum` is absent when no cell passes the
/// effort cap; that is a legitimate result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimum: Option<OptimizationCandidate>,
    pub alternatives: Vec<OptimizationCandidate>,
    pub cells_evaluated: u32,
    pub viable_count: u32,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Scan durations (12-month steps) against down-payment percentages and
/// return the cheapest viable configuration plus the next four.
///
/// Traversal order is fixed (duration outer ascending, down payment inner
/// ascending) and the ranking sort is stable, so identical inputs always
/// produce identical output ordering.
pub fn optimize_loan(
    input: &OptimizationInput,
) -> LoanSimResult<ComputationOutput<OptimizationResult>> {
    let start = Instant::now();

    validate(input)?;

    let net_income = input.monthly_income - input.monthly_charges;
    let r = monthly_rate(input.annual_rate_pct);

    let mut cells_evaluated = 0u32;
    let mut viable: Vec<(Decimal, OptimizationCandidate)> = Vec::new();

    let mut duration = input.duration_min_months;
    while duration <= input.duration_max_months {
        for pct in DOWN_PAYMENT_STEPS_PCT {
            cells_evaluated += 1;

            let down_amount = input.property_price * Decimal::from(pct) / dec!(100);
            let principal = input.property_price - down_amount;
            let payment = annuity_payment(principal, r, duration);

            if net_income <= Decimal::ZERO {
                continue;
            }
            let effort = payment / net_income;
            if effort > STANDARD_EFFORT_CAP {
                continue;
            }

            let total_cost = payment * Decimal::from(duration) + down_amount;
            viable.push((
                total_cost,
                OptimizationCandidate {
                    duration_months: duration,
                    down_payment_pct: pct,
                    down_payment_amount: round_money(down_amount),
                    monthly_payment: round_money(payment),
                    effort_ratio: effort
                        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero),
                    total_cost: round_money(total_cost),
                },
            ));
        }
        duration += 12;
    }

    let viable_count = viable.len() as u32;
    viable.sort_by(|a, b| a.0.cmp(&b.0));
    viable.truncate(1 + MAX_ALTERNATIVES);

    let mut ranked = viable.into_iter().map(|(_, c)| c);
    let optimum = ranked.next();
    let alternatives: Vec<OptimizationCandidate> = ranked.collect();

    let result = OptimizationResult {
        optimum,
        alternatives,
        cells_evaluated,
        viable_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Grid search over duration and down payment, ranked by total cost",
        &serde_json::json!({
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "duration_min_months": input.duration_min_months,
            "duration_max_months": input.duration_max_months,
            "down_payment_steps_pct": DOWN_PAYMENT_STEPS_PCT,
            "effort_cap": STANDARD_EFFORT_CAP.to_string(),
        }),
        Vec::new(),
        elapsed,
        result,
    ))
}

fn validate(input: &OptimizationInput) -> LoanSimResult<()> {
    if input.duration_min_months == 0 || input.duration_max_months < input.duration_min_months {
        return Err(LoanSimError::InvalidInput {
            field: "duration_min_months".into(),
            reason: "need 0 < duration_min <= duration_max".into(),
        });
    }
    if input.duration_max_months > super::MAX_DURATION_MONTHS {
        return Err(LoanSimError::InvalidInput {
            field: "duration_max_months".into(),
            reason: format!("duration must be <= {} months", super::MAX_DURATION_MONTHS),
        });
    }
    if input.property_price <= Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "property_price".into(),
            reason: "price must be > 0".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "rate must be >= 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
