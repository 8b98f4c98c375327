use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::STANDARD_EFFORT_CAP;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Ratio};
use crate::LoanSimResult;

/// Fixed scenario grid: (name, income multiplier, charges multiplier).
/// Order is part of the contract.
const SCENARIOS: [(&str, Decimal, Decimal); 5] = [
    ("Baseline", dec!(1), dec!(1)),
    ("Partial income loss", dec!(0.8), dec!(1)),
    ("Severe income loss", dec!(0.5), dec!(1)),
    ("Expense surge", dec!(1), dec!(1.3)),
    ("Combined crisis", dec!(0.7), dec!(1.2)),
];

/// Effort ratio reported when stressed income hits zero.
const EFFORT_SENTINEL: Decimal = dec!(999);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a borrower stress test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestInput {
    pub monthly_income: Money,
    pub monthly_charges: Money,
    /// The loan payment being stress-tested. Must be > 0: the safety margin
    /// is undefined for a zero payment.
    pub current_payment: Money,
}

/// Outcome of one stress scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub stressed_income: Money,
    pub stressed_charges: Money,
    /// Stressed income minus stressed charges minus the payment.
    pub payment_capacity: Money,
    /// Payment / stressed income; 999 when stressed income is zero.
    pub effort_ratio: Ratio,
    pub viable: bool,
}

/// Overall risk classification from the safety margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Output of `run_stress_test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenarios: Vec<ScenarioResult>,
    /// ((income − charges) − payment) / payment × 100.
    pub safety_margin_pct: Decimal,
    pub risk_level: RiskLevel,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Apply the five fixed stress scenarios to a borrower's position and
/// classify overall risk from the safety margin.
pub fn run_stress_test(
    input: &StressTestInput,
) -> LoanSimResult<ComputationOutput<StressTestResult>> {
    let start = Instant::now();

    validate(input)?;

    let payment = input.current_payment;
    let scenarios: Vec<ScenarioResult> = SCENARIOS
        .iter()
        .map(|(name, income_mult, charges_mult)| {
            let stressed_income = input.monthly_income * income_mult;
            let stressed_charges = input.monthly_charges * charges_mult;
            let capacity = stressed_income - stressed_charges - payment;
            let effort = if stressed_income.is_zero() {
                EFFORT_SENTINEL
            } else {
                payment / stressed_income
            };

            ScenarioResult {
                scenario: (*name).to_string(),
                stressed_income: round_money(stressed_income),
                stressed_charges: round_money(stressed_charges),
                payment_capacity: round_money(capacity),
                effort_ratio: effort
                    .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero),
                viable: effort <= STANDARD_EFFORT_CAP && capacity > Decimal::ZERO,
            }
        })
        .collect();

    let margin =
        ((input.monthly_income - input.monthly_charges) - payment) / payment * dec!(100);
    let risk_level = if margin > dec!(50) {
        RiskLevel::Low
    } else if margin > dec!(20) {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let result = StressTestResult {
        scenarios,
        safety_margin_pct: round_money(margin),
        risk_level,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Stress test (fixed income/expense shock grid plus safety margin)",
        &serde_json::json!({
            "scenario_count": SCENARIOS.len(),
            "effort_cap": STANDARD_EFFORT_CAP.to_string(),
        }),
        Vec::new(),
        elapsed,
        result,
    ))
}

fn validate(input: &StressTestInput) -> LoanSimResult<()> {
    if input.current_payment.is_zero() {
        return Err(LoanSimError::DivisionByZero {
            context: "stress-test safety margin (current payment is zero)".into(),
        });
    }
    if input.current_payment < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "current_payment".into(),
            reason: "payment must be > 0".into(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn base_input() -> StressTestInput {
        StressTestInput {
            monthly_income: dec!(4000),
            monthly_charges: dec!(500),
            current_payment: dec!(1200),
        }
    }

    #[test]
    fn test_five_scenarios_in_fixed_order() {
        let res = run_stress_test(&base_input()).unwrap().result;
        let names: Vec<&str> = res.scenarios.iter().map(|s| s.scenario.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Baseline",
                "Partial income loss",
                "Severe income loss",
                "Expense surge",
                "Combined crisis",
            ]
        );
    }

    #[test]
    fn test_scenario_arithmetic() {
        let res = run_stress_test(&base_input()).unwrap().result;

        let severe = &res.scenarios[2];
        assert_eq!(severe.stressed_income, dec!(2000));
        assert_eq!(severe.stressed_charges, dec!(500));
        // 2000 - 500 - 1200
        assert_eq!(severe.payment_capacity, dec!(300));
        // 1200 / 2000 = 0.6 -> over the cap
        assert_eq!(severe.effort_ratio, dec!(0.6));
        assert!(!severe.viable);

        let crisis = &res.scenarios[4];
        assert_eq!(crisis.stressed_income, dec!(2800));
        assert_eq!(crisis.stressed_charges, dec!(600));
        assert_eq!(crisis.payment_capacity, dec!(1000));
    }

    #[test]
    fn test_safety_margin_and_risk_level() {
        let res = run_stress_test(&base_input()).unwrap().result;
        // ((4000 - 500) - 1200) / 1200 * 100 = 191.67 -> low risk
        assert_eq!(res.safety_margin_pct, dec!(191.67));
        assert_eq!(res.risk_level, RiskLevel::Low);

        let tight = StressTestInput {
            monthly_income: dec!(2000),
            monthly_charges: dec!(500),
            current_payment: dec!(1200),
        };
        let res = run_stress_test(&tight).unwrap().result;
        // (1500 - 1200) / 1200 * 100 = 25 -> medium
        assert_eq!(res.safety_margin_pct, dec!(25));
        assert_eq!(res.risk_level, RiskLevel::Medium);

        let worse = StressTestInput {
            monthly_income: dec!(1700),
            monthly_charges: dec!(500),
            current_payment: dec!(1200),
        };
        let res = run_stress_test(&worse).unwrap().result;
        assert_eq!(res.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_zero_payment_is_an_explicit_error() {
        let input = StressTestInput {
            monthly_income: dec!(4000),
            monthly_charges: dec!(500),
            current_payment: Decimal::ZERO,
        };
        assert!(matches!(
            run_stress_test(&input),
            Err(LoanSimError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_zero_income_uses_sentinel_effort() {
        let input = StressTestInput {
            monthly_income: Decimal::ZERO,
            monthly_charges: dec!(500),
            current_payment: dec!(1200),
        };
        let res = run_stress_test(&input).unwrap().result;
        for s in &res.scenarios {
            assert_eq!(s.effort_ratio, dec!(999));
            assert!(!s.viable);
        }
    }

    #[test]
    fn test_viability_needs_capacity_and_effort() {
        // Effort fine but capacity negative: high charges
        let input = StressTestInput {
            monthly_income: dec!(4000),
            monthly_charges: dec!(3500),
            current_payment: dec!(600),
        };
        let res = run_stress_test(&input).unwrap().result;
        let baseline = &res.scenarios[0];
        assert!(baseline.effort_ratio <= dec!(0.33));
        assert!(baseline.payment_capacity < Decimal::ZERO);
        assert!(!baseline.viable);
    }
}
