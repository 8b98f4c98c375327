use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::simulation::{annuity_payment, monthly_rate};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct};
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How an offer prices borrower insurance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insurance {
    /// Flat monthly premium.
    FlatMonthly(Money),
    /// Percent of the initial principal per year.
    AnnualRatePct(RatePct),
}

/// One bank's quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOffer {
    pub bank_name: String,
    pub annual_rate_pct: RatePct,
    pub duration_months: u32,
    #[serde(default)]
    pub upfront_fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Insurance>,
}

/// Input for a multi-offer comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareInput {
    pub property_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub offers: Vec<RateOffer>,
}

/// Per-offer comparison line, cheapest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferComparison {
    pub bank_name: String,
    pub annual_rate_pct: RatePct,
    pub duration_months: u32,
    pub credit_payment: Money,
    pub insurance_payment: Money,
    pub total_monthly_payment: Money,
    pub total_cost: Money,
    pub cost_of_credit: Money,
    /// Against the most expensive offer in the set; 0 when offers tie.
    pub savings_vs_most_expensive: Money,
}

/// Output of `compare_offers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResult {
    pub principal: Money,
    pub comparisons: Vec<OfferComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_offer: Option<String>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Rank a set of bank offers on a fixed principal by total cost.
///
/// Sort is stable: offers with identical total cost keep their input order.
pub fn compare_offers(input: &CompareInput) -> LoanSimResult<ComputationOutput<CompareResult>> {
    let start = Instant::now();

    let principal = input.property_price - input.down_payment;
    if principal <= Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "down_payment".into(),
            reason: "down payment must leave a positive principal".into(),
        });
    }

    // Full-precision lines, in input order
    let mut lines: Vec<(Decimal, Decimal, Decimal, Decimal, &RateOffer)> = Vec::new();
    for offer in &input.offers {
        if offer.duration_months == 0 || offer.duration_months > super::MAX_DURATION_MONTHS {
            return Err(LoanSimError::InvalidInput {
                field: "duration_months".into(),
                reason: format!(
                    "offer '{}' needs a duration in (0, {}] months",
                    offer.bank_name,
                    super::MAX_DURATION_MONTHS
                ),
            });
        }

        let credit = annuity_payment(
            principal,
            monthly_rate(offer.annual_rate_pct),
            offer.duration_months,
        );
        let insurance = match &offer.insurance {
            Some(Insurance::FlatMonthly(amount)) => *amount,
            Some(Insurance::AnnualRatePct(pct)) => principal * pct / dec!(100) / dec!(12),
            None => Decimal::ZERO,
        };
        let combined = credit + insurance;
        let total_cost = combined * Decimal::from(offer.duration_months) + offer.upfront_fee;

        lines.push((credit, insurance, combined, total_cost, offer));
    }

    lines.sort_by(|a, b| a.3.cmp(&b.3));

    let max_total = lines
        .iter()
        .map(|line| line.3)
        .max()
        .unwrap_or(Decimal::ZERO);

    let comparisons: Vec<OfferComparison> = lines
        .iter()
        .map(|(credit, insurance, combined, total_cost, offer)| OfferComparison {
            bank_name: offer.bank_name.clone(),
            annual_rate_pct: offer.annual_rate_pct,
            duration_months: offer.duration_months,
            credit_payment: round_money(*credit),
            insurance_payment: round_money(*insurance),
            total_monthly_payment: round_money(*combined),
            total_cost: round_money(*total_cost),
            cost_of_credit: round_money(*total_cost - principal),
            savings_vs_most_expensive: round_money(max_total - *total_cost),
        })
        .collect();

    let best_offer = comparisons.first().map(|c| c.bank_name.clone());

    let result = CompareResult {
        principal: round_money(principal),
        comparisons,
        best_offer,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-offer comparison (total cost of credit plus insurance and fees)",
        &serde_json::json!({
            "property_price": input.property_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "offer_count": input.offers.len(),
        }),
        Vec::new(),
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn offer(bank: &str, rate: Decimal, months: u32, fee: Decimal) -> RateOffer {
        RateOffer {
            bank_name: bank.to_string(),
            annual_rate_pct: rate,
            duration_months: months,
            upfront_fee: fee,
            insurance: None,
        }
    }

    fn base_input(offers: Vec<RateOffer>) -> CompareInput {
        CompareInput {
            property_price: dec!(250_000),
            down_payment: dec!(50_000),
            offers,
        }
    }

    #[test]
    fn test_sorted_ascending_by_total_cost() {
        let input = base_input(vec![
            offer("Expensive", dec!(4.5), 240, dec!(1000)),
            offer("Cheap", dec!(3.0), 240, dec!(500)),
            offer("Middle", dec!(3.8), 240, dec!(800)),
        ]);
        let res = compare_offers(&input).unwrap().result;

        assert_eq!(res.principal, dec!(200_000));
        let names: Vec<&str> = res.comparisons.iter().map(|c| c.bank_name.as_str()).collect();
        assert_eq!(names, vec!["Cheap", "Middle", "Expensive"]);
        assert_eq!(res.best_offer.as_deref(), Some("Cheap"));

        for pair in res.comparisons.windows(2) {
            assert!(pair[0].total_cost <= pair[1].total_cost);
        }
    }

    #[test]
    fn test_equal_cost_offers_keep_input_order_with_zero_savings() {
        let input = base_input(vec![
            offer("First", dec!(3.5), 240, dec!(500)),
            offer("Second", dec!(3.5), 240, dec!(500)),
        ]);
        let res = compare_offers(&input).unwrap().result;

        assert_eq!(res.comparisons[0].bank_name, "First");
        assert_eq!(res.comparisons[1].bank_name, "Second");
        assert_eq!(res.comparisons[0].savings_vs_most_expensive, Decimal::ZERO);
        assert_eq!(res.comparisons[1].savings_vs_most_expensive, Decimal::ZERO);
    }

    #[test]
    fn test_savings_measured_against_most_expensive() {
        let input = base_input(vec![
            offer("A", dec!(3.0), 240, Decimal::ZERO),
            offer("B", dec!(4.0), 240, Decimal::ZERO),
        ]);
        let res = compare_offers(&input).unwrap().result;

        let cheapest = &res.comparisons[0];
        let priciest = &res.comparisons[1];
        assert_eq!(priciest.savings_vs_most_expensive, Decimal::ZERO);
        // Savings are rounded from full precision, totals independently;
        // allow a cent of drift between the two paths
        let diff = (cheapest.savings_vs_most_expensive
            - (priciest.total_cost - cheapest.total_cost))
            .abs();
        assert!(diff <= dec!(0.01), "savings drifted by {diff}");
    }

    #[test]
    fn test_flat_and_rate_insurance() {
        let mut with_flat = offer("Flat", dec!(3.5), 240, Decimal::ZERO);
        with_flat.insurance = Some(Insurance::FlatMonthly(dec!(30)));
        let mut with_rate = offer("Pct", dec!(3.5), 240, Decimal::ZERO);
        with_rate.insurance = Some(Insurance::AnnualRatePct(dec!(0.36)));

        let res = compare_offers(&base_input(vec![with_flat, with_rate]))
            .unwrap()
            .result;

        let flat = res.comparisons.iter().find(|c| c.bank_name == "Flat").unwrap();
        assert_eq!(flat.insurance_payment, dec!(30));

        // 0.36% of 200k per year = 720/year = 60/month
        let pct = res.comparisons.iter().find(|c| c.bank_name == "Pct").unwrap();
        assert_eq!(pct.insurance_payment, dec!(60));

        for c in &res.comparisons {
            assert_eq!(
                c.total_monthly_payment,
                round_money(c.credit_payment + c.insurance_payment)
            );
        }
    }

    #[test]
    fn test_zero_rate_offer_uses_linear_fallback() {
        let input = base_input(vec![offer("NoRate", Decimal::ZERO, 200, Decimal::ZERO)]);
        let res = compare_offers(&input).unwrap().result;
        assert_eq!(res.comparisons[0].credit_payment, dec!(1000));
        assert_eq!(res.comparisons[0].cost_of_credit, Decimal::ZERO);
    }

    #[test]
    fn test_no_offers_is_empty_not_an_error() {
        let res = compare_offers(&base_input(Vec::new())).unwrap().result;
        assert!(res.comparisons.is_empty());
        assert!(res.best_offer.is_none());
    }

    #[test]
    fn test_offer_with_excessive_duration_is_rejected() {
        let input = base_input(vec![offer("Forever", dec!(20), 6000, Decimal::ZERO)]);
        assert!(matches!(
            compare_offers(&input),
            Err(LoanSimError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_down_payment_covering_price_is_rejected() {
        let mut input = base_input(Vec::new());
        input.down_payment = dec!(250_000);
        assert!(matches!(
            compare_offers(&input),
            Err(LoanSimError::InvalidInput { .. })
        ));
    }
}
