//! The amortization engine: pure functions over loan parameters.
//!
//! Every operation is a stateless function of its inputs; the submodules
//! share the annuity helpers below. Rates arrive as annual percentages
//! (the way banks quote them) and are converted to monthly decimals here.

pub mod affordability;
pub mod compare;
pub mod investment;
pub mod optimizer;
pub mod stress;
pub mod variable_rate;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, RatePct};

/// Maximum share of income a loan payment may consume.
pub const STANDARD_EFFORT_CAP: Decimal = dec!(0.33);

/// Longest accepted loan duration (50 years). Mortgage tenors top out well
/// below this; beyond it the compounding factor overflows Decimal.
pub const MAX_DURATION_MONTHS: u32 = 600;

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(annual_pct: RatePct) -> Decimal {
    annual_pct / dec!(100) / dec!(12)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Present value of a level payment stream:
/// P = pmt * (1 - (1+r)^-n) / r, with the zero-rate degenerate case
/// P = pmt * n.
pub fn annuity_principal(payment: Money, monthly: Decimal, months: u32) -> Money {
    if months == 0 {
        return Decimal::ZERO;
    }
    if monthly.is_zero() {
        return payment * Decimal::from(months);
    }
    let factor = compound(monthly, months);
    payment * (Decimal::ONE - Decimal::ONE / factor) / monthly
}

/// Level payment amortizing a principal over `months`:
/// pmt = P * r / (1 - (1+r)^-n), with the zero-rate degenerate case
/// pmt = P / n.
pub fn annuity_payment(principal: Money, monthly: Decimal, months: u32) -> Money {
    if months == 0 {
        return Decimal::ZERO;
    }
    if monthly.is_zero() {
        return principal / Decimal::from(months);
    }
    let factor = compound(monthly, months);
    principal * monthly / (Decimal::ONE - Decimal::ONE / factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_conversion() {
        // 3.5%/year -> 0.035/12 per month
        assert_eq!(monthly_rate(dec!(3.5)), dec!(0.035) / dec!(12));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_annuity_round_trip_recovers_principal() {
        let principal = dec!(200_000);
        let r = monthly_rate(dec!(3.5));
        let n = 240;

        let payment = annuity_payment(principal, r, n);
        let recovered = annuity_principal(payment, r, n);

        let err = (recovered - principal).abs();
        assert!(err < dec!(0.000001), "round-trip error {err}");
    }

    #[test]
    fn test_annuity_zero_rate_is_linear() {
        assert_eq!(
            annuity_principal(dec!(500), Decimal::ZERO, 240),
            dec!(120_000)
        );
        assert_eq!(annuity_payment(dec!(120_000), Decimal::ZERO, 240), dec!(500));
    }

    #[test]
    fn test_annuity_zero_months_is_zero() {
        assert_eq!(annuity_principal(dec!(500), dec!(0.003), 0), Decimal::ZERO);
        assert_eq!(annuity_payment(dec!(100_000), dec!(0.003), 0), Decimal::ZERO);
    }

    #[test]
    fn test_compound_matches_repeated_multiplication() {
        let r = dec!(0.01);
        assert_eq!(compound(r, 0), Decimal::ONE);
        assert_eq!(compound(r, 1), dec!(1.01));
        assert_eq!(compound(r, 2), dec!(1.01) * dec!(1.01));
    }

    #[test]
    fn test_higher_rate_means_lower_principal() {
        let payment = dec!(490);
        let low = annuity_principal(payment, monthly_rate(dec!(1.0)), 240);
        let high = annuity_principal(payment, monthly_rate(dec!(5.0)), 240);
        assert!(high < low);
    }
}
