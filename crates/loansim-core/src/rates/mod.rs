//! Bank-rate collaborator, modeled at its interface boundary.
//!
//! Sources quote a `bank → tenor → rate` map on a best-effort basis; a
//! failing source contributes nothing and never fails the merge. Known
//! major banks absent from every source get fixed fallback quotes so the
//! comparison endpoints always have something to show.

pub mod store;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::RatePct;
use crate::LoanSimResult;

pub use store::{refresh, MemoryRateStore, RateStore, RefreshOutcome};

/// Duration bucket a bank quotes a rate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenor {
    Years10,
    Years15,
    Years20,
    Years25,
}

impl Tenor {
    pub const ALL: [Tenor; 4] = [Tenor::Years10, Tenor::Years15, Tenor::Years20, Tenor::Years25];

    pub fn months(self) -> u32 {
        match self {
            Tenor::Years10 => 120,
            Tenor::Years15 => 180,
            Tenor::Years20 => 240,
            Tenor::Years25 => 300,
        }
    }
}

/// One bank's quotes across the four standard tenors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenorRates {
    pub years_10: RatePct,
    pub years_15: RatePct,
    pub years_20: RatePct,
    pub years_25: RatePct,
}

impl TenorRates {
    pub fn rate_for(&self, tenor: Tenor) -> RatePct {
        match tenor {
            Tenor::Years10 => self.years_10,
            Tenor::Years15 => self.years_15,
            Tenor::Years20 => self.years_20,
            Tenor::Years25 => self.years_25,
        }
    }
}

/// A provider of current rates; the scraping behind it is not our concern.
pub trait RateSource {
    fn name(&self) -> &str;

    /// Best-effort fetch. Implementations report their own failure as `Err`;
    /// the merge turns that into "contributed nothing".
    fn fetch(&self) -> LoanSimResult<BTreeMap<String, TenorRates>>;
}

/// Fallback quotes for the major banks, used when no source covers them.
const FALLBACK_RATES: [(&str, TenorRates); 8] = [
    ("BNP Paribas", rates(dec!(3.25), dec!(3.50), dec!(3.70), dec!(3.90))),
    ("Banque Populaire", rates(dec!(3.32), dec!(3.57), dec!(3.77), dec!(3.97))),
    ("CIC", rates(dec!(3.27), dec!(3.52), dec!(3.72), dec!(3.92))),
    ("Caisse d'Épargne", rates(dec!(3.28), dec!(3.52), dec!(3.72), dec!(3.92))),
    ("Crédit Agricole", rates(dec!(3.20), dec!(3.45), dec!(3.65), dec!(3.85))),
    ("Crédit Mutuel", rates(dec!(3.30), dec!(3.55), dec!(3.75), dec!(3.95))),
    ("LCL", rates(dec!(3.35), dec!(3.60), dec!(3.80), dec!(4.00))),
    ("Société Générale", rates(dec!(3.15), dec!(3.40), dec!(3.60), dec!(3.80))),
];

const fn rates(y10: Decimal, y15: Decimal, y20: Decimal, y25: Decimal) -> TenorRates {
    TenorRates {
        years_10: y10,
        years_15: y15,
        years_20: y20,
        years_25: y25,
    }
}

/// Result of merging all sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRates {
    pub rates: BTreeMap<String, TenorRates>,
    /// Sources whose fetch failed; present for observability, never fatal.
    pub failed_sources: Vec<String>,
}

/// Fold source results in order (later sources overwrite earlier quotes for
/// the same bank), then fill in fallbacks for major banks nobody covered.
pub fn merge_sources(sources: &[&dyn RateSource]) -> MergedRates {
    let mut rates: BTreeMap<String, TenorRates> = BTreeMap::new();
    let mut failed_sources = Vec::new();

    for source in sources {
        match source.fetch() {
            Ok(fetched) => rates.extend(fetched),
            Err(_) => failed_sources.push(source.name().to_string()),
        }
    }

    for (bank, fallback) in FALLBACK_RATES {
        rates.entry(bank.to_string()).or_insert(fallback);
    }

    MergedRates {
        rates,
        failed_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoanSimError;
    use pretty_assertions::assert_eq;

    struct FixedSource {
        name: &'static str,
        quotes: Vec<(&'static str, TenorRates)>,
    }

    impl RateSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch(&self) -> LoanSimResult<BTreeMap<String, TenorRates>> {
            Ok(self
                .quotes
                .iter()
                .map(|(bank, r)| (bank.to_string(), *r))
                .collect())
        }
    }

    struct BrokenSource;

    impl RateSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch(&self) -> LoanSimResult<BTreeMap<String, TenorRates>> {
            Err(LoanSimError::InsufficientData("page layout changed".into()))
        }
    }

    #[test]
    fn test_failed_source_contributes_nothing_but_never_fails() {
        let good = FixedSource {
            name: "aggregator",
            quotes: vec![("Hello Bank", rates(dec!(3.0), dec!(3.2), dec!(3.4), dec!(3.6)))],
        };
        let merged = merge_sources(&[&BrokenSource, &good]);

        assert_eq!(merged.failed_sources, vec!["broken".to_string()]);
        assert!(merged.rates.contains_key("Hello Bank"));
    }

    #[test]
    fn test_later_source_overwrites_earlier_quote() {
        let stale = FixedSource {
            name: "stale",
            quotes: vec![("LCL", rates(dec!(9.9), dec!(9.9), dec!(9.9), dec!(9.9)))],
        };
        let fresh = FixedSource {
            name: "fresh",
            quotes: vec![("LCL", rates(dec!(3.1), dec!(3.3), dec!(3.5), dec!(3.7)))],
        };
        let merged = merge_sources(&[&stale, &fresh]);
        assert_eq!(merged.rates["LCL"].years_10, dec!(3.1));
    }

    #[test]
    fn test_fallbacks_fill_only_missing_majors() {
        let source = FixedSource {
            name: "aggregator",
            quotes: vec![("Crédit Agricole", rates(dec!(2.9), dec!(3.1), dec!(3.3), dec!(3.5)))],
        };
        let merged = merge_sources(&[&source]);

        // Quoted bank keeps its source rate
        assert_eq!(merged.rates["Crédit Agricole"].years_10, dec!(2.9));
        // Unquoted majors get fallbacks
        assert_eq!(merged.rates["Société Générale"].years_10, dec!(3.15));
        assert_eq!(merged.rates.len(), 8);
    }

    #[test]
    fn test_no_sources_still_yields_the_major_banks() {
        let merged = merge_sources(&[]);
        assert_eq!(merged.rates.len(), 8);
        assert!(merged.failed_sources.is_empty());
    }

    #[test]
    fn test_tenor_months() {
        assert_eq!(Tenor::Years10.months(), 120);
        assert_eq!(Tenor::Years25.months(), 300);
    }

    #[test]
    fn test_rate_for_tenor() {
        let r = rates(dec!(3.0), dec!(3.2), dec!(3.4), dec!(3.6));
        assert_eq!(r.rate_for(Tenor::Years15), dec!(3.2));
        for tenor in Tenor::ALL {
            assert!(r.rate_for(tenor) > Decimal::ZERO);
        }
    }
}
