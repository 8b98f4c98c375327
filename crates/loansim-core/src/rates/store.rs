//! Persistence seam for bank-rate snapshots: one row per bank, overwritten
//! wholesale on each refresh. The in-memory implementation is the reference;
//! a relational store would plug in behind the same trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{merge_sources, RateSource, TenorRates};

/// One bank's persisted rate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRateSnapshot {
    pub bank_name: String,
    pub rates: TenorRates,
    pub last_updated: DateTime<Utc>,
}

/// Snapshot store keyed by bank name.
pub trait RateStore {
    /// Insert or overwrite the row for `snapshot.bank_name`.
    fn upsert(&mut self, snapshot: BankRateSnapshot);

    fn get(&self, bank_name: &str) -> Option<&BankRateSnapshot>;

    /// All rows, ordered by bank name.
    fn all(&self) -> Vec<&BankRateSnapshot>;
}

/// In-memory `RateStore`.
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    rows: BTreeMap<String, BankRateSnapshot>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryRateStore {
    fn upsert(&mut self, snapshot: BankRateSnapshot) {
        self.rows.insert(snapshot.bank_name.clone(), snapshot);
    }

    fn get(&self, bank_name: &str) -> Option<&BankRateSnapshot> {
        self.rows.get(bank_name)
    }

    fn all(&self) -> Vec<&BankRateSnapshot> {
        self.rows.values().collect()
    }
}

/// What a refresh pass did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub banks_updated: usize,
    pub failed_sources: Vec<String>,
}

/// Pull every source once and overwrite the store's rows with the merged
/// result, stamped with `now`. The caller owns scheduling; this function is
/// one tick of it.
pub fn refresh(
    store: &mut dyn RateStore,
    sources: &[&dyn RateSource],
    now: DateTime<Utc>,
) -> RefreshOutcome {
    let merged = merge_sources(sources);
    let banks_updated = merged.rates.len();

    for (bank_name, rates) in merged.rates {
        store.upsert(BankRateSnapshot {
            bank_name,
            rates,
            last_updated: now,
        });
    }

    RefreshOutcome {
        banks_updated,
        failed_sources: merged.failed_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoanSimResult;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn quotes(y10: rust_decimal::Decimal) -> TenorRates {
        TenorRates {
            years_10: y10,
            years_15: y10 + dec!(0.2),
            years_20: y10 + dec!(0.4),
            years_25: y10 + dec!(0.6),
        }
    }

    struct OneBank(&'static str, TenorRates);

    impl RateSource for OneBank {
        fn name(&self) -> &str {
            "test-source"
        }

        fn fetch(&self) -> LoanSimResult<BTreeMap<String, TenorRates>> {
            Ok(BTreeMap::from([(self.0.to_string(), self.1)]))
        }
    }

    #[test]
    fn test_refresh_stamps_and_stores_all_banks() {
        let mut store = MemoryRateStore::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 6, 0, 0).unwrap();
        let source = OneBank("Hello Bank", quotes(dec!(3.0)));

        let outcome = refresh(&mut store, &[&source], now);

        // 1 quoted bank + 8 fallback majors
        assert_eq!(outcome.banks_updated, 9);
        assert_eq!(store.all().len(), 9);
        let row = store.get("Hello Bank").unwrap();
        assert_eq!(row.last_updated, now);
        assert_eq!(row.rates.years_10, dec!(3.0));
    }

    #[test]
    fn test_refresh_overwrites_wholesale() {
        let mut store = MemoryRateStore::new();
        let t1 = Utc.with_ymd_and_hms(2026, 8, 27, 6, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();

        refresh(&mut store, &[&OneBank("Hello Bank", quotes(dec!(3.0)))], t1);
        refresh(&mut store, &[&OneBank("Hello Bank", quotes(dec!(2.8)))], t2);

        let row = store.get("Hello Bank").unwrap();
        assert_eq!(row.rates.years_10, dec!(2.8));
        assert_eq!(row.last_updated, t2);
    }

    #[test]
    fn test_all_is_sorted_by_bank_name() {
        let mut store = MemoryRateStore::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 6, 0, 0).unwrap();
        refresh(&mut store, &[], now);

        let names: Vec<&str> = store.all().iter().map(|s| s.bank_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
