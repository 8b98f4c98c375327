use chrono::Utc;
use clap::Args;
use serde_json::Value;

use loansim_core::rates::{refresh, MemoryRateStore, RateStore};

/// Arguments for the rate board
#[derive(Args)]
pub struct RatesArgs {}

/// Without live sources wired in, a refresh over zero sources yields the
/// fallback board for the major banks.
pub fn run(_args: RatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = MemoryRateStore::new();
    let outcome = refresh(&mut store, &[], Utc::now());

    let board: Vec<Value> = store
        .all()
        .into_iter()
        .map(|snapshot| serde_json::to_value(snapshot).unwrap_or_default())
        .collect();

    Ok(serde_json::json!({
        "result": board,
        "banks_updated": outcome.banks_updated,
        "failed_sources": outcome.failed_sources,
    }))
}
