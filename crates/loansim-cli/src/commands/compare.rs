use clap::Args;
use serde_json::Value;

use loansim_core::simulation::compare::{self, CompareInput};

use crate::input;

/// Arguments for the multi-offer comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (offers don't fit in flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: CompareInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for offer comparison".into());
    };

    let result = compare::compare_offers(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
