use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Simulations
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loansim_core::simulation::affordability::calculate_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_variable_rate(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::variable_rate::VariableRateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loansim_core::simulation::variable_rate::simulate_variable_rate(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn optimize_loan(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::optimizer::OptimizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loansim_core::simulation::optimizer::optimize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_investment(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::investment::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loansim_core::simulation::investment::simulate_investment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_stress_test(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::stress::StressTestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loansim_core::simulation::stress::run_stress_test(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_offers(input_json: String) -> NapiResult<String> {
    let input: loansim_core::simulation::compare::CompareInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loansim_core::simulation::compare::compare_offers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
