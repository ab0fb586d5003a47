use napi::Result as NapiResult;
use napi_derive::napi;

use antifragile_core::dashboard::{self, DashboardInput};
use antifragile_core::monte_carlo::simulation::{self, SimulationInput};
use antifragile_core::scenarios;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[napi]
pub fn run_dashboard(input_json: String) -> NapiResult<String> {
    let input: DashboardInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dashboard::run_dashboard(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn intensity_sensitivity(input_json: String) -> NapiResult<String> {
    let input: DashboardInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dashboard::intensity_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_scenario(input_json: String) -> NapiResult<String> {
    let input: SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simulation::run_scenario_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_scenarios() -> NapiResult<String> {
    serde_json::to_string(&scenarios::scenario_catalogue()).map_err(to_napi_error)
}
