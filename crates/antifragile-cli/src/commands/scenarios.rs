use serde_json::Value;

use antifragile_core::scenarios::scenario_catalogue;

pub fn run_scenarios() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(scenario_catalogue())?)
}
