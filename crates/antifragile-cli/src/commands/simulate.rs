use clap::Args;
use serde_json::Value;

use antifragile_core::monte_carlo::simulation;

use super::{resolve_input, AllocationArgs, ScenarioArgs};

/// Arguments for a standalone scenario simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = resolve_input(&args.scenario, &AllocationArgs::default())?;
    let result = simulation::run_scenario_simulation(&input.simulation)?;
    Ok(serde_json::to_value(result)?)
}
