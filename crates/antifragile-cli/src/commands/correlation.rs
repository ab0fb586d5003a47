use clap::Args;
use serde_json::Value;

use antifragile_core::portfolio::correlation;

use super::{resolve_input, AllocationArgs, ScenarioArgs};

/// Arguments for the asset correlation matrix
#[derive(Args)]
pub struct CorrelationArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_correlation(args: CorrelationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = resolve_input(&args.scenario, &AllocationArgs::default())?;
    let result = correlation::run_correlation_matrix(&input.simulation)?;
    Ok(serde_json::to_value(result)?)
}
