use clap::Args;
use serde_json::Value;

use antifragile_core::dashboard::sensitivity;

use super::{resolve_input, AllocationArgs, ScenarioArgs};

/// Arguments for the intensity sensitivity sweep.
///
/// `--intensity` is ignored since every level from 1 to 10 is run.
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = resolve_input(&args.scenario, &args.allocation)?;
    let result = sensitivity::intensity_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}
