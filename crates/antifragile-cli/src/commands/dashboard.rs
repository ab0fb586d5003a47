use clap::Args;
use serde_json::Value;

use antifragile_core::dashboard::report;

use super::{resolve_input, AllocationArgs, ScenarioArgs};

/// Arguments for the full dashboard view
#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub allocation: AllocationArgs,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = resolve_input(&args.scenario, &args.allocation)?;
    let result = report::run_dashboard(&input)?;
    Ok(serde_json::to_value(result)?)
}
