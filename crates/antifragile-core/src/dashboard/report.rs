use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::monte_carlo::random::{RandomSource, StdRandomSource};
use crate::monte_carlo::simulation::{generate, ScenarioParameters, SimulationInput};
use crate::portfolio::aggregate::{aggregate, AntifragilityBand, ReturnSummary};
use crate::portfolio::correlation::{Correlation, CorrelationMatrix};
use crate::portfolio::weights::{AllocationInput, CompositionSlice, PortfolioWeights};
use crate::scenarios::recommendations::{recommendations, sector_impact, SectorImpact};
use crate::scenarios::Scenario;
use crate::types::{with_metadata, AssetClass, ComputationOutput, ReturnSeries};
use crate::AntifragileResult;

/// Every parameter the dashboard sidebar collects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(flatten)]
    pub simulation: SimulationInput,
    #[serde(default)]
    pub allocation: AllocationInput,
}

/// Everything the rendering layer needs for one dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOutput {
    pub scenario: Scenario,
    pub scenario_name: String,
    pub intensity: u8,
    pub horizon_months: u32,
    #[serde(flatten)]
    pub summary: ReturnSummary,
    /// Antifragility index in [-100, 100], or `"undefined"`.
    pub antifragility_index: Correlation,
    pub antifragility_band: AntifragilityBand,
    pub dates: Vec<NaiveDate>,
    pub portfolio: ReturnSeries,
    pub benchmark: ReturnSeries,
    pub assets: BTreeMap<AssetClass, ReturnSeries>,
    pub intensity_ramp: Vec<f64>,
    pub correlation_matrix: CorrelationMatrix,
    pub composition: Vec<CompositionSlice>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_impact: Option<Vec<SectorImpact>>,
}

/// Run the `parameters -> series -> aggregate` pipeline once.
///
/// Returns the dashboard view together with any non-fatal warnings
/// (allocation mismatches, undefined statistics).
pub fn compute_dashboard<R: RandomSource + ?Sized>(
    params: &ScenarioParameters,
    allocation: &AllocationInput,
    start_date: NaiveDate,
    rng: &mut R,
) -> AntifragileResult<(DashboardOutput, Vec<String>)> {
    let weights = PortfolioWeights::from_allocation(allocation)?;
    let mut warnings = allocation.warnings();

    let data = generate(params, start_date, rng)?;
    let agg = aggregate(&data, &weights)?;
    warnings.extend(agg.warnings.iter().cloned());

    let output = DashboardOutput {
        scenario: params.scenario,
        scenario_name: params.scenario.name().to_string(),
        intensity: params.intensity,
        horizon_months: params.horizon_months,
        summary: agg.summary,
        antifragility_index: agg.antifragility.value,
        antifragility_band: agg.antifragility.band,
        dates: agg.dates,
        portfolio: agg.portfolio,
        benchmark: agg.benchmark,
        assets: data.assets,
        intensity_ramp: agg.antifragility.intensity_ramp,
        correlation_matrix: agg.correlation_matrix,
        composition: agg.composition,
        recommendations: recommendations(params.scenario)
            .iter()
            .map(|r| (*r).to_string())
            .collect(),
        sector_impact: sector_impact(params.scenario, params.intensity),
    };

    Ok((output, warnings))
}

/// Compute a complete dashboard view and wrap it in the output envelope.
pub fn run_dashboard(input: &DashboardInput) -> AntifragileResult<ComputationOutput<DashboardOutput>> {
    let start = Instant::now();

    let sim = &input.simulation;
    let params = sim.parameters()?;
    let mut rng = StdRandomSource::from_seed_option(sim.seed);
    let (output, mut warnings) =
        compute_dashboard(&params, &input.allocation, sim.resolved_start_date(), &mut rng)?;
    if sim.seed.is_none() {
        warnings.push("No seed supplied; results will differ between runs".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Crisis scenario dashboard (random walk, two-level weights, 60/40 benchmark, Pearson antifragility)",
        &serde_json::json!({
            "scenario": sim.scenario.name(),
            "intensity": sim.intensity,
            "years": sim.years,
            "seed": sim.seed,
            "allocation": input.allocation,
            "benchmark": "60% equities / 40% bonds",
        }),
        warnings,
        elapsed,
        output,
    ))
}
