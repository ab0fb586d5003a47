use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::report::{compute_dashboard, DashboardInput};
use crate::monte_carlo::random::StdRandomSource;
use crate::monte_carlo::simulation::ScenarioParameters;
use crate::portfolio::aggregate::AntifragilityBand;
use crate::portfolio::correlation::Correlation;
use crate::portfolio::weights::PortfolioWeights;
use crate::scenarios::scenario::{MAX_INTENSITY, MIN_INTENSITY};
use crate::scenarios::Scenario;
use crate::types::{with_metadata, ComputationOutput};
use crate::AntifragileResult;

/// Headline figures at one intensity level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub intensity: u8,
    pub portfolio_total_return_pct: Option<f64>,
    pub benchmark_total_return_pct: Option<f64>,
    pub difference_pct: Option<f64>,
    pub antifragility_index: Correlation,
    pub antifragility_band: AntifragilityBand,
}

/// Output of an intensity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub scenario: Scenario,
    pub horizon_months: u32,
    /// Seed shared by every intensity level.
    pub seed: u64,
    pub results: Vec<SensitivityRow>,
}

/// Re-run the dashboard pipeline for every intensity from 1 to 10.
///
/// Each level gets a fresh source seeded identically, so the levels differ
/// only in drift and shock scaling, not in their random draws. Without a
/// seed one is drawn once and reported.
pub fn intensity_sensitivity(
    input: &DashboardInput,
) -> AntifragileResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let sim = &input.simulation;

    // Validate the allocation and horizon once, before sweeping.
    PortfolioWeights::from_allocation(&input.allocation)?;
    let base = ScenarioParameters::from_years(sim.scenario, MIN_INTENSITY, sim.years)?;

    let seed = sim.seed.unwrap_or_else(rand::random::<u64>);
    let start_date = sim.resolved_start_date();
    let mut warnings = input.allocation.warnings();
    let mut results = Vec::with_capacity(MAX_INTENSITY as usize);

    for intensity in MIN_INTENSITY..=MAX_INTENSITY {
        let params = ScenarioParameters::new(sim.scenario, intensity, base.horizon_months)?;
        let mut rng = StdRandomSource::seeded(seed);
        let (view, level_warnings) =
            compute_dashboard(&params, &input.allocation, start_date, &mut rng)?;

        if !view.antifragility_index.is_defined() {
            warnings.push(format!("Antifragility index undefined at intensity {intensity}"));
        }
        for w in level_warnings {
            if !warnings.contains(&w) && !w.starts_with("Correlation undefined") {
                warnings.push(w);
            }
        }

        results.push(SensitivityRow {
            intensity,
            portfolio_total_return_pct: view.summary.portfolio_total_return_pct,
            benchmark_total_return_pct: view.summary.benchmark_total_return_pct,
            difference_pct: view.summary.difference_pct,
            antifragility_index: view.antifragility_index,
            antifragility_band: view.antifragility_band,
        });
    }

    let output = SensitivityOutput {
        scenario: sim.scenario,
        horizon_months: base.horizon_months,
        seed,
        results,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Crisis intensity sensitivity (intensities 1-10, shared seed)",
        &serde_json::json!({
            "scenario": sim.scenario.name(),
            "years": sim.years,
            "seed": seed,
            "allocation": input.allocation,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::simulation::SimulationInput;
    use chrono::NaiveDate;

    fn input(seed: Option<u64>) -> DashboardInput {
        DashboardInput {
            simulation: SimulationInput {
                scenario: Scenario::EnergyCrisis,
                intensity: 5,
                years: 1,
                seed,
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            },
            ..DashboardInput::default()
        }
    }

    #[test]
    fn test_sweeps_every_intensity() {
        let out = intensity_sensitivity(&input(Some(9))).unwrap();
        let intensities: Vec<u8> = out.result.results.iter().map(|r| r.intensity).collect();
        assert_eq!(intensities, (1..=10).collect::<Vec<u8>>());
        assert_eq!(out.result.seed, 9);
        assert_eq!(out.result.horizon_months, 12);
    }

    #[test]
    fn test_sweep_is_reproducible() {
        let a = intensity_sensitivity(&input(Some(9))).unwrap();
        let b = intensity_sensitivity(&input(Some(9))).unwrap();
        for (x, y) in a.result.results.iter().zip(&b.result.results) {
            assert_eq!(x.portfolio_total_return_pct, y.portfolio_total_return_pct);
            assert_eq!(x.antifragility_index, y.antifragility_index);
        }
    }

    #[test]
    fn test_unseeded_sweep_reports_seed() {
        let out = intensity_sensitivity(&input(None)).unwrap();
        assert_eq!(out.assumptions["seed"], out.result.seed);
    }

    #[test]
    fn test_invalid_horizon_rejected() {
        let mut bad = input(Some(1));
        bad.simulation.years = 0;
        assert!(intensity_sensitivity(&bad).is_err());
    }
}
