use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use super::random::{RandomSource, StdRandomSource};
use crate::error::AntifragileError;
use crate::scenarios::scenario::{validate_intensity, Scenario};
use crate::types::{with_metadata, AssetClass, ComputationOutput, ReturnSeries};
use crate::AntifragileResult;

/// Trend-following adjustment applied every month.
pub const MOMENTUM_ADJUSTMENT: f64 = 0.01;
/// Monthly probability of a tariff announcement shock.
pub const TARIFF_SHOCK_PROBABILITY: f64 = 0.10;
/// Upper bound of the Equities tariff shock before intensity scaling.
pub const TARIFF_EQUITY_SHOCK_MAX: f64 = 0.05;
/// Upper bound of the Gold tariff shock before intensity scaling.
pub const TARIFF_GOLD_SHOCK_MAX: f64 = 0.04;
/// Spacing of the monthly date axis.
pub const DAYS_PER_MONTH: i64 = 30;
/// Longest accepted horizon in years.
pub const MAX_YEARS: u32 = 10;
/// Longest accepted horizon in months.
pub const MAX_HORIZON_MONTHS: u32 = MAX_YEARS * 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Immutable parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub scenario: Scenario,
    /// Crisis intensity dial, 1 to 10.
    pub intensity: u8,
    pub horizon_months: u32,
}

impl ScenarioParameters {
    pub fn new(scenario: Scenario, intensity: u8, horizon_months: u32) -> AntifragileResult<Self> {
        let params = Self {
            scenario,
            intensity,
            horizon_months,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build parameters from a horizon expressed in whole years.
    pub fn from_years(scenario: Scenario, intensity: u8, years: u32) -> AntifragileResult<Self> {
        if !(1..=MAX_YEARS).contains(&years) {
            return Err(AntifragileError::InvalidInput {
                field: "years".into(),
                reason: format!("Must be between 1 and {MAX_YEARS}, got {years}"),
            });
        }
        Self::new(scenario, intensity, years * 12)
    }

    pub fn validate(&self) -> AntifragileResult<()> {
        validate_intensity(self.intensity)?;
        if self.horizon_months == 0 {
            return Err(AntifragileError::InvalidInput {
                field: "horizon_months".into(),
                reason: "Must be at least 1".into(),
            });
        }
        if self.horizon_months > MAX_HORIZON_MONTHS {
            return Err(AntifragileError::InvalidInput {
                field: "horizon_months".into(),
                reason: format!(
                    "Must be at most {MAX_HORIZON_MONTHS}, got {}",
                    self.horizon_months
                ),
            });
        }
        Ok(())
    }
}

/// Simulated index series for every asset class over a shared date axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSeries {
    pub parameters: ScenarioParameters,
    pub dates: Vec<NaiveDate>,
    pub assets: BTreeMap<AssetClass, ReturnSeries>,
}

impl ScenarioSeries {
    /// Series for `asset`; empty if the asset was not simulated.
    pub fn series(&self, asset: AssetClass) -> &[f64] {
        self.assets.get(&asset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of monthly observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Input for a standalone scenario simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    #[serde(default = "default_scenario")]
    pub scenario: Scenario,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
    /// Horizon in years, 1 to 10; the simulation runs `years * 12` months.
    #[serde(default = "default_years")]
    pub years: u32,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
    /// First date of the monthly axis (defaults to today).
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_scenario() -> Scenario {
    Scenario::UkraineWar
}

fn default_intensity() -> u8 {
    5
}

fn default_years() -> u32 {
    5
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            scenario: default_scenario(),
            intensity: default_intensity(),
            years: default_years(),
            seed: None,
            start_date: None,
        }
    }
}

impl SimulationInput {
    pub fn parameters(&self) -> AntifragileResult<ScenarioParameters> {
        ScenarioParameters::from_years(self.scenario, self.intensity, self.years)
    }

    pub fn resolved_start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// One month of the simulated dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: BTreeMap<AssetClass, f64>,
}

/// Output of a standalone scenario simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub scenario: Scenario,
    pub intensity: u8,
    pub horizon_months: u32,
    pub rows: Vec<SeriesRow>,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Monthly date axis: `start`, `start + 30d`, `start + 60d`, ...
pub fn monthly_dates(start: NaiveDate, months: u32) -> Vec<NaiveDate> {
    (0..months as i64)
        .map(|i| start + Duration::days(i * DAYS_PER_MONTH))
        .collect()
}

/// Maximum size and sign of the tariff announcement shock for `asset`.
fn tariff_shock(scenario: Scenario, asset: AssetClass) -> Option<(f64, f64)> {
    if !scenario.has_tariff_shocks() {
        return None;
    }
    match asset {
        AssetClass::Equities => Some((TARIFF_EQUITY_SHOCK_MAX, -1.0)),
        AssetClass::Gold => Some((TARIFF_GOLD_SHOCK_MAX, 1.0)),
        _ => None,
    }
}

/// Simulate the index series of one asset class.
///
/// Each month draws a normal shock around the scenario drift, nudges the
/// return by the momentum rule (+1% above the starting level, -1% otherwise)
/// and, in the tariff war, may add an announcement shock to Equities or Gold.
///
/// The Bernoulli trial for that shock is only drawn for Equities and Gold in
/// the tariff war; no uniform draw is consumed for any other asset or
/// scenario. The shock distribution is the same as drawing for every asset,
/// but a seeded run yields a different stream than a draw-per-asset scheme.
pub fn simulate_asset<R: RandomSource + ?Sized>(
    params: &ScenarioParameters,
    asset: AssetClass,
    rng: &mut R,
) -> AntifragileResult<ReturnSeries> {
    let horizon = params.horizon_months as usize;
    let base_drift = params.scenario.base_drift(asset, params.intensity);
    let volatility = params.scenario.monthly_volatility(asset);
    let shock_scale = params.intensity as f64 / 5.0;

    let mut series = Vec::with_capacity(horizon.max(1));
    series.push(1.0);

    for _ in 1..horizon {
        let previous = series[series.len() - 1];
        let mut monthly_return = base_drift + rng.normal(volatility)?;

        if previous > 1.0 {
            monthly_return += MOMENTUM_ADJUSTMENT;
        } else {
            monthly_return -= MOMENTUM_ADJUSTMENT;
        }

        if let Some((max_shock, direction)) = tariff_shock(params.scenario, asset) {
            if rng.unit() < TARIFF_SHOCK_PROBABILITY {
                monthly_return += direction * rng.uniform(max_shock)? * shock_scale;
            }
        }

        series.push(previous * (1.0 + monthly_return));
    }

    Ok(series)
}

/// Generate the full per-asset dataset for a scenario.
///
/// Assets are simulated in [`AssetClass::ALL`] order so a seeded source
/// always reproduces the same dataset.
pub fn generate<R: RandomSource + ?Sized>(
    params: &ScenarioParameters,
    start_date: NaiveDate,
    rng: &mut R,
) -> AntifragileResult<ScenarioSeries> {
    params.validate()?;

    let mut assets = BTreeMap::new();
    for asset in AssetClass::ALL {
        let series = simulate_asset(params, asset, rng)?;
        debug!(
            scenario = params.scenario.id(),
            asset = %asset,
            final_value = series[series.len() - 1],
            "simulated asset series"
        );
        assets.insert(asset, series);
    }

    Ok(ScenarioSeries {
        parameters: *params,
        dates: monthly_dates(start_date, params.horizon_months),
        assets,
    })
}

/// Generate a dataset from a [`SimulationInput`], seeding the source from
/// `input.seed` when present.
pub fn generate_from_input(input: &SimulationInput) -> AntifragileResult<ScenarioSeries> {
    let params = input.parameters()?;
    let mut rng = StdRandomSource::from_seed_option(input.seed);
    generate(&params, input.resolved_start_date(), &mut rng)
}

/// Convert a dataset into date-indexed rows for tabular output.
pub fn to_rows(series: &ScenarioSeries) -> Vec<SeriesRow> {
    series
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| SeriesRow {
            date: *date,
            values: series
                .assets
                .iter()
                .filter_map(|(asset, values)| values.get(i).map(|v| (*asset, *v)))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API: scenario simulation
// ---------------------------------------------------------------------------

/// Run the scenario generator and wrap the dataset in the output envelope.
pub fn run_scenario_simulation(
    input: &SimulationInput,
) -> AntifragileResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let series = generate_from_input(input)?;
    if input.seed.is_none() {
        warnings.push("No seed supplied; results will differ between runs".into());
    }

    let output = SimulationOutput {
        scenario: series.parameters.scenario,
        intensity: series.parameters.intensity,
        horizon_months: series.parameters.horizon_months,
        rows: to_rows(&series),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario random-walk simulation (monthly drift + normal shock + momentum)",
        &serde_json::json!({
            "scenario": input.scenario.name(),
            "intensity": input.intensity,
            "years": input.years,
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every draw returns zero, and Bernoulli trials never fire.
    struct ZeroShocks;

    impl RandomSource for ZeroShocks {
        fn normal(&mut self, _std_dev: f64) -> AntifragileResult<f64> {
            Ok(0.0)
        }
        fn uniform(&mut self, _upper: f64) -> AntifragileResult<f64> {
            Ok(0.0)
        }
        fn unit(&mut self) -> f64 {
            1.0
        }
    }

    /// Zero normal shocks, every Bernoulli trial fires at the maximum draw.
    struct AlwaysShock {
        uniform_calls: usize,
    }

    impl RandomSource for AlwaysShock {
        fn normal(&mut self, _std_dev: f64) -> AntifragileResult<f64> {
            Ok(0.0)
        }
        fn uniform(&mut self, upper: f64) -> AntifragileResult<f64> {
            self.uniform_calls += 1;
            Ok(upper)
        }
        fn unit(&mut self) -> f64 {
            0.0
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-12, "index {i}: {a} != {e}");
        }
    }

    #[test]
    fn test_series_shape() {
        let params = ScenarioParameters::from_years(Scenario::UkraineWar, 7, 3).unwrap();
        let mut rng = StdRandomSource::seeded(42);
        let data = generate(&params, start(), &mut rng).unwrap();

        assert_eq!(data.len(), 36);
        assert_eq!(data.assets.len(), 8);
        for asset in AssetClass::ALL {
            let s = data.series(asset);
            assert_eq!(s.len(), 36);
            assert_eq!(s[0], 1.0);
        }
    }

    #[test]
    fn test_date_axis_spacing() {
        let dates = monthly_dates(start(), 3);
        assert_eq!(
            dates,
            vec![
                start(),
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_zero_shock_golden_energy_crisis() {
        let params = ScenarioParameters::new(Scenario::EnergyCrisis, 5, 12).unwrap();
        let data = generate(&params, start(), &mut ZeroShocks).unwrap();

        let powers = |base: f64| -> Vec<f64> { (0..12).map(|k| base.powi(k)).collect() };
        let after_first = |first: f64, rest: f64| -> Vec<f64> {
            let mut v = vec![1.0];
            for k in 1..12 {
                v.push(first * rest.powi(k - 1));
            }
            v
        };

        // drift -0.02, momentum -0.01 every month
        assert_close(data.series(AssetClass::Equities), &powers(0.97));
        // drift -0.01, momentum -0.01
        assert_close(data.series(AssetClass::Bonds), &powers(0.98));
        // flat 0.01 drift cancelled by -0.01 momentum at exactly 1.0
        assert_close(data.series(AssetClass::Cash), &vec![1.0; 12]);
        // 0.045 - 0.01 first month, then 0.045 + 0.01
        assert_close(data.series(AssetClass::Commodities), &after_first(1.035, 1.055));
        assert_close(data.series(AssetClass::RenewableEnergy), &after_first(1.04, 1.06));
        assert_close(data.series(AssetClass::Gold), &after_first(1.01, 1.03));
        // 0.005 - 0.01 keeps crypto below 1.0 forever
        assert_close(data.series(AssetClass::Crypto), &powers(0.995));
        assert_close(data.series(AssetClass::VolatilityEtf), &after_first(1.025, 1.045));
    }

    #[test]
    fn test_single_month_horizon() {
        let params = ScenarioParameters::new(Scenario::ClimateChange, 3, 1).unwrap();
        let data = generate(&params, start(), &mut ZeroShocks).unwrap();
        for asset in AssetClass::ALL {
            assert_eq!(data.series(asset), &[1.0]);
        }
        assert_eq!(data.dates, vec![start()]);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = ScenarioParameters::new(Scenario::TariffWar, 5, 0).unwrap_err();
        assert!(
            matches!(err, AntifragileError::InvalidInput { ref field, .. } if field == "horizon_months")
        );

        let raw = ScenarioParameters {
            scenario: Scenario::TariffWar,
            intensity: 5,
            horizon_months: 0,
        };
        assert!(generate(&raw, start(), &mut ZeroShocks).is_err());
    }

    #[test]
    fn test_intensity_out_of_range_rejected() {
        assert!(ScenarioParameters::new(Scenario::TariffWar, 0, 12).is_err());
        assert!(ScenarioParameters::new(Scenario::TariffWar, 11, 12).is_err());
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        let err = ScenarioParameters::new(Scenario::EnergyCrisis, 5, 4_000_000).unwrap_err();
        assert!(
            matches!(err, AntifragileError::InvalidInput { ref field, .. } if field == "horizon_months")
        );
        let just_over = ScenarioParameters::new(Scenario::EnergyCrisis, 5, MAX_HORIZON_MONTHS + 1);
        assert!(just_over.is_err());

        let err = ScenarioParameters::from_years(Scenario::EnergyCrisis, 5, 400_000).unwrap_err();
        assert!(matches!(err, AntifragileError::InvalidInput { ref field, .. } if field == "years"));
        assert!(ScenarioParameters::from_years(Scenario::EnergyCrisis, 5, u32::MAX).is_err());
        assert!(ScenarioParameters::from_years(Scenario::EnergyCrisis, 5, 0).is_err());

        let longest = ScenarioParameters::from_years(Scenario::EnergyCrisis, 5, MAX_YEARS).unwrap();
        assert_eq!(longest.horizon_months, 120);
    }

    #[test]
    fn test_oversized_years_input_returns_error() {
        let input = SimulationInput {
            years: 400_000,
            seed: Some(1),
            ..SimulationInput::default()
        };
        let err = run_scenario_simulation(&input).unwrap_err();
        assert!(matches!(err, AntifragileError::InvalidInput { ref field, .. } if field == "years"));
    }

    #[test]
    fn test_tariff_shocks_hit_equities_and_gold() {
        let params = ScenarioParameters::new(Scenario::TariffWar, 10, 2).unwrap();
        let mut rng = AlwaysShock { uniform_calls: 0 };
        let data = generate(&params, start(), &mut rng).unwrap();

        // Equities: -0.06 drift - 0.01 momentum - 0.05 * 10/5 shock
        let eq = data.series(AssetClass::Equities);
        assert!((eq[1] - (1.0 - 0.06 - 0.01 - 0.10)).abs() < 1e-12, "eq={}", eq[1]);
        // Gold: 0.08 drift - 0.01 momentum + 0.04 * 10/5 shock
        let gold = data.series(AssetClass::Gold);
        assert!((gold[1] - (1.0 + 0.08 - 0.01 + 0.08)).abs() < 1e-12, "gold={}", gold[1]);
        // Bonds untouched by shocks
        let bonds = data.series(AssetClass::Bonds);
        assert!((bonds[1] - (1.0 - 0.01 - 0.01)).abs() < 1e-12);
        assert_eq!(rng.uniform_calls, 2);
    }

    #[test]
    fn test_no_tariff_shocks_outside_tariff_war() {
        for scenario in [
            Scenario::UkraineWar,
            Scenario::EnergyCrisis,
            Scenario::ClimateChange,
        ] {
            let params = ScenarioParameters::new(scenario, 10, 24).unwrap();
            let mut rng = AlwaysShock { uniform_calls: 0 };
            let shocked = generate(&params, start(), &mut rng).unwrap();
            let calm = generate(&params, start(), &mut ZeroShocks).unwrap();
            assert_eq!(rng.uniform_calls, 0, "{scenario}");
            assert_eq!(shocked.assets, calm.assets);
        }
    }

    #[test]
    fn test_seeded_reproducibility() {
        let input = SimulationInput {
            scenario: Scenario::TariffWar,
            intensity: 8,
            years: 2,
            seed: Some(42),
            start_date: Some(start()),
        };
        let a = generate_from_input(&input).unwrap();
        let b = generate_from_input(&input).unwrap();
        assert_eq!(a.assets, b.assets);
    }

    #[test]
    fn test_run_scenario_simulation_rows() {
        let input = SimulationInput {
            seed: Some(1),
            start_date: Some(start()),
            ..SimulationInput::default()
        };
        let out = run_scenario_simulation(&input).unwrap();
        assert_eq!(out.result.rows.len(), 60);
        assert_eq!(out.result.rows[0].values.len(), 8);
        assert_eq!(out.result.rows[0].date, start());
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "ieee754_f64");
    }

    #[test]
    fn test_unseeded_run_warns() {
        let out = run_scenario_simulation(&SimulationInput::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: SimulationInput = serde_json::from_str(r#"{"scenario": "tariff-war"}"#).unwrap();
        assert_eq!(input.scenario, Scenario::TariffWar);
        assert_eq!(input.intensity, 5);
        assert_eq!(input.years, 5);
        assert!(input.seed.is_none());
    }
}
