pub mod correlation;
pub mod dashboard;
pub mod scenarios;
pub mod sensitivity;
pub mod simulate;

use antifragile_core::dashboard::DashboardInput;
use antifragile_core::scenarios::Scenario;
use chrono::NaiveDate;
use clap::Args;
use tracing::debug;

use crate::input;

/// Flags shared by every command that runs a simulation
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Path to a JSON or YAML file with the full input (flags override it)
    #[arg(long)]
    pub input: Option<String>,

    /// Crisis scenario: ukraine-war, energy-crisis, climate-change, tariff-war
    #[arg(long)]
    pub scenario: Option<Scenario>,

    /// Crisis intensity from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub intensity: Option<u8>,

    /// Horizon in years from 1 to 10 (the simulation runs years * 12 months)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub years: Option<u32>,

    /// Seed for reproducible results
    #[arg(long)]
    pub seed: Option<u64>,

    /// First date of the monthly axis (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Allocation percentages, each between 0 and 100
#[derive(Args, Debug, Default)]
pub struct AllocationArgs {
    /// Share of the portfolio in the traditional sleeve
    #[arg(long)]
    pub traditional: Option<u32>,
    /// Share of the portfolio in the alternative sleeve
    #[arg(long)]
    pub alternative: Option<u32>,
    /// Equities share of the traditional sleeve
    #[arg(long)]
    pub equities: Option<u32>,
    /// Bonds share of the traditional sleeve
    #[arg(long)]
    pub bonds: Option<u32>,
    /// Cash share of the traditional sleeve
    #[arg(long)]
    pub cash: Option<u32>,
    /// Commodities share of the alternative sleeve
    #[arg(long)]
    pub commodities: Option<u32>,
    /// Renewable energy share of the alternative sleeve
    #[arg(long)]
    pub renewable: Option<u32>,
    /// Gold share of the alternative sleeve
    #[arg(long)]
    pub gold: Option<u32>,
    /// Crypto share of the alternative sleeve
    #[arg(long)]
    pub crypto: Option<u32>,
    /// Volatility ETF share of the alternative sleeve
    #[arg(long)]
    pub volatility_etf: Option<u32>,
}

/// Build the pipeline input from `--input`, piped stdin or defaults, then
/// apply any explicit flags on top.
pub fn resolve_input(
    scenario: &ScenarioArgs,
    allocation: &AllocationArgs,
) -> Result<DashboardInput, Box<dyn std::error::Error>> {
    let mut resolved: DashboardInput = if let Some(ref path) = scenario.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DashboardInput::default()
    };

    let sim = &mut resolved.simulation;
    if let Some(s) = scenario.scenario {
        sim.scenario = s;
    }
    if let Some(i) = scenario.intensity {
        sim.intensity = i;
    }
    if let Some(y) = scenario.years {
        sim.years = y;
    }
    if scenario.seed.is_some() {
        sim.seed = scenario.seed;
    }
    if scenario.start_date.is_some() {
        sim.start_date = scenario.start_date;
    }

    let alloc = &mut resolved.allocation;
    let overrides = [
        (allocation.traditional, &mut alloc.traditional_pct),
        (allocation.alternative, &mut alloc.alternative_pct),
        (allocation.equities, &mut alloc.equities_pct),
        (allocation.bonds, &mut alloc.bonds_pct),
        (allocation.cash, &mut alloc.cash_pct),
        (allocation.commodities, &mut alloc.commodities_pct),
        (allocation.renewable, &mut alloc.renewable_energy_pct),
        (allocation.gold, &mut alloc.gold_pct),
        (allocation.crypto, &mut alloc.crypto_pct),
        (allocation.volatility_etf, &mut alloc.volatility_etf_pct),
    ];
    for (flag, field) in overrides {
        if let Some(pct) = flag {
            *field = pct;
        }
    }

    debug!(
        scenario = %resolved.simulation.scenario,
        intensity = resolved.simulation.intensity,
        years = resolved.simulation.years,
        seeded = resolved.simulation.seed.is_some(),
        "resolved input"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        scenario: ScenarioArgs,
    }

    fn args_with_file(path: &str) -> ScenarioArgs {
        ScenarioArgs {
            input: Some(path.to_string()),
            scenario: None,
            intensity: Some(9),
            years: None,
            seed: None,
            start_date: None,
        }
    }

    #[test]
    fn test_flags_override_input_file() {
        let path = std::env::temp_dir().join("afx-resolve-input-test.json");
        fs::write(
            &path,
            r#"{"scenario": "energy-crisis", "intensity": 3, "seed": 5,
                "allocation": {"traditional_pct": 20, "alternative_pct": 80}}"#,
        )
        .unwrap();

        let allocation = AllocationArgs {
            gold: Some(60),
            ..AllocationArgs::default()
        };
        let resolved =
            resolve_input(&args_with_file(path.to_str().unwrap()), &allocation).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(resolved.simulation.scenario, Scenario::EnergyCrisis);
        assert_eq!(resolved.simulation.intensity, 9);
        assert_eq!(resolved.simulation.seed, Some(5));
        assert_eq!(resolved.allocation.alternative_pct, 80);
        assert_eq!(resolved.allocation.gold_pct, 60);
        assert_eq!(resolved.allocation.crypto_pct, 15);
    }

    #[test]
    fn test_years_flag_is_range_checked() {
        assert!(Harness::try_parse_from(["afx", "--years", "400000"]).is_err());
        assert!(Harness::try_parse_from(["afx", "--years", "0"]).is_err());
        assert!(Harness::try_parse_from(["afx", "--years", "11"]).is_err());

        let parsed = Harness::try_parse_from(["afx", "--years", "10"]).unwrap();
        assert_eq!(parsed.scenario.years, Some(10));
    }

    #[test]
    fn test_oversized_years_in_file_is_rejected() {
        let path = std::env::temp_dir().join("afx-resolve-years-test.json");
        fs::write(&path, r#"{"scenario": "Energy Crisis", "years": 400000, "seed": 5}"#).unwrap();

        let resolved = resolve_input(
            &ScenarioArgs {
                intensity: None,
                ..args_with_file(path.to_str().unwrap())
            },
            &AllocationArgs::default(),
        )
        .unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(resolved.simulation.scenario, Scenario::EnergyCrisis);
        assert!(antifragile_core::dashboard::run_dashboard(&resolved).is_err());
    }
}
