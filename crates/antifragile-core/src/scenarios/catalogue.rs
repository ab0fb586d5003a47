use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::recommendations::recommendations;
use super::scenario::Scenario;
use crate::types::{with_metadata, AssetClass, ComputationOutput};

/// Static description of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub id: String,
    pub name: String,
    pub spanish_label: String,
    /// Base monthly drift before intensity scaling.
    pub drift: BTreeMap<AssetClass, f64>,
    pub monthly_volatility: BTreeMap<AssetClass, f64>,
    pub tariff_shocks: bool,
    pub recommendations: Vec<String>,
}

impl From<Scenario> for ScenarioInfo {
    fn from(scenario: Scenario) -> Self {
        Self {
            id: scenario.id().to_string(),
            name: scenario.name().to_string(),
            spanish_label: scenario.spanish_label().to_string(),
            drift: AssetClass::ALL
                .map(|a| (a, scenario.drift_factor(a)))
                .into_iter()
                .collect(),
            monthly_volatility: AssetClass::ALL
                .map(|a| (a, scenario.monthly_volatility(a)))
                .into_iter()
                .collect(),
            tariff_shocks: scenario.has_tariff_shocks(),
            recommendations: recommendations(scenario)
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        }
    }
}

/// The full scenario catalogue, in [`Scenario::ALL`] order.
pub fn scenario_catalogue() -> ComputationOutput<Vec<ScenarioInfo>> {
    let infos: Vec<ScenarioInfo> = Scenario::ALL.into_iter().map(ScenarioInfo::from).collect();
    with_metadata(
        "Static crisis scenario catalogue",
        &serde_json::json!({
            "intensity_scaling": "drift * intensity / 10, Cash unscaled",
        }),
        Vec::new(),
        0,
        infos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lists_all_scenarios() {
        let out = scenario_catalogue();
        let ids: Vec<&str> = out.result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ukraine-war", "energy-crisis", "climate-change", "tariff-war"]);
    }

    #[test]
    fn test_tariff_war_entry() {
        let info = ScenarioInfo::from(Scenario::TariffWar);
        assert!(info.tariff_shocks);
        assert_eq!(info.drift[&AssetClass::Equities], -0.06);
        assert_eq!(info.monthly_volatility[&AssetClass::Equities], 0.07);
        assert_eq!(info.recommendations.len(), 5);
    }
}
