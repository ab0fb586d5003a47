use serde::{Deserialize, Serialize};

use super::scenario::Scenario;

/// Estimated impact of a scenario on one equity sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorImpact {
    pub sector: String,
    /// Estimated impact in percent (-4.0 = -4%).
    pub impact_pct: f64,
}

/// Strategic recommendations shown for a scenario.
pub fn recommendations(scenario: Scenario) -> &'static [&'static str] {
    match scenario {
        Scenario::UkraineWar => &[
            "Increase exposure to gold and commodities",
            "Reduce exposure to bonds of countries close to the conflict",
            "Consider investments in defence and cybersecurity",
            "Diversify geographically towards markets far from the conflict",
        ],
        Scenario::EnergyCrisis => &[
            "Increase investment in renewable energy and storage technologies",
            "Selective exposure to companies with low energy intensity",
            "Consider options on energy futures as a hedge",
            "Invest in energy efficiency and smart grid companies",
        ],
        Scenario::ClimateChange => &[
            "Increase exposure to green technology and circular economy companies",
            "Invest in sustainable agriculture and water management",
            "Reduce exposure to assets with high climate risk (coastal real estate)",
            "Consider green and social impact bonds as an alternative to traditional bonds",
        ],
        Scenario::TariffWar => &[
            "Prefer companies with diversified or domestic supply chains",
            "Exposure to sectors less dependent on international trade",
            "Consider gold and crypto as protection against currency volatility",
            "Invest in volatility ETFs as a tactical hedge",
            "Explore opportunities in adaptable logistics and automation companies",
        ],
    }
}

const TARIFF_SECTOR_FACTORS: [(&str, f64); 6] = [
    ("Technology", -0.08),
    ("Consumer Staples", -0.03),
    ("Healthcare", -0.02),
    ("Industrials", -0.07),
    ("Materials", -0.06),
    ("Financials", -0.04),
];

/// Sector-level impact estimates; only the tariff war carries a sector table.
pub fn sector_impact(scenario: Scenario, intensity: u8) -> Option<Vec<SectorImpact>> {
    if scenario != Scenario::TariffWar {
        return None;
    }
    let scale = intensity as f64 / 10.0;
    Some(
        TARIFF_SECTOR_FACTORS
            .iter()
            .map(|(sector, factor)| SectorImpact {
                sector: (*sector).to_string(),
                impact_pct: factor * scale * 100.0,
            })
            .collect(),
    )
}
