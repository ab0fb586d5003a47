use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AntifragileError;
use crate::types::AssetClass;

/// Lowest accepted crisis intensity.
pub const MIN_INTENSITY: u8 = 1;
/// Highest accepted crisis intensity.
pub const MAX_INTENSITY: u8 = 10;

/// Monthly volatility for asset classes without an override.
pub const DEFAULT_MONTHLY_VOLATILITY: f64 = 0.02;

/// A named macro-crisis narrative.
///
/// Serialises as its kebab id and deserialises from any spelling `FromStr`
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    UkraineWar,
    EnergyCrisis,
    ClimateChange,
    TariffWar,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::UkraineWar,
        Scenario::EnergyCrisis,
        Scenario::ClimateChange,
        Scenario::TariffWar,
    ];

    /// Stable identifier used on the command line and in JSON.
    pub fn id(&self) -> &'static str {
        match self {
            Scenario::UkraineWar => "ukraine-war",
            Scenario::EnergyCrisis => "energy-crisis",
            Scenario::ClimateChange => "climate-change",
            Scenario::TariffWar => "tariff-war",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::UkraineWar => "War in Ukraine",
            Scenario::EnergyCrisis => "Energy Crisis",
            Scenario::ClimateChange => "Climate Change",
            Scenario::TariffWar => "Tariff War",
        }
    }

    /// Label shown by the Spanish-language dashboard.
    pub fn spanish_label(&self) -> &'static str {
        match self {
            Scenario::UkraineWar => "Guerra en Ucrania",
            Scenario::EnergyCrisis => "Crisis Energética",
            Scenario::ClimateChange => "Cambio Climático",
            Scenario::TariffWar => "Guerra Arancelaria",
        }
    }

    /// Base monthly drift before intensity scaling.
    pub fn drift_factor(&self, asset: AssetClass) -> f64 {
        let row: [f64; 8] = match self {
            // Equities, Bonds, Cash, Commodities, Renewable, Gold, Crypto, VolETF
            Scenario::UkraineWar => [-0.05, -0.03, 0.01, 0.08, 0.05, 0.07, 0.02, 0.09],
            Scenario::EnergyCrisis => [-0.04, -0.02, 0.01, 0.09, 0.10, 0.04, 0.01, 0.07],
            Scenario::ClimateChange => [-0.03, -0.02, 0.00, 0.04, 0.12, 0.03, 0.02, 0.05],
            Scenario::TariffWar => [-0.06, -0.01, 0.02, 0.03, 0.02, 0.08, 0.06, 0.10],
        };
        row[asset.index()]
    }

    /// Monthly drift applied by the random walk.
    ///
    /// Cash carries a flat scenario constant; every other asset class is
    /// scaled by `intensity / 10`.
    pub fn base_drift(&self, asset: AssetClass, intensity: u8) -> f64 {
        let factor = self.drift_factor(asset);
        if asset == AssetClass::Cash {
            factor
        } else {
            factor * (intensity as f64 / 10.0)
        }
    }

    /// Standard deviation of the monthly shock for `asset`.
    pub fn monthly_volatility(&self, asset: AssetClass) -> f64 {
        match (self, asset) {
            (Scenario::TariffWar, AssetClass::Equities) => 0.07,
            (_, AssetClass::Equities) => 0.05,
            (_, AssetClass::Crypto) => 0.15,
            (_, AssetClass::VolatilityEtf) => 0.10,
            _ => DEFAULT_MONTHLY_VOLATILITY,
        }
    }

    /// Whether tariff announcement shocks hit Equities and Gold.
    pub fn has_tariff_shocks(&self) -> bool {
        matches!(self, Scenario::TariffWar)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = AntifragileError;

    /// Accepts the kebab id, the English name or the Spanish label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Scenario::ALL
            .into_iter()
            .find(|sc| {
                sc.id() == needle
                    || sc.name().to_lowercase() == needle
                    || sc.spanish_label().to_lowercase() == needle
            })
            .ok_or_else(|| AntifragileError::InvalidInput {
                field: "scenario".into(),
                reason: format!(
                    "Unknown scenario '{s}' (expected one of: {})",
                    Scenario::ALL.map(|sc| sc.id()).join(", ")
                ),
            })
    }
}

impl<'de> Deserialize<'de> for Scenario {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Validate a crisis intensity dial value.
pub fn validate_intensity(intensity: u8) -> Result<(), AntifragileError> {
    if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) {
        return Err(AntifragileError::InvalidInput {
            field: "intensity".into(),
            reason: format!(
                "Must be between {MIN_INTENSITY} and {MAX_INTENSITY} (got {intensity})"
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_spellings() {
        assert_eq!("energy-crisis".parse::<Scenario>().unwrap(), Scenario::EnergyCrisis);
        assert_eq!("Energy Crisis".parse::<Scenario>().unwrap(), Scenario::EnergyCrisis);
        assert_eq!(
            "Crisis Energética".parse::<Scenario>().unwrap(),
            Scenario::EnergyCrisis
        );
        assert_eq!(
            " guerra arancelaria ".parse::<Scenario>().unwrap(),
            Scenario::TariffWar
        );
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let err = "alien-invasion".parse::<Scenario>().unwrap_err();
        assert!(matches!(err, AntifragileError::InvalidInput { ref field, .. } if field == "scenario"));
    }

    #[test]
    fn test_deserialize_every_spelling() {
        for sc in Scenario::ALL {
            for raw in [sc.id(), sc.name(), sc.spanish_label()] {
                let parsed: Scenario = serde_json::from_str(&format!("\"{raw}\"")).unwrap();
                assert_eq!(parsed, sc, "{raw}");
            }
            // Output keeps the kebab id
            assert_eq!(serde_json::to_string(&sc).unwrap(), format!("\"{}\"", sc.id()));
        }
        assert!(serde_json::from_str::<Scenario>("\"alien-invasion\"").is_err());
        assert!(serde_json::from_str::<Scenario>("3").is_err());
    }

    #[test]
    fn test_cash_drift_ignores_intensity() {
        for sc in Scenario::ALL {
            assert_eq!(
                sc.base_drift(AssetClass::Cash, 1),
                sc.base_drift(AssetClass::Cash, 10)
            );
        }
        assert_eq!(Scenario::TariffWar.base_drift(AssetClass::Cash, 3), 0.02);
    }

    #[test]
    fn test_drift_scales_with_intensity() {
        let d = Scenario::UkraineWar.base_drift(AssetClass::Gold, 5);
        assert!((d - 0.035).abs() < 1e-12, "drift={d}");
        let d = Scenario::ClimateChange.base_drift(AssetClass::RenewableEnergy, 10);
        assert!((d - 0.12).abs() < 1e-12, "drift={d}");
    }

    #[test]
    fn test_volatility_overrides() {
        assert_eq!(Scenario::EnergyCrisis.monthly_volatility(AssetClass::Equities), 0.05);
        assert_eq!(Scenario::TariffWar.monthly_volatility(AssetClass::Equities), 0.07);
        assert_eq!(Scenario::TariffWar.monthly_volatility(AssetClass::Crypto), 0.15);
        assert_eq!(Scenario::UkraineWar.monthly_volatility(AssetClass::VolatilityEtf), 0.10);
        assert_eq!(Scenario::UkraineWar.monthly_volatility(AssetClass::Bonds), 0.02);
    }

    #[test]
    fn test_only_tariff_war_has_shocks() {
        let with_shocks: Vec<_> = Scenario::ALL
            .into_iter()
            .filter(|s| s.has_tariff_shocks())
            .collect();
        assert_eq!(with_shocks, vec![Scenario::TariffWar]);
    }

    #[test]
    fn test_intensity_bounds() {
        assert!(validate_intensity(0).is_err());
        assert!(validate_intensity(1).is_ok());
        assert!(validate_intensity(10).is_ok());
        assert!(validate_intensity(11).is_err());
    }
}
