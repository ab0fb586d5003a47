use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AntifragileError;
use crate::types::{AssetClass, Sleeve, Weight};
use crate::AntifragileResult;

/// Two-level allocation in whole percentages, as entered on the dashboard.
///
/// The effective weight of an asset is `sleeve_pct/100 * asset_pct/100`.
/// Nothing forces either level to sum to 100; mismatches only warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationInput {
    pub traditional_pct: u32,
    pub alternative_pct: u32,
    pub equities_pct: u32,
    pub bonds_pct: u32,
    pub cash_pct: u32,
    pub commodities_pct: u32,
    pub renewable_energy_pct: u32,
    pub gold_pct: u32,
    pub crypto_pct: u32,
    pub volatility_etf_pct: u32,
}

impl Default for AllocationInput {
    fn default() -> Self {
        Self {
            traditional_pct: 60,
            alternative_pct: 40,
            equities_pct: 50,
            bonds_pct: 30,
            cash_pct: 20,
            commodities_pct: 25,
            renewable_energy_pct: 25,
            gold_pct: 20,
            crypto_pct: 15,
            volatility_etf_pct: 15,
        }
    }
}

impl AllocationInput {
    pub fn sleeve_pct(&self, sleeve: Sleeve) -> u32 {
        match sleeve {
            Sleeve::Traditional => self.traditional_pct,
            Sleeve::Alternative => self.alternative_pct,
        }
    }

    /// Percentage of its sleeve allocated to `asset`.
    pub fn asset_pct(&self, asset: AssetClass) -> u32 {
        match asset {
            AssetClass::Equities => self.equities_pct,
            AssetClass::Bonds => self.bonds_pct,
            AssetClass::Cash => self.cash_pct,
            AssetClass::Commodities => self.commodities_pct,
            AssetClass::RenewableEnergy => self.renewable_energy_pct,
            AssetClass::Gold => self.gold_pct,
            AssetClass::Crypto => self.crypto_pct,
            AssetClass::VolatilityEtf => self.volatility_etf_pct,
        }
    }

    /// Reject any percentage above 100.
    pub fn validate(&self) -> AntifragileResult<()> {
        let sleeves = [
            ("traditional_pct", self.traditional_pct),
            ("alternative_pct", self.alternative_pct),
        ];
        let assets = AssetClass::ALL.map(|a| (a, self.asset_pct(a)));

        for (field, pct) in sleeves {
            if pct > 100 {
                return Err(out_of_range(field.to_string(), pct));
            }
        }
        for (asset, pct) in assets {
            if pct > 100 {
                return Err(out_of_range(format!("{asset} allocation"), pct));
            }
        }
        Ok(())
    }

    /// Non-fatal allocation problems to show next to the results.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let total = u64::from(self.traditional_pct) + u64::from(self.alternative_pct);
        if total != 100 {
            warnings.push(format!("Total allocation is {total}%; it should be 100%"));
        }

        for sleeve in [Sleeve::Traditional, Sleeve::Alternative] {
            let sub_total: u64 = AssetClass::ALL
                .iter()
                .filter(|a| a.sleeve() == sleeve)
                .map(|a| u64::from(self.asset_pct(*a)))
                .sum();
            if sub_total != 100 {
                let name = match sleeve {
                    Sleeve::Traditional => "Traditional",
                    Sleeve::Alternative => "Alternative",
                };
                warnings.push(format!(
                    "{name} sub-allocation is {sub_total}%; weights are not renormalised"
                ));
            }
        }

        warnings
    }
}

fn out_of_range(field: String, pct: u32) -> AntifragileError {
    AntifragileError::InvalidInput {
        field,
        reason: format!("Percentage must be between 0 and 100 (got {pct})"),
    }
}

/// Effective fractional weight of each asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    weights: BTreeMap<AssetClass, Weight>,
}

/// One slice of the composition pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSlice {
    pub asset: AssetClass,
    pub label: String,
    pub weight: Weight,
}

impl PortfolioWeights {
    /// Weights from explicit fractions; unlisted assets weigh zero.
    pub fn new(weights: impl IntoIterator<Item = (AssetClass, Weight)>) -> Self {
        Self {
            weights: weights.into_iter().collect(),
        }
    }

    /// Multiply each sleeve percentage by its sub-percentages, without
    /// renormalising.
    pub fn from_allocation(allocation: &AllocationInput) -> AntifragileResult<Self> {
        allocation.validate()?;
        Ok(Self::new(AssetClass::ALL.map(|asset| {
            let top = allocation.sleeve_pct(asset.sleeve()) as f64 / 100.0;
            let sub = allocation.asset_pct(asset) as f64 / 100.0;
            (asset, top * sub)
        })))
    }

    /// The fixed 60% Equities / 40% Bonds reference portfolio.
    pub fn benchmark_60_40() -> Self {
        Self::new([(AssetClass::Equities, 0.6), (AssetClass::Bonds, 0.4)])
    }

    pub fn weight(&self, asset: AssetClass) -> Weight {
        self.weights.get(&asset).copied().unwrap_or(0.0)
    }

    /// Sum of all weights (1.0 only when both levels sum to 100%).
    pub fn total(&self) -> Weight {
        self.weights.values().sum()
    }

    pub fn composition(&self) -> Vec<CompositionSlice> {
        AssetClass::ALL
            .iter()
            .map(|asset| CompositionSlice {
                asset: *asset,
                label: asset.label().to_string(),
                weight: self.weight(*asset),
            })
            .collect()
    }
}
