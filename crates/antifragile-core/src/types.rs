use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional portfolio weight (0.30 = 30% of the portfolio).
pub type Weight = f64;

/// Monthly price index values, starting at 1.0.
pub type ReturnSeries = Vec<f64>;

/// Top-level bucket an asset class is allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sleeve {
    Traditional,
    Alternative,
}

/// The eight asset classes every scenario is simulated over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equities,
    Bonds,
    Cash,
    Commodities,
    RenewableEnergy,
    Gold,
    Crypto,
    VolatilityEtf,
}

impl AssetClass {
    /// All asset classes in simulation order.
    pub const ALL: [AssetClass; 8] = [
        AssetClass::Equities,
        AssetClass::Bonds,
        AssetClass::Cash,
        AssetClass::Commodities,
        AssetClass::RenewableEnergy,
        AssetClass::Gold,
        AssetClass::Crypto,
        AssetClass::VolatilityEtf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Equities => "Equities",
            AssetClass::Bonds => "Bonds",
            AssetClass::Cash => "Cash",
            AssetClass::Commodities => "Commodities",
            AssetClass::RenewableEnergy => "Renewable Energy",
            AssetClass::Gold => "Gold",
            AssetClass::Crypto => "Crypto",
            AssetClass::VolatilityEtf => "Volatility ETFs",
        }
    }

    pub fn sleeve(&self) -> Sleeve {
        match self {
            AssetClass::Equities | AssetClass::Bonds | AssetClass::Cash => Sleeve::Traditional,
            _ => Sleeve::Alternative,
        }
    }

    /// Position within [`AssetClass::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}
