use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::correlation::{correlate, correlation_matrix, Correlation, CorrelationMatrix};
use super::weights::{CompositionSlice, PortfolioWeights};
use crate::error::AntifragileError;
use crate::monte_carlo::simulation::ScenarioSeries;
use crate::types::{AssetClass, ReturnSeries};
use crate::AntifragileResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline performance figures, in percent.
///
/// A total return is `None` when the series starts at zero (e.g. an
/// all-zero allocation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub portfolio_total_return_pct: Option<f64>,
    pub benchmark_total_return_pct: Option<f64>,
    /// Portfolio minus benchmark total return.
    pub difference_pct: Option<f64>,
}

/// Gauge band of the antifragility index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntifragilityBand {
    /// [-100, -50): the portfolio suffers badly as the crisis escalates.
    Fragile,
    /// [-50, 0)
    Vulnerable,
    /// [0, 50)
    Resilient,
    /// [50, 100]: the portfolio benefits from the escalation.
    Antifragile,
    Undefined,
}

impl AntifragilityBand {
    pub fn classify(index: Correlation) -> Self {
        match index.value() {
            None => AntifragilityBand::Undefined,
            Some(v) if v < -50.0 => AntifragilityBand::Fragile,
            Some(v) if v < 0.0 => AntifragilityBand::Vulnerable,
            Some(v) if v < 50.0 => AntifragilityBand::Resilient,
            Some(_) => AntifragilityBand::Antifragile,
        }
    }
}

/// Correlation between escalating crisis intensity and the portfolio level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntifragilityIndex {
    /// Pearson correlation scaled to [-100, 100].
    pub value: Correlation,
    pub band: AntifragilityBand,
    /// The escalation ramp the portfolio was correlated against.
    pub intensity_ramp: Vec<f64>,
}

/// Everything derived from one dataset and one set of weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    pub dates: Vec<NaiveDate>,
    pub portfolio: ReturnSeries,
    pub benchmark: ReturnSeries,
    pub summary: ReturnSummary,
    pub correlation_matrix: CorrelationMatrix,
    pub antifragility: AntifragilityIndex,
    pub composition: Vec<CompositionSlice>,
    #[serde(skip)]
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// `Σ weight[asset] * series[asset][month]` for every month.
///
/// A pure linear combination: weights are used as given, never normalised.
pub fn weighted_sum(
    data: &ScenarioSeries,
    weights: &PortfolioWeights,
) -> AntifragileResult<ReturnSeries> {
    let len = data.len();
    let mut combined = vec![0.0; len];

    for asset in AssetClass::ALL {
        let w = weights.weight(asset);
        let series = data.series(asset);
        if series.len() != len {
            if w == 0.0 && series.is_empty() {
                continue;
            }
            return Err(AntifragileError::InvalidInput {
                field: format!("{asset} series"),
                reason: format!("Expected {len} observations, got {}", series.len()),
            });
        }
        for (total, value) in combined.iter_mut().zip(series) {
            *total += w * value;
        }
    }

    Ok(combined)
}

/// The fixed 0.6 Equities + 0.4 Bonds reference series.
pub fn benchmark_series(data: &ScenarioSeries) -> AntifragileResult<ReturnSeries> {
    weighted_sum(data, &PortfolioWeights::benchmark_60_40())
}

/// `(last / first - 1) * 100`, or `None` for an empty or zero-based series.
pub fn total_return_pct(series: &[f64]) -> Option<f64> {
    let first = *series.first()?;
    let last = *series.last()?;
    if first == 0.0 {
        return None;
    }
    Some((last / first - 1.0) * 100.0)
}

/// Escalation ramp `intensity * i / 10` for `i = 1..=horizon`.
pub fn intensity_ramp(intensity: u8, horizon: usize) -> Vec<f64> {
    (1..=horizon)
        .map(|i| intensity as f64 * (i as f64 / 10.0))
        .collect()
}

/// Pearson correlation between the intensity ramp and the portfolio,
/// scaled to [-100, 100].
pub fn antifragility_index(
    intensity: u8,
    portfolio: &[f64],
) -> AntifragileResult<AntifragilityIndex> {
    let ramp = intensity_ramp(intensity, portfolio.len());
    let value = correlate(&ramp, portfolio)?
        .scaled(100.0)
        .value()
        .map(|v| Correlation::Defined(v.clamp(-100.0, 100.0)))
        .unwrap_or(Correlation::Undefined);

    Ok(AntifragilityIndex {
        value,
        band: AntifragilityBand::classify(value),
        intensity_ramp: ramp,
    })
}

// ---------------------------------------------------------------------------
// Public API: aggregation
// ---------------------------------------------------------------------------

/// Combine a simulated dataset with user weights.
///
/// Produces the weighted portfolio series, the 60/40 benchmark, total
/// returns, the asset correlation matrix and the antifragility index.
/// Zero-variance statistics come back as `undefined` with a warning.
pub fn aggregate(
    data: &ScenarioSeries,
    weights: &PortfolioWeights,
) -> AntifragileResult<AggregateResult> {
    let mut warnings = Vec::new();

    let portfolio = weighted_sum(data, weights)?;
    let benchmark = benchmark_series(data)?;

    let portfolio_total = total_return_pct(&portfolio);
    let benchmark_total = total_return_pct(&benchmark);
    if portfolio_total.is_none() {
        warnings.push("Portfolio series starts at zero; total return is undefined".into());
    }
    let summary = ReturnSummary {
        portfolio_total_return_pct: portfolio_total,
        benchmark_total_return_pct: benchmark_total,
        difference_pct: portfolio_total.zip(benchmark_total).map(|(p, b)| p - b),
    };

    let matrix = correlation_matrix(data)?;
    let constant_assets: Vec<String> = matrix
        .assets
        .iter()
        .zip(&matrix.values)
        .enumerate()
        .filter(|(i, (_, row))| !row[*i].is_defined())
        .map(|(_, (asset, _))| asset.label().to_string())
        .collect();
    if !constant_assets.is_empty() {
        warn!(assets = ?constant_assets, "constant asset series in correlation matrix");
        warnings.push(format!(
            "Correlation undefined for constant series: {}",
            constant_assets.join(", ")
        ));
    }

    let antifragility = antifragility_index(data.parameters.intensity, &portfolio)?;
    if !antifragility.value.is_defined() {
        warn!("portfolio series is constant; antifragility index undefined");
        warnings.push("Portfolio series is constant; antifragility index is undefined".into());
    }

    debug!(
        months = portfolio.len(),
        portfolio_total = ?summary.portfolio_total_return_pct,
        benchmark_total = ?summary.benchmark_total_return_pct,
        antifragility = ?antifragility.value.value(),
        "aggregated portfolio"
    );

    Ok(AggregateResult {
        dates: data.dates.clone(),
        portfolio,
        benchmark,
        summary,
        correlation_matrix: matrix,
        antifragility,
        composition: weights.composition(),
        warnings,
    })
}
