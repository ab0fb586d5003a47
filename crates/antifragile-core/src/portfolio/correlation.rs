use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use std::time::Instant;

use crate::error::AntifragileError;
use crate::monte_carlo::simulation::{generate_from_input, ScenarioSeries, SimulationInput};
use crate::types::{with_metadata, AssetClass, ComputationOutput};
use crate::AntifragileResult;

/// A correlation coefficient, or `Undefined` when an input has no variance.
///
/// Serialises as a plain number, or as the string `"undefined"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined(v) => Some(*v),
            Correlation::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Correlation::Defined(_))
    }

    /// Multiply a defined coefficient by `factor`.
    pub fn scaled(&self, factor: f64) -> Correlation {
        match self {
            Correlation::Defined(v) => Correlation::Defined(v * factor),
            Correlation::Undefined => Correlation::Undefined,
        }
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Correlation::Defined(v) => serializer.serialize_f64(*v),
            Correlation::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

impl<'de> Deserialize<'de> for Correlation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Correlation::Defined(v)),
            Repr::Text(s) if s == "undefined" => Ok(Correlation::Undefined),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"undefined\", got \"{s}\""
            ))),
        }
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Pearson product-moment correlation of two equally long samples.
///
/// Returns `DegenerateStatistic` when either sample is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> AntifragileResult<f64> {
    if xs.len() != ys.len() {
        return Err(AntifragileError::InvalidInput {
            field: "series".into(),
            reason: format!("Length mismatch ({} vs {})", xs.len(), ys.len()),
        });
    }
    if xs.is_empty() {
        return Err(AntifragileError::InsufficientData(
            "Correlation requires at least one observation".into(),
        ));
    }
    if is_constant(xs) {
        return Err(AntifragileError::DegenerateStatistic {
            context: "first correlation input".into(),
        });
    }
    if is_constant(ys) {
        return Err(AntifragileError::DegenerateStatistic {
            context: "second correlation input".into(),
        });
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Err(AntifragileError::DegenerateStatistic {
            context: "correlation inputs".into(),
        });
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// Pearson correlation with zero variance mapped to [`Correlation::Undefined`].
pub fn correlate(xs: &[f64], ys: &[f64]) -> AntifragileResult<Correlation> {
    match pearson(xs, ys) {
        Ok(r) => Ok(Correlation::Defined(r)),
        Err(AntifragileError::DegenerateStatistic { .. }) => Ok(Correlation::Undefined),
        Err(e) => Err(e),
    }
}

/// Pairwise correlations of the asset index series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub assets: Vec<AssetClass>,
    /// `values[i][j]` = correlation of `assets[i]` with `assets[j]`.
    pub values: Vec<Vec<Correlation>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: AssetClass, b: AssetClass) -> Option<Correlation> {
        let i = self.assets.iter().position(|x| *x == a)?;
        let j = self.assets.iter().position(|x| *x == b)?;
        Some(self.values[i][j])
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.values.len();
        (0..n).all(|i| (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

/// Correlation matrix over the raw index levels (not period returns).
///
/// The diagonal is exactly 1 for every series with variance, and
/// undefined for constant ones.
pub fn correlation_matrix(data: &ScenarioSeries) -> AntifragileResult<CorrelationMatrix> {
    let assets: Vec<AssetClass> = data.assets.keys().copied().collect();
    let n = assets.len();
    let mut values = vec![vec![Correlation::Undefined; n]; n];

    for i in 0..n {
        let xs = data.series(assets[i]);
        values[i][i] = if xs.is_empty() || is_constant(xs) {
            Correlation::Undefined
        } else {
            Correlation::Defined(1.0)
        };
        for j in (i + 1)..n {
            let c = correlate(xs, data.series(assets[j]))?;
            values[i][j] = c;
            values[j][i] = c;
        }
    }

    Ok(CorrelationMatrix { assets, values })
}

/// Simulate a scenario and return only its asset correlation matrix.
pub fn run_correlation_matrix(
    input: &SimulationInput,
) -> AntifragileResult<ComputationOutput<CorrelationMatrix>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let data = generate_from_input(input)?;
    let matrix = correlation_matrix(&data)?;

    for (i, asset) in matrix.assets.iter().enumerate() {
        if !matrix.values[i][i].is_defined() {
            warnings.push(format!("{asset} series is constant; its correlations are undefined"));
        }
    }
    if input.seed.is_none() {
        warnings.push("No seed supplied; results will differ between runs".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pearson correlation of simulated asset index levels",
        &serde_json::json!({
            "scenario": input.scenario.name(),
            "intensity": input.intensity,
            "years": input.years,
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        matrix,
    ))
}
