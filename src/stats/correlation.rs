use serde::Serialize;

use crate::color::diverging_hex;
use crate::data::model::Dataset;
use crate::error::{EdaError, Result};
use crate::stats::transform::Transform;

/// Pearson's r over the rows where both sides are present.
///
/// Returns 0 when no row overlaps or when either side has zero variance.
/// The result is clamped into `[-1, 1]`.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.is_empty() {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    // Deviations are scaled to [-1, 1] so the sums neither overflow nor
    // vanish for very large or very small magnitudes.
    let scale_x = pairs.iter().fold(0.0_f64, |m, p| m.max((p.0 - mean_x).abs()));
    let scale_y = pairs.iter().fold(0.0_f64, |m, p| m.max((p.1 - mean_y).abs()));
    if scale_x == 0.0 || scale_y == 0.0 || !scale_x.is_finite() || !scale_y.is_finite() {
        return 0.0;
    }

    let (cov, var_x, var_y) = pairs
        .iter()
        .fold((0.0, 0.0, 0.0), |(cov, vx, vy), &(xi, yi)| {
            let dx = (xi - mean_x) / scale_x;
            let dy = (yi - mean_y) / scale_y;
            (cov + dx * dy, vx + dx * dx, vy + dy * dy)
        });

    let denominator = var_x.sqrt() * var_y.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// Square correlation matrix over a list of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Compute every ordered pair independently; the diagonal is fixed at 1.
    pub fn compute(columns: &[(String, Vec<Option<f64>>)]) -> Result<Self> {
        if let Some((_, first)) = columns.first() {
            for (_, col) in columns {
                if col.len() != first.len() {
                    return Err(EdaError::LengthMismatch {
                        left: first.len(),
                        right: col.len(),
                    });
                }
            }
        }

        let k = columns.len();
        let mut values = vec![vec![0.0; k]; k];
        for i in 0..k {
            for j in 0..k {
                values[i][j] = if i == j {
                    1.0
                } else {
                    pearson(&columns[i].1, &columns[j].1)
                };
            }
        }

        log::debug!("correlation matrix over {k} columns");
        Ok(Self {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        })
    }

    /// Parse the named columns of a dataset and correlate them.
    pub fn from_dataset(dataset: &Dataset, names: &[String]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| {
                let cells = dataset.column(name)?;
                Ok((name.clone(), Transform::Identity.apply_column(cells)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::compute(&columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied()
    }

    pub fn by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.get(i, j)
    }

    /// Hide cells whose magnitude is below `threshold`.
    pub fn thresholded(&self, threshold: f64) -> Vec<Vec<Option<f64>>> {
        self.values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&r| (r.abs() >= threshold).then_some(r))
                    .collect()
            })
            .collect()
    }
}

/// Heatmap payload: the matrix, an optional mask, and a colour per cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationHeatmap {
    pub columns: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
    pub colors: Vec<Vec<Option<String>>>,
}

impl CorrelationHeatmap {
    pub fn new(matrix: &CorrelationMatrix, threshold: Option<f64>) -> Self {
        let z = match threshold {
            Some(t) => matrix.thresholded(t),
            None => matrix
                .values
                .iter()
                .map(|row| row.iter().copied().map(Some).collect())
                .collect(),
        };
        let colors = z
            .iter()
            .map(|row: &Vec<Option<f64>>| row.iter().map(|v| v.map(diverging_hex)).collect())
            .collect();
        Self {
            columns: matrix.columns.clone(),
            z,
            colors,
        }
    }
}
