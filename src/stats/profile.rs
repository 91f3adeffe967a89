//! Descriptive statistics: quantiles, box summaries, histograms, and the
//! per-column quality profile (missing, infinite, and outlying values).

use serde::Serialize;

use crate::data::model::{Cell, Dataset};
use crate::data::schema::ColumnSchema;
use crate::error::Result;
use crate::stats::crosstab::value_counts;

/// Quantile of an ascending slice with linear interpolation between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));

        Some(Self {
            q1,
            median,
            q3,
            mean,
            whisker_low: inside().fold(f64::INFINITY, f64::min),
            whisker_high: inside().fold(f64::NEG_INFINITY, f64::max),
            outliers: sorted
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Equal-width bins over the observed range. A constant sample gets one bin.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<Bin> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if n_bins == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![Bin {
            start: min,
            end: max,
            count: sorted.len() as u64,
        }];
    }

    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: if i + 1 == n_bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in sorted {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Column profiles
// ---------------------------------------------------------------------------

/// Location and spread of the valid values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericProfile {
    pub column: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub inf_count: usize,
    pub outliers_count: usize,
    pub summary: Option<Summary>,
}

impl NumericProfile {
    /// Profile a column. Outliers lie more than `outlier_sigma` sample
    /// standard deviations from the mean.
    pub fn from_cells<'a, I>(column: &str, cells: I, outlier_sigma: f64) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut total = 0usize;
        let mut inf_count = 0usize;
        let mut values = Vec::new();
        for cell in cells {
            total += 1;
            match cell.as_f64_lossy() {
                Some(v) if v.is_finite() => values.push(v),
                Some(_) => inf_count += 1,
                None => {}
            }
        }

        let missing_count = total - values.len() - inf_count;
        let missing_percentage = if total == 0 {
            0.0
        } else {
            missing_count as f64 / total as f64 * 100.0
        };

        let summary = summarize(&values);
        let outliers_count = match &summary {
            Some(s) if s.std > 0.0 => values
                .iter()
                .filter(|&&v| (v - s.mean).abs() > outlier_sigma * s.std)
                .count(),
            _ => 0,
        };

        Self {
            column: column.to_string(),
            count: values.len(),
            missing_count,
            missing_percentage,
            inf_count,
            outliers_count,
            summary,
        }
    }
}

fn summarize(values: &[f64]) -> Option<Summary> {
    let sorted = sorted_finite(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    Some(Summary {
        mean,
        std,
        min: sorted[0],
        max: sorted[n - 1],
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalProfile {
    pub column: String,
    pub levels: usize,
    /// Level → count, first-seen order.
    pub counts: Vec<(String, u64)>,
}

impl CategoricalProfile {
    pub fn from_labels(column: &str, labels: &[String]) -> Self {
        let counts = value_counts(labels.iter().map(String::as_str));
        Self {
            column: column.to_string(),
            levels: counts.len(),
            counts,
        }
    }
}

/// Profile of every classified column of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub numeric: Vec<NumericProfile>,
    pub categorical: Vec<CategoricalProfile>,
}

impl DatasetProfile {
    pub fn build(dataset: &Dataset, schema: &ColumnSchema, outlier_sigma: f64) -> Result<Self> {
        let numeric = schema
            .numeric
            .iter()
            .map(|name| {
                let cells = dataset.column(name)?;
                Ok(NumericProfile::from_cells(name, cells, outlier_sigma))
            })
            .collect::<Result<Vec<_>>>()?;

        let categorical = schema
            .categorical
            .iter()
            .filter(|name| !schema.numeric.contains(*name))
            .map(|name| {
                let labels = dataset.labels(name)?;
                Ok(CategoricalProfile::from_labels(name, &labels))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rows: dataset.len(),
            numeric,
            categorical,
        })
    }
}
