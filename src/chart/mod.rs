//! Chart-data assembly.
//!
//! Architecture:
//! ```text
//!   (dataset, schema, selection)
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ availability │  column kinds → allowed chart kinds
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────────────────────┐
//!   │ univariate / bivariate   │  one stats routine per chart
//!   └──────────────────────────┘
//!        │
//!        ▼
//!     ChartData (numeric payload + colour hints)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::KdeConfig;
use crate::data::model::Dataset;
use crate::data::schema::{ColumnKind, ColumnSchema};
use crate::error::{EdaError, Result};
use crate::stats::correlation::{CorrelationHeatmap, CorrelationMatrix};
use crate::stats::kde::{DensityCurve, DensityGrid, Kde1d};
use crate::stats::profile::{Bin, BoxStats};

pub mod bivariate;
pub mod univariate;

pub use bivariate::bivariate;
pub use univariate::univariate;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Histogram,
    Box,
    Violin,
    Density,
    Scatter,
    Line,
    Bar,
    GroupedBar,
    StackedBar,
    Mosaic,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 12] = [
        ChartKind::Pie,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Violin,
        ChartKind::Density,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::GroupedBar,
        ChartKind::StackedBar,
        ChartKind::Mosaic,
        ChartKind::Heatmap,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
            ChartKind::Violin => "violin",
            ChartKind::Density => "density",
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::GroupedBar => "grouped_bar",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::Mosaic => "mosaic",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ChartKind {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.tag() == s.trim())
            .ok_or_else(|| EdaError::UnknownChart(s.to_string()))
    }
}

/// Charts offered for a single column. The first entry is the default.
pub fn available_univariate(kind: ColumnKind) -> &'static [ChartKind] {
    match kind {
        ColumnKind::Categorical => &[ChartKind::Pie],
        ColumnKind::Numeric => &[
            ChartKind::Histogram,
            ChartKind::Box,
            ChartKind::Violin,
            ChartKind::Density,
            ChartKind::Scatter,
            ChartKind::Line,
        ],
    }
}

/// Charts offered for an x/y column pair. The first entry is the default.
pub fn available_bivariate(x: ColumnKind, y: ColumnKind) -> &'static [ChartKind] {
    use ColumnKind::*;
    match (x, y) {
        (Numeric, Numeric) => &[ChartKind::Scatter, ChartKind::Line, ChartKind::Density],
        (Categorical, Numeric) => &[ChartKind::Box, ChartKind::Violin, ChartKind::Bar],
        (Numeric, Categorical) => &[ChartKind::Box, ChartKind::Violin],
        (Categorical, Categorical) => &[
            ChartKind::GroupedBar,
            ChartKind::StackedBar,
            ChartKind::Mosaic,
            ChartKind::Heatmap,
        ],
    }
}

// ---------------------------------------------------------------------------
// Chart payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    Markers,
    Lines,
    LinesMarkers,
}

/// Values of one category in a grouped distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub label: String,
    pub values: Vec<f64>,
    pub stats: Option<BoxStats>,
    /// Present for violin charts.
    pub density: Option<DensityCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountSeries {
    pub name: String,
    pub counts: Vec<u64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MosaicSeries {
    pub name: String,
    pub counts: Vec<u64>,
    /// Percent of all rows, per category.
    pub percents: Vec<f64>,
    pub color: String,
}

/// Numeric payload handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Pie {
        labels: Vec<String>,
        values: Vec<u64>,
        colors: Vec<String>,
    },
    Histogram {
        bins: Vec<Bin>,
    },
    Box {
        values: Vec<f64>,
        stats: Option<BoxStats>,
    },
    Violin {
        values: Vec<f64>,
        stats: Option<BoxStats>,
        density: Option<DensityCurve>,
    },
    Density {
        density: Option<DensityCurve>,
    },
    Series {
        x: Vec<f64>,
        y: Vec<f64>,
        mode: SeriesMode,
    },
    DensityContour {
        grid: Option<DensityGrid>,
    },
    Grouped {
        groups: Vec<Group>,
        horizontal: bool,
        violin: bool,
    },
    Bar {
        categories: Vec<String>,
        values: Vec<f64>,
    },
    CountBars {
        categories: Vec<String>,
        series: Vec<CountSeries>,
        stacked: bool,
    },
    Mosaic {
        categories: Vec<String>,
        widths: Vec<f64>,
        series: Vec<MosaicSeries>,
    },
    CountHeatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<u64>>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn unsupported(chart: ChartKind, detail: String) -> EdaError {
    EdaError::UnsupportedChart {
        chart: chart.to_string(),
        detail,
    }
}

/// KDE curve, or `None` when there is nothing to estimate.
fn optional_curve(values: &[f64], config: &KdeConfig) -> Result<Option<DensityCurve>> {
    match Kde1d::fit(values, config) {
        Ok(kde) => Ok(Some(kde.curve())),
        Err(EdaError::EmptySample(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Correlation heatmap over the schema's numeric columns.
///
/// Cells with `|r|` below `threshold` are masked when a threshold is given.
pub fn correlation_heatmap(
    dataset: &Dataset,
    schema: &ColumnSchema,
    threshold: Option<f64>,
) -> Result<CorrelationHeatmap> {
    let matrix = CorrelationMatrix::from_dataset(dataset, &schema.numeric)?;
    Ok(CorrelationHeatmap::new(&matrix, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_first() {
        assert_eq!(available_univariate(ColumnKind::Numeric)[0], ChartKind::Histogram);
        assert_eq!(available_univariate(ColumnKind::Categorical)[0], ChartKind::Pie);
        assert_eq!(
            available_bivariate(ColumnKind::Categorical, ColumnKind::Categorical)[0],
            ChartKind::GroupedBar
        );
        assert!(!available_bivariate(ColumnKind::Numeric, ColumnKind::Categorical)
            .contains(&ChartKind::Bar));
    }

    #[test]
    fn test_chart_tags() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.tag().parse::<ChartKind>().unwrap(), kind);
        }
        assert!(matches!("pie3d".parse::<ChartKind>(), Err(EdaError::UnknownChart(_))));
    }

    #[test]
    fn test_payload_is_tagged() {
        let data = ChartData::Bar {
            categories: vec!["a".into()],
            values: vec![1.5],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["values"][0], 1.5);
    }
}
