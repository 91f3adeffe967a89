use crate::color::generate_palette;
use crate::config::AnalysisConfig;
use crate::data::model::Dataset;
use crate::data::schema::ColumnSchema;
use crate::error::Result;
use crate::stats::crosstab::value_counts;
use crate::stats::profile::{BoxStats, histogram};
use crate::stats::transform::{Transform, valid_values};

use super::{ChartData, ChartKind, SeriesMode, available_univariate, optional_curve, unsupported};

/// Derive the payload of a single-column chart.
///
/// Categorical columns only support pie charts and ignore `transform`.
pub fn univariate(
    dataset: &Dataset,
    schema: &ColumnSchema,
    column: &str,
    transform: Transform,
    chart: ChartKind,
    config: &AnalysisConfig,
) -> Result<ChartData> {
    let kind = schema.kind_of(column);
    if !available_univariate(kind).contains(&chart) {
        return Err(unsupported(chart, format!("{kind} column '{column}'")));
    }

    log::debug!("univariate {chart} of '{column}' ({kind}, {transform})");

    if chart == ChartKind::Pie {
        let labels = dataset.labels(column)?;
        let (labels, values): (Vec<String>, Vec<u64>) =
            value_counts(labels.iter().map(String::as_str)).into_iter().unzip();
        let colors = generate_palette(labels.len());
        return Ok(ChartData::Pie {
            labels,
            values,
            colors,
        });
    }

    let values = valid_values(&transform.apply_column(dataset.column(column)?));

    let data = match chart {
        ChartKind::Histogram => ChartData::Histogram {
            bins: histogram(&values, config.histogram_bins),
        },
        ChartKind::Box => ChartData::Box {
            stats: BoxStats::from_values(&values),
            values,
        },
        ChartKind::Violin => ChartData::Violin {
            stats: BoxStats::from_values(&values),
            density: optional_curve(&values, &config.kde)?,
            values,
        },
        ChartKind::Density => ChartData::Density {
            density: optional_curve(&values, &config.kde)?,
        },
        ChartKind::Scatter | ChartKind::Line => ChartData::Series {
            x: (0..values.len()).map(|i| i as f64).collect(),
            y: values,
            mode: if chart == ChartKind::Line {
                SeriesMode::Lines
            } else {
                SeriesMode::Markers
            },
        },
        other => return Err(unsupported(other, format!("{kind} column '{column}'"))),
    };
    Ok(data)
}
