use crate::color::ColorMap;
use crate::config::AnalysisConfig;
use crate::data::model::Dataset;
use crate::data::schema::{ColumnKind, ColumnSchema};
use crate::error::{EdaError, Result};
use crate::stats::crosstab::{CrossTab, FirstSeen};
use crate::stats::kde::Kde2d;
use crate::stats::profile::BoxStats;
use crate::stats::transform::Transform;

use super::{
    ChartData, ChartKind, CountSeries, Group, MosaicSeries, SeriesMode, available_bivariate,
    optional_curve, unsupported,
};

/// One side of a two-column selection.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
    pub column: &'a str,
    pub transform: Transform,
}

impl<'a> Axis<'a> {
    pub fn new(column: &'a str, transform: Transform) -> Self {
        Self { column, transform }
    }
}

/// Derive the payload of a two-column chart. Which stats routine runs is
/// decided by the kinds of the two columns.
pub fn bivariate(
    dataset: &Dataset,
    schema: &ColumnSchema,
    x: Axis<'_>,
    y: Axis<'_>,
    chart: ChartKind,
    config: &AnalysisConfig,
) -> Result<ChartData> {
    let x_kind = schema.kind_of(x.column);
    let y_kind = schema.kind_of(y.column);
    if !available_bivariate(x_kind, y_kind).contains(&chart) {
        return Err(unsupported(
            chart,
            format!("{x_kind} '{}' × {y_kind} '{}'", x.column, y.column),
        ));
    }

    log::debug!(
        "bivariate {chart} of '{}' ({x_kind}) × '{}' ({y_kind})",
        x.column,
        y.column
    );

    match (x_kind, y_kind) {
        (ColumnKind::Numeric, ColumnKind::Numeric) => {
            let xs = numeric_column(dataset, x)?;
            let ys = numeric_column(dataset, y)?;
            numeric_pair(&xs, &ys, chart, config)
        }
        (ColumnKind::Categorical, ColumnKind::Numeric) => {
            let labels = dataset.labels(x.column)?;
            let ys = numeric_column(dataset, y)?;
            if chart == ChartKind::Bar {
                return Ok(category_means(&labels, &ys));
            }
            grouped(&labels, &ys, chart, false, config)
        }
        (ColumnKind::Numeric, ColumnKind::Categorical) => {
            let xs = numeric_column(dataset, x)?;
            let labels = dataset.labels(y.column)?;
            grouped(&labels, &xs, chart, true, config)
        }
        (ColumnKind::Categorical, ColumnKind::Categorical) => {
            let tab = CrossTab::build(&dataset.labels(x.column)?, &dataset.labels(y.column)?)?;
            Ok(from_crosstab(tab, chart))
        }
    }
}

fn numeric_column(dataset: &Dataset, axis: Axis<'_>) -> Result<Vec<Option<f64>>> {
    Ok(axis.transform.apply_column(dataset.column(axis.column)?))
}

// ---------------------------------------------------------------------------
// numeric × numeric
// ---------------------------------------------------------------------------

fn numeric_pair(
    xs: &[Option<f64>],
    ys: &[Option<f64>],
    chart: ChartKind,
    config: &AnalysisConfig,
) -> Result<ChartData> {
    if chart == ChartKind::Density {
        let grid = match Kde2d::fit(xs, ys, &config.kde) {
            Ok(kde) => Some(kde.grid()),
            Err(EdaError::EmptySample(_)) => None,
            Err(e) => return Err(e),
        };
        return Ok(ChartData::DensityContour { grid });
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if chart == ChartKind::Line {
        let (x, y) = sorted_means(pairs);
        return Ok(ChartData::Series {
            x,
            y,
            mode: SeriesMode::LinesMarkers,
        });
    }

    let (x, y) = pairs.into_iter().unzip();
    Ok(ChartData::Series {
        x,
        y,
        mode: SeriesMode::Markers,
    })
}

/// Sort pairs by x and average the y values of repeated x.
fn sorted_means(mut pairs: Vec<(f64, f64)>) -> (Vec<f64>, Vec<f64>) {
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut xs: Vec<f64> = Vec::new();
    let mut sums: Vec<(f64, usize)> = Vec::new();
    for (x, y) in pairs {
        if xs.last() == Some(&x) {
            if let Some(acc) = sums.last_mut() {
                acc.0 += y;
                acc.1 += 1;
            }
        } else {
            xs.push(x);
            sums.push((y, 1));
        }
    }
    let ys = sums.into_iter().map(|(sum, n)| sum / n as f64).collect();
    (xs, ys)
}

// ---------------------------------------------------------------------------
// categorical × numeric
// ---------------------------------------------------------------------------

/// Mean of the numeric side per category; 0 for a category without values.
fn category_means(labels: &[String], values: &[Option<f64>]) -> ChartData {
    let mut seen = FirstSeen::new();
    let mut acc: Vec<(f64, usize)> = Vec::new();
    for (label, value) in labels.iter().zip(values) {
        let i = seen.insert(label);
        if i == acc.len() {
            acc.push((0.0, 0));
        }
        if let Some(v) = value {
            acc[i].0 += v;
            acc[i].1 += 1;
        }
    }

    ChartData::Bar {
        categories: seen.into_vec(),
        values: acc
            .into_iter()
            .map(|(sum, n)| if n > 0 { sum / n as f64 } else { 0.0 })
            .collect(),
    }
}

fn grouped(
    labels: &[String],
    values: &[Option<f64>],
    chart: ChartKind,
    horizontal: bool,
    config: &AnalysisConfig,
) -> Result<ChartData> {
    let violin = chart == ChartKind::Violin;

    let mut seen = FirstSeen::new();
    let mut buckets: Vec<Vec<f64>> = Vec::new();
    for (label, value) in labels.iter().zip(values) {
        let i = seen.insert(label);
        if i == buckets.len() {
            buckets.push(Vec::new());
        }
        if let Some(v) = value {
            buckets[i].push(*v);
        }
    }

    let groups = seen
        .into_vec()
        .into_iter()
        .zip(buckets)
        .map(|(label, values)| {
            let density = if violin {
                optional_curve(&values, &config.kde)?
            } else {
                None
            };
            Ok(Group {
                label,
                stats: BoxStats::from_values(&values),
                density,
                values,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartData::Grouped {
        groups,
        horizontal,
        violin,
    })
}

// ---------------------------------------------------------------------------
// categorical × categorical
// ---------------------------------------------------------------------------

fn from_crosstab(tab: CrossTab, chart: ChartKind) -> ChartData {
    let colors = ColorMap::new(&tab.y_levels);

    match chart {
        ChartKind::Heatmap => ChartData::CountHeatmap {
            x: tab.y_levels,
            y: tab.x_levels,
            z: tab.counts,
        },
        ChartKind::Mosaic => {
            let widths = tab.row_proportions();
            let series = tab
                .y_levels
                .iter()
                .enumerate()
                .map(|(j, name)| MosaicSeries {
                    name: name.clone(),
                    counts: tab.counts.iter().map(|row| row[j]).collect(),
                    percents: (0..tab.x_levels.len())
                        .filter_map(|i| tab.share(i, j))
                        .collect(),
                    color: colors.color_for(name).to_string(),
                })
                .collect();
            ChartData::Mosaic {
                categories: tab.x_levels,
                widths,
                series,
            }
        }
        _ => {
            let series = tab
                .y_levels
                .iter()
                .enumerate()
                .map(|(j, name)| CountSeries {
                    name: name.clone(),
                    counts: tab.counts.iter().map(|row| row[j]).collect(),
                    color: colors.color_for(name).to_string(),
                })
                .collect();
            ChartData::CountBars {
                categories: tab.x_levels,
                series,
                stacked: chart == ChartKind::StackedBar,
            }
        }
    }
}
