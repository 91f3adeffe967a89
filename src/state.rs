use crate::chart::bivariate::Axis;
use crate::chart::{
    ChartData, ChartKind, available_bivariate, available_univariate, bivariate,
    correlation_heatmap, univariate,
};
use crate::config::AnalysisConfig;
use crate::data::model::Dataset;
use crate::data::schema::{ColumnKind, ColumnSchema};
use crate::error::Result;
use crate::insights::ColumnOverview;
use crate::stats::correlation::CorrelationHeatmap;
use crate::stats::transform::Transform;

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UnivariateSelection {
    pub column: Option<String>,
    pub transform: Transform,
    pub chart: ChartKind,
}

impl Default for UnivariateSelection {
    fn default() -> Self {
        Self {
            column: None,
            transform: Transform::Identity,
            chart: ChartKind::Histogram,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BivariateSelection {
    pub x: Option<String>,
    pub y: Option<String>,
    pub x_transform: Transform,
    pub y_transform: Transform,
    pub chart: ChartKind,
}

impl Default for BivariateSelection {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            x_transform: Transform::Identity,
            y_transform: Transform::Identity,
            chart: ChartKind::Scatter,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

/// Everything a front end needs between interactions, independent of rendering.
///
/// Derived outputs are only refreshed by [`AnalysisState::recompute`], which
/// every setter calls.
#[derive(Debug, Default)]
pub struct AnalysisState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,
    pub schema: ColumnSchema,
    pub config: AnalysisConfig,

    pub univariate: UnivariateSelection,
    pub bivariate: BivariateSelection,

    /// Correlations with `|r|` below this are masked in the heatmap.
    pub correlation_threshold: Option<f64>,

    pub univariate_chart: Option<ChartData>,
    pub bivariate_chart: Option<ChartData>,
    pub correlation: Option<CorrelationHeatmap>,
    pub overview: Option<ColumnOverview>,

    /// Last error, shown to the user instead of a chart.
    pub status_message: Option<String>,
}

impl AnalysisState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and pick default selections.
    pub fn set_dataset(&mut self, dataset: Dataset, schema: ColumnSchema) {
        self.schema = schema.with_fallback(self.config.fallback_kind);

        self.univariate = UnivariateSelection::default();
        if let Some(first) = dataset.headers.first() {
            self.univariate.chart = available_univariate(self.schema.kind_of(first))[0];
            self.univariate.column = Some(first.clone());
        }

        self.bivariate = BivariateSelection::default();
        let mut numeric = dataset
            .headers
            .iter()
            .filter(|h| self.schema.kind_of(h) == ColumnKind::Numeric);
        self.bivariate.x = numeric.next().cloned();
        self.bivariate.y = numeric.next().cloned();

        log::info!(
            "dataset with {} rows and {} columns selected",
            dataset.len(),
            dataset.headers.len()
        );
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// Select the univariate column; the chart resets to the first one offered.
    pub fn set_univariate_column(&mut self, column: &str) {
        self.univariate.chart = available_univariate(self.schema.kind_of(column))[0];
        self.univariate.column = Some(column.to_string());
        self.recompute();
    }

    pub fn set_univariate_transform(&mut self, transform: Transform) {
        self.univariate.transform = transform;
        self.recompute();
    }

    pub fn set_univariate_chart(&mut self, chart: ChartKind) {
        self.univariate.chart = chart;
        self.recompute();
    }

    pub fn set_bivariate_x(&mut self, column: &str) {
        self.bivariate.x = Some(column.to_string());
        self.reset_bivariate_chart();
        self.recompute();
    }

    pub fn set_bivariate_y(&mut self, column: &str) {
        self.bivariate.y = Some(column.to_string());
        self.reset_bivariate_chart();
        self.recompute();
    }

    pub fn set_bivariate_transforms(&mut self, x: Transform, y: Transform) {
        self.bivariate.x_transform = x;
        self.bivariate.y_transform = y;
        self.recompute();
    }

    pub fn set_bivariate_chart(&mut self, chart: ChartKind) {
        self.bivariate.chart = chart;
        self.recompute();
    }

    pub fn set_correlation_threshold(&mut self, threshold: Option<f64>) {
        self.correlation_threshold = threshold;
        self.recompute();
    }

    fn reset_bivariate_chart(&mut self) {
        if let (Some(x), Some(y)) = (&self.bivariate.x, &self.bivariate.y) {
            self.bivariate.chart =
                available_bivariate(self.schema.kind_of(x), self.schema.kind_of(y))[0];
        }
    }

    /// Rebuild every derived output from the current selections.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let mut errors = Vec::new();

        let uni = &self.univariate;
        self.univariate_chart = uni.column.as_deref().and_then(|col| {
            keep(
                univariate(ds, &self.schema, col, uni.transform, uni.chart, &self.config),
                col,
                &mut errors,
            )
        });
        self.overview = uni.column.as_deref().and_then(|col| {
            keep(
                ColumnOverview::build(ds, &self.schema, col, uni.chart, uni.transform),
                col,
                &mut errors,
            )
        });

        let bi = &self.bivariate;
        self.bivariate_chart = match (bi.x.as_deref(), bi.y.as_deref()) {
            (Some(x), Some(y)) => keep(
                bivariate(
                    ds,
                    &self.schema,
                    Axis::new(x, bi.x_transform),
                    Axis::new(y, bi.y_transform),
                    bi.chart,
                    &self.config,
                ),
                &format!("{x} × {y}"),
                &mut errors,
            ),
            _ => None,
        };

        self.correlation = keep(
            correlation_heatmap(ds, &self.schema, self.correlation_threshold),
            "correlation",
            &mut errors,
        );

        log::debug!("recomputed analysis outputs ({} errors)", errors.len());
        self.status_message = if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        };
    }
}

fn keep<T>(result: Result<T>, what: &str, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{what}: {e}");
            errors.push(format!("{what}: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Cell;

    fn state() -> AnalysisState {
        let table = vec![
            vec![Cell::from("city"), Cell::from("temp"), Cell::from("rain"), Cell::from("wind")],
            vec![Cell::from("Oslo"), Cell::Number(4.0), Cell::Number(30.0), Cell::Number(2.0)],
            vec![Cell::from("Rome"), Cell::Number(18.0), Cell::Number(8.0), Cell::Number(5.0)],
            vec![Cell::from("Oslo"), Cell::Number(6.0), Cell::Number(25.0), Cell::Number(3.0)],
            vec![Cell::from("Lima"), Cell::Number(20.0), Cell::Number(1.0), Cell::Number(9.0)],
        ];
        let ds = Dataset::from_table(table).unwrap();
        let schema = ColumnSchema::infer(&ds);
        let mut state = AnalysisState::new(AnalysisConfig::default());
        state.set_dataset(ds, schema);
        state
    }

    #[test]
    fn test_defaults_after_load() {
        let state = state();
        assert_eq!(state.univariate.column.as_deref(), Some("city"));
        assert_eq!(state.univariate.chart, ChartKind::Pie);
        assert_eq!(state.bivariate.x.as_deref(), Some("temp"));
        assert_eq!(state.bivariate.y.as_deref(), Some("rain"));
        assert_eq!(state.bivariate.chart, ChartKind::Scatter);
        assert!(matches!(state.univariate_chart, Some(ChartData::Pie { .. })));
        assert!(matches!(state.bivariate_chart, Some(ChartData::Series { .. })));
        assert_eq!(state.correlation.as_ref().map(|h| h.columns.len()), Some(3));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_column_change_resets_chart() {
        let mut state = state();
        state.set_univariate_column("temp");
        assert_eq!(state.univariate.chart, ChartKind::Histogram);
        assert!(matches!(state.univariate_chart, Some(ChartData::Histogram { .. })));

        state.set_bivariate_x("city");
        assert_eq!(state.bivariate.chart, ChartKind::Box);
        assert!(matches!(state.bivariate_chart, Some(ChartData::Grouped { .. })));
    }

    #[test]
    fn test_invalid_chart_sets_status() {
        let mut state = state();
        state.set_univariate_chart(ChartKind::Mosaic);
        assert!(state.univariate_chart.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("city"));

        state.set_univariate_chart(ChartKind::Pie);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_threshold_masks_heatmap() {
        let mut state = state();
        state.set_correlation_threshold(Some(1.1));
        let heatmap = state.correlation.as_ref().unwrap();
        for i in 0..heatmap.columns.len() {
            for j in 0..heatmap.columns.len() {
                assert!(heatmap.z[i][j].is_none());
            }
        }
    }

    #[test]
    fn test_no_dataset_is_noop() {
        let mut state = AnalysisState::default();
        state.set_univariate_transform(Transform::Ln);
        assert!(state.univariate_chart.is_none());
        assert!(state.status_message.is_none());
    }
}
