use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use rusty_eda::chart::ChartData;
use rusty_eda::insights::ColumnOverview;
use rusty_eda::stats::correlation::CorrelationHeatmap;
use rusty_eda::stats::profile::DatasetProfile;
use rusty_eda::{AnalysisConfig, AnalysisState, ColumnSchema, load_file};

/// Everything printed for one input file.
#[derive(Serialize)]
struct Report<'a> {
    file: String,
    schema: &'a ColumnSchema,
    profile: DatasetProfile,
    correlation: Option<&'a CorrelationHeatmap>,
    overview: Option<String>,
    univariate: Option<&'a ChartData>,
    bivariate: Option<&'a ChartData>,
    status: Option<&'a str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: rusty-eda <data.csv|data.json> [config.json]");
    };
    let config = match args.next() {
        Some(cfg) => AnalysisConfig::from_path(cfg.as_ref())
            .with_context(|| format!("loading config {cfg}"))?,
        None => AnalysisConfig::default(),
    };

    let loaded = load_file(&path).with_context(|| format!("loading {}", path.display()))?;

    let mut state = AnalysisState::new(config);
    state.set_dataset(loaded.dataset, loaded.schema);
    let Some(dataset) = state.dataset.as_ref() else {
        bail!("no dataset after load");
    };

    let profile = DatasetProfile::build(dataset, &state.schema, state.config.outlier_sigma)?;
    let report = Report {
        file: path.display().to_string(),
        schema: &state.schema,
        profile,
        correlation: state.correlation.as_ref(),
        overview: state.overview.as_ref().map(ColumnOverview::to_string),
        univariate: state.univariate_chart.as_ref(),
        bivariate: state.bivariate_chart.as_ref(),
        status: state.status_message.as_deref(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
