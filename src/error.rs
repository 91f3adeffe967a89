use thiserror::Error;

/// Errors raised by the analysis layer.
///
/// Missing or unparseable cells never end up here: they are skipped by the
/// computations. Only structurally invalid input is reported.
#[derive(Debug, Error)]
pub enum EdaError {
    #[error("dataset has no header row")]
    MissingHeader,

    #[error("row {row} has {len} cells but the header has {expected}")]
    RowTooLong {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("length mismatch: {left} values vs {right} values")]
    LengthMismatch { left: usize, right: usize },

    #[error("no valid samples in {0}")]
    EmptySample(String),

    #[error("zero bandwidth: {0} has a constant value")]
    ZeroBandwidth(String),

    #[error("unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("unknown chart type '{0}'")]
    UnknownChart(String),

    #[error("chart '{chart}' is not available for {detail}")]
    UnsupportedChart { chart: String, detail: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EdaError>;
