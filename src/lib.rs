//! Statistical core of an exploratory data analysis tool.
//!
//! A [`Dataset`] plus a [`ColumnSchema`] goes in; serialisable chart
//! payloads, correlation matrices, density grids, cross-tabulations and
//! column profiles come out. Rendering is left to the caller.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod insights;
pub mod state;
pub mod stats;

pub use chart::{ChartData, ChartKind, bivariate, univariate};
pub use config::{AnalysisConfig, DegeneratePolicy, KdeConfig};
pub use data::loader::{LoadedDataset, load_file};
pub use data::model::{Cell, Dataset};
pub use data::schema::{ColumnKind, ColumnSchema};
pub use error::{EdaError, Result};
pub use state::AnalysisState;
pub use stats::transform::Transform;
