use std::fmt;

use serde::Serialize;

use crate::chart::ChartKind;
use crate::data::model::Dataset;
use crate::data::schema::{ColumnKind, ColumnSchema};
use crate::error::Result;
use crate::stats::transform::Transform;

const PREVIEW_LEN: usize = 5;

/// Plain-text summary of the column behind the current chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOverview {
    pub column: String,
    pub kind: ColumnKind,
    pub chart: ChartKind,
    pub transform: Transform,
    pub length: usize,
    pub first_values: Vec<String>,
}

impl ColumnOverview {
    pub fn build(
        dataset: &Dataset,
        schema: &ColumnSchema,
        column: &str,
        chart: ChartKind,
        transform: Transform,
    ) -> Result<Self> {
        let cells = dataset.column(column)?;
        Ok(Self {
            column: column.to_string(),
            kind: schema.kind_of(column),
            chart,
            transform,
            length: cells.len(),
            first_values: cells.iter().take(PREVIEW_LEN).map(|c| c.label()).collect(),
        })
    }
}

impl fmt::Display for ColumnOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Overview:")?;
        writeln!(f, "- Selected Column: {}", self.column)?;
        writeln!(f, "- Data Type: {}", self.kind)?;
        writeln!(f, "- Chart Type: {}", self.chart)?;
        writeln!(f, "- Transformation: {}", self.transform)?;
        writeln!(f, "- Data Length: {}", self.length)?;
        write!(f, "- First {PREVIEW_LEN} Values: [{}]", self.first_values.join(", "))
    }
}
