use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::Dataset;

/// The two column kinds charts distinguish between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Numeric / categorical classification of header names.
///
/// Names in neither list resolve to `fallback`, which defaults to
/// [`ColumnKind::Categorical`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    #[serde(default = "default_fallback")]
    pub fallback: ColumnKind,
}

fn default_fallback() -> ColumnKind {
    ColumnKind::Categorical
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            numeric: Vec::new(),
            categorical: Vec::new(),
            fallback: default_fallback(),
        }
    }
}

impl ColumnSchema {
    pub fn new(numeric: Vec<String>, categorical: Vec<String>) -> Self {
        Self {
            numeric,
            categorical,
            fallback: default_fallback(),
        }
    }

    pub fn with_fallback(mut self, fallback: ColumnKind) -> Self {
        self.fallback = fallback;
        self
    }

    /// Explicit classification, `None` for unclassified names.
    /// Membership in the numeric list takes precedence.
    pub fn classify(&self, name: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|n| n == name) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|n| n == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    /// Classification with the fallback applied.
    pub fn kind_of(&self, name: &str) -> ColumnKind {
        self.classify(name).unwrap_or(self.fallback)
    }

    /// Classify every column of a dataset from its contents.
    ///
    /// A column is numeric when it has at least one non-empty cell and every
    /// non-empty cell parses as a number (infinities included).
    pub fn infer(dataset: &Dataset) -> Self {
        let mut numeric = Vec::new();
        let mut categorical = Vec::new();

        for (idx, name) in dataset.headers.iter().enumerate() {
            let mut seen = 0usize;
            let all_numeric = dataset
                .column_at(idx)
                .filter(|cell| !cell.is_empty())
                .all(|cell| {
                    seen += 1;
                    cell.as_f64_lossy().is_some()
                });

            if all_numeric && seen > 0 {
                numeric.push(name.clone());
            } else {
                categorical.push(name.clone());
            }
        }

        log::debug!("inferred numeric columns {numeric:?}, categorical {categorical:?}");
        Self::new(numeric, categorical)
    }
}
