use std::collections::HashMap;

use serde::Serialize;

use crate::error::{EdaError, Result};

/// Collects distinct labels in the order they are first seen.
#[derive(Debug, Clone, Default)]
pub struct FirstSeen {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl FirstSeen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label and return its position.
    pub fn insert(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.order.len();
        self.order.push(label.to_string());
        self.index.insert(label.to_string(), i);
        i
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Label → occurrence count, in first-seen order.
pub fn value_counts<'a, I>(labels: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = FirstSeen::new();
    let mut counts: Vec<u64> = Vec::new();
    for label in labels {
        let i = seen.insert(label);
        if i == counts.len() {
            counts.push(0);
        }
        counts[i] += 1;
    }
    seen.into_vec().into_iter().zip(counts).collect()
}

/// Frequency table over pairs of categorical values.
///
/// `counts[i][j]` is the number of rows with `x_levels[i]` and `y_levels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub x_levels: Vec<String>,
    pub y_levels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
    pub total: u64,
}

impl CrossTab {
    pub fn build<S: AsRef<str>>(x: &[S], y: &[S]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(EdaError::LengthMismatch {
                left: x.len(),
                right: y.len(),
            });
        }

        let mut xs = FirstSeen::new();
        let mut ys = FirstSeen::new();
        let cells: Vec<(usize, usize)> = x
            .iter()
            .zip(y)
            .map(|(a, b)| (xs.insert(a.as_ref()), ys.insert(b.as_ref())))
            .collect();

        let x_levels = xs.into_vec();
        let y_levels = ys.into_vec();
        let mut counts = vec![vec![0u64; y_levels.len()]; x_levels.len()];
        for &(i, j) in &cells {
            counts[i][j] += 1;
        }

        Ok(Self {
            x_levels,
            y_levels,
            counts,
            total: cells.len() as u64,
        })
    }

    pub fn count(&self, x: &str, y: &str) -> Option<u64> {
        let i = self.x_levels.iter().position(|l| l == x)?;
        let j = self.y_levels.iter().position(|l| l == y)?;
        Some(self.counts[i][j])
    }

    /// Count per x level.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Count per y level.
    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.y_levels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Share of all rows falling in each x level (mosaic bar widths).
    pub fn row_proportions(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.x_levels.len()];
        }
        self.row_totals()
            .into_iter()
            .map(|t| t as f64 / self.total as f64)
            .collect()
    }

    /// Percentage of all rows in cell `(i, j)`, `None` outside the table.
    pub fn share(&self, i: usize, j: usize) -> Option<f64> {
        let count = *self.counts.get(i)?.get(j)?;
        if self.total == 0 {
            return Some(0.0);
        }
        Some(count as f64 / self.total as f64 * 100.0)
    }
}
