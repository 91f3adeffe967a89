use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::Cell;
use crate::error::EdaError;

/// Pointwise remap applied to a numeric column before charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Transform {
    #[default]
    #[serde(rename = "x")]
    Identity,
    #[serde(rename = "x^2")]
    Square,
    #[serde(rename = "log10(x)")]
    Log10,
    #[serde(rename = "log10(x+1)")]
    Log10Plus1,
    #[serde(rename = "ln(x)")]
    Ln,
    #[serde(rename = "ln(x+1)")]
    LnPlus1,
}

impl Transform {
    pub const ALL: [Transform; 6] = [
        Transform::Identity,
        Transform::Square,
        Transform::Log10,
        Transform::Log10Plus1,
        Transform::Ln,
        Transform::LnPlus1,
    ];

    /// The textual tag, e.g. `log10(x+1)`.
    pub fn tag(self) -> &'static str {
        match self {
            Transform::Identity => "x",
            Transform::Square => "x^2",
            Transform::Log10 => "log10(x)",
            Transform::Log10Plus1 => "log10(x+1)",
            Transform::Ln => "ln(x)",
            Transform::LnPlus1 => "ln(x+1)",
        }
    }

    /// Apply to one value. Out-of-domain and non-finite results are `None`.
    pub fn apply(self, x: f64) -> Option<f64> {
        let y = match self {
            Transform::Identity => x,
            Transform::Square => x * x,
            Transform::Log10 if x > 0.0 => x.log10(),
            Transform::Log10Plus1 if x > -1.0 => (x + 1.0).log10(),
            Transform::Ln if x > 0.0 => x.ln(),
            Transform::LnPlus1 if x > -1.0 => (x + 1.0).ln(),
            _ => return None,
        };
        y.is_finite().then_some(y)
    }

    /// Parse and transform a single cell.
    pub fn apply_cell(self, cell: &Cell) -> Option<f64> {
        cell.as_f64().and_then(|x| self.apply(x))
    }

    /// Transform a column, keeping row positions.
    pub fn apply_column<'a, I>(self, cells: I) -> Vec<Option<f64>>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        cells.into_iter().map(|c| self.apply_cell(c)).collect()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Transform {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transform::ALL
            .into_iter()
            .find(|t| t.tag() == s.trim())
            .ok_or_else(|| EdaError::UnknownTransform(s.to_string()))
    }
}

/// Drop the missing entries of a transformed column.
pub fn valid_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        let cells: Vec<Cell> = (1..=5).map(|i| Cell::Number(i as f64)).collect();
        let out = valid_values(&Transform::Square.apply_column(&cells));
        assert_eq!(out, vec![1.0, 4.0, 9.0, 16.0, 25.0]);
    }

    #[test]
    fn test_log10_plus_one_is_exact() {
        assert_eq!(Transform::Log10Plus1.apply(9.0), Some(1.0));
    }

    #[test]
    fn test_log_domains() {
        assert_eq!(Transform::Log10.apply(0.0), None);
        assert_eq!(Transform::Ln.apply(-3.0), None);
        assert_eq!(Transform::LnPlus1.apply(-1.0), None);
        assert_eq!(Transform::LnPlus1.apply(0.0), Some(0.0));
        assert_eq!(Transform::Log10Plus1.apply(-0.5), Some(0.5f64.log10()));
    }

    #[test]
    fn test_unparseable_and_overflow_are_missing() {
        assert_eq!(Transform::Identity.apply_cell(&Cell::from("n/a")), None);
        assert_eq!(Transform::Square.apply(1e200), None);
    }

    #[test]
    fn test_positions_are_kept() {
        let cells = vec![Cell::from("4"), Cell::Null, Cell::from("0")];
        assert_eq!(
            Transform::Ln.apply_column(&cells),
            vec![Some(4f64.ln()), None, None]
        );
    }

    #[test]
    fn test_tag_round_trip() {
        for t in Transform::ALL {
            assert_eq!(t.tag().parse::<Transform>().unwrap(), t);
        }
        assert!("sqrt(x)".parse::<Transform>().is_err());
    }
}
