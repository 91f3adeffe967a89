use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};

/// Label shared by every missing cell: nulls, blank text and padding.
pub const MISSING_LABEL: &str = "<null>";

static PADDING: Cell = Cell::Null;

// ---------------------------------------------------------------------------
// Cell – a single value in the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it arrives from a spreadsheet or CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Null
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Number(v as f64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Null => f.write_str(MISSING_LABEL),
        }
    }
}

impl Cell {
    /// Parse the cell as a finite number. Anything else is missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(_) | Cell::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Like [`Cell::as_f64`] but keeps infinities.
    pub fn as_f64_lossy(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if !v.is_nan() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }

    /// Whether the cell holds nothing (null or blank text).
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Category label used for pie slices and cross-tab levels.
    pub fn label(&self) -> String {
        if self.is_empty() {
            MISSING_LABEL.to_string()
        } else {
            self.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – header row plus positionally aligned data rows
// ---------------------------------------------------------------------------

/// A loaded table. Rows built through [`Dataset::new`] have exactly
/// `headers.len()` cells; cells missing from a shorter row read as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset from headers and rows.
    ///
    /// Short rows are padded with null cells; rows longer than the header
    /// are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let width = headers.len();
        let mut aligned = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(EdaError::RowTooLong {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
            row.resize(width, Cell::Null);
            aligned.push(row);
        }
        Ok(Dataset {
            headers,
            rows: aligned,
        })
    }

    /// Build from a raw table whose first row is the header.
    pub fn from_table(mut table: Vec<Vec<Cell>>) -> Result<Self> {
        if table.is_empty() {
            return Err(EdaError::MissingHeader);
        }
        let rows = table.split_off(1);
        let headers = table
            .pop()
            .map(|h| h.iter().map(Cell::label).collect())
            .unwrap_or_default();
        Self::new(headers, rows)
    }

    /// Position of a column (first match wins on duplicate headers).
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Ok(self.column_at(idx).collect())
    }

    /// Cells at position `idx` of every row.
    pub fn column_at(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&PADDING))
    }

    /// Category labels of a column, in row order.
    pub fn labels(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.column(name)?.into_iter().map(Cell::label).collect())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|&c| Cell::from(c)).collect()
    }

    #[test]
    fn test_cell_parsing() {
        assert_eq!(Cell::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(Cell::from("abc").as_f64(), None);
        assert_eq!(Cell::from("").as_f64(), None);
        assert_eq!(Cell::from("inf").as_f64(), None);
        assert_eq!(Cell::from("inf").as_f64_lossy(), Some(f64::INFINITY));
        assert_eq!(Cell::Bool(true).as_f64(), None);
        assert_eq!(Cell::Number(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_cell_labels() {
        assert_eq!(Cell::Number(3.0).label(), "3");
        assert_eq!(Cell::Number(0.5).label(), "0.5");
        assert_eq!(Cell::from("north").label(), "north");
    }

    #[test]
    fn test_missing_cells_share_one_label() {
        let ds = Dataset::from_table(vec![
            row(&["k", "v"]),
            vec![Cell::from("a"), Cell::Null],
            vec![Cell::from("b"), Cell::from("  ")],
            row(&["c"]),
        ])
        .unwrap();
        assert_eq!(ds.labels("v").unwrap(), vec![MISSING_LABEL; 3]);
    }

    #[test]
    fn test_hand_built_short_rows_read_as_null() {
        let ds = Dataset {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec![Cell::Number(1.0)], vec![Cell::Number(2.0), Cell::from("x")]],
        };
        let b = ds.column("b").unwrap();
        assert_eq!(b, vec![&Cell::Null, &Cell::from("x")]);
        assert_eq!(ds.labels("b").unwrap(), vec![MISSING_LABEL, "x"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let ds = Dataset::from_table(vec![row(&["a", "b", "c"]), row(&["1"])]).unwrap();
        assert_eq!(ds.rows[0].len(), 3);
        assert!(ds.rows[0][2].is_empty());
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = Dataset::from_table(vec![row(&["a"]), row(&["1", "2"])]).unwrap_err();
        assert!(matches!(err, EdaError::RowTooLong { row: 0, len: 2, expected: 1 }));
    }

    #[test]
    fn test_empty_table_has_no_header() {
        assert!(matches!(
            Dataset::from_table(Vec::new()),
            Err(EdaError::MissingHeader)
        ));
    }

    #[test]
    fn test_unknown_column() {
        let ds = Dataset::from_table(vec![row(&["a"]), row(&["1"])]).unwrap();
        assert!(matches!(ds.column("zzz"), Err(EdaError::UnknownColumn(_))));
        assert_eq!(ds.column("a").unwrap().len(), 1);
    }
}
