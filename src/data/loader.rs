use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Cell, Dataset};
use super::schema::ColumnSchema;

/// A dataset together with its column classification.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub schema: ColumnSchema,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, comma or semicolon separated; schema is inferred
/// * `.json` – `{ "headers": [...], "data": [[...], ...],
///              "numeric_columns": [...], "categorical_columns": [...] }`
pub fn load_file(path: &Path) -> Result<LoadedDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        loaded.dataset.len(),
        loaded.dataset.headers,
        path.display()
    );
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a headed CSV table. The delimiter is `;` when the header line has
/// semicolons and no commas, `,` otherwise.
pub fn load_csv<R: Read>(mut source: R) -> Result<LoadedDataset> {
    let mut text = String::new();
    source.read_to_string(&mut text).context("reading CSV")?;

    let first_line = text.lines().next().unwrap_or("");
    let delimiter = if first_line.contains(';') && !first_line.contains(',') {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    let dataset = Dataset::new(headers, rows).context("aligning CSV rows")?;
    let schema = ColumnSchema::infer(&dataset);
    Ok(LoadedDataset { dataset, schema })
}

/// Numeric-looking text stays text so labels such as "007" survive;
/// [`Cell::as_f64`] parses it at the point of use.
fn guess_cell_type(s: &str) -> Cell {
    let trimmed = s.trim();
    match trimmed {
        "" => Cell::Null,
        "true" => Cell::Bool(true),
        "false" => Cell::Bool(false),
        _ => Cell::Text(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonTable {
    headers: Vec<String>,
    data: Vec<Vec<JsonValue>>,
    numeric_columns: Option<Vec<String>>,
    categorical_columns: Option<Vec<String>>,
}

/// Parse the records-with-metadata payload. When the column lists are
/// absent the schema is inferred.
pub fn load_json(text: &str) -> Result<LoadedDataset> {
    let table: JsonTable = serde_json::from_str(text).context("parsing JSON")?;

    let rows = table
        .data
        .iter()
        .map(|row| row.iter().map(json_to_cell).collect())
        .collect();
    let dataset = Dataset::new(table.headers, rows).context("aligning JSON rows")?;

    let schema = match (table.numeric_columns, table.categorical_columns) {
        (None, None) => ColumnSchema::infer(&dataset),
        (numeric, categorical) => {
            ColumnSchema::new(numeric.unwrap_or_default(), categorical.unwrap_or_default())
        }
    };
    Ok(LoadedDataset { dataset, schema })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(n.to_string())),
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_comma() {
        let text = "age,city\n31,Oslo\n,Rome\n45,Oslo\n";
        let loaded = load_csv(text.as_bytes()).unwrap();
        assert_eq!(loaded.dataset.headers, vec!["age", "city"]);
        assert_eq!(loaded.dataset.len(), 3);
        assert_eq!(loaded.dataset.rows[1][0], Cell::Null);
        assert_eq!(loaded.schema.numeric, vec!["age".to_string()]);
        assert_eq!(loaded.schema.categorical, vec!["city".to_string()]);
    }

    #[test]
    fn test_load_csv_semicolon_and_short_rows() {
        let text = "a;b;c\n1;x;2\n3;y\n";
        let loaded = load_csv(text.as_bytes()).unwrap();
        assert_eq!(loaded.dataset.rows[1].len(), 3);
        assert_eq!(loaded.schema.numeric, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_numeric_looking_codes_keep_their_text() {
        let text = "code,qty\n007,1e3\n12,5\n";
        let loaded = load_csv(text.as_bytes()).unwrap();
        let ds = &loaded.dataset;
        assert_eq!(ds.labels("code").unwrap(), vec!["007", "12"]);
        assert_eq!(ds.labels("qty").unwrap(), vec!["1e3", "5"]);
        assert_eq!(ds.rows[0][1].as_f64(), Some(1000.0));
        assert_eq!(loaded.schema.numeric, vec!["code".to_string(), "qty".to_string()]);
    }

    #[test]
    fn test_load_csv_rejects_long_rows() {
        let text = "a,b\n1,2,3\n";
        assert!(load_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn test_load_json_with_schema() {
        let text = r#"{
            "headers": ["price", "region"],
            "data": [[1.5, "north"], [null, "south"]],
            "numeric_columns": ["price"],
            "categorical_columns": ["region"]
        }"#;
        let loaded = load_json(text).unwrap();
        assert_eq!(loaded.dataset.rows[1][0], Cell::Null);
        assert_eq!(loaded.schema.numeric, vec!["price".to_string()]);
    }

    #[test]
    fn test_load_json_infers_missing_schema() {
        let text = r#"{"headers": ["n", "s"], "data": [[1, "a"], [2, "b"]]}"#;
        let loaded = load_json(text).unwrap();
        assert_eq!(loaded.schema.numeric, vec!["n".to_string()]);
        assert_eq!(loaded.schema.categorical, vec!["s".to_string()]);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(load_file(Path::new("data.xlsx")).is_err());
    }
}
