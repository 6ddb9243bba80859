//! Row sources: turning a tabular file into ordered row mappings.
//!
//! A [`RowSet`] is the boundary contract with whatever produced the data: an
//! ordered sequence of rows (field name → value) plus the list of columns
//! observed in the first row. Two loaders are provided — JSON (an array of
//! objects, the shape spreadsheet-to-JSON converters emit) and a small CSV
//! reader covering the RFC 4180 quoting rules this pipeline encounters.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io::Read;

/// The column choices driving an allocation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSpec {
    /// Column holding the primary per-row value.
    pub value_column: String,
    /// Optional column holding the label printed above each symbol.
    pub label_column: Option<String>,
}

impl ColumnSpec {
    /// Creates a spec from a value column and an optional label column.
    pub fn new(value_column: impl Into<String>, label_column: Option<String>) -> Self {
        Self {
            value_column: value_column.into(),
            label_column: label_column.filter(|c| !c.is_empty()),
        }
    }

    /// Checks that every named column exists in `columns`.
    pub fn validate_against(&self, columns: &[String]) -> Result<()> {
        let missing = |column: &str| Error::Selection {
            reason: format!("column `{column}` is not present in the input"),
        };
        if !columns.iter().any(|c| c == &self.value_column) {
            return Err(missing(&self.value_column));
        }
        if let Some(label) = &self.label_column
            && !columns.iter().any(|c| c == label)
        {
            return Err(missing(label));
        }
        Ok(())
    }
}

/// One raw row: field name → value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value in `column`, or `None` when the cell is absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// An ordered sequence of rows plus the columns of the first row.
#[derive(Clone, Debug, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RowSet {
    /// Columns observed in the first row, in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parses a JSON array of objects, e.g. `[{"fsn": "A1", "cid": "X"}]`.
    ///
    /// Non-string scalar values are stringified; `null` becomes the empty
    /// string, matching how absent spreadsheet cells surface.
    ///
    /// # Errors
    ///
    /// [`Error::Input`] for malformed JSON or a non-array / non-object
    /// shape, [`Error::EmptyInput`] for an empty array.
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let objects: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_reader(reader).map_err(|e| Error::Input {
                reason: format!("invalid JSON rows: {e}"),
            })?;
        if objects.is_empty() {
            return Err(Error::EmptyInput);
        }

        let columns = objects[0].keys().cloned().collect();
        let rows = objects
            .into_iter()
            .map(|object| {
                Row::from_pairs(object.into_iter().map(|(k, v)| (k, stringify(v))))
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Parses CSV with a header row.
    ///
    /// Handles quoted fields, embedded separators, doubled quotes, and CRLF
    /// line endings. Rows shorter than the header leave the missing cells
    /// absent; extra cells are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Input`] for unreadable or malformed input (e.g. an
    /// unterminated quote), [`Error::EmptyInput`] when no data rows follow
    /// the header.
    pub fn from_csv_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| Error::Input {
            reason: format!("failed to read input: {e}"),
        })?;

        let mut lines = parse_csv(&text)?.into_iter();
        let columns = lines.next().ok_or(Error::EmptyInput)?;
        let rows: Vec<Row> = lines
            .map(|cells| {
                Row::from_pairs(columns.iter().cloned().zip(cells))
            })
            .collect();
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self { columns, rows })
    }
}

fn stringify(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Splits CSV text into records of fields.
///
/// Blank records (a lone trailing newline, stray empty lines) are skipped.
fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(core::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(core::mem::take(&mut field));
                if record.iter().any(|cell| !cell.is_empty()) {
                    records.push(core::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(Error::Input {
            reason: "unterminated quoted field".into(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        if record.iter().any(|cell| !cell.is_empty()) {
            records.push(record);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_parses_header_and_rows() {
        let input = "fsn,cid\nA1,X\nB2,Y\n";
        let rows = RowSet::from_csv_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.columns(), ["fsn", "cid"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[0].get("fsn"), Some("A1"));
        assert_eq!(rows.rows()[1].get("cid"), Some("Y"));
    }

    #[test]
    fn csv_handles_quoting() {
        let input = "fsn,cid\n\"a,b\",\"say \"\"hi\"\"\"\n";
        let rows = RowSet::from_csv_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.rows()[0].get("fsn"), Some("a,b"));
        assert_eq!(rows.rows()[0].get("cid"), Some("say \"hi\""));
    }

    #[test]
    fn csv_handles_crlf_and_short_rows() {
        let input = "fsn,cid\r\nA1\r\n";
        let rows = RowSet::from_csv_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.rows()[0].get("fsn"), Some("A1"));
        assert_eq!(rows.rows()[0].get("cid"), None);
    }

    #[test]
    fn csv_rejects_unterminated_quote() {
        let input = "fsn\n\"oops\n";
        assert!(matches!(
            RowSet::from_csv_reader(input.as_bytes()),
            Err(Error::Input { .. })
        ));
    }

    #[test]
    fn csv_header_only_is_empty_input() {
        assert_eq!(
            RowSet::from_csv_reader("fsn,cid\n".as_bytes()).unwrap_err(),
            Error::EmptyInput
        );
    }

    #[test]
    fn json_rows_preserve_column_order() {
        let input = r#"[{"fsn": "A1", "qty": 3, "cid": null}]"#;
        let rows = RowSet::from_json_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.columns(), ["fsn", "qty", "cid"]);
        assert_eq!(rows.rows()[0].get("qty"), Some("3"));
        assert_eq!(rows.rows()[0].get("cid"), Some(""));
    }

    #[test]
    fn json_empty_array_is_empty_input() {
        assert_eq!(
            RowSet::from_json_reader("[]".as_bytes()).unwrap_err(),
            Error::EmptyInput
        );
    }

    #[test]
    fn column_spec_validates_membership() {
        let columns = vec!["fsn".to_string(), "cid".to_string()];
        ColumnSpec::new("fsn", Some("cid".into()))
            .validate_against(&columns)
            .unwrap();
        assert!(matches!(
            ColumnSpec::new("missing", None).validate_against(&columns),
            Err(Error::Selection { .. })
        ));
    }
}
