use crate::{ColumnSpec, TagRecord};

/// Builds the tabular export for offline reconciliation with the authority.
///
/// Every record appears, regardless of its `selected` flag: the export is
/// the full allocation ledger, not the print set. Columns are
/// `Identifier,<value-column>` plus `Label` when a label column was part of
/// the run.
pub fn build_export(records: &[TagRecord], columns: &ColumnSpec) -> String {
    let with_label = columns.label_column.is_some();
    let mut out = String::new();

    out.push_str("Identifier,");
    out.push_str(&csv_field(&columns.value_column));
    if with_label {
        out.push_str(",Label");
    }
    out.push('\n');

    for record in records {
        out.push_str(&csv_field(&record.identifier));
        out.push(',');
        out.push_str(&csv_field(&record.value));
        if with_label {
            out.push(',');
            out.push_str(&csv_field(record.label.as_deref().unwrap_or_default()));
        }
        out.push('\n');
    }
    out
}

/// Quotes a field when it contains a separator, quote, or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
