//! Batch identifier allocation.
//!
//! [`allocate`] turns an ordered slice of raw rows into a batch of
//! [`TagRecord`]s, each carrying a unique fixed-width identifier reserved
//! from a [`CounterSource`]. The whole batch is costed up front: rows whose
//! primary value is empty are dropped before the reservation is made, so
//! they never consume a sequence position.
//!
//! Order matters. Identifiers are assigned in source row order, which is
//! what determines which physical row receives which number.

use crate::{ColumnSpec, CounterSource, Error, Result, Row, TagRecord};
use std::collections::HashSet;

/// Allocates identifiers for a batch of rows.
///
/// Rows are processed in their original order. For each row with a non-empty
/// value in `columns.value_column`, one identifier from a single up-front
/// reservation is assigned; empty rows are dropped from the output entirely.
///
/// The caller owns persistence: on success the source's counter has already
/// advanced past the reservation, and the returned batch should replace the
/// session's working set. On error, nothing must be replaced.
///
/// # Errors
///
/// - [`Error::NoRowsSelected`] when the value column yields zero non-empty
///   rows (no reservation is made in that case).
/// - Any error the counter source raises while reserving.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(rows, source), fields(rows = rows.len()))
)]
pub fn allocate<C: CounterSource>(
    rows: &[Row],
    columns: &ColumnSpec,
    source: &mut C,
) -> Result<Vec<TagRecord>> {
    let extracted: Vec<(usize, &str, Option<&str>)> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let value = row.get(&columns.value_column).unwrap_or_default();
            if value.is_empty() {
                return None;
            }
            let label = columns
                .label_column
                .as_deref()
                .and_then(|column| row.get(column));
            Some((index, value, label))
        })
        .collect();

    if extracted.is_empty() {
        return Err(Error::NoRowsSelected {
            column: columns.value_column.clone(),
        });
    }

    let range = source.reserve(extracted.len() as u64)?;
    debug_assert_eq!(range.len(), extracted.len() as u64);

    let mut used = HashSet::with_capacity(extracted.len());
    let records = extracted
        .into_iter()
        .zip(range.ids())
        .map(|((index, value, label), id)| {
            let identifier = claim_identifier(id.encode(), &mut used);
            TagRecord {
                id: format!("{index}-{value}"),
                value: value.to_string(),
                label: label.map(str::to_string),
                identifier,
                selected: true,
            }
        })
        .collect();

    Ok(records)
}

/// Returns a batch-unique identifier, rewriting the candidate if needed.
///
/// Reserved ranges make collisions impossible in the remote path; this guard
/// exists for the degraded local path, where nothing stops a wrapped or
/// re-seeded counter from producing a duplicate within one batch. On
/// collision the candidate's trailing digits are overwritten with an
/// incrementing suffix until the result is unused.
fn claim_identifier(candidate: String, used: &mut HashSet<String>) -> String {
    let mut identifier = candidate;
    let mut suffix = 1u64;
    while used.contains(&identifier) {
        let tail = suffix.to_string();
        if tail.len() >= identifier.len() {
            identifier = tail;
        } else {
            let split = identifier.len() - tail.len();
            identifier.replace_range(split.., &tail);
        }
        suffix += 1;
    }
    used.insert(identifier.clone());
    identifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalCounterSource;

    fn spec(value: &str, label: Option<&str>) -> ColumnSpec {
        ColumnSpec::new(value, label.map(str::to_string))
    }

    fn fsn_rows(values: &[&str]) -> Vec<Row> {
        values
            .iter()
            .map(|v| Row::from_pairs([("fsn", *v)]))
            .collect()
    }

    #[test]
    fn allocates_in_source_order_skipping_empty_rows() {
        let rows = fsn_rows(&["A1", "", "B2"]);
        let mut source = LocalCounterSource::seeded(5);

        let batch = allocate(&rows, &spec("fsn", None), &mut source).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].value, "A1");
        assert_eq!(batch[0].identifier, "000006");
        assert_eq!(batch[1].value, "B2");
        assert_eq!(batch[1].identifier, "000007");
        assert_eq!(source.current(), 7);
    }

    #[test]
    fn identifiers_are_exactly_the_reserved_range() {
        let rows = fsn_rows(&["a", "b", "", "c", "d"]);
        let mut source = LocalCounterSource::seeded(41);

        let batch = allocate(&rows, &spec("fsn", None), &mut source).unwrap();

        let ids: Vec<&str> = batch.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["000042", "000043", "000044", "000045"]);
    }

    #[test]
    fn empty_rows_consume_no_counter_value() {
        let rows = fsn_rows(&["", "only", ""]);
        let mut source = LocalCounterSource::seeded(9);

        let batch = allocate(&rows, &spec("fsn", None), &mut source).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].identifier, "000010");
        assert_eq!(source.current(), 10);
    }

    #[test]
    fn no_nonempty_rows_fails_without_reserving() {
        let rows = fsn_rows(&["", ""]);
        let mut source = LocalCounterSource::seeded(3);

        let err = allocate(&rows, &spec("fsn", None), &mut source).unwrap_err();

        assert_eq!(
            err,
            Error::NoRowsSelected {
                column: "fsn".into()
            }
        );
        assert_eq!(source.current(), 3);
    }

    #[test]
    fn labels_come_from_the_label_column() {
        let rows = vec![
            Row::from_pairs([("fsn", "A1"), ("cid", "shelf-9")]),
            Row::from_pairs([("fsn", "B2"), ("cid", "")]),
        ];
        let mut source = LocalCounterSource::new();

        let batch = allocate(&rows, &spec("fsn", Some("cid")), &mut source).unwrap();

        assert_eq!(batch[0].label.as_deref(), Some("shelf-9"));
        assert_eq!(batch[1].label.as_deref(), Some(""));
        assert_eq!(batch[1].label_text(), None);
    }

    #[test]
    fn record_keys_carry_row_index_and_value() {
        let rows = fsn_rows(&["A1", "", "B2"]);
        let mut source = LocalCounterSource::new();

        let batch = allocate(&rows, &spec("fsn", None), &mut source).unwrap();

        assert_eq!(batch[0].id, "0-A1");
        assert_eq!(batch[1].id, "2-B2");
    }

    #[test]
    fn widens_past_the_padding_width() {
        let rows = fsn_rows(&["x"]);
        let mut source = LocalCounterSource::seeded(999_999);

        let batch = allocate(&rows, &spec("fsn", None), &mut source).unwrap();
        assert_eq!(batch[0].identifier, "1000000");
    }

    #[test]
    fn near_exhausted_counter_fails_cleanly() {
        let rows = fsn_rows(&["A1", "B2"]);
        let mut source = LocalCounterSource::seeded(u64::MAX - 1);

        // Room for one identifier, not two: the reservation must fail
        // without wrapping or truncating the batch.
        let err = allocate(&rows, &spec("fsn", None), &mut source).unwrap_err();
        assert!(matches!(err, Error::Selection { .. }));
        assert_eq!(source.current(), u64::MAX - 1);
    }

    #[test]
    fn claim_identifier_rewrites_trailing_digits() {
        let mut used = HashSet::new();
        assert_eq!(claim_identifier("000006".into(), &mut used), "000006");
        assert_eq!(claim_identifier("000006".into(), &mut used), "000001");
        assert_eq!(claim_identifier("000006".into(), &mut used), "000002");
        assert_eq!(claim_identifier("000001".into(), &mut used), "000003");
    }

    #[test]
    fn claim_identifier_survives_dense_collisions() {
        let mut used: HashSet<String> =
            (0..=9).map(|d| format!("00000{d}")).collect();
        let id = claim_identifier("000000".into(), &mut used);
        assert_eq!(id, "000010");
        assert!(used.contains("000010"));
    }
}
