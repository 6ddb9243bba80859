//! One allocation session: rows in, artifacts and a submission out.
//!
//! A session loops between empty and populated. A successful generate
//! replaces the working set wholesale; selection toggles, re-renders, and
//! re-exports are non-destructive; clear returns to empty and drops the
//! column choices along with the batch.

use crate::client::{AuthorityTransport, RemoteCounterSource};
use seqtag::{
    Code128ScriptRenderer, ColumnSpec, CounterSource, Error, PrintOptions, RecordStore, Result,
    RowSet, allocate, build_export, build_print_artifact,
};

/// Session state: the counter source, the working set, and the column
/// choices of the last generate.
pub struct Session<C: CounterSource> {
    source: C,
    store: RecordStore,
    columns: Option<ColumnSpec>,
    print_options: PrintOptions,
    renderer: Code128ScriptRenderer,
}

impl<C: CounterSource> Session<C> {
    /// Creates an empty session over a counter source.
    pub fn new(source: C, print_options: PrintOptions) -> Self {
        Self {
            source,
            store: RecordStore::new(),
            columns: None,
            print_options,
            renderer: Code128ScriptRenderer,
        }
    }

    /// Allocates a batch for `rows` and replaces the working set.
    ///
    /// Returns the batch size. On any error the existing working set and
    /// column choices are left untouched.
    pub fn generate(&mut self, rows: &RowSet, columns: ColumnSpec) -> Result<usize> {
        columns.validate_against(rows.columns())?;
        let batch = allocate(rows.rows(), &columns, &mut self.source)?;
        let size = batch.len();
        self.store.replace(batch);
        self.columns = Some(columns);
        Ok(size)
    }

    /// The session's working set.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Mutable access for selection toggling.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// Last counter value the source has observed.
    pub fn counter(&self) -> u64 {
        self.source.current()
    }

    /// Builds the printable document from the working set.
    pub fn print_document(&self) -> Result<String> {
        build_print_artifact(self.store.records(), &self.print_options, &self.renderer)
    }

    /// Builds the reconciliation export from the working set.
    ///
    /// Covers every record regardless of selection. Fails when no generate
    /// has populated the session yet.
    pub fn export_document(&self) -> Result<String> {
        let columns = self.columns.as_ref().ok_or_else(|| Error::Selection {
            reason: "nothing to export: no batch has been generated".into(),
        })?;
        Ok(build_export(self.store.records(), columns))
    }

    /// Empties the working set and forgets the column choices.
    pub fn clear(&mut self) {
        self.store.clear();
        self.columns = None;
    }
}

impl<T: AuthorityTransport> Session<RemoteCounterSource<T>> {
    /// Submits the working set to the authority.
    ///
    /// On success the source resynchronizes its counter. On failure the
    /// batch stays allocated locally; nothing is rolled back.
    pub fn submit(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Err(Error::Selection {
                reason: "nothing to submit: no batch has been generated".into(),
            });
        }
        self.source.submit(self.store.records())
    }
}
