use crate::TagRecord;

/// Holds the current batch as the session's working set.
///
/// The store owns the batch exclusively: a generate replaces it wholesale
/// via [`Self::replace`], a clear empties it, and the only in-place mutation
/// is flipping `selected` flags. Callers of [`Self::clear`] are expected to
/// also drop their own input references (source file, column choices) — the
/// store cannot reach those.
///
/// The session loops between two states: empty (no batch) and populated.
/// Selection toggles, re-renders, and re-submits keep it populated; only
/// `clear` returns it to empty.
#[derive(Clone, Debug)]
pub struct RecordStore {
    records: Vec<TagRecord>,
    select_all: bool,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates an empty store with the select-all flag raised.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            select_all: true,
        }
    }

    /// The current batch, in allocation order.
    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no batch is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current state of the batch-wide select-all flag.
    pub const fn select_all(&self) -> bool {
        self.select_all
    }

    /// Number of currently selected records.
    pub fn selected_count(&self) -> usize {
        self.records.iter().filter(|r| r.selected).count()
    }

    /// Replaces the batch wholesale and resets the select-all flag.
    pub fn replace(&mut self, batch: Vec<TagRecord>) {
        self.records = batch;
        self.select_all = true;
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        self.records.clear();
        self.select_all = true;
    }

    /// Toggles the `selected` flag of the record with the given session key.
    ///
    /// Returns `false` when no record matches.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.selected = !record.selected;
                true
            }
            None => false,
        }
    }

    /// Flips the select-all flag and fans the new value out to every record.
    ///
    /// This is a single logical flip, not a per-record inversion: a store
    /// with mixed selection collapses to a uniform state.
    pub fn toggle_select_all(&mut self) {
        self.select_all = !self.select_all;
        for record in &mut self.records {
            record.selected = self.select_all;
        }
    }
}
