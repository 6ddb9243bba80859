//! Authority state: the counter of record and the submission ledger.
//!
//! All mutations happen behind one lock, which is what makes concurrent
//! range reservations disjoint: two clients reserving at the same time
//! serialize here and leave with non-overlapping ranges.

use parking_lot::Mutex;
use seqtag_wire::{Error, Result, SubmitEntry};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Persisted shape of the authority state.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
struct Ledger {
    counter: u64,
    records: Vec<SubmitEntry>,
}

/// Shared, lock-protected authority state with optional JSON persistence.
#[derive(Clone)]
pub struct AuthorityState {
    inner: Arc<Mutex<Ledger>>,
    state_file: Option<PathBuf>,
}

impl AuthorityState {
    /// Creates in-memory state starting at `initial_counter`.
    pub fn new(initial_counter: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ledger {
                counter: initial_counter,
                records: Vec::new(),
            })),
            state_file: None,
        }
    }

    /// Loads state from `state_file` when it exists, otherwise starts fresh
    /// at `initial_counter`. A persisted counter always wins over the
    /// configured initial value.
    pub fn load_or_new(
        state_file: Option<PathBuf>,
        initial_counter: u64,
    ) -> anyhow::Result<Self> {
        let ledger = match &state_file {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
            _ => Ledger {
                counter: initial_counter,
                records: Vec::new(),
            },
        };
        Ok(Self {
            inner: Arc::new(Mutex::new(ledger)),
            state_file,
        })
    }

    /// Returns the current counter value.
    pub fn counter(&self) -> u64 {
        self.inner.lock().counter
    }

    /// Number of records in the ledger.
    pub fn record_count(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Atomically reserves `count` identifiers.
    ///
    /// Returns the counter values before and after the reservation; the
    /// reserved identifiers are `start + 1 ..= end`.
    pub fn reserve(&self, count: u64) -> Result<(u64, u64)> {
        let mut inner = self.inner.lock();
        let start = inner.counter;
        let end = start.checked_add(count).ok_or(Error::InvalidRequest {
            reason: "reservation would overflow the sequence".into(),
        })?;
        inner.counter = end;
        self.persist(&inner)?;
        Ok((start, end))
    }

    /// Appends a submitted batch to the ledger.
    ///
    /// Rejects any identifier already recorded, and duplicates within the
    /// submission itself. On success the counter advances to the highest
    /// submitted identifier (it never moves backwards), covering clients
    /// that allocated locally without a reservation.
    pub fn submit(&self, entries: Vec<SubmitEntry>) -> Result<()> {
        let mut inner = self.inner.lock();

        let mut seen: HashSet<u64> = inner.records.iter().map(|r| r.uid).collect();
        for entry in &entries {
            if !seen.insert(entry.uid) {
                return Err(Error::DuplicateIdentifier { uid: entry.uid });
            }
        }

        let high_water = entries.iter().map(|e| e.uid).max().unwrap_or(0);
        inner.records.extend(entries);
        if high_water > inner.counter {
            inner.counter = high_water;
        }
        self.persist(&inner)?;
        Ok(())
    }

    fn persist(&self, ledger: &Ledger) -> Result<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(ledger).map_err(|e| Error::Persistence {
            context: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| Error::Persistence {
            context: format!("{}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uid: u64) -> SubmitEntry {
        SubmitEntry {
            fsn: format!("FSN-{uid}"),
            uid,
            cid: String::new(),
        }
    }

    #[test]
    fn reservations_are_disjoint() {
        let state = AuthorityState::new(5);
        let (a_start, a_end) = state.reserve(3).unwrap();
        let (b_start, b_end) = state.reserve(2).unwrap();
        assert_eq!((a_start, a_end), (5, 8));
        assert_eq!((b_start, b_end), (8, 10));
        assert_eq!(state.counter(), 10);
    }

    #[test]
    fn submit_rejects_duplicates_against_the_ledger() {
        let state = AuthorityState::new(0);
        state.submit(vec![entry(1), entry(2)]).unwrap();

        let err = state.submit(vec![entry(3), entry(2)]).unwrap_err();
        assert_eq!(err, Error::DuplicateIdentifier { uid: 2 });
        // Rejected batch must not partially apply.
        assert_eq!(state.record_count(), 2);
    }

    #[test]
    fn submit_rejects_duplicates_within_the_batch() {
        let state = AuthorityState::new(0);
        let err = state.submit(vec![entry(7), entry(7)]).unwrap_err();
        assert_eq!(err, Error::DuplicateIdentifier { uid: 7 });
        assert_eq!(state.record_count(), 0);
    }

    #[test]
    fn submit_advances_the_counter_to_the_high_water_mark() {
        let state = AuthorityState::new(3);
        state.submit(vec![entry(6), entry(7)]).unwrap();
        assert_eq!(state.counter(), 7);

        // Lower submissions never move it backwards.
        state.submit(vec![entry(4)]).unwrap();
        assert_eq!(state.counter(), 7);
    }

    #[test]
    fn state_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authority.json");

        let state = AuthorityState::load_or_new(Some(path.clone()), 0).unwrap();
        state.reserve(5).unwrap();
        state.submit(vec![entry(3)]).unwrap();

        let reloaded = AuthorityState::load_or_new(Some(path), 0).unwrap();
        assert_eq!(reloaded.counter(), 5);
        assert_eq!(reloaded.record_count(), 1);
    }

    #[test]
    fn persisted_counter_wins_over_initial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authority.json");

        let state = AuthorityState::load_or_new(Some(path.clone()), 100).unwrap();
        state.reserve(1).unwrap();

        let reloaded = AuthorityState::load_or_new(Some(path), 0).unwrap();
        assert_eq!(reloaded.counter(), 101);
    }
}
