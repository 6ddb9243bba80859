use crate::{Error, Result, TagId};

/// Session-scoped cache of the last known authority counter value.
///
/// The counter is initialized to zero at session start, refreshed from the
/// authority before any allocation and after any successful submission, and
/// advanced by the allocator when a reservation commits. It is threaded
/// explicitly through calls rather than living in ambient state.
///
/// Invariant: the cached value never moves backwards. [`Self::advance_to`]
/// ignores lower values, so a stale authority read cannot shrink the local
/// view of the sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u64,
}

impl SequenceCounter {
    /// Creates a counter starting at zero.
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Creates a counter seeded from a previously fetched value.
    pub const fn from_value(value: u64) -> Self {
        Self { value }
    }

    /// Returns the last known counter value.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Advances the counter to `value`. Lower values are ignored.
    pub fn advance_to(&mut self, value: u64) {
        if value > self.value {
            self.value = value;
        }
    }
}

/// A reserved, contiguous identifier range.
///
/// The range covers the sequence positions `start + 1 ..= end`: `start` is
/// the counter value the reservation began from, `end` the counter value
/// after it. A reservation of `n` identifiers therefore satisfies
/// `end - start == n`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdRange {
    start: u64,
    end: u64,
}

impl IdRange {
    /// Creates a range from the counter values before and after reservation.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Counter value the reservation began from (exclusive).
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Counter value after the reservation (inclusive).
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Number of identifiers in the range.
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns `true` when the range reserves nothing.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterates the reserved identifiers in sequence order.
    pub fn ids(&self) -> impl Iterator<Item = TagId> + use<> {
        (self.start + 1..=self.end).map(TagId::from_raw)
    }
}

/// A source of reserved identifier ranges.
///
/// This is the single capability the allocator consumes. Two variants exist:
/// a purely local continuation of the last fetched counter value
/// ([`LocalCounterSource`]), and a remote source that asks the authority for
/// an atomic reservation (implemented alongside the authority client, where
/// the transport lives). The allocator is written once against this trait
/// and never distinguishes the two.
pub trait CounterSource {
    /// Reserves `n` consecutive identifiers and returns the range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when a remote reservation fails at the
    /// transport level and no degraded path applies, and
    /// [`Error::Selection`] when `n` is zero or the reservation would
    /// overflow the sequence.
    fn reserve(&mut self, n: u64) -> Result<IdRange>;

    /// Returns the last counter value this source has observed.
    fn current(&self) -> u64;
}

/// A counter source backed only by session-local state.
///
/// Used when no authority is reachable or configured. Reservations are
/// infallible and monotonic within the session, but carry no cross-session
/// guarantee: two sessions seeded from the same fetched value will hand out
/// overlapping ranges. The allocator's within-batch collision guard is the
/// only uniqueness defense in this mode.
#[derive(Debug, Default, Clone)]
pub struct LocalCounterSource {
    counter: SequenceCounter,
}

impl LocalCounterSource {
    /// Creates a local source starting at zero.
    pub const fn new() -> Self {
        Self {
            counter: SequenceCounter::new(),
        }
    }

    /// Creates a local source seeded from the last fetched authority value.
    pub const fn seeded(value: u64) -> Self {
        Self {
            counter: SequenceCounter::from_value(value),
        }
    }
}

impl CounterSource for LocalCounterSource {
    fn reserve(&mut self, n: u64) -> Result<IdRange> {
        if n == 0 {
            return Err(Error::Selection {
                reason: "cannot reserve an empty range".into(),
            });
        }
        let start = self.counter.value();
        let end = start.checked_add(n).ok_or_else(|| Error::Selection {
            reason: "reservation would overflow the sequence".into(),
        })?;
        self.counter.advance_to(end);
        Ok(IdRange::new(start, end))
    }

    fn current(&self) -> u64 {
        self.counter.value()
    }
}
