//! Blocking HTTP client for the sequence authority.
//!
//! [`AuthorityClient`] speaks the wire contract from `seqtag-wire`;
//! [`RemoteCounterSource`] layers the session's counter cache on top of it
//! and implements the [`CounterSource`] capability the allocator consumes.
//! Transport failures degrade rather than abort: a session keeps working
//! against its cached counter when the authority drops away.

use reqwest::blocking::Client;
use seqtag::{CounterSource, Error, IdRange, Result, SequenceCounter, TagRecord};
use seqtag_wire::{
    ReserveRequest, ReserveResponse, SequenceResponse, SubmitRequest, SubmitResponse,
};
use std::time::Duration;

/// Per-request timeout. A hung authority must not hang the session.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SEQUENCE_PATH: &str = "/api/sequence";
const RESERVE_PATH: &str = "/api/sequence/reserve";
const RECORDS_PATH: &str = "/api/records";

/// Blocking JSON transport for the authority endpoints.
pub struct AuthorityClient {
    client: Client,
    base_url: String,
}

impl AuthorityClient {
    /// Creates a client targeting the authority's base URL (e.g.
    /// `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::Selection {
                reason: "authority URL must not be empty".into(),
            });
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network {
                context: format!("http client build failed: {e}"),
            })?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Reads the authority's current counter value.
    pub fn fetch_sequence(&self) -> Result<u64> {
        let body: SequenceResponse = self
            .client
            .get(self.url(SEQUENCE_PATH))
            .send()
            .map_err(|e| transport("sequence read", e))?
            .json()
            .map_err(|e| decode("sequence read", e))?;
        if !body.success {
            return Err(Error::AuthorityRejection {
                description: "sequence read answered success: false".into(),
            });
        }
        Ok(body.data)
    }

    /// Requests an atomic reservation of `count` identifiers.
    pub fn reserve(&self, count: u64) -> Result<IdRange> {
        let body: ReserveResponse = self
            .client
            .post(self.url(RESERVE_PATH))
            .json(&ReserveRequest { count })
            .send()
            .map_err(|e| transport("reservation", e))?
            .json()
            .map_err(|e| decode("reservation", e))?;
        if !body.success {
            return Err(Error::AuthorityRejection {
                description: body
                    .description
                    .unwrap_or_else(|| "reservation answered success: false".into()),
            });
        }
        Ok(IdRange::new(body.start, body.end))
    }

    /// Submits an allocated batch for persistence.
    ///
    /// A `success: false` answer surfaces as [`Error::AuthorityRejection`]
    /// with the authority's description; the caller's batch stays allocated
    /// locally either way.
    pub fn submit(&self, records: &[TagRecord]) -> Result<()> {
        let request = SubmitRequest::from_records(records).map_err(|e| Error::Selection {
            reason: e.to_string(),
        })?;
        let body: SubmitResponse = self
            .client
            .post(self.url(RECORDS_PATH))
            .json(&request)
            .send()
            .map_err(|e| transport("submission", e))?
            .json()
            .map_err(|e| decode("submission", e))?;
        if !body.success {
            return Err(Error::AuthorityRejection {
                description: body
                    .description
                    .unwrap_or_else(|| "submission answered success: false".into()),
            });
        }
        Ok(())
    }
}

fn transport(action: &str, e: reqwest::Error) -> Error {
    Error::Network {
        context: format!("{action} failed: {e}"),
    }
}

fn decode(action: &str, e: reqwest::Error) -> Error {
    Error::Network {
        context: format!("{action} decode failed: {e}"),
    }
}

/// The transport half of the authority protocol.
///
/// [`AuthorityClient`] is the production implementation; the seam lets the
/// counter source be driven without a live authority.
pub trait AuthorityTransport {
    /// Reads the authority's current counter value.
    fn fetch_sequence(&self) -> Result<u64>;
    /// Requests an atomic reservation of `count` identifiers.
    fn reserve(&self, count: u64) -> Result<IdRange>;
    /// Submits an allocated batch for persistence.
    fn submit(&self, records: &[TagRecord]) -> Result<()>;
}

impl AuthorityTransport for AuthorityClient {
    fn fetch_sequence(&self) -> Result<u64> {
        AuthorityClient::fetch_sequence(self)
    }

    fn reserve(&self, count: u64) -> Result<IdRange> {
        AuthorityClient::reserve(self, count)
    }

    fn submit(&self, records: &[TagRecord]) -> Result<()> {
        AuthorityClient::submit(self, records)
    }
}

/// Authority-backed counter source with local degradation.
///
/// Holds the session's [`SequenceCounter`] cache. Reservations go to the
/// authority; when the transport fails, the source continues locally from
/// the cached value — the session stays responsive, at the documented cost
/// of cross-session uniqueness until the next successful sync.
pub struct RemoteCounterSource<T = AuthorityClient> {
    client: T,
    counter: SequenceCounter,
}

impl<T: AuthorityTransport> RemoteCounterSource<T> {
    /// Wraps an authority transport with a zeroed counter cache.
    pub fn new(client: T) -> Self {
        Self {
            client,
            counter: SequenceCounter::new(),
        }
    }

    /// Refreshes the cached counter from the authority.
    ///
    /// On transport failure the cached value is returned unchanged and the
    /// failure is logged — recoverable by design, the caller proceeds.
    pub fn refresh(&mut self) -> u64 {
        match self.client.fetch_sequence() {
            Ok(value) => {
                self.counter.advance_to(value);
                value
            }
            Err(e) => {
                tracing::warn!("counter refresh failed, keeping cached value: {e}");
                self.counter.value()
            }
        }
    }

    /// Submits the batch and, on success, resynchronizes the counter — the
    /// authority is the source of truth after a commit.
    ///
    /// On failure the batch is not rolled back anywhere and no retry is
    /// attempted; the error is the caller's to surface.
    pub fn submit(&mut self, records: &[TagRecord]) -> Result<()> {
        self.client.submit(records)?;
        self.refresh();
        Ok(())
    }
}

impl<T: AuthorityTransport> CounterSource for RemoteCounterSource<T> {
    fn reserve(&mut self, n: u64) -> Result<IdRange> {
        if n == 0 {
            return Err(Error::Selection {
                reason: "cannot reserve an empty range".into(),
            });
        }
        match self.client.reserve(n) {
            Ok(range) => {
                self.counter.advance_to(range.end());
                Ok(range)
            }
            Err(Error::Network { context }) => {
                // Degraded mode: continue from the cache. The allocator's
                // collision guard is the remaining uniqueness defense.
                tracing::warn!("authority unreachable, continuing locally: {context}");
                let start = self.counter.value();
                let end = start.checked_add(n).ok_or_else(|| Error::Selection {
                    reason: "reservation would overflow the sequence".into(),
                })?;
                self.counter.advance_to(end);
                Ok(IdRange::new(start, end))
            }
            Err(e) => Err(e),
        }
    }

    fn current(&self) -> u64 {
        self.counter.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StubAuthority {
        sequence: u64,
        reachable: Cell<bool>,
        rejection: Option<&'static str>,
    }

    fn stub(sequence: u64, rejection: Option<&'static str>) -> StubAuthority {
        StubAuthority {
            sequence,
            reachable: Cell::new(true),
            rejection,
        }
    }

    impl AuthorityTransport for StubAuthority {
        fn fetch_sequence(&self) -> Result<u64> {
            if !self.reachable.get() {
                return Err(Error::Network {
                    context: "connection refused".into(),
                });
            }
            Ok(self.sequence)
        }

        fn reserve(&self, count: u64) -> Result<IdRange> {
            if !self.reachable.get() {
                return Err(Error::Network {
                    context: "connection refused".into(),
                });
            }
            Ok(IdRange::new(self.sequence, self.sequence + count))
        }

        fn submit(&self, _: &[TagRecord]) -> Result<()> {
            if let Some(description) = self.rejection {
                return Err(Error::AuthorityRejection {
                    description: description.into(),
                });
            }
            Ok(())
        }
    }

    fn record(identifier: &str) -> TagRecord {
        TagRecord {
            id: "0-A1".into(),
            value: "A1".into(),
            label: None,
            identifier: identifier.into(),
            selected: true,
        }
    }

    #[test]
    fn rejected_submit_leaves_the_counter_cache_alone() {
        let mut source = RemoteCounterSource::new(stub(9, Some("dup")));
        source.refresh();
        assert_eq!(source.current(), 9);

        let err = source.submit(&[record("000009")]).unwrap_err();
        assert_eq!(
            err,
            Error::AuthorityRejection {
                description: "dup".into()
            }
        );
        assert_eq!(source.current(), 9);
    }

    #[test]
    fn unreachable_authority_degrades_to_local_continuation() {
        let mut source = RemoteCounterSource::new(stub(7, None));
        source.refresh();
        source.client.reachable.set(false);

        let range = source.reserve(2).unwrap();
        assert_eq!((range.start(), range.end()), (7, 9));
        assert_eq!(source.current(), 9);
    }

    #[test]
    fn degraded_reservation_refuses_to_overflow() {
        let mut source = RemoteCounterSource::new(stub(u64::MAX - 1, None));
        source.refresh();
        source.client.reachable.set(false);

        assert!(matches!(
            source.reserve(2),
            Err(Error::Selection { .. })
        ));
        assert_eq!(source.current(), u64::MAX - 1);
    }

    #[test]
    fn failed_refresh_keeps_the_cached_value() {
        let mut source = RemoteCounterSource::new(stub(5, None));
        source.refresh();
        source.client.reachable.set(false);

        assert_eq!(source.refresh(), 5);
        assert_eq!(source.current(), 5);
    }
}
