//! # Authority wire contract
//!
//! Request and response bodies for the sequence authority API, shared by
//! the service and its clients so both sides adhere to one serde contract.
//!
//! ## Endpoints
//!
//! - `GET /api/sequence` → [`SequenceResponse`] — the current counter.
//! - `POST /api/sequence/reserve` [`ReserveRequest`] → [`ReserveResponse`]
//!   — an atomic contiguous range reservation.
//! - `POST /api/records` [`SubmitRequest`] → [`SubmitResponse`] — persists
//!   an allocated batch.
//!
//! ## Conventions
//!
//! Every body carries `success`. Domain-level rejections (duplicate
//! identifier, exhausted range) answer HTTP 200 with `success: false` and a
//! `description`; clients must treat that as reportable and distinct from a
//! transport failure. The submit entry field names (`fsn`, `uid`, `cid`)
//! are fixed by the protocol: `fsn` is the primary value, `uid` the numeric
//! identifier, `cid` the label (empty when none was chosen).

use seqtag::{TagId, TagRecord};
use serde::{Deserialize, Serialize};

/// Response to a counter read.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequenceResponse {
    pub success: bool,
    /// The current counter value.
    pub data: u64,
}

/// Request for an atomic range reservation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReserveRequest {
    /// Number of identifiers to reserve. Must be positive.
    pub count: u64,
}

/// Response to a range reservation.
///
/// On success the reserved identifiers are `start + 1 ..= end`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReserveResponse {
    pub success: bool,
    /// Counter value the reservation began from (exclusive).
    pub start: u64,
    /// Counter value after the reservation (inclusive).
    pub end: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// One allocated record in a batch submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitEntry {
    /// The primary per-row value.
    pub fsn: String,
    /// The allocated identifier, numeric on the wire.
    pub uid: u64,
    /// The label, or empty when no label column was chosen.
    pub cid: String,
}

impl TryFrom<&TagRecord> for SubmitEntry {
    type Error = crate::Error;

    fn try_from(record: &TagRecord) -> Result<Self, Self::Error> {
        let uid = TagId::decode(&record.identifier)
            .ok_or_else(|| crate::Error::InvalidRequest {
                reason: format!("identifier `{}` is not numeric", record.identifier),
            })?
            .to_raw();
        Ok(Self {
            fsn: record.value.clone(),
            uid,
            cid: record.label.clone().unwrap_or_default(),
        })
    }
}

/// A batch submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitRequest {
    pub data: Vec<SubmitEntry>,
}

impl SubmitRequest {
    /// Maps a batch of records into a submission.
    ///
    /// Fails when any record's identifier does not parse back to a
    /// sequence position.
    pub fn from_records(records: &[TagRecord]) -> Result<Self, crate::Error> {
        let data = records
            .iter()
            .map(SubmitEntry::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Self { data })
    }
}

/// Response to a batch submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl SubmitResponse {
    /// A successful submission.
    pub const fn ok() -> Self {
        Self {
            success: true,
            description: None,
        }
    }

    /// A domain-level rejection with a description.
    pub fn rejected(description: impl Into<String>) -> Self {
        Self {
            success: false,
            description: Some(description.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: &str, identifier: &str, label: Option<&str>) -> TagRecord {
        TagRecord {
            id: format!("0-{value}"),
            value: value.into(),
            label: label.map(str::to_string),
            identifier: identifier.into(),
            selected: true,
        }
    }

    #[test]
    fn submit_entry_uses_protocol_field_names() {
        let entry = SubmitEntry::try_from(&record("A1", "000006", Some("shelf"))).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fsn": "A1", "uid": 6, "cid": "shelf"})
        );
    }

    #[test]
    fn missing_label_becomes_empty_cid() {
        let entry = SubmitEntry::try_from(&record("A1", "000006", None)).unwrap();
        assert_eq!(entry.cid, "");
    }

    #[test]
    fn non_numeric_identifier_is_invalid() {
        assert!(SubmitEntry::try_from(&record("A1", "00x006", None)).is_err());
    }

    #[test]
    fn rejection_description_round_trips() {
        let body = serde_json::to_string(&SubmitResponse::rejected("dup")).unwrap();
        let parsed: SubmitResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, SubmitResponse::rejected("dup"));
    }

    #[test]
    fn ok_omits_description() {
        let body = serde_json::to_string(&SubmitResponse::ok()).unwrap();
        assert_eq!(body, r#"{"success":true}"#);
    }
}
