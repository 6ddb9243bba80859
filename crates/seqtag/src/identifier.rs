use core::fmt;

/// Number of digits in an encoded [`TagId`].
///
/// Encoded identifiers are left-padded with zeros to this width. Values that
/// need more digits widen the string rather than truncate: uniqueness always
/// wins over fixed layout.
pub const TAG_WIDTH: usize = 6;

/// A single allocated identifier, backed by its position in the sequence.
///
/// `TagId` is distinct from a record's primary value: it is the number handed
/// out by the sequence authority (or a local continuation of it), and it is
/// what the scannable symbol encodes.
///
/// ## Encoding
///
/// The canonical encoding is a zero-padded decimal string of [`TAG_WIDTH`]
/// digits:
///
/// ```
/// use seqtag::TagId;
///
/// assert_eq!(TagId::from_raw(6).encode(), "000006");
/// assert_eq!(TagId::from_raw(1_234_567).encode(), "1234567");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagId(u64);

impl TagId {
    /// Creates an ID from its raw sequence position.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence position.
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Encodes the ID as a zero-padded decimal string.
    pub fn encode(self) -> String {
        format!("{:0TAG_WIDTH$}", self.0)
    }

    /// Decodes an encoded identifier back to its sequence position.
    ///
    /// Accepts any all-decimal string, padded or not. Returns `None` for
    /// anything else, including identifiers whose trailing digits were
    /// rewritten by the collision guard and no longer map to a position.
    pub fn decode(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().map(Self)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0TAG_WIDTH$}", self.0)
    }
}

impl From<u64> for TagId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_fixed_width() {
        assert_eq!(TagId::from_raw(0).encode(), "000000");
        assert_eq!(TagId::from_raw(42).encode(), "000042");
        assert_eq!(TagId::from_raw(999_999).encode(), "999999");
    }

    #[test]
    fn encoding_widens_past_six_digits() {
        assert_eq!(TagId::from_raw(1_000_000).encode(), "1000000");
    }

    #[test]
    fn decode_round_trips() {
        let id = TagId::from_raw(7);
        assert_eq!(TagId::decode(&id.encode()), Some(id));
        assert_eq!(TagId::decode("1234567"), Some(TagId::from_raw(1_234_567)));
    }

    #[test]
    fn decode_rejects_non_decimal() {
        assert_eq!(TagId::decode(""), None);
        assert_eq!(TagId::decode("00a042"), None);
        assert_eq!(TagId::decode("-6"), None);
    }

    #[test]
    fn display_matches_encode() {
        let id = TagId::from_raw(6);
        assert_eq!(id.to_string(), id.encode());
    }
}
