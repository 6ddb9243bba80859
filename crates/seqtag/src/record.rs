/// One row's allocation result.
///
/// Created by the allocator, mutated only by selection toggles, and
/// destroyed when the session is cleared or a new batch replaces the old one
/// wholesale. Within a batch, `identifier` is unique.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRecord {
    /// Stable session-local key: source row index plus the primary value.
    pub id: String,
    /// The primary field extracted for this row (FSN in the domain).
    pub value: String,
    /// Optional secondary field shown above the symbol.
    pub label: Option<String>,
    /// The allocated identifier, encoded as a zero-padded decimal string.
    pub identifier: String,
    /// Whether the record participates in printing. Defaults to `true`.
    pub selected: bool,
}

impl TagRecord {
    /// Returns the label if it is present and non-empty.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }
}
