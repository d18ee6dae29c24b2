use crate::ShortCode;

/// The durable mapping from a short code to its target.
///
/// Created exactly once when a target is shortened and never updated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingRecord {
    pub code: ShortCode,
    pub target: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Opaque reference to whoever created the mapping, if known.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub owner: Option<String>,
}

impl MappingRecord {
    pub fn new(code: ShortCode, target: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            code,
            target: target.into(),
            created_at_ms,
            owner: None,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    /// Orders records newest first: by creation time, then by code value,
    /// which follows ID issuance order.
    pub fn newest_first(a: &Self, b: &Self) -> core::cmp::Ordering {
        b.created_at_ms
            .cmp(&a.created_at_ms)
            .then_with(|| b.code.to_u64().cmp(&a.code.to_u64()))
    }
}
