use core::fmt;

/// A 64-bit Snowflake-style identifier.
///
/// The raw value is opaque on its own: the position of the timestamp, node ID
/// and sequence fields depends on the [`SnowflakeLayout`] used to compose it.
/// Use [`SnowflakeLayout::decompose`] to recover the fields.
///
/// Ordering follows the raw integer, which for IDs from the same layout is
/// timestamp first, then node ID, then sequence.
///
/// [`SnowflakeLayout`]: crate::SnowflakeLayout
/// [`SnowflakeLayout::decompose`]: crate::SnowflakeLayout::decompose
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SnowflakeId").field(&self.id).finish()
    }
}

/// The unpacked fields of a [`SnowflakeId`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Components {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    pub node_id: u64,
    pub sequence: u64,
}
