use crate::{Components, LayoutError, SnowflakeId};

/// The bit-width split of a [`SnowflakeId`].
///
/// The most significant bit is reserved and always zero, leaving 63 bits for
/// the three fields. Every width must be at least one bit and the widths must
/// sum to exactly [`SnowflakeLayout::USABLE_BITS`].
///
/// ```text
///  Bit Index:  63           63 62          S+N S+N-1          S S-1            0
///              +--------------+----------------+----------------+--------------+
///  Field:      | reserved (1) | timestamp (T)  |  node ID (N)   | sequence (S) |
///              +--------------+----------------+----------------+--------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ---------->|
/// ```
///
/// # Example
///
/// ```
/// use linklet::SnowflakeLayout;
///
/// let layout = SnowflakeLayout::new(41, 10, 12).unwrap();
/// let id = layout.compose(100, 7, 1);
/// assert_eq!(id.to_raw(), (100 << 22) | (7 << 12) | 1);
///
/// let parts = layout.decompose(id);
/// assert_eq!((parts.timestamp, parts.node_id, parts.sequence), (100, 7, 1));
///
/// assert!(SnowflakeLayout::new(41, 10, 13).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnowflakeLayout {
    timestamp_bits: u32,
    node_bits: u32,
    sequence_bits: u32,
}

impl Default for SnowflakeLayout {
    fn default() -> Self {
        Self::TWITTER
    }
}

impl SnowflakeLayout {
    /// Bits available to the three fields once the sign bit is reserved.
    pub const USABLE_BITS: u32 = 63;

    /// 41 bits timestamp, 10 bits node ID, 12 bits sequence.
    pub const TWITTER: Self = Self {
        timestamp_bits: 41,
        node_bits: 10,
        sequence_bits: 12,
    };

    /// Validates and builds a layout.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::ZeroWidth`] if any field is zero bits wide
    /// - [`LayoutError::WidthMismatch`] if the widths do not sum to 63
    pub fn new(timestamp_bits: u32, node_bits: u32, sequence_bits: u32) -> Result<Self, LayoutError> {
        for (field, bits) in [
            ("timestamp", timestamp_bits),
            ("node_id", node_bits),
            ("sequence", sequence_bits),
        ] {
            if bits == 0 {
                return Err(LayoutError::ZeroWidth { field });
            }
        }

        let total = timestamp_bits
            .saturating_add(node_bits)
            .saturating_add(sequence_bits);
        if total != Self::USABLE_BITS {
            return Err(LayoutError::WidthMismatch {
                total,
                expected: Self::USABLE_BITS,
            });
        }

        Ok(Self {
            timestamp_bits,
            node_bits,
            sequence_bits,
        })
    }

    pub const fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits
    }

    pub const fn node_bits(&self) -> u32 {
        self.node_bits
    }

    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Largest timestamp (ms since epoch) the layout can hold.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    pub const fn max_node_id(&self) -> u64 {
        mask(self.node_bits)
    }

    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    const fn node_shift(&self) -> u32 {
        self.sequence_bits
    }

    const fn timestamp_shift(&self) -> u32 {
        self.node_bits + self.sequence_bits
    }

    /// Packs the three fields into an ID. Each field is masked to its width.
    pub const fn compose(&self, timestamp: u64, node_id: u64, sequence: u64) -> SnowflakeId {
        let timestamp = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let node_id = (node_id & self.max_node_id()) << self.node_shift();
        let sequence = sequence & self.max_sequence();
        SnowflakeId::from_raw(timestamp | node_id | sequence)
    }

    /// Unpacks an ID into its fields. The reserved bit is ignored.
    pub const fn decompose(&self, id: SnowflakeId) -> Components {
        let raw = id.to_raw();
        Components {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            node_id: (raw >> self.node_shift()) & self.max_node_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}

const fn mask(bits: u32) -> u64 {
    (1 << bits) - 1
}
