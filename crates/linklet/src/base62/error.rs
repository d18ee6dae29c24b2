/// Errors produced when decoding a base62 short code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Base62Error {
    #[error("short code is empty")]
    Empty,

    /// Longer than any encoding of a `u64`.
    #[error("invalid length: {len}")]
    InvalidLen { len: usize },

    /// A byte outside `0-9A-Za-z`.
    #[error("invalid byte {byte:#04x} at index {index}")]
    InvalidChar { byte: u8, index: usize },

    /// A leading `'0'` on a multi-character code. Only `"0"` itself may start
    /// with zero, which keeps every value to exactly one encoding.
    #[error("non-canonical short code (leading zero)")]
    NonCanonical,

    /// The decoded value does not fit in a `u64`.
    #[error("decoded value overflows u64")]
    Overflow,
}
