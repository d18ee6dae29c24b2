/// Reasons a bit-width split is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// One of the three fields was given zero bits.
    #[error("{field} must be at least 1 bit wide")]
    ZeroWidth { field: &'static str },

    /// The three widths do not add up to the usable identifier width.
    #[error("field widths sum to {total} bits, expected {expected}")]
    WidthMismatch { total: u32, expected: u32 },
}
