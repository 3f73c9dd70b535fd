/// Errors raised while interpreting raw bytes against the tag table.
///
/// These are slice-level failures: the wire crate never pulls more input,
/// so a short slice is reported as [`WireError::Truncated`] and it is up to
/// the caller to decide whether more bytes could arrive later.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// The byte is not assigned a meaning by the tag table (`0xc1`).
    #[error("unassigned tag byte {tag:#04x}")]
    UnassignedTag { tag: u8 },

    /// The slice ended before a header or fixed-size field was complete.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A length or count field does not fit in 32 bits.
    ///
    /// Only reachable through a hand-built [`Tag`](crate::Tag) carrying a
    /// 64-bit length width; [`Tag::parse`](crate::Tag::parse) never produces
    /// one.
    #[error("length field value {value} exceeds the 32-bit limit")]
    LengthOverflow { value: u64 },
}
