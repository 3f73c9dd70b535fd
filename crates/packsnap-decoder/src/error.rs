use packsnap_types::{ContainerKind, ValueKind};
use packsnap_wire::WireError;

/// Errors that can occur while decoding from an [`Unpacker`](crate::Unpacker).
///
/// Only [`IncompleteData`](Self::IncompleteData) is recoverable: feed more
/// bytes and call again. Every failure leaves the read cursor where it was
/// before the call, but after a format or depth error the stream itself
/// cannot be trusted and should be dropped with
/// [`Unpacker::reset`](crate::Unpacker::reset).
///
/// ```text
///   DecodeError
///   ├── IncompleteData        ← not enough bytes yet (source exhausted or absent)
///   ├── MalformedFormat       ← unassigned tag byte or bad length field
///   ├── UnexpectedType        ← header read found the other container kind
///   ├── StackDepthExceeded    ← nesting deeper than max_stack_depth
///   ├── BufferLimitExceeded   ← pending bytes would exceed max_buffer_size
///   ├── InvalidConfig         ← rejected at construction
///   └── Source(io::Error)     ← the backing source failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The buffer, and the source if there is one, cannot supply enough
    /// bytes for the value being decoded.
    #[error("incomplete data: needed {needed} bytes, {available} available")]
    IncompleteData { needed: usize, available: usize },

    /// A tag byte or length field does not correspond to any valid encoding.
    ///
    /// `offset` is the absolute stream position of the offending header.
    #[error("malformed format at offset {offset}: {source}")]
    MalformedFormat {
        offset: u64,
        #[source]
        source: WireError,
    },

    /// A header read found a well-formed value of the wrong kind.
    #[error("expected {expected} header at offset {offset}, found {found}")]
    UnexpectedType {
        expected: ContainerKind,
        found: ValueKind,
        offset: u64,
    },

    /// Opening one more container would exceed the configured nesting limit.
    #[error("stack depth limit {limit} exceeded at offset {offset}")]
    StackDepthExceeded { limit: usize, offset: u64 },

    /// Retaining the requested bytes would exceed `max_buffer_size`.
    #[error("buffer limit exceeded: {requested} bytes requested, limit is {limit}")]
    BufferLimitExceeded { requested: usize, limit: usize },

    /// The configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// The backing source failed for a reason unrelated to the format.
    #[error(transparent)]
    Source(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether this is the "not enough bytes right now" condition that
    /// iteration treats as a normal stop.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteData { .. })
    }

    /// Whether the current stream position is unusable after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MalformedFormat { .. } | Self::StackDepthExceeded { .. }
        )
    }

    pub(crate) fn malformed(offset: u64, source: WireError) -> Self {
        Self::MalformedFormat { offset, source }
    }
}
