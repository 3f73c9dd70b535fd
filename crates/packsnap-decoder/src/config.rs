use crate::error::DecodeError;

/// Default nesting limit.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 128;

/// Default number of bytes requested from the source per pull (32 KiB).
pub const DEFAULT_READ_CHUNK_SIZE: usize = 32 * 1024;

/// Construction-time settings of an [`Unpacker`](crate::Unpacker).
///
/// Fixed once the unpacker is built.
///
/// ```text
/// ┌─────────────────┬──────────┬──────────────────────────────────────────┐
/// │ Field           │ Default  │ Purpose                                  │
/// ├─────────────────┼──────────┼──────────────────────────────────────────┤
/// │ max_stack_depth │ 128      │ open containers allowed at once          │
/// │ max_buffer_size │ None     │ ceiling on retained, unconsumed bytes    │
/// │ read_chunk_size │ 32 KiB   │ bytes requested from the source per pull │
/// └─────────────────┴──────────┴──────────────────────────────────────────┘
/// ```
///
/// `max_buffer_size` bounds both `feed` and source pulls. A value whose
/// declared length can never fit under the ceiling fails with
/// [`DecodeError::BufferLimitExceeded`] as soon as its header is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnpackerConfig {
    /// Maximum number of simultaneously open arrays/maps. Nesting exactly
    /// this deep succeeds; one more level fails with
    /// [`DecodeError::StackDepthExceeded`].
    pub max_stack_depth: usize,

    /// Maximum number of unconsumed bytes the buffer may hold.
    pub max_buffer_size: Option<usize>,

    /// Bytes requested from the backing source on each underrun.
    pub read_chunk_size: usize,
}

impl Default for UnpackerConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            max_buffer_size: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl UnpackerConfig {
    /// Default settings with a different nesting limit.
    #[must_use]
    pub fn with_max_stack_depth(max_stack_depth: usize) -> Self {
        Self {
            max_stack_depth,
            ..Self::default()
        }
    }

    /// Check the settings before they are used.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidConfig`] when any limit is zero.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.max_stack_depth == 0 {
            return Err(DecodeError::InvalidConfig {
                reason: "max_stack_depth must be at least 1",
            });
        }
        if self.read_chunk_size == 0 {
            return Err(DecodeError::InvalidConfig {
                reason: "read_chunk_size must be at least 1",
            });
        }
        if self.max_buffer_size == Some(0) {
            return Err(DecodeError::InvalidConfig {
                reason: "max_buffer_size must be at least 1 when set",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = UnpackerConfig::default();
        assert_eq!(config.max_stack_depth, 128);
        assert_eq!(config.read_chunk_size, 32 * 1024);
        assert!(config.max_buffer_size.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let zero_depth = UnpackerConfig::with_max_stack_depth(0);
        assert!(matches!(
            zero_depth.validate(),
            Err(DecodeError::InvalidConfig { .. })
        ));

        let zero_chunk = UnpackerConfig {
            read_chunk_size: 0,
            ..UnpackerConfig::default()
        };
        assert!(zero_chunk.validate().is_err());

        let zero_buffer = UnpackerConfig {
            max_buffer_size: Some(0),
            ..UnpackerConfig::default()
        };
        assert!(zero_buffer.validate().is_err());
    }
}
