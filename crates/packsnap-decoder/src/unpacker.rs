use packsnap_types::{ContainerKind, Value};
use packsnap_wire::tag::marker;
use tracing::debug;

use crate::buffer::Buffer;
use crate::config::UnpackerConfig;
use crate::decoder::{Pending, decode_header, decode_value, skip_value};
use crate::error::DecodeError;
use crate::source::ByteSource;

/// Streaming decoder over a growing byte buffer.
///
/// Bytes arrive either through [`feed`](Self::feed) or, when the unpacker
/// was built with a source, by pulling on underrun. Every operation either
/// completes or leaves the read cursor untouched, so a value split across
/// any number of feeds decodes once its last byte is in. A walk cut short
/// by an underrun is kept and resumed by the next call of the same kind, so
/// re-feeding a large value costs time linear in its size.
///
/// ```text
///   feed(bytes) ──► Buffer ──► read / skip / read_*_header ──► Value
///                     ▲
///   ByteSource ───────┘ (pulled on underrun)
/// ```
///
/// # Example
///
/// ```
/// use packsnap_decoder::{Unpacker, Value};
///
/// let mut unpacker = Unpacker::new();
/// unpacker.feed(&[0x93, 0x01, 0x02])?;
/// assert!(unpacker.read().unwrap_err().is_incomplete());
///
/// unpacker.feed(&[0x03])?;
/// assert_eq!(unpacker.read()?, Value::from(vec![1u8, 2, 3]));
/// # Ok::<(), packsnap_decoder::DecodeError>(())
/// ```
#[derive(Debug)]
pub struct Unpacker {
    buffer: Buffer,
    config: UnpackerConfig,
    pending: Pending,
}

impl Default for Unpacker {
    fn default() -> Self {
        Self::new()
    }
}

impl Unpacker {
    /// Feed-only unpacker with default settings.
    #[must_use]
    pub fn new() -> Self {
        let config = UnpackerConfig::default();
        Self {
            buffer: Buffer::new(&config, None),
            config,
            pending: Pending::Idle,
        }
    }

    /// Feed-only unpacker with custom settings.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: UnpackerConfig) -> Result<Self, DecodeError> {
        config.validate()?;
        Ok(Self {
            buffer: Buffer::new(&config, None),
            config,
            pending: Pending::Idle,
        })
    }

    /// Unpacker that pulls from `source` whenever it runs short. Fed bytes
    /// are still accepted and are decoded before anything pulled later.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidConfig`] if `config` fails validation.
    pub fn with_source(
        source: impl ByteSource + 'static,
        config: UnpackerConfig,
    ) -> Result<Self, DecodeError> {
        config.validate()?;
        Ok(Self {
            buffer: Buffer::new(&config, Some(Box::new(source))),
            config,
            pending: Pending::Idle,
        })
    }

    #[must_use]
    pub fn config(&self) -> &UnpackerConfig {
        &self.config
    }

    #[must_use]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Direct access to the underlying buffer, for raw reads between
    /// values.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Append bytes for later decoding.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BufferLimitExceeded`] if `max_buffer_size` would be
    /// exceeded. Nothing is appended in that case.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<&mut Self, DecodeError> {
        self.buffer.append(bytes)?;
        Ok(self)
    }

    /// Decode the next complete value.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::IncompleteData`] if the value is not fully available
    ///   yet. Nothing is consumed.
    /// - [`DecodeError::MalformedFormat`] on an unassigned tag byte.
    /// - [`DecodeError::StackDepthExceeded`] if nesting exceeds the limit.
    /// - [`DecodeError::BufferLimitExceeded`] if the value cannot fit under
    ///   `max_buffer_size`.
    /// - [`DecodeError::Source`] if the source fails.
    pub fn read(&mut self) -> Result<Value, DecodeError> {
        let depth = self.config.max_stack_depth;
        let result = decode_value(&mut self.buffer, depth, &mut self.pending);
        self.settle(result)
    }

    /// Step over the next complete value without building it. Consumes
    /// exactly as many bytes as [`read`](Self::read) would.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        let depth = self.config.max_stack_depth;
        let result = skip_value(&mut self.buffer, depth, &mut self.pending);
        self.settle(result)
    }

    /// Consume the next value if it is nil.
    ///
    /// Returns `false`, consuming nothing, for any other value.
    ///
    /// # Errors
    ///
    /// [`DecodeError::IncompleteData`] only if not even one byte is
    /// available.
    pub fn skip_nil(&mut self) -> Result<bool, DecodeError> {
        let is_nil = self.buffer.peek(1)?[0] == marker::NIL;
        if is_nil {
            self.buffer.advance(1);
            self.buffer.compact();
        }
        Ok(is_nil)
    }

    /// Consume an array header and return its element count. The elements
    /// are left for subsequent calls.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnexpectedType`] if the next value is not an array,
    /// otherwise as [`read`](Self::read).
    pub fn read_array_header(&mut self) -> Result<u32, DecodeError> {
        self.read_header(ContainerKind::Array)
    }

    /// Consume a map header and return its pair count.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnexpectedType`] if the next value is not a map,
    /// otherwise as [`read`](Self::read).
    pub fn read_map_header(&mut self) -> Result<u32, DecodeError> {
        self.read_header(ContainerKind::Map)
    }

    /// Decode every complete value currently obtainable and hand each to
    /// `callback`. Running out of bytes ends the loop normally; partial
    /// trailing bytes stay buffered.
    ///
    /// # Errors
    ///
    /// The first error other than [`DecodeError::IncompleteData`].
    pub fn each<F>(&mut self, mut callback: F) -> Result<(), DecodeError>
    where
        F: FnMut(Value),
    {
        for value in self.values() {
            callback(value?);
        }
        Ok(())
    }

    /// [`feed`](Self::feed) then [`each`](Self::each).
    ///
    /// # Errors
    ///
    /// As [`feed`](Self::feed) and [`each`](Self::each).
    pub fn feed_each<F>(&mut self, bytes: &[u8], callback: F) -> Result<(), DecodeError>
    where
        F: FnMut(Value),
    {
        self.feed(bytes)?;
        self.each(callback)
    }

    /// Iterator over the complete values currently obtainable. Ends when
    /// the data runs out; yields at most one error, then ends.
    pub fn values(&mut self) -> Values<'_> {
        Values {
            unpacker: self,
            failed: false,
        }
    }

    /// Discard every buffered byte. The source and configuration are kept.
    pub fn reset(&mut self) {
        debug!(dropped = self.buffer.available(), "unpacker reset");
        self.buffer.clear();
        self.pending = Pending::Idle;
    }

    fn read_header(&mut self, kind: ContainerKind) -> Result<u32, DecodeError> {
        self.pending = Pending::Idle;
        let result = decode_header(&mut self.buffer, kind);
        self.settle(result)
    }

    fn settle<T>(&mut self, result: Result<T, DecodeError>) -> Result<T, DecodeError> {
        match &result {
            Ok(_) => self.buffer.compact(),
            Err(e) if e.is_incomplete() => {
                debug!(error = %e, "end of available data");
            }
            Err(e) => {
                debug!(error = %e, consumed = self.buffer.consumed(), "decode failed");
            }
        }
        result
    }
}

/// Iterator returned by [`Unpacker::values`].
#[derive(Debug)]
pub struct Values<'a> {
    unpacker: &'a mut Unpacker,
    failed: bool,
}

impl Iterator for Values<'_> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.unpacker.read() {
            Ok(value) => Some(Ok(value)),
            Err(e) if e.is_incomplete() => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
