use bytes::{Buf, BytesMut};
use tracing::{debug, trace};

use crate::config::UnpackerConfig;
use crate::error::DecodeError;
use crate::source::ByteSource;

/// Allocation kept across compactions; anything larger is released once
/// most of it is dead space.
const RETAINED_CAPACITY: usize = 64 * 1024;

/// Outcome of a single [`Buffer::pull_from_source`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// This many bytes were appended at the write boundary.
    Filled(usize),
    /// The source has nothing more, or there is no source.
    EndOfData,
}

/// Byte store between the caller (or a backing source) and the decoder.
///
/// ```text
///          consumed()            read cursor         write boundary
///   stream ─────────────────────────┬───────────────────┬─────────────
///   offset   (dropped, reclaimable) │  available bytes  │  (not yet
///                                   │  = as_slice()     │   received)
/// ```
///
/// Only the bytes between the read cursor and the write boundary are
/// held. Writes append at the boundary through [`append`](Self::append) or a
/// source pull; reads move the cursor through [`advance`](Self::advance).
/// The decoder never moves the cursor until a whole value has been
/// decoded, so an underrun in the middle of a value loses nothing.
pub struct Buffer {
    data: BytesMut,
    consumed: u64,
    source: Option<Box<dyn ByteSource>>,
    read_chunk_size: usize,
    max_buffer_size: Option<usize>,
    /// Most bytes held at once since the last reallocation.
    peak: usize,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("available", &self.data.len())
            .field("consumed", &self.consumed)
            .field("has_source", &self.source.is_some())
            .field("read_chunk_size", &self.read_chunk_size)
            .field("max_buffer_size", &self.max_buffer_size)
            .finish()
    }
}

impl Buffer {
    pub(crate) fn new(config: &UnpackerConfig, source: Option<Box<dyn ByteSource>>) -> Self {
        Self {
            data: BytesMut::new(),
            consumed: 0,
            source,
            read_chunk_size: config.read_chunk_size,
            max_buffer_size: config.max_buffer_size,
            peak: 0,
        }
    }

    /// Append bytes at the write boundary.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BufferLimitExceeded`] if the unconsumed bytes would
    /// exceed `max_buffer_size`. Nothing is appended in that case.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let requested = self.data.len().saturating_add(bytes.len());
        if let Some(limit) = self.max_buffer_size {
            if requested > limit {
                return Err(DecodeError::BufferLimitExceeded { requested, limit });
            }
        }
        self.data.extend_from_slice(bytes);
        self.peak = self.peak.max(self.data.len());
        Ok(())
    }

    /// Bytes between the read cursor and the write boundary.
    #[must_use]
    pub fn available(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute stream offset of the read cursor.
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// All available bytes, without consuming them.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// View the next `n` bytes without consuming them, pulling from the
    /// source if needed.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::IncompleteData`] if fewer than `n` bytes can be had.
    /// - [`DecodeError::BufferLimitExceeded`] if `n` exceeds `max_buffer_size`.
    /// - [`DecodeError::Source`] if the source fails.
    pub fn peek(&mut self, n: usize) -> Result<&[u8], DecodeError> {
        self.ensure(n)?;
        Ok(&self.data[..n])
    }

    /// Move the read cursor forward by up to `n` bytes, never past the
    /// write boundary. Returns how far it moved.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.data.len());
        self.data.advance(n);
        self.consumed += n as u64;
        n
    }

    /// Consume exactly `n` raw bytes, or nothing at all.
    ///
    /// # Errors
    ///
    /// Same as [`peek`](Self::peek).
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.ensure(n)?;
        let bytes = self.data.split_to(n).to_vec();
        self.consumed += n as u64;
        Ok(bytes)
    }

    /// Skip exactly `n` raw bytes, or nothing at all.
    ///
    /// # Errors
    ///
    /// Same as [`peek`](Self::peek).
    pub fn skip_exact(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure(n)?;
        self.advance(n);
        Ok(())
    }

    /// Drop every available byte. The source, if any, is kept.
    pub fn clear(&mut self) {
        let n = self.data.len();
        self.advance(n);
        self.compact();
    }

    /// Read once from the backing source into the buffer.
    ///
    /// Requests up to `read_chunk_size` bytes, fewer if `max_buffer_size`
    /// leaves less room. Called on underrun only.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::BufferLimitExceeded`] if the buffer is already full.
    /// - [`DecodeError::Source`] if the source fails.
    pub fn pull_from_source(&mut self) -> Result<Pull, DecodeError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(Pull::EndOfData);
        };

        let start = self.data.len();
        let room = match self.max_buffer_size {
            Some(limit) if start >= limit => {
                return Err(DecodeError::BufferLimitExceeded {
                    requested: start + 1,
                    limit,
                });
            }
            Some(limit) => limit - start,
            None => usize::MAX,
        };
        let want = self.read_chunk_size.min(room);

        self.data.resize(start + want, 0);
        match source.fill(&mut self.data[start..]) {
            Ok(0) => {
                self.data.truncate(start);
                trace!("source reported end of data");
                Ok(Pull::EndOfData)
            }
            Ok(n) => {
                let n = n.min(want);
                self.data.truncate(start + n);
                self.peak = self.peak.max(self.data.len());
                trace!(bytes = n, "pulled from source");
                Ok(Pull::Filled(n))
            }
            Err(e) => {
                self.data.truncate(start);
                debug!(error = %e, "source read failed");
                Err(DecodeError::Source(e))
            }
        }
    }

    /// Release memory held for already-consumed bytes.
    ///
    /// `BytesMut` reuses the consumed prefix on its own when the next
    /// append needs room. This additionally gives back an allocation that
    /// grew for one large message once most of it is dead.
    pub fn compact(&mut self) {
        let live = self.data.len();
        if self.peak <= RETAINED_CAPACITY || live.saturating_mul(4) >= self.peak {
            return;
        }
        let mut fresh = BytesMut::with_capacity(live);
        fresh.extend_from_slice(&self.data);
        self.data = fresh;
        debug!(live, released = self.peak - live, "compacted buffer");
        self.peak = live;
    }

    /// Make sure at least `end` bytes past the cursor are available,
    /// pulling from the source until they are.
    pub(crate) fn ensure(&mut self, end: usize) -> Result<(), DecodeError> {
        while self.data.len() < end {
            if let Some(limit) = self.max_buffer_size {
                if end > limit {
                    return Err(DecodeError::BufferLimitExceeded {
                        requested: end,
                        limit,
                    });
                }
            }
            if self.pull_from_source()? == Pull::EndOfData {
                return Err(DecodeError::IncompleteData {
                    needed: end,
                    available: self.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Bytes `[start, start + len)` past the cursor. Callers must have
    /// called [`ensure`](Self::ensure) for `start + len` first.
    pub(crate) fn window(&self, start: usize, len: usize) -> &[u8] {
        &self.data[start..start + len]
    }
}
