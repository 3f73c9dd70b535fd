//! The resumable value walker.
//!
//! Every top-level operation works on a tentative position past the read
//! cursor and only commits (advances the cursor) once the whole request has
//! succeeded. An underrun anywhere in the value therefore leaves the buffer
//! exactly as it was.
//!
//! Nesting is tracked with an explicit frame stack rather than recursion,
//! so the depth limit is a plain length check and hostile input cannot
//! exhaust the thread stack. When a walk stops on an underrun, its frames
//! and position are parked in a [`Pending`] owned by the caller. The next
//! walk of the same kind from the same cursor picks up where it stopped, so
//! a value that trickles in over many feeds is parsed once, not once per
//! feed.
//!
//! ```text
//!   cursor            pos
//!     │                │
//!     ▼                ▼
//!   [ 93 01 02 ]  ──►  frames: [ Array { remaining: 1, [1, 2] } ]
//! ```

use std::fmt;
use std::mem;

use packsnap_types::{ContainerKind, Extension, Float, IntEncoding, Integer, Value, ValueKind};
use packsnap_wire::{Header, Tag, WireError, scalar};
use tracing::trace;

use crate::buffer::Buffer;
use crate::error::DecodeError;

/// Decode the next complete value, resuming a parked walk if one matches.
pub(crate) fn decode_value(
    buffer: &mut Buffer,
    max_depth: usize,
    pending: &mut Pending,
) -> Result<Value, DecodeError> {
    walk::<Tree>(buffer, max_depth, pending)
}

/// Step over the next complete value, resuming a parked walk if one matches.
pub(crate) fn skip_value(
    buffer: &mut Buffer,
    max_depth: usize,
    pending: &mut Pending,
) -> Result<(), DecodeError> {
    walk::<Discard>(buffer, max_depth, pending)
}

/// Read one container header of the given kind and return its count
/// (elements for arrays, pairs for maps).
pub(crate) fn decode_header(
    buffer: &mut Buffer,
    kind: ContainerKind,
) -> Result<u32, DecodeError> {
    let mut walker = Walker {
        buffer: &mut *buffer,
        pos: 0,
        max_depth: 0,
    };
    let offset = walker.offset();
    let header = walker.header()?;
    if !kind.matches(header.tag) {
        return Err(DecodeError::UnexpectedType {
            expected: kind,
            found: ValueKind::of(header.tag),
            offset,
        });
    }
    let used = walker.pos;
    buffer.advance(used);
    Ok(header.len)
}

fn walk<B: Build>(
    buffer: &mut Buffer,
    max_depth: usize,
    pending: &mut Pending,
) -> Result<B::Item, DecodeError> {
    let start = buffer.consumed();
    let (pos, mut stack) = match B::resume(mem::take(pending)) {
        Some(parked) if parked.start == start => {
            trace!(start, pos = parked.pos, depth = parked.stack.len(), "resuming walk");
            (parked.pos, parked.stack)
        }
        _ => (0, Vec::new()),
    };

    let mut walker = Walker {
        buffer: &mut *buffer,
        pos,
        max_depth,
    };
    match walker.value::<B>(&mut stack) {
        Ok(item) => {
            let used = walker.pos;
            buffer.advance(used);
            Ok(item)
        }
        Err(e) => {
            if e.is_incomplete() {
                *pending = B::park(Parked {
                    start,
                    pos: walker.pos,
                    stack,
                });
            }
            Err(e)
        }
    }
}

// ── Builders ────────────────────────────────────────────────────────────

/// What a walk produces for each item, and how containers collect them.
pub(crate) trait Build: Sized {
    type Item;
    type Partial: fmt::Debug;

    fn open(is_map: bool, hint: usize) -> Self::Partial;
    fn empty(is_map: bool) -> Self::Item;
    fn scalar(header: &Header, payload: &[u8], offset: u64) -> Result<Self::Item, DecodeError>;
    fn attach(partial: &mut Self::Partial, item: Self::Item);
    fn finish(partial: Self::Partial) -> Self::Item;

    fn park(walk: Parked<Self>) -> Pending;
    fn resume(pending: Pending) -> Option<Parked<Self>>;
}

/// Builds the full value tree.
#[derive(Debug)]
pub(crate) struct Tree;

/// Walks with the same checks but keeps nothing.
#[derive(Debug)]
pub(crate) struct Discard;

/// Partially built contents of an open container.
#[derive(Debug)]
pub(crate) enum Collected {
    Array(Vec<Value>),
    Map {
        entries: Vec<(Value, Value)>,
        key: Option<Value>,
    },
}

impl Build for Tree {
    type Item = Value;
    type Partial = Collected;

    fn open(is_map: bool, hint: usize) -> Collected {
        if is_map {
            Collected::Map {
                entries: Vec::with_capacity(hint / 2),
                key: None,
            }
        } else {
            Collected::Array(Vec::with_capacity(hint))
        }
    }

    fn empty(is_map: bool) -> Value {
        if is_map {
            Value::Map(Vec::new())
        } else {
            Value::Array(Vec::new())
        }
    }

    fn scalar(header: &Header, payload: &[u8], offset: u64) -> Result<Value, DecodeError> {
        let bad = malformed(offset);
        let value = match header.tag {
            Tag::Nil => Value::Nil,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::PosFixInt(n) => {
                Value::Integer(Integer::from_u64(u64::from(n), IntEncoding::PositiveFixInt))
            }
            Tag::NegFixInt(n) => {
                Value::Integer(Integer::from_i64(i64::from(n), IntEncoding::NegativeFixInt))
            }
            Tag::Uint(w) => Value::Integer(Integer::from_u64(
                scalar::read_uint(w, payload).map_err(bad)?,
                IntEncoding::Unsigned(w),
            )),
            Tag::Int(w) => Value::Integer(Integer::from_i64(
                scalar::read_int(w, payload).map_err(bad)?,
                IntEncoding::Signed(w),
            )),
            Tag::Float32 => Value::Float(Float::F32(scalar::read_f32(payload).map_err(bad)?)),
            Tag::Float64 => Value::Float(Float::F64(scalar::read_f64(payload).map_err(bad)?)),
            Tag::FixStr(_) | Tag::Str(_) => Value::Str(payload.to_vec()),
            Tag::Bin(_) => Value::Bin(payload.to_vec()),
            Tag::FixExt(_) | Tag::Ext(_) => Value::Ext(Extension::new(
                header.ext_type.unwrap_or_default(),
                payload,
            )),
            Tag::FixArray(_) | Tag::Array(_) | Tag::FixMap(_) | Tag::Map(_) => {
                unreachable!("containers are walked by frames, not read as scalars")
            }
        };
        Ok(value)
    }

    fn attach(partial: &mut Collected, item: Value) {
        match partial {
            Collected::Array(items) => items.push(item),
            Collected::Map { entries, key } => match key.take() {
                Some(k) => entries.push((k, item)),
                None => *key = Some(item),
            },
        }
    }

    fn finish(partial: Collected) -> Value {
        match partial {
            Collected::Array(items) => Value::Array(items),
            Collected::Map { entries, .. } => Value::Map(entries),
        }
    }

    fn park(walk: Parked<Self>) -> Pending {
        Pending::Read(walk)
    }

    fn resume(pending: Pending) -> Option<Parked<Self>> {
        match pending {
            Pending::Read(walk) => Some(walk),
            Pending::Idle | Pending::Skip(_) => None,
        }
    }
}

impl Build for Discard {
    type Item = ();
    type Partial = ();

    fn open(_is_map: bool, _hint: usize) {}

    fn empty(_is_map: bool) {}

    fn scalar(_header: &Header, _payload: &[u8], _offset: u64) -> Result<(), DecodeError> {
        Ok(())
    }

    fn attach(_partial: &mut (), _item: ()) {}

    fn finish(_partial: ()) {}

    fn park(walk: Parked<Self>) -> Pending {
        Pending::Skip(walk)
    }

    fn resume(pending: Pending) -> Option<Parked<Self>> {
        match pending {
            Pending::Skip(walk) => Some(walk),
            Pending::Idle | Pending::Read(_) => None,
        }
    }
}

// ── Parked walks ────────────────────────────────────────────────────────

/// A walk that stopped on an underrun.
#[derive(Debug)]
pub(crate) struct Parked<B: Build> {
    /// Absolute offset of the value's first byte. A walk is only resumed
    /// while the read cursor still sits here.
    start: u64,
    /// Start of the first item not yet parsed, relative to `start`.
    pos: usize,
    stack: Vec<Frame<B>>,
}

/// Walk state carried between calls.
#[derive(Debug, Default)]
pub(crate) enum Pending {
    #[default]
    Idle,
    Read(Parked<Tree>),
    Skip(Parked<Discard>),
}

impl Pending {
    #[cfg(test)]
    fn position(&self) -> Option<(u64, usize, usize)> {
        match self {
            Self::Idle => None,
            Self::Read(walk) => Some((walk.start, walk.pos, walk.stack.len())),
            Self::Skip(walk) => Some((walk.start, walk.pos, walk.stack.len())),
        }
    }
}

// ── Frames ──────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Frame<B: Build> {
    /// Entries still expected. A map of `n` pairs starts at `2n`.
    remaining: u64,
    partial: B::Partial,
}

// ── Walker ──────────────────────────────────────────────────────────────

fn malformed(offset: u64) -> impl FnOnce(WireError) -> DecodeError {
    move |e| DecodeError::malformed(offset, e)
}

struct Walker<'b> {
    buffer: &'b mut Buffer,
    /// Bytes past the read cursor already parsed by this request.
    pos: usize,
    max_depth: usize,
}

impl Walker<'_> {
    fn offset(&self) -> u64 {
        self.buffer.consumed() + self.pos as u64
    }

    /// Parse the header at the tentative position and step past it.
    fn header(&mut self) -> Result<Header, DecodeError> {
        let offset = self.offset();
        self.buffer.ensure(self.pos + 1)?;
        let tag = Tag::parse(self.buffer.window(self.pos, 1)[0]).map_err(malformed(offset))?;

        let size = tag.header_size();
        self.buffer.ensure(self.pos + size)?;
        let header =
            Header::read_from(self.buffer.window(self.pos, size)).map_err(malformed(offset))?;
        self.pos += size;
        Ok(header)
    }

    /// Walk until the value on `stack` (or a fresh one) is complete.
    ///
    /// On error `pos` is left at the start of the item that failed, and
    /// `stack` holds every container opened before it.
    fn value<B: Build>(&mut self, stack: &mut Vec<Frame<B>>) -> Result<B::Item, DecodeError> {
        loop {
            let item_start = self.pos;
            let mut item = match self.item::<B>(stack) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(e) => {
                    self.pos = item_start;
                    return Err(e);
                }
            };

            // Hand the finished item to its parent, closing every container
            // it completes along the way.
            loop {
                match stack.last_mut() {
                    None => return Ok(item),
                    Some(frame) => {
                        frame.remaining -= 1;
                        B::attach(&mut frame.partial, item);
                        if frame.remaining > 0 {
                            break;
                        }
                    }
                }
                let Some(frame) = stack.pop() else {
                    break;
                };
                item = B::finish(frame.partial);
                trace!(depth = stack.len(), "closed container");
            }
        }
    }

    /// Parse one item. A non-empty container is pushed onto `stack` and
    /// yields `None`; anything else yields the finished item.
    fn item<B: Build>(
        &mut self,
        stack: &mut Vec<Frame<B>>,
    ) -> Result<Option<B::Item>, DecodeError> {
        let offset = self.offset();
        let header = self.header()?;
        let is_map = header.tag.is_map();

        if !(header.tag.is_array() || is_map) {
            let len = header.payload_len();
            let end = self.pos.saturating_add(len);
            self.buffer.ensure(end)?;
            let item = B::scalar(&header, self.buffer.window(self.pos, len), offset)?;
            self.pos = end;
            return Ok(Some(item));
        }

        if stack.len() >= self.max_depth {
            return Err(DecodeError::StackDepthExceeded {
                limit: self.max_depth,
                offset,
            });
        }
        let entries = header.entry_count();
        if entries == 0 {
            return Ok(Some(B::empty(is_map)));
        }

        // Every entry takes at least one byte, so a count larger than what
        // is buffered cannot be trusted for preallocation.
        let buffered = (self.buffer.available() - self.pos) as u64;
        let hint = usize::try_from(entries.min(buffered)).unwrap_or(0);
        stack.push(Frame {
            remaining: entries,
            partial: B::open(is_map, hint),
        });
        trace!(depth = stack.len(), entries, offset, "opened container");
        Ok(None)
    }
}
