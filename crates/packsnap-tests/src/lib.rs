//! Fixture writer for the packsnap test suites.
//!
//! Produces the wire form of a [`Value`] so tests can state inputs as
//! values instead of hand-assembled bytes. Integers keep the encoding they
//! carry (the `From` conversions pick the minimal one); lengths and counts
//! always use the narrowest tag that fits.
//!
//! The raw header helpers exist for inputs the writer would never produce
//! on its own: wide headers around short payloads, unterminated containers,
//! and pathological nesting.

use packsnap_types::{Extension, Float, IntEncoding, Integer, Value};
use packsnap_wire::{Tag, Width};

/// Encode a single value.
#[must_use]
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(&mut out, value);
    out
}

/// Encode a sequence of values back to back, as a stream.
#[must_use]
pub fn encode_all<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        write_value(&mut out, value);
    }
    out
}

pub fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Nil => out.push(Tag::Nil.byte()),
        Value::Bool(false) => out.push(Tag::False.byte()),
        Value::Bool(true) => out.push(Tag::True.byte()),
        Value::Integer(n) => write_integer(out, n),
        Value::Float(Float::F32(v)) => {
            out.push(Tag::Float32.byte());
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::Float(Float::F64(v)) => {
            out.push(Tag::Float64.byte());
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::Str(bytes) => {
            write_str_header(out, bytes.len());
            out.extend_from_slice(bytes);
        }
        Value::Bin(bytes) => {
            write_length(out, Tag::Bin, bytes.len());
            out.extend_from_slice(bytes);
        }
        Value::Array(items) => {
            out.extend_from_slice(&array_header(items.len()));
            for item in items {
                write_value(out, item);
            }
        }
        Value::Map(entries) => {
            out.extend_from_slice(&map_header(entries.len()));
            for (key, value) in entries {
                write_value(out, key);
                write_value(out, value);
            }
        }
        Value::Ext(ext) => write_ext(out, ext),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn write_integer(out: &mut Vec<u8>, n: &Integer) {
    let bits = match (n.as_u64(), n.as_i64()) {
        (Some(v), _) => v,
        (None, Some(v)) => v as u64,
        (None, None) => unreachable!("every integer fits u64 or i64"),
    };
    match n.encoding() {
        IntEncoding::PositiveFixInt => out.push(Tag::PosFixInt(bits as u8).byte()),
        IntEncoding::NegativeFixInt => out.push(Tag::NegFixInt(bits as i8).byte()),
        IntEncoding::Unsigned(w) => {
            out.push(Tag::Uint(w).byte());
            out.extend_from_slice(&bits.to_be_bytes()[8 - w.bytes()..]);
        }
        IntEncoding::Signed(w) => {
            out.push(Tag::Int(w).byte());
            out.extend_from_slice(&bits.to_be_bytes()[8 - w.bytes()..]);
        }
    }
}

fn write_str_header(out: &mut Vec<u8>, len: usize) {
    if len < 32 {
        out.push(Tag::FixStr(small(len)).byte());
    } else {
        write_length(out, Tag::Str, len);
    }
}

fn write_ext(out: &mut Vec<u8>, ext: &Extension) {
    let len = ext.data.len();
    if matches!(len, 1 | 2 | 4 | 8 | 16) {
        out.push(Tag::FixExt(small(len)).byte());
    } else {
        write_length(out, Tag::Ext, len);
    }
    out.extend_from_slice(&ext.type_id.to_be_bytes());
    out.extend_from_slice(&ext.data);
}

/// Tag plus the narrowest 8/16/32-bit length field.
fn write_length(out: &mut Vec<u8>, family: fn(Width) -> Tag, len: usize) {
    let len = u32::try_from(len).expect("fixture payloads stay under 4 GiB");
    match len {
        0..=0xff => {
            out.push(family(Width::W8).byte());
            out.push(small(len as usize));
        }
        0x100..=0xffff => {
            out.push(family(Width::W16).byte());
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            out.push(family(Width::W32).byte());
            out.extend_from_slice(&len.to_be_bytes());
        }
    }
}

fn small(n: usize) -> u8 {
    u8::try_from(n).expect("fixed-size count fits the tag")
}

// ── Raw headers ─────────────────────────────────────────────────────────

/// Narrowest array header for `len` elements.
#[must_use]
pub fn array_header(len: usize) -> Vec<u8> {
    container_header(len, Tag::FixArray, Tag::Array)
}

/// Narrowest map header for `len` pairs.
#[must_use]
pub fn map_header(len: usize) -> Vec<u8> {
    container_header(len, Tag::FixMap, Tag::Map)
}

fn container_header(len: usize, fixed: fn(u8) -> Tag, wide: fn(Width) -> Tag) -> Vec<u8> {
    if len < 16 {
        return vec![fixed(small(len)).byte()];
    }
    let len = u32::try_from(len).expect("fixture counts stay under 2^32");
    match u16::try_from(len) {
        Ok(short) => wide_header(wide(Width::W16), u32::from(short)),
        Err(_) => wide_header(wide(Width::W32), len),
    }
}

/// A 16- or 32-bit container or string header regardless of how small
/// `len` is.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn wide_header(tag: Tag, len: u32) -> Vec<u8> {
    let mut out = vec![tag.byte()];
    match tag.length_width() {
        Some(Width::W8) => out.push(len as u8),
        Some(Width::W16) => out.extend_from_slice(&(len as u16).to_be_bytes()),
        Some(Width::W32 | Width::W64) => out.extend_from_slice(&len.to_be_bytes()),
        None => {}
    }
    out
}

/// `depth` single-element arrays wrapped around `leaf`.
#[must_use]
pub fn nested_arrays(depth: usize, leaf: &Value) -> Vec<u8> {
    let mut out = vec![Tag::FixArray(1).byte(); depth];
    write_value(&mut out, leaf);
    out
}
