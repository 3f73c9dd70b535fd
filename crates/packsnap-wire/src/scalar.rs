//! Big-endian scalar field readers.
//!
//! Each reader takes a slice that starts at the field and returns the
//! decoded value. Only the leading bytes are read; trailing bytes are left
//! alone, so callers can pass a view of the rest of the buffer.

use crate::error::WireError;
use crate::tag::Width;

fn field<const N: usize>(buf: &[u8]) -> Result<[u8; N], WireError> {
    buf.get(..N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(WireError::Truncated {
            needed: N,
            available: buf.len(),
        })
}

/// Read an unsigned integer of the given width.
///
/// # Errors
///
/// [`WireError::Truncated`] if `buf` is shorter than the width.
pub fn read_uint(width: Width, buf: &[u8]) -> Result<u64, WireError> {
    Ok(match width {
        Width::W8 => u64::from(field::<1>(buf)?[0]),
        Width::W16 => u64::from(u16::from_be_bytes(field(buf)?)),
        Width::W32 => u64::from(u32::from_be_bytes(field(buf)?)),
        Width::W64 => u64::from_be_bytes(field(buf)?),
    })
}

/// Read a two's-complement signed integer of the given width.
///
/// # Errors
///
/// [`WireError::Truncated`] if `buf` is shorter than the width.
pub fn read_int(width: Width, buf: &[u8]) -> Result<i64, WireError> {
    Ok(match width {
        Width::W8 => i64::from(i8::from_be_bytes(field(buf)?)),
        Width::W16 => i64::from(i16::from_be_bytes(field(buf)?)),
        Width::W32 => i64::from(i32::from_be_bytes(field(buf)?)),
        Width::W64 => i64::from_be_bytes(field(buf)?),
    })
}

/// Read a length or count field. Lengths are capped at 32 bits.
///
/// # Errors
///
/// [`WireError::Truncated`] if `buf` is too short, or
/// [`WireError::LengthOverflow`] for a 64-bit field holding a value above
/// `u32::MAX`.
pub fn read_length(width: Width, buf: &[u8]) -> Result<u32, WireError> {
    let value = read_uint(width, buf)?;
    u32::try_from(value).map_err(|_| WireError::LengthOverflow { value })
}

/// Read an IEEE 754 single-precision float.
///
/// # Errors
///
/// [`WireError::Truncated`] if fewer than 4 bytes are given.
pub fn read_f32(buf: &[u8]) -> Result<f32, WireError> {
    Ok(f32::from_be_bytes(field(buf)?))
}

/// Read an IEEE 754 double-precision float.
///
/// # Errors
///
/// [`WireError::Truncated`] if fewer than 8 bytes are given.
pub fn read_f64(buf: &[u8]) -> Result<f64, WireError> {
    Ok(f64::from_be_bytes(field(buf)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_widths_are_big_endian() {
        assert_eq!(read_uint(Width::W8, &[0xff]).unwrap(), 255);
        assert_eq!(read_uint(Width::W16, &[0x01, 0x00]).unwrap(), 256);
        assert_eq!(read_uint(Width::W32, &[0x00, 0x01, 0x00, 0x00]).unwrap(), 65_536);
        assert_eq!(read_uint(Width::W64, &[0xff; 8]).unwrap(), u64::MAX);
    }

    #[test]
    fn int_widths_sign_extend() {
        assert_eq!(read_int(Width::W8, &[0x80]).unwrap(), -128);
        assert_eq!(read_int(Width::W16, &[0xff, 0xfe]).unwrap(), -2);
        assert_eq!(read_int(Width::W32, &[0x7f, 0xff, 0xff, 0xff]).unwrap(), i64::from(i32::MAX));
        assert_eq!(
            read_int(Width::W64, &[0x80, 0, 0, 0, 0, 0, 0, 0]).unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(read_uint(Width::W16, &[0x00, 0x2a, 0xde, 0xad]).unwrap(), 42);
    }

    #[test]
    fn short_slice_is_truncated() {
        assert_eq!(
            read_uint(Width::W32, &[0x00, 0x01]),
            Err(WireError::Truncated {
                needed: 4,
                available: 2
            })
        );
        assert!(matches!(read_f64(&[0; 7]), Err(WireError::Truncated { needed: 8, .. })));
    }

    #[test]
    fn floats() {
        assert_eq!(read_f32(&1.5f32.to_be_bytes()).unwrap(), 1.5);
        assert_eq!(read_f64(&(-0.25f64).to_be_bytes()).unwrap(), -0.25);
    }

    #[test]
    fn length_over_32_bits_is_rejected() {
        let bytes = (u64::from(u32::MAX) + 1).to_be_bytes();
        assert!(matches!(
            read_length(Width::W64, &bytes),
            Err(WireError::LengthOverflow { .. })
        ));
        assert_eq!(read_length(Width::W32, &[0xff; 4]).unwrap(), u32::MAX);
    }
}
