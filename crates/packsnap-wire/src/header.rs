use crate::error::WireError;
use crate::scalar::read_length;
use crate::tag::{Tag, Width};

/// A value header: the tag plus any length/count field, without the payload
/// or container elements.
///
/// ```text
/// ┌──────────┬──────────────────────┬────────────────┬───────────────────┐
/// │ tag (1)  │ length/count (0..4)  │ ext type (0/1) │ payload / entries │
/// └──────────┴──────────────────────┴────────────────┴───────────────────┘
///  \_____________________ Header::size __________________/
/// ```
///
/// For strings, binaries and extensions `len` is the payload length in
/// bytes. For arrays it is the element count, for maps the pair count. For
/// every other tag it is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub tag: Tag,
    pub len: u32,
    /// Application type byte of an extension.
    pub ext_type: Option<i8>,
}

impl Header {
    /// Parse a header from the start of `buf`.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnassignedTag`] if the first byte is `0xc1`.
    /// - [`WireError::Truncated`] if `buf` ends inside the header.
    #[allow(clippy::cast_possible_wrap)]
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        let first = *buf.first().ok_or(WireError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let tag = Tag::parse(first)?;

        let size = tag.header_size();
        if buf.len() < size {
            return Err(WireError::Truncated {
                needed: size,
                available: buf.len(),
            });
        }

        let len = match tag {
            Tag::FixMap(n) | Tag::FixArray(n) | Tag::FixStr(n) | Tag::FixExt(n) => u32::from(n),
            Tag::Bin(w) | Tag::Str(w) | Tag::Array(w) | Tag::Map(w) | Tag::Ext(w) => {
                read_length(w, &buf[1..])?
            }
            _ => 0,
        };

        let ext_type = match tag {
            Tag::Ext(_) | Tag::FixExt(_) => Some(buf[size - 1] as i8),
            _ => None,
        };

        Ok(Self { tag, len, ext_type })
    }

    /// Bytes occupied by the header itself.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.tag.header_size()
    }

    /// Bytes of payload that directly follow the header.
    ///
    /// Zero for containers: their elements are values in their own right and
    /// are walked one by one.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self.tag {
            Tag::Uint(w) | Tag::Int(w) => w.bytes(),
            Tag::Float32 => Width::W32.bytes(),
            Tag::Float64 => Width::W64.bytes(),
            Tag::FixStr(_) | Tag::Str(_) | Tag::Bin(_) | Tag::Ext(_) | Tag::FixExt(_) => {
                self.len as usize
            }
            _ => 0,
        }
    }

    /// Number of values that follow as container entries: elements for an
    /// array, keys plus values for a map.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        if self.tag.is_map() {
            u64::from(self.len) * 2
        } else if self.tag.is_array() {
            u64::from(self.len)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_headers_are_one_byte() {
        let header = Header::read_from(&[0xcd, 0x01, 0x00]).unwrap();
        assert_eq!(header.tag, Tag::Uint(Width::W16));
        assert_eq!(header.size(), 1);
        assert_eq!(header.payload_len(), 2);
        assert_eq!(header.entry_count(), 0);
    }

    #[test]
    fn str8_header_carries_length() {
        let header = Header::read_from(&[0xd9, 0x05, b'h']).unwrap();
        assert_eq!(header.len, 5);
        assert_eq!(header.size(), 2);
        assert_eq!(header.payload_len(), 5);
    }

    #[test]
    fn map16_counts_keys_and_values() {
        let header = Header::read_from(&[0xde, 0x00, 0x03]).unwrap();
        assert_eq!(header.len, 3);
        assert_eq!(header.entry_count(), 6);
        assert_eq!(header.payload_len(), 0);
    }

    #[test]
    fn array32_header() {
        let header = Header::read_from(&[0xdd, 0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(header.tag, Tag::Array(Width::W32));
        assert_eq!(header.len, 65_536);
        assert_eq!(header.entry_count(), 65_536);
    }

    #[test]
    fn ext_headers_carry_type_byte() {
        let fixed = Header::read_from(&[0xd6, 0xff, 1, 2, 3, 4]).unwrap();
        assert_eq!(fixed.ext_type, Some(-1));
        assert_eq!(fixed.payload_len(), 4);

        let ext16 = Header::read_from(&[0xc8, 0x01, 0x00, 0x07]).unwrap();
        assert_eq!(ext16.ext_type, Some(7));
        assert_eq!(ext16.size(), 4);
        assert_eq!(ext16.payload_len(), 256);
    }

    #[test]
    fn truncated_count_field() {
        let result = Header::read_from(&[0xdd, 0x00, 0x00]);
        assert_eq!(
            result,
            Err(WireError::Truncated {
                needed: 5,
                available: 3
            })
        );
    }

    #[test]
    fn empty_and_unassigned() {
        assert!(matches!(
            Header::read_from(&[]),
            Err(WireError::Truncated { needed: 1, .. })
        ));
        assert_eq!(
            Header::read_from(&[0xc1]),
            Err(WireError::UnassignedTag { tag: 0xc1 })
        );
    }
}
