use crate::error::WireError;

/// Raw tag byte values of the MessagePack tag table.
///
/// Every encoded value starts with exactly one of these bytes. Ranged
/// families (fixint, fixmap, fixarray, fixstr) carry their payload or count
/// in the low bits of the tag itself.
pub mod marker {
    pub const POS_FIXINT_MAX: u8 = 0x7f;
    pub const FIXMAP: u8 = 0x80;
    pub const FIXARRAY: u8 = 0x90;
    pub const FIXSTR: u8 = 0xa0;
    pub const NIL: u8 = 0xc0;
    pub const UNASSIGNED: u8 = 0xc1;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const BIN8: u8 = 0xc4;
    pub const BIN16: u8 = 0xc5;
    pub const BIN32: u8 = 0xc6;
    pub const EXT8: u8 = 0xc7;
    pub const EXT16: u8 = 0xc8;
    pub const EXT32: u8 = 0xc9;
    pub const FLOAT32: u8 = 0xca;
    pub const FLOAT64: u8 = 0xcb;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    pub const INT8: u8 = 0xd0;
    pub const INT16: u8 = 0xd1;
    pub const INT32: u8 = 0xd2;
    pub const INT64: u8 = 0xd3;
    pub const FIXEXT1: u8 = 0xd4;
    pub const FIXEXT2: u8 = 0xd5;
    pub const FIXEXT4: u8 = 0xd6;
    pub const FIXEXT8: u8 = 0xd7;
    pub const FIXEXT16: u8 = 0xd8;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;
    pub const NEG_FIXINT_MIN: u8 = 0xe0;
}

/// Width of a big-endian field following a tag.
///
/// Used both for length/count fields (8, 16 or 32 bits) and for fixed-size
/// integer payloads (8 to 64 bits).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Number of bytes the field occupies on the wire.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// The offset of this width inside a run of four consecutive tags
    /// (`uint8..uint64`, `int8..int64`).
    const fn from_offset(offset: u8) -> Self {
        match offset & 0x03 {
            0 => Self::W8,
            1 => Self::W16,
            2 => Self::W32,
            _ => Self::W64,
        }
    }

    const fn offset(self) -> u8 {
        match self {
            Self::W8 => 0,
            Self::W16 => 1,
            Self::W32 => 2,
            Self::W64 => 3,
        }
    }
}

/// A classified tag byte.
///
/// [`Tag::parse`] is the single dispatch table of the format: it maps each of
/// the 256 byte values to exactly one variant, except `0xc1`, which is
/// unassigned.
///
/// ```text
/// ┌───────────────┬───────────────────┬──────────────┬──────────────────────┐
/// │ Tag range     │ Variant           │ Length field │ Payload              │
/// ├───────────────┼───────────────────┼──────────────┼──────────────────────┤
/// │ 0x00..=0x7f   │ PosFixInt(n)      │ -            │ -                    │
/// │ 0x80..=0x8f   │ FixMap(n)         │ -            │ n key/value pairs    │
/// │ 0x90..=0x9f   │ FixArray(n)       │ -            │ n values             │
/// │ 0xa0..=0xbf   │ FixStr(n)         │ -            │ n bytes              │
/// │ 0xc0          │ Nil               │ -            │ -                    │
/// │ 0xc1          │ (unassigned)      │              │                      │
/// │ 0xc2 / 0xc3   │ False / True      │ -            │ -                    │
/// │ 0xc4..=0xc6   │ Bin(W8..W32)      │ 1 / 2 / 4    │ n bytes              │
/// │ 0xc7..=0xc9   │ Ext(W8..W32)      │ 1 / 2 / 4    │ type + n bytes       │
/// │ 0xca / 0xcb   │ Float32 / Float64 │ -            │ 4 / 8 bytes          │
/// │ 0xcc..=0xcf   │ Uint(W8..W64)     │ -            │ 1 / 2 / 4 / 8 bytes  │
/// │ 0xd0..=0xd3   │ Int(W8..W64)      │ -            │ 1 / 2 / 4 / 8 bytes  │
/// │ 0xd4..=0xd8   │ FixExt(n)         │ -            │ type + 1..16 bytes   │
/// │ 0xd9..=0xdb   │ Str(W8..W32)      │ 1 / 2 / 4    │ n bytes              │
/// │ 0xdc / 0xdd   │ Array(W16 / W32)  │ 2 / 4        │ n values             │
/// │ 0xde / 0xdf   │ Map(W16 / W32)    │ 2 / 4        │ n key/value pairs    │
/// │ 0xe0..=0xff   │ NegFixInt(n)      │ -            │ -                    │
/// └───────────────┴───────────────────┴──────────────┴──────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    PosFixInt(u8),
    FixMap(u8),
    FixArray(u8),
    FixStr(u8),
    Nil,
    False,
    True,
    Bin(Width),
    Ext(Width),
    Float32,
    Float64,
    Uint(Width),
    Int(Width),
    /// Fixed-size extension; the value is the payload size (1, 2, 4, 8 or 16).
    FixExt(u8),
    Str(Width),
    Array(Width),
    Map(Width),
    NegFixInt(i8),
}

impl Tag {
    /// Classify a tag byte.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnassignedTag`] for `0xc1`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn parse(byte: u8) -> Result<Self, WireError> {
        use marker::{
            ARRAY16, ARRAY32, BIN8, BIN16, BIN32, EXT8, EXT16, EXT32, FALSE, FIXARRAY, FIXEXT1,
            FIXEXT2, FIXEXT4, FIXEXT8, FIXEXT16, FIXMAP, FIXSTR, FLOAT32, FLOAT64, INT8, INT64,
            MAP16, MAP32, NEG_FIXINT_MIN, NIL, POS_FIXINT_MAX, STR8, STR16, STR32, TRUE, UINT8,
            UINT64,
        };

        let tag = match byte {
            0x00..=POS_FIXINT_MAX => Self::PosFixInt(byte),
            0x80..=0x8f => Self::FixMap(byte - FIXMAP),
            0x90..=0x9f => Self::FixArray(byte - FIXARRAY),
            0xa0..=0xbf => Self::FixStr(byte - FIXSTR),
            NIL => Self::Nil,
            FALSE => Self::False,
            TRUE => Self::True,
            BIN8 => Self::Bin(Width::W8),
            BIN16 => Self::Bin(Width::W16),
            BIN32 => Self::Bin(Width::W32),
            EXT8 => Self::Ext(Width::W8),
            EXT16 => Self::Ext(Width::W16),
            EXT32 => Self::Ext(Width::W32),
            FLOAT32 => Self::Float32,
            FLOAT64 => Self::Float64,
            UINT8..=UINT64 => Self::Uint(Width::from_offset(byte - UINT8)),
            INT8..=INT64 => Self::Int(Width::from_offset(byte - INT8)),
            FIXEXT1 => Self::FixExt(1),
            FIXEXT2 => Self::FixExt(2),
            FIXEXT4 => Self::FixExt(4),
            FIXEXT8 => Self::FixExt(8),
            FIXEXT16 => Self::FixExt(16),
            STR8 => Self::Str(Width::W8),
            STR16 => Self::Str(Width::W16),
            STR32 => Self::Str(Width::W32),
            ARRAY16 => Self::Array(Width::W16),
            ARRAY32 => Self::Array(Width::W32),
            MAP16 => Self::Map(Width::W16),
            MAP32 => Self::Map(Width::W32),
            NEG_FIXINT_MIN..=0xff => Self::NegFixInt(byte as i8),
            _ => return Err(WireError::UnassignedTag { tag: byte }),
        };
        Ok(tag)
    }

    /// The tag byte this variant is written as.
    ///
    /// Inverse of [`parse`](Self::parse) for every variant `parse` produces.
    /// Widths that the format does not define for a family (for example
    /// `Array(W8)`) map to the nearest defined tag.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn byte(self) -> u8 {
        match self {
            Self::PosFixInt(n) => n & marker::POS_FIXINT_MAX,
            Self::FixMap(n) => marker::FIXMAP | (n & 0x0f),
            Self::FixArray(n) => marker::FIXARRAY | (n & 0x0f),
            Self::FixStr(n) => marker::FIXSTR | (n & 0x1f),
            Self::Nil => marker::NIL,
            Self::False => marker::FALSE,
            Self::True => marker::TRUE,
            Self::Bin(w) => marker::BIN8 + w.offset().min(2),
            Self::Ext(w) => marker::EXT8 + w.offset().min(2),
            Self::Float32 => marker::FLOAT32,
            Self::Float64 => marker::FLOAT64,
            Self::Uint(w) => marker::UINT8 + w.offset(),
            Self::Int(w) => marker::INT8 + w.offset(),
            Self::FixExt(n) => match n {
                1 => marker::FIXEXT1,
                2 => marker::FIXEXT2,
                4 => marker::FIXEXT4,
                8 => marker::FIXEXT8,
                _ => marker::FIXEXT16,
            },
            Self::Str(w) => marker::STR8 + w.offset().min(2),
            Self::Array(Width::W32 | Width::W64) => marker::ARRAY32,
            Self::Array(_) => marker::ARRAY16,
            Self::Map(Width::W32 | Width::W64) => marker::MAP32,
            Self::Map(_) => marker::MAP16,
            Self::NegFixInt(n) => (n as u8) | marker::NEG_FIXINT_MIN,
        }
    }

    /// Width of the length/count field that follows the tag, if any.
    #[must_use]
    pub const fn length_width(self) -> Option<Width> {
        match self {
            Self::Bin(w) | Self::Ext(w) | Self::Str(w) | Self::Array(w) | Self::Map(w) => Some(w),
            _ => None,
        }
    }

    /// Total header size: tag byte, length/count field and, for
    /// extensions, the type byte.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            Self::Bin(w) | Self::Str(w) | Self::Array(w) | Self::Map(w) => 1 + w.bytes(),
            Self::Ext(w) => 2 + w.bytes(),
            Self::FixExt(_) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn is_nil(self) -> bool {
        matches!(self, Self::Nil)
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::FixArray(_) | Self::Array(_))
    }

    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::FixMap(_) | Self::Map(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_c1_is_unassigned() {
        for byte in 0..=u8::MAX {
            let result = Tag::parse(byte);
            if byte == marker::UNASSIGNED {
                assert_eq!(result, Err(WireError::UnassignedTag { tag: 0xc1 }));
            } else {
                assert!(result.is_ok(), "byte {byte:#04x} should be assigned");
            }
        }
    }

    #[test]
    fn byte_inverts_parse_for_every_assigned_tag() {
        for byte in (0..=u8::MAX).filter(|&b| b != marker::UNASSIGNED) {
            let tag = Tag::parse(byte).unwrap();
            assert_eq!(tag.byte(), byte, "tag {tag:?}");
        }
    }

    #[test]
    fn fix_families_carry_count_in_low_bits() {
        assert_eq!(Tag::parse(0x93).unwrap(), Tag::FixArray(3));
        assert_eq!(Tag::parse(0x8f).unwrap(), Tag::FixMap(15));
        assert_eq!(Tag::parse(0xbf).unwrap(), Tag::FixStr(31));
        assert_eq!(Tag::parse(0xff).unwrap(), Tag::NegFixInt(-1));
        assert_eq!(Tag::parse(0xe0).unwrap(), Tag::NegFixInt(-32));
    }

    #[test]
    fn integer_runs_map_to_widths() {
        assert_eq!(Tag::parse(0xcc).unwrap(), Tag::Uint(Width::W8));
        assert_eq!(Tag::parse(0xcf).unwrap(), Tag::Uint(Width::W64));
        assert_eq!(Tag::parse(0xd1).unwrap(), Tag::Int(Width::W16));
        assert_eq!(Tag::parse(0xd2).unwrap(), Tag::Int(Width::W32));
    }

    #[test]
    fn header_sizes() {
        assert_eq!(Tag::Nil.header_size(), 1);
        assert_eq!(Tag::Uint(Width::W64).header_size(), 1);
        assert_eq!(Tag::Str(Width::W8).header_size(), 2);
        assert_eq!(Tag::Array(Width::W32).header_size(), 5);
        assert_eq!(Tag::Ext(Width::W16).header_size(), 4);
        assert_eq!(Tag::FixExt(16).header_size(), 2);
    }

    #[test]
    fn container_predicates() {
        assert!(Tag::FixArray(0).is_array());
        assert!(Tag::Array(Width::W16).is_array());
        assert!(!Tag::FixMap(1).is_array());
        assert!(Tag::Map(Width::W32).is_map());
        assert!(Tag::Nil.is_nil());
    }
}
