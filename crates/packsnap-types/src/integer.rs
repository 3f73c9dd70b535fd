use std::fmt;
use std::hash::{Hash, Hasher};

use packsnap_wire::{Tag, Width};

/// The wire form an integer was decoded from.
///
/// Kept on [`Integer`] so callers can tell a `uint64` from a positive
/// fixint, but it never takes part in equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntEncoding {
    PositiveFixInt,
    NegativeFixInt,
    Unsigned(Width),
    Signed(Width),
}

impl IntEncoding {
    /// The encoding carried by an integer tag, if the tag is one.
    #[must_use]
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            Tag::PosFixInt(_) => Some(Self::PositiveFixInt),
            Tag::NegFixInt(_) => Some(Self::NegativeFixInt),
            Tag::Uint(w) => Some(Self::Unsigned(w)),
            Tag::Int(w) => Some(Self::Signed(w)),
            _ => None,
        }
    }

    /// Whether the tag used a signed representation.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::NegativeFixInt | Self::Signed(_))
    }

    /// Payload bytes after the tag (zero for fixints).
    #[must_use]
    pub const fn payload_bytes(self) -> usize {
        match self {
            Self::PositiveFixInt | Self::NegativeFixInt => 0,
            Self::Unsigned(w) | Self::Signed(w) => w.bytes(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum N {
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
}

/// An integer covering the whole `u64` and `i64` range.
///
/// Non-negative numbers are normalised to an unsigned representation, so
/// an `int8` holding `5` and a positive fixint `5` compare equal; the
/// original encoding is still available through [`encoding`](Self::encoding).
#[derive(Clone, Copy, Debug)]
pub struct Integer {
    n: N,
    encoding: IntEncoding,
}

impl Integer {
    #[must_use]
    pub fn from_u64(value: u64, encoding: IntEncoding) -> Self {
        Self {
            n: N::PosInt(value),
            encoding,
        }
    }

    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_i64(value: i64, encoding: IntEncoding) -> Self {
        let n = if value < 0 {
            N::NegInt(value)
        } else {
            N::PosInt(value as u64)
        };
        Self { n, encoding }
    }

    #[must_use]
    pub const fn encoding(&self) -> IntEncoding {
        self.encoding
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        matches!(self.n, N::NegInt(_))
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(v) => Some(v),
            N::NegInt(_) => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(v) => i64::try_from(v).ok(),
            N::NegInt(v) => Some(v),
        }
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        match (self.n, other.n) {
            (N::PosInt(a), N::PosInt(b)) => a == b,
            (N::NegInt(a), N::NegInt(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Integer {}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.n {
            N::PosInt(v) => (0u8, v).hash(state),
            N::NegInt(v) => (1u8, v).hash(state),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            N::PosInt(v) => write!(f, "{v}"),
            N::NegInt(v) => write!(f, "{v}"),
        }
    }
}

// Conversions pick the encoding a minimal writer would have used, which
// keeps hand-built expectations readable in tests.

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        let encoding = match value {
            0..=0x7f => IntEncoding::PositiveFixInt,
            0x80..=0xff => IntEncoding::Unsigned(Width::W8),
            0x100..=0xffff => IntEncoding::Unsigned(Width::W16),
            0x1_0000..=0xffff_ffff => IntEncoding::Unsigned(Width::W32),
            _ => IntEncoding::Unsigned(Width::W64),
        };
        Self::from_u64(value, encoding)
    }
}

impl From<i64> for Integer {
    #[allow(clippy::cast_sign_loss)]
    fn from(value: i64) -> Self {
        if value >= 0 {
            return Self::from(value as u64);
        }
        let encoding = match value {
            -32..=-1 => IntEncoding::NegativeFixInt,
            -0x80..=-33 => IntEncoding::Signed(Width::W8),
            -0x8000..=-0x81 => IntEncoding::Signed(Width::W16),
            -0x8000_0000..=-0x8001 => IntEncoding::Signed(Width::W32),
            _ => IntEncoding::Signed(Width::W64),
        };
        Self::from_i64(value, encoding)
    }
}

macro_rules! integer_from {
    ($($unsigned:ty),* ; $($signed:ty),*) => {
        $(impl From<$unsigned> for Integer {
            fn from(value: $unsigned) -> Self {
                Self::from(u64::from(value))
            }
        })*
        $(impl From<$signed> for Integer {
            fn from(value: $signed) -> Self {
                Self::from(i64::from(value))
            }
        })*
    };
}

integer_from!(u8, u16, u32; i8, i16, i32);
