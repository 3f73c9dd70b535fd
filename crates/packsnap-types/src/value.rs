use std::fmt;

use crate::extension::Extension;
use crate::integer::Integer;
use crate::kind::ValueKind;

/// A floating-point value, keeping the width it was encoded with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Float {
    F32(f32),
    F64(f64),
}

impl Float {
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
        }
    }
}

/// A decoded value.
///
/// Every decode produces a fresh tree; nothing is shared or interned.
///
/// ```text
///   Value
///   ├── Nil
///   ├── Bool(bool)
///   ├── Integer(Integer)        ← u64 / i64 range, wire encoding kept
///   ├── Float(Float)            ← F32 / F64
///   ├── Str(Vec<u8>)            ← raw bytes, UTF-8 not enforced
///   ├── Bin(Vec<u8>)
///   ├── Array(Vec<Value>)
///   ├── Map(Vec<(Value, Value)>) ← wire order, duplicate keys kept
///   └── Ext(Extension)
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(Integer),
    Float(Float),
    /// String payload exactly as encoded. Use [`Value::as_str`] for a
    /// checked UTF-8 view.
    Str(Vec<u8>),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Ext(Extension),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Bin(_) => ValueKind::Bin,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
            Self::Ext(_) => ValueKind::Ext,
        }
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => n.as_u64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f.as_f64()),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str` holding valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Raw payload of a `Str` or `Bin`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(bytes) | Self::Bin(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ext(&self) -> Option<&Extension> {
        match self {
            Self::Ext(ext) => Some(ext),
            _ => None,
        }
    }

    /// First value stored under `key` in a map. Later duplicates are not
    /// consulted.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Shorthand for a text `Str`.
    #[must_use]
    pub fn str(text: &str) -> Self {
        Self::Str(text.as_bytes().to_vec())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Self::Integer(Integer::from(value))
            }
        })*
    };
}

value_from_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(Float::F32(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(Float::F64(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::str(value)
    }
}

impl From<Extension> for Value {
    fn from(value: Extension) -> Self {
        Self::Ext(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "h'{}'", hex::encode(bytes))
}

/// Compact text rendering, stable enough for snapshot tests.
///
/// ```text
///   nil  true  42  -7  1.5  1.5f32  "text"  h'00ff'  [1, 2]  {"k": 1}  ext(3, h'01')
/// ```
///
/// A `Str` that is not valid UTF-8 renders as `str(h'..')`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(Float::F32(v)) => write!(f, "{v:?}f32"),
            Self::Float(Float::F64(v)) => write!(f, "{v:?}"),
            Self::Str(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => write!(f, "{text:?}"),
                Err(_) => {
                    f.write_str("str(")?;
                    write_hex(f, bytes)?;
                    f.write_str(")")
                }
            },
            Self::Bin(bytes) => write_hex(f, bytes),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Ext(ext) => {
                write!(f, "ext({}, ", ext.type_id)?;
                write_hex(f, &ext.data)?;
                f.write_str(")")
            }
        }
    }
}
