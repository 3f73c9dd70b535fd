use std::fmt;

use packsnap_wire::Tag;

/// Discriminant of a [`Value`](crate::Value), also derivable from a bare tag
/// without decoding the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Integer,
    Float,
    Str,
    Bin,
    Array,
    Map,
    Ext,
}

impl ValueKind {
    #[must_use]
    pub const fn of(tag: Tag) -> Self {
        match tag {
            Tag::Nil => Self::Nil,
            Tag::False | Tag::True => Self::Bool,
            Tag::PosFixInt(_) | Tag::NegFixInt(_) | Tag::Uint(_) | Tag::Int(_) => Self::Integer,
            Tag::Float32 | Tag::Float64 => Self::Float,
            Tag::FixStr(_) | Tag::Str(_) => Self::Str,
            Tag::Bin(_) => Self::Bin,
            Tag::FixArray(_) | Tag::Array(_) => Self::Array,
            Tag::FixMap(_) | Tag::Map(_) => Self::Map,
            Tag::Ext(_) | Tag::FixExt(_) => Self::Ext,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bin => "bin",
            Self::Array => "array",
            Self::Map => "map",
            Self::Ext => "ext",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two container kinds whose headers can be read on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    Map,
}

impl ContainerKind {
    /// Whether `tag` opens a container of this kind.
    #[must_use]
    pub const fn matches(self, tag: Tag) -> bool {
        match self {
            Self::Array => tag.is_array(),
            Self::Map => tag.is_map(),
        }
    }
}

impl From<ContainerKind> for ValueKind {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Array => Self::Array,
            ContainerKind::Map => Self::Map,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ValueKind::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packsnap_wire::Width;

    #[test]
    fn kinds_from_tags() {
        assert_eq!(ValueKind::of(Tag::NegFixInt(-3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(Tag::FixStr(0)), ValueKind::Str);
        assert_eq!(ValueKind::of(Tag::Map(Width::W16)), ValueKind::Map);
        assert_eq!(ValueKind::of(Tag::FixExt(8)), ValueKind::Ext);
    }

    #[test]
    fn container_matching() {
        assert!(ContainerKind::Array.matches(Tag::FixArray(2)));
        assert!(!ContainerKind::Array.matches(Tag::FixMap(2)));
        assert!(ContainerKind::Map.matches(Tag::Map(Width::W32)));
        assert_eq!(ContainerKind::Map.to_string(), "map");
    }
}
