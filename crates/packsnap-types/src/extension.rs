/// Extension value: an application-defined type tag plus opaque payload.
///
/// The decoder never interprets `data`; only consumers that know what
/// `type_id` means will. Negative type ids are reserved by the format for
/// predefined types, non-negative ones are free for applications.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    pub type_id: i8,
    pub data: Vec<u8>,
}

impl Extension {
    #[must_use]
    pub fn new(type_id: i8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_id,
            data: data.into(),
        }
    }

    /// Whether the type id is in the range reserved for predefined types.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.type_id < 0
    }
}
