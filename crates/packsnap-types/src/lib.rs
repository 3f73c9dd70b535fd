#![warn(clippy::pedantic)]

pub mod extension;
pub mod integer;
pub mod kind;
pub mod value;

pub use extension::Extension;
pub use integer::{IntEncoding, Integer};
pub use kind::{ContainerKind, ValueKind};
pub use value::{Float, Value};
