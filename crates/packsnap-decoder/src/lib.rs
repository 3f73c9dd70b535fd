#![warn(clippy::pedantic)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod source;
pub mod unpacker;

mod decoder;

pub use buffer::{Buffer, Pull};
pub use config::UnpackerConfig;
pub use error::DecodeError;
pub use source::{ByteSource, ReaderSource};
pub use unpacker::{Unpacker, Values};

pub use packsnap_types::{ContainerKind, Extension, Float, IntEncoding, Integer, Value, ValueKind};
