#![warn(clippy::pedantic)]

pub mod error;
pub mod header;
pub mod scalar;
pub mod tag;

pub use error::WireError;
pub use header::Header;
pub use tag::{Tag, Width};
