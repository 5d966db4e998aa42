//! Little-endian помощники для полей заголовка.

pub mod read;
pub mod write;

pub use read::*;
pub use write::*;
