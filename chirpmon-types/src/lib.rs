pub mod error;
pub mod frame;
pub mod header;
pub mod slot;

pub use error::*;
pub use frame::*;
pub use header::*;
pub use slot::*;
