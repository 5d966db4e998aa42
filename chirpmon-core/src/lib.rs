//! Ядро разбора телеметрии chirp
//!
//! Синхронизация по маркеру, чтение кадров фиксированного размера, разбор
//! заголовка и I/Q блоков, статистика амплитуд и маршрутизация по слотам.
//!
//! # Быстрый старт
//!
//! ```
//! use chirpmon_core::{route_packet, FrameBuilder, FrameSync, L7gHeaderDecoder, PacketDecoder};
//! use chirpmon_types::Header;
//! use std::io::Cursor;
//!
//! let bytes = FrameBuilder::new(Header::new(0)).to_bytes();
//! let mut sync = FrameSync::new(Cursor::new(bytes));
//! let packet = PacketDecoder::new(L7gHeaderDecoder).decode(sync.next_frame()?);
//! let updates = route_packet(&packet, 1)?;
//! assert_eq!(updates[0].label, "ASIC 4 FROM 1");
//! # Ok::<(), chirpmon_types::ChirpError>(())
//! ```

pub mod binary;
pub mod builder;
pub mod decoder;
pub mod display;
pub mod header;
pub mod routing;
pub mod stats;
pub mod sync;

pub use builder::*;
pub use decoder::*;
pub use display::*;
pub use header::*;
pub use routing::*;
pub use stats::*;
pub use sync::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
