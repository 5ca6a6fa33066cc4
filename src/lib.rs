//! Packbuf - Fixed-Capacity Binary Serialization Buffer
//!
//! Arsitektur:
//! - Buffer: Satu region byte, reader/writer cursor independen
//! - Typed access: Scalar fixed-width (termasuk half-precision) little-endian
//! - Strings: Variable (null-terminated) dan fixed-size (padded/truncated)
//! - Packable: Value serialize dirinya sendiri, bisa nested
//! - Packets: Frame fixed-length dengan ID + dispatcher

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;

pub use crate::config::Config;
pub use crate::core::{Buffer, Half, Scalar, DEFAULT_CAPACITY};
pub use crate::error::{ConfigError, DispatchError};
pub use crate::protocol::{Dispatcher, Frame, Packable, Packet, Ping};
