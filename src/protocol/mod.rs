//! Protocol Layer: Packable Messages
//!
//! Prinsip desain:
//! - Self-describing: Setiap value serialize dirinya sendiri lewat `Buffer`
//! - Fixed-size frames: Setiap packet punya ID dan panjang tetap
//! - Composable: Packable boleh berisi Packable lain

mod dispatcher;
mod packable;
mod packet;
mod ping;

pub use dispatcher::Dispatcher;
pub use packable::Packable;
pub use packet::{Frame, FrameHeader, Packet, FRAME_HEADER_SIZE};
pub use ping::Ping;
