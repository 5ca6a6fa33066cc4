//! Ping message (keep-alive / latency probe)
//!
//! Body: `ping_value: u32`, sisa frame di-pad ke 16 bytes.

use super::packable::Packable;
use super::packet::{Frame, Packet};
use crate::core::Buffer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ping {
    ping_value: u32,
    processed: bool,
}

impl Ping {
    pub fn new(ping_value: u32) -> Self {
        Self {
            ping_value,
            processed: false,
        }
    }

    #[inline(always)]
    pub fn ping_value(&self) -> u32 {
        self.ping_value
    }

    #[inline(always)]
    pub fn set_ping_value(&mut self, ping_value: u32) {
        self.ping_value = ping_value;
    }

    /// `true` setelah `process` dipanggil
    #[inline(always)]
    pub fn is_processed(&self) -> bool {
        self.processed
    }
}

impl Packable for Ping {
    fn pack(&self, buffer: &mut Buffer) {
        let frame = Frame::begin::<Self>(buffer);
        buffer.add(self.ping_value);
        frame.end(buffer);
    }

    fn unpack(&mut self, buffer: &mut Buffer) {
        let Some(frame) = Frame::open::<Self>(buffer) else {
            return;
        };
        self.ping_value = buffer.get();
        frame.close(buffer);
    }
}

impl Packet for Ping {
    const ID: u8 = 0x59;
    const LENGTH: u16 = 16;

    fn process(&mut self) {
        tracing::debug!(ping_value = self.ping_value, "ping received");
        self.processed = true;
    }
}
