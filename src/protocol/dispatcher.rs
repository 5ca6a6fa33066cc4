//! Packet Dispatcher
//!
//! Mencocokkan identifier di reader cursor ke tipe packet terdaftar,
//! decode via `Buffer::get_pack`, lalu panggil processing hook.
//! Frame yang gagal divalidasi tidak menggeser reader cursor.

use std::collections::HashMap;

use super::packet::{FrameHeader, Packet};
use crate::core::Buffer;
use crate::error::DispatchError;

type Handler = Box<dyn FnMut(&mut Buffer)>;

struct Route {
    length: u16,
    handler: Handler,
}

/// Registry identifier → decoder + hook
#[derive(Default)]
pub struct Dispatcher {
    routes: HashMap<u8, Route>,
    dispatched: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Daftarkan tipe packet; hanya `Packet::process` yang dipanggil
    pub fn register<P: Packet + 'static>(&mut self) -> &mut Self {
        self.register_with::<P, _>(|_| {})
    }

    /// Daftarkan tipe packet dengan hook tambahan setelah `process`
    pub fn register_with<P, F>(&mut self, mut hook: F) -> &mut Self
    where
        P: Packet + 'static,
        F: FnMut(&P) + 'static,
    {
        let () = P::LENGTH_COVERS_HEADER;
        let handler = move |buffer: &mut Buffer| {
            let mut packet = P::default();
            buffer.get_pack(&mut packet);
            packet.process();
            hook(&packet);
        };

        let route = Route {
            length: P::LENGTH,
            handler: Box::new(handler),
        };
        if self.routes.insert(P::ID, route).is_some() {
            tracing::warn!(id = P::ID, "packet handler replaced");
        }
        self
    }

    #[inline(always)]
    pub fn is_registered(&self, id: u8) -> bool {
        self.routes.contains_key(&id)
    }

    /// Jumlah packet yang berhasil di-dispatch sejak dibuat
    #[inline(always)]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Decode dan proses satu packet di reader cursor
    ///
    /// Returns identifier packet. Setelah sukses, reader cursor tepat di
    /// akhir frame.
    pub fn dispatch(&mut self, buffer: &mut Buffer) -> Result<u8, DispatchError> {
        let offset = buffer.reader_offset();
        let header =
            FrameHeader::peek(buffer, offset).ok_or(DispatchError::Incomplete { offset })?;

        let Some(route) = self.routes.get_mut(&header.id) else {
            tracing::warn!(id = header.id, offset, "unknown packet id");
            return Err(DispatchError::UnknownPacket {
                id: header.id,
                offset,
            });
        };

        if header.length != route.length {
            return Err(DispatchError::LengthMismatch {
                id: header.id,
                declared: header.length,
                expected: route.length,
            });
        }

        let needed = route.length as usize;
        let available = buffer.remaining();
        if available < needed {
            return Err(DispatchError::Truncated {
                id: header.id,
                needed,
                available,
            });
        }

        (route.handler)(buffer);
        buffer.set_reader_offset(offset + needed);
        self.dispatched += 1;

        tracing::debug!(id = header.id, offset, length = needed, "packet dispatched");
        Ok(header.id)
    }

    /// Dispatch sampai buffer habis dibaca
    ///
    /// Berhenti di error pertama; packet sebelumnya sudah diproses.
    /// Setiap dispatch sukses memajukan reader minimal `FRAME_HEADER_SIZE`.
    pub fn dispatch_all(&mut self, buffer: &mut Buffer) -> Result<usize, DispatchError> {
        let mut count = 0;
        while buffer.remaining() > 0 {
            self.dispatch(buffer)?;
            count += 1;
        }
        Ok(count)
    }
}
