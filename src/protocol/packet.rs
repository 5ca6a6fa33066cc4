//! Fixed-Length Packet Frame
//!
//! Layout (selalu tepat `LENGTH` bytes):
//! ┌──────────┬──────────────┬──────────────────┬─────────────┐
//! │ id: u8   │ length: u16  │ body (per type)  │ zero pad    │
//! └──────────┴──────────────┴──────────────────┴─────────────┘
//!
//! Body ditulis lewat primitive `Buffer` biasa dan harus muat dalam
//! `LENGTH - FRAME_HEADER_SIZE`. `Frame` menjaga agar cursor berakhir
//! di `start + LENGTH`.

use super::packable::Packable;
use crate::core::Buffer;

/// Ukuran header frame: id (u8) + length (u16)
pub const FRAME_HEADER_SIZE: usize = 3;

/// Message dengan identifier dan panjang encoding tetap
///
/// `LENGTH` minimal `FRAME_HEADER_SIZE`; tipe yang lebih pendek ditolak
/// saat compile begitu dipakai lewat `Frame` atau `Dispatcher`:
///
/// ```compile_fail
/// use packbuf::{Buffer, Frame, Packable, Packet};
///
/// #[derive(Default)]
/// struct Empty;
///
/// impl Packable for Empty {
///     fn pack(&self, buffer: &mut Buffer) {
///         Frame::begin::<Self>(buffer).end(buffer);
///     }
///     fn unpack(&mut self, _buffer: &mut Buffer) {}
/// }
///
/// impl Packet for Empty {
///     const ID: u8 = 1;
///     const LENGTH: u16 = 0;
///     fn process(&mut self) {}
/// }
///
/// Empty.pack(&mut Buffer::new(8));
/// ```
pub trait Packet: Packable + Default {
    /// Packet identifier di wire
    const ID: u8;
    /// Total panjang frame (header + body + padding)
    const LENGTH: u16;

    #[doc(hidden)]
    const LENGTH_COVERS_HEADER: () = assert!(
        Self::LENGTH as usize >= FRAME_HEADER_SIZE,
        "Packet::LENGTH must cover the frame header"
    );

    /// Processing hook, dipanggil sekali setelah packet ter-decode lengkap
    fn process(&mut self);
}

/// Frame yang sedang ditulis/dibaca
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    start: usize,
    length: usize,
    /// `Buffer::len()` sebelum frame ditulis (untuk rollback)
    prior_len: usize,
}

impl Frame {
    /// Tulis header di writer cursor
    pub fn begin<P: Packet>(buffer: &mut Buffer) -> Self {
        let () = P::LENGTH_COVERS_HEADER;
        let start = buffer.writer_offset();
        let prior_len = buffer.len();
        buffer.add(P::ID).add(P::LENGTH);
        Self {
            start,
            length: P::LENGTH as usize,
            prior_len,
        }
    }

    /// Zero-pad sisa frame dan posisikan writer di akhir frame.
    ///
    /// Body yang melewati `LENGTH` membatalkan seluruh frame: bytes yang
    /// sudah ditulis di-zero, writer dan `length` kembali seperti sebelum
    /// `begin`. Jika padding tidak muat di capacity, padding ditolak (no-op)
    /// dan writer tetap di posisi terakhir yang berhasil.
    pub fn end(self, buffer: &mut Buffer) {
        let end = self.start + self.length;
        let written = buffer.writer_offset();
        if written > end {
            tracing::trace!(
                start = self.start,
                length = self.length,
                written = written - self.start,
                "frame body overflows declared length, rolled back"
            );
            buffer.data_mut()[self.start..written].fill(0);
            buffer.set_writer_offset(self.start);
            buffer.set_len(self.prior_len);
            return;
        }
        buffer.add_zeros(end - written);
    }

    /// Baca dan validasi header di reader cursor.
    ///
    /// `None` (reader tidak bergeser) jika header belum lengkap atau id /
    /// length tidak cocok dengan `P`.
    pub fn open<P: Packet>(buffer: &mut Buffer) -> Option<Self> {
        let () = P::LENGTH_COVERS_HEADER;
        let start = buffer.reader_offset();
        let header = FrameHeader::peek(buffer, start)?;
        if header.id != P::ID || header.length != P::LENGTH {
            tracing::trace!(
                id = header.id,
                length = header.length,
                expected_id = P::ID,
                expected_length = P::LENGTH,
                "frame header mismatch"
            );
            return None;
        }
        buffer.set_reader_offset(start + FRAME_HEADER_SIZE);
        Some(Self {
            start,
            length: P::LENGTH as usize,
            prior_len: buffer.len(),
        })
    }

    /// Posisikan reader di akhir frame (padding dilewati)
    pub fn close(self, buffer: &mut Buffer) {
        let end = self.start + self.length;
        if end <= buffer.len() {
            buffer.set_reader_offset(end);
        }
    }

    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }
}

/// Header yang sudah di-peek tanpa menggeser cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: u8,
    pub length: u16,
}

impl FrameHeader {
    /// Peek header di `offset`. `None` jika header belum lengkap.
    pub fn peek(buffer: &Buffer, offset: usize) -> Option<Self> {
        if offset.checked_add(FRAME_HEADER_SIZE)? > buffer.len() {
            return None;
        }
        Some(Self {
            id: buffer.get_at(offset),
            length: buffer.get_at(offset + 1),
        })
    }
}
