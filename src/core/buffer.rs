//! Fixed-Capacity Binary Buffer
//!
//! Satu region byte dengan dua cursor independen (reader & writer),
//! high-water mark `length`, dan batas `capacity`.
//!
//! Kebijakan kegagalan:
//! - Write yang melewati `capacity` → no-op (buffer tidak berubah)
//! - Read yang melewati `length` → nilai kosong (zero / `""` / `None`),
//!   cursor tidak bergeser
//!
//! Tidak ada partial write maupun partial read.

use std::ffi::CString;
use std::fmt;

use super::scalar::Scalar;
use crate::protocol::Packable;

/// Kapasitas default untuk `Buffer::default()`
pub const DEFAULT_CAPACITY: usize = 4096;

/// Binary serialization buffer
///
/// Semua operasi sinkron, in-memory, dan total. Tidak thread-safe:
/// untuk dipakai lintas thread, pemilik harus serialisasi akses
/// (misalnya satu buffer per in-flight message).
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    region: Vec<u8>,
    length: usize,
    reader: usize,
    writer: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.capacity())
            .field("length", &self.length)
            .field("reader", &self.reader)
            .field("writer", &self.writer)
            .finish()
    }
}

impl Buffer {
    /// Membuat buffer kosong dengan kapasitas tertentu
    ///
    /// Region di-zero-init, kedua cursor di 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            region: vec![0u8; capacity],
            length: 0,
            reader: 0,
            writer: 0,
        }
    }

    /// Wrap bytes yang sudah ada (buffer "pre-filled")
    ///
    /// `capacity == length == bytes.len()`, writer di akhir, reader di 0.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Sama dengan `from_bytes`, tapi mengambil ownership tanpa copy
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let length = bytes.len();
        Self {
            region: bytes,
            length,
            reader: 0,
            writer: length,
        }
    }

    // ------------------------------------------------------------------
    // Capacity & introspection
    // ------------------------------------------------------------------

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Resize region. Byte lama dipertahankan sampai `min(old, new)`,
    /// sisanya zero. `length` dan cursor di-clamp jika region menyusut.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.region.resize(capacity, 0);
        self.length = self.length.min(capacity);
        self.reader = self.reader.min(capacity);
        self.writer = self.writer.min(capacity);
    }

    /// High-water mark: batas bawah byte yang valid untuk dibaca
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Override `length`, di-clamp ke `capacity`
    #[inline(always)]
    pub fn set_len(&mut self, length: usize) {
        self.length = length.min(self.capacity());
    }

    #[inline(always)]
    pub fn reader_offset(&self) -> usize {
        self.reader
    }

    #[inline(always)]
    pub fn writer_offset(&self) -> usize {
        self.writer
    }

    /// Set reader cursor, di-clamp ke `[0, capacity]`
    #[inline(always)]
    pub fn set_reader_offset(&mut self, offset: usize) {
        self.reader = offset.min(self.capacity());
    }

    /// Set writer cursor, di-clamp ke `[0, capacity]`
    #[inline(always)]
    pub fn set_writer_offset(&mut self, offset: usize) {
        self.writer = offset.min(self.capacity());
    }

    /// Bytes yang masih bisa dibaca dari reader cursor
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.length.saturating_sub(self.reader)
    }

    /// Zero-fill seluruh region.
    ///
    /// Cursor dan `length` TIDAK di-reset; gunakan `reset` untuk itu.
    pub fn clear(&mut self) {
        self.region.fill(0);
    }

    /// Reset `length` dan kedua cursor ke 0 (isi region tidak disentuh)
    pub fn reset(&mut self) {
        self.length = 0;
        self.reader = 0;
        self.writer = 0;
    }

    /// Seluruh region (`capacity` bytes)
    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.region
    }

    #[inline(always)]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.region
    }

    /// Byte yang sudah ditulis: `[0, length)`
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.region[..self.length]
    }

    // ------------------------------------------------------------------
    // Bounds checking (satu-satunya jalur akses ke region)
    // ------------------------------------------------------------------

    /// Reserve `[offset, offset + size)` untuk write dan update `length`.
    /// `None` jika melewati capacity.
    #[inline(always)]
    fn write_window(&mut self, offset: usize, size: usize) -> Option<&mut [u8]> {
        let end = match offset.checked_add(size) {
            Some(end) if end <= self.capacity() => end,
            _ => {
                tracing::trace!(
                    offset,
                    size,
                    capacity = self.capacity(),
                    "buffer write rejected"
                );
                return None;
            }
        };
        self.length = self.length.max(end);
        Some(&mut self.region[offset..end])
    }

    /// Window `[offset, offset + size)` untuk read. `None` jika melewati `length`.
    #[inline(always)]
    fn read_window(&self, offset: usize, size: usize) -> Option<&[u8]> {
        match offset.checked_add(size) {
            Some(end) if end <= self.length => Some(&self.region[offset..end]),
            _ => {
                tracing::trace!(offset, size, length = self.length, "buffer read rejected");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Typed arithmetic access
    // ------------------------------------------------------------------

    /// Tulis scalar di writer cursor dan advance `T::SIZE`
    #[inline(always)]
    pub fn add<T: Scalar>(&mut self, value: T) -> &mut Self {
        let offset = self.writer;
        if let Some(dst) = self.write_window(offset, T::SIZE) {
            value.encode(dst);
            self.writer = offset + T::SIZE;
        }
        self
    }

    /// Tulis scalar di offset eksplisit; writer cursor tidak berubah
    #[inline(always)]
    pub fn add_at<T: Scalar>(&mut self, value: T, offset: usize) -> &mut Self {
        if let Some(dst) = self.write_window(offset, T::SIZE) {
            value.encode(dst);
        }
        self
    }

    /// Baca scalar di reader cursor dan advance.
    ///
    /// Mengembalikan `T::default()` (zero) jika melewati `length`.
    #[inline(always)]
    pub fn get<T: Scalar>(&mut self) -> T {
        let offset = self.reader;
        match self.read_window(offset, T::SIZE) {
            Some(src) => {
                let value = T::decode(src);
                self.reader = offset + T::SIZE;
                value
            }
            None => T::default(),
        }
    }

    /// Baca scalar di offset eksplisit; reader cursor tidak berubah
    #[inline(always)]
    pub fn get_at<T: Scalar>(&self, offset: usize) -> T {
        self.read_window(offset, T::SIZE)
            .map(T::decode)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Tulis string + satu terminator byte (`len + 1` bytes)
    pub fn add_string(&mut self, text: &str) -> &mut Self {
        let offset = self.writer;
        let size = c_bytes(text).len() + 1;
        if self.put_string(text, size, offset) {
            self.writer = offset + size;
        }
        self
    }

    pub fn add_string_at(&mut self, text: &str, offset: usize) -> &mut Self {
        let size = c_bytes(text).len() + 1;
        self.put_string(text, size, offset);
        self
    }

    /// Tulis tepat `size` bytes: text (dipotong jika lebih panjang)
    /// lalu zero-padding jika lebih pendek.
    pub fn add_string_fixed(&mut self, text: &str, size: usize) -> &mut Self {
        let offset = self.writer;
        if self.put_string(text, size, offset) {
            self.writer = offset + size;
        }
        self
    }

    pub fn add_string_fixed_at(&mut self, text: &str, size: usize, offset: usize) -> &mut Self {
        self.put_string(text, size, offset);
        self
    }

    fn put_string(&mut self, text: &str, size: usize, offset: usize) -> bool {
        let text = c_bytes(text);
        match self.write_window(offset, size) {
            Some(dst) => {
                let copied = text.len().min(size);
                dst[..copied].copy_from_slice(&text[..copied]);
                dst[copied..].fill(0);
                true
            }
            None => false,
        }
    }

    /// Baca string terminator-delimited di reader cursor (raw form).
    ///
    /// `None` jika cursor sudah >= `length` atau terminator tidak
    /// ditemukan sebelum `length`. Cursor advance `len + 1`.
    pub fn get_c_string(&mut self) -> Option<CString> {
        let value = self.get_c_string_at(self.reader)?;
        self.reader += value.as_bytes().len() + 1;
        Some(value)
    }

    pub fn get_c_string_at(&self, offset: usize) -> Option<CString> {
        if offset >= self.length {
            return None;
        }
        let valid = &self.region[offset..self.length];
        match valid.iter().position(|&b| b == 0) {
            Some(end) => CString::new(&valid[..end]).ok(),
            None => {
                tracing::trace!(offset, length = self.length, "unterminated string");
                None
            }
        }
    }

    /// Sama dengan `get_c_string`, dikonversi ke `String` (UTF-8 lossy).
    /// String kosong jika gagal.
    pub fn get_string(&mut self) -> String {
        self.get_c_string().map(into_text).unwrap_or_default()
    }

    pub fn get_string_at(&self, offset: usize) -> String {
        self.get_c_string_at(offset).map(into_text).unwrap_or_default()
    }

    /// Baca tepat `size` bytes (bukan terminator-seeking); hasil dipotong
    /// pada NUL pertama. Cursor selalu advance `size`.
    pub fn get_c_string_fixed(&mut self, size: usize) -> Option<CString> {
        let value = self.get_c_string_fixed_at(size, self.reader)?;
        self.reader += size;
        Some(value)
    }

    pub fn get_c_string_fixed_at(&self, size: usize, offset: usize) -> Option<CString> {
        if offset >= self.length {
            return None;
        }
        let raw = self.read_window(offset, size)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        CString::new(&raw[..end]).ok()
    }

    pub fn get_string_fixed(&mut self, size: usize) -> String {
        self.get_c_string_fixed(size)
            .map(into_text)
            .unwrap_or_default()
    }

    pub fn get_string_fixed_at(&self, size: usize, offset: usize) -> String {
        self.get_c_string_fixed_at(size, offset)
            .map(into_text)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Raw bytes
    // ------------------------------------------------------------------

    /// Copy-in raw bytes di writer cursor
    pub fn add_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let offset = self.writer;
        if let Some(dst) = self.write_window(offset, bytes.len()) {
            dst.copy_from_slice(bytes);
            self.writer = offset + bytes.len();
        }
        self
    }

    pub fn add_bytes_at(&mut self, bytes: &[u8], offset: usize) -> &mut Self {
        if let Some(dst) = self.write_window(offset, bytes.len()) {
            dst.copy_from_slice(bytes);
        }
        self
    }

    /// Tulis `size` zero bytes di writer cursor (padding tanpa alokasi)
    pub fn add_zeros(&mut self, size: usize) -> &mut Self {
        let offset = self.writer;
        if let Some(dst) = self.write_window(offset, size) {
            dst.fill(0);
            self.writer = offset + size;
        }
        self
    }

    /// Copy-out `size` bytes ke `Vec` baru (ownership pindah ke caller)
    pub fn get_bytes(&mut self, size: usize) -> Option<Vec<u8>> {
        let value = self.get_bytes_at(size, self.reader)?;
        self.reader += size;
        Some(value)
    }

    pub fn get_bytes_at(&self, size: usize, offset: usize) -> Option<Vec<u8>> {
        self.read_window(offset, size).map(<[u8]>::to_vec)
    }

    // ------------------------------------------------------------------
    // Packable protocol
    // ------------------------------------------------------------------

    /// Delegasi ke `value.pack` di writer cursor
    pub fn add_pack<P: Packable + ?Sized>(&mut self, value: &P) -> &mut Self {
        value.pack(self);
        self
    }

    /// Pack di offset eksplisit; writer cursor dikembalikan persis
    /// setelah `value.pack` selesai.
    pub fn add_pack_at<P: Packable + ?Sized>(&mut self, value: &P, offset: usize) -> &mut Self {
        let saved = self.writer;
        self.set_writer_offset(offset);
        value.pack(self);
        self.writer = saved;
        self
    }

    /// Delegasi ke `value.unpack` di reader cursor
    pub fn get_pack<P: Packable + ?Sized>(&mut self, value: &mut P) {
        value.unpack(self);
    }

    /// Unpack dari offset eksplisit; reader cursor dikembalikan
    pub fn get_pack_at<P: Packable + ?Sized>(&mut self, value: &mut P, offset: usize) {
        let saved = self.reader;
        self.set_reader_offset(offset);
        value.unpack(self);
        self.reader = saved;
    }
}

/// Bytes text sampai NUL pertama (semantik C string)
#[inline(always)]
fn c_bytes(text: &str) -> &[u8] {
    let raw = text.as_bytes();
    match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => raw,
    }
}

fn into_text(raw: CString) -> String {
    raw.into_string()
        .unwrap_or_else(|e| String::from_utf8_lossy(e.into_cstring().as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Half;

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = Buffer::new(32);
        assert_eq!(buf.capacity(), 32);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.reader_offset(), 0);
        assert_eq!(buf.writer_offset(), 0);
        assert!(buf.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_bytes_is_prefilled() {
        let mut buf = Buffer::from_bytes(&[1, 0, 0, 0, 2]);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.writer_offset(), 5);
        assert_eq!(buf.reader_offset(), 0);
        assert_eq!(buf.get::<u32>(), 1);
        assert_eq!(buf.get::<u8>(), 2);

        // Penuh: write berikutnya ditolak
        buf.add(9u8);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.writer_offset(), 5);
    }

    #[test]
    fn test_cursor_add_advances_by_size() {
        let mut buf = Buffer::new(16);
        buf.add(1u16).add(2u64).add(Half::ONE);
        assert_eq!(buf.writer_offset(), 12);
        assert_eq!(buf.len(), 12);

        assert_eq!(buf.get::<u16>(), 1);
        assert_eq!(buf.get::<u64>(), 2);
        assert_eq!(buf.get::<Half>(), Half::ONE);
        assert_eq!(buf.reader_offset(), 12);
    }

    #[test]
    fn test_offset_add_keeps_cursor() {
        let mut buf = Buffer::new(16);
        buf.add_at(0xABCDu16, 10);
        assert_eq!(buf.writer_offset(), 0);
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.get_at::<u16>(10), 0xABCD);
        assert_eq!(buf.reader_offset(), 0);
    }

    #[test]
    fn test_rejected_write_is_noop() {
        let mut buf = Buffer::new(8);
        buf.set_writer_offset(6);
        buf.add(0xDEAD_BEEFu32);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.writer_offset(), 6);
        assert!(buf.data().iter().all(|&b| b == 0));

        buf.add_at(1u64, usize::MAX);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_read_past_length_returns_zero() {
        let mut buf = Buffer::new(16);
        buf.add(5u16);
        assert_eq!(buf.get::<u32>(), 0);
        assert_eq!(buf.reader_offset(), 0);
        assert_eq!(buf.get::<u16>(), 5);
        assert_eq!(buf.get_at::<u16>(15), 0);
    }

    #[test]
    fn test_variable_string() {
        let mut buf = Buffer::new(16);
        buf.add_string("abc");
        assert_eq!(buf.writer_offset(), 4);
        assert_eq!(&buf.data()[..4], b"abc\0");
        assert_eq!(buf.get_string(), "abc");
        assert_eq!(buf.reader_offset(), 4);
    }

    #[test]
    fn test_string_without_terminator_is_empty() {
        let mut buf = Buffer::from_bytes(b"abc");
        assert_eq!(buf.get_string(), "");
        assert!(buf.get_c_string().is_none());
        assert_eq!(buf.reader_offset(), 0);
        assert!(buf.get_c_string_at(3).is_none());
    }

    #[test]
    fn test_string_interior_nul_truncates() {
        let mut buf = Buffer::new(16);
        buf.add_string("ab\0cd");
        assert_eq!(buf.writer_offset(), 3);
        assert_eq!(buf.get_string_at(0), "ab");
    }

    #[test]
    fn test_fixed_string_padding_and_truncation() {
        let mut buf = Buffer::new(16);
        buf.add_string_fixed("ab", 5);
        assert_eq!(&buf.data()[..5], b"ab\0\0\0");
        assert_eq!(buf.writer_offset(), 5);

        buf.add_string_fixed("abcdef", 3);
        assert_eq!(&buf.data()[5..8], b"abc");
        assert_eq!(buf.writer_offset(), 8);
        assert_eq!(buf.len(), 8);

        assert_eq!(buf.get_string_fixed(5), "ab");
        assert_eq!(buf.reader_offset(), 5);
        assert_eq!(buf.get_string_fixed(3), "abc");
        assert_eq!(buf.get_string_fixed(1), "");
        assert_eq!(buf.reader_offset(), 8);
    }

    #[test]
    fn test_fixed_string_at_offset() {
        let mut buf = Buffer::new(16);
        buf.add_string_fixed_at("xyz", 4, 8);
        assert_eq!(buf.writer_offset(), 0);
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.get_string_fixed_at(4, 8), "xyz");
        assert_eq!(buf.get_string_fixed_at(4, 10), "");
    }

    #[test]
    fn test_bytes_copy_in_copy_out() {
        let mut buf = Buffer::new(8);
        buf.add_bytes(&[1, 2, 3]);
        buf.add_bytes(&[9; 6]);
        assert_eq!(buf.len(), 3);

        let out = buf.get_bytes(3).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
        assert!(buf.get_bytes(1).is_none());

        buf.add_bytes_at(&[7, 7], 6);
        assert_eq!(buf.get_bytes_at(2, 6), Some(vec![7, 7]));
        assert_eq!(buf.writer_offset(), 3);
    }

    #[test]
    fn test_set_capacity_preserves_and_zero_extends() {
        let mut buf = Buffer::new(4);
        buf.add(0x0403_0201u32);
        buf.set_capacity(8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.data(), &[1, 2, 3, 4, 0, 0, 0, 0]);
        assert_eq!(buf.len(), 4);

        buf.set_capacity(2);
        assert_eq!(buf.data(), &[1, 2]);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.writer_offset(), 2);
    }

    #[test]
    fn test_clear_keeps_cursors() {
        let mut buf = Buffer::new(8);
        buf.add(7u32);
        buf.clear();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.writer_offset(), 4);
        assert_eq!(buf.get_at::<u32>(0), 0);

        buf.reset();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.writer_offset(), 0);
    }

    #[test]
    fn test_setters_clamp() {
        let mut buf = Buffer::new(8);
        buf.set_reader_offset(100);
        buf.set_writer_offset(9);
        buf.set_len(50);
        assert_eq!(buf.reader_offset(), 8);
        assert_eq!(buf.writer_offset(), 8);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Buffer::new(8);
        original.add(1u32);
        let mut copy = original.clone();
        copy.add(2u32);

        assert_eq!(original.len(), 4);
        assert_eq!(copy.len(), 8);
        assert_eq!(copy.get_at::<u32>(0), 1);
    }

    #[test]
    fn test_add_zeros() {
        let mut buf = Buffer::from_bytes(&[0xFF; 8]);
        buf.set_writer_offset(2);
        buf.add_zeros(3);
        assert_eq!(buf.writer_offset(), 5);
        assert_eq!(buf.as_bytes(), &[0xFF, 0xFF, 0, 0, 0, 0xFF, 0xFF, 0xFF]);

        // Tidak muat: no-op
        buf.add_zeros(4);
        assert_eq!(buf.writer_offset(), 5);
        assert_eq!(buf.get_at::<u8>(5), 0xFF);
    }
}
