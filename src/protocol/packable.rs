//! Packable: value yang bisa serialize dirinya sendiri ke `Buffer`

use crate::core::Buffer;

/// Kapabilitas pack/unpack
///
/// `pack` menulis di writer cursor, `unpack` membaca di reader cursor.
/// Implementasi cukup memakai primitive `Buffer` (`add*`/`get*`), termasuk
/// `add_pack`/`get_pack` untuk field yang juga `Packable`.
///
/// Buffer tidak pernah melihat layout internal value.
pub trait Packable {
    fn pack(&self, buffer: &mut Buffer);

    fn unpack(&mut self, buffer: &mut Buffer);
}

impl<P: Packable> Packable for [P] {
    fn pack(&self, buffer: &mut Buffer) {
        for item in self {
            item.pack(buffer);
        }
    }

    fn unpack(&mut self, buffer: &mut Buffer) {
        for item in self {
            item.unpack(buffer);
        }
    }
}

impl<P: Packable, const N: usize> Packable for [P; N] {
    fn pack(&self, buffer: &mut Buffer) {
        self.as_slice().pack(buffer);
    }

    fn unpack(&mut self, buffer: &mut Buffer) {
        self.as_mut_slice().unpack(buffer);
    }
}
