//! Fixed-Width Scalar Encoding
//!
//! Pengganti type punning: setiap tipe numerik di-encode/decode secara
//! eksplisit dalam little-endian. Trait di-seal sehingga hanya tipe
//! aritmatika fixed-width yang bisa lewat `Buffer::add`/`Buffer::get`.
//! Tipe lain ditolak saat compile time.

use super::half::Half;

mod sealed {
    pub trait Sealed {}
}

/// Tipe aritmatika fixed-width yang boleh ditulis/dibaca oleh `Buffer`
pub trait Scalar: sealed::Sealed + Copy + Default {
    /// Ukuran encoding dalam bytes
    const SIZE: usize;

    /// Tulis encoding ke `dst` (panjang `dst` == `SIZE`)
    fn encode(self, dst: &mut [u8]);

    /// Baca dari `src` (panjang `src` == `SIZE`)
    fn decode(src: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline(always)]
                fn encode(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }

                #[inline(always)]
                fn decode(src: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(src);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline(always)]
    fn encode(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }

    #[inline(always)]
    fn decode(src: &[u8]) -> Self {
        src[0] != 0
    }
}

impl sealed::Sealed for Half {}

// Half murni didefinisikan lewat encoding u16
impl Scalar for Half {
    const SIZE: usize = <u16 as Scalar>::SIZE;

    #[inline(always)]
    fn encode(self, dst: &mut [u8]) {
        self.to_bits().encode(dst);
    }

    #[inline(always)]
    fn decode(src: &[u8]) -> Self {
        Half::from_bits(u16::decode(src))
    }
}
