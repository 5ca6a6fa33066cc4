//! Half-Precision Float (IEEE 754 binary16)
//!
//! Disimpan selalu sebagai 16-bit encoding. Konversi ke/dari `f32`
//! dilakukan dengan round-to-nearest-even.

use std::fmt;

/// Half-precision float, representasi wire = `u16`
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Half(u16);

impl Half {
    pub const ZERO: Half = Half(0x0000);
    pub const ONE: Half = Half(0x3C00);
    pub const INFINITY: Half = Half(0x7C00);
    pub const NEG_INFINITY: Half = Half(0xFC00);
    /// Nilai finite terbesar (65504.0)
    pub const MAX: Half = Half(0x7BFF);

    /// Wrap raw 16-bit encoding
    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw 16-bit encoding
    #[inline(always)]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub fn is_nan(self) -> bool {
        self.0 & 0x7C00 == 0x7C00 && self.0 & 0x03FF != 0
    }

    /// Encode `f32` ke binary16
    pub fn from_f32(value: f32) -> Self {
        let x = value.to_bits();
        let sign = (x & 0x8000_0000) >> 16;
        let exp = x & 0x7F80_0000;
        let man = x & 0x007F_FFFF;

        // Inf / NaN (NaN tetap quiet)
        if exp == 0x7F80_0000 {
            let nan_bit = if man == 0 { 0 } else { 0x0200 };
            return Self((sign | 0x7C00 | nan_bit | (man >> 13)) as u16);
        }

        let half_exp = ((exp >> 23) as i32) - 127 + 15;

        // Overflow -> infinity
        if half_exp >= 0x1F {
            return Self((sign | 0x7C00) as u16);
        }

        // Subnormal atau underflow ke zero
        if half_exp <= 0 {
            if 14 - half_exp > 24 {
                return Self(sign as u16);
            }
            let man = man | 0x0080_0000;
            let mut half_man = man >> (14 - half_exp);
            let round_bit = 1 << (13 - half_exp);
            if (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0 {
                half_man += 1;
            }
            return Self((sign | half_man) as u16);
        }

        let bits = sign | ((half_exp as u32) << 10) | (man >> 13);
        let round_bit = 0x0000_1000;
        if (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0 {
            // Carry boleh merambat ke exponent (termasuk ke infinity)
            Self((bits + 1) as u16)
        } else {
            Self(bits as u16)
        }
    }

    /// Decode binary16 ke `f32` (selalu exact)
    pub fn to_f32(self) -> f32 {
        let h = self.0 as u32;
        if h & 0x7FFF == 0 {
            return f32::from_bits(h << 16);
        }

        let sign = (h & 0x8000) << 16;
        let half_exp = h & 0x7C00;
        let half_man = h & 0x03FF;

        if half_exp == 0x7C00 {
            return if half_man == 0 {
                f32::from_bits(sign | 0x7F80_0000)
            } else {
                f32::from_bits(sign | 0x7FC0_0000 | (half_man << 13))
            };
        }

        if half_exp == 0 {
            // Subnormal: normalisasi mantissa
            let e = (half_man as u16).leading_zeros() - 6;
            let exp = (127 - 15 - e) << 23;
            let man = (half_man << (14 + e)) & 0x007F_FFFF;
            return f32::from_bits(sign | exp | man);
        }

        let exp = (((half_exp >> 10) as i32 - 15 + 127) as u32) << 23;
        f32::from_bits(sign | exp | (half_man << 13))
    }
}

impl From<f32> for Half {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<Half> for f32 {
    fn from(value: Half) -> Self {
        value.to_f32()
    }
}

impl From<u16> for Half {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<Half> for u16 {
    fn from(value: Half) -> Self {
        value.0
    }
}

impl fmt::Debug for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Half({} / {:#06x})", self.to_f32(), self.0)
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}
