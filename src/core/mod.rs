//! Core module: Fixed-Capacity Binary Buffer
//!
//! Prinsip desain:
//! - Bounds-checked: Tidak ada akses di luar `capacity`/`length`
//! - Explicit encoding: Little-endian per tipe, tanpa type punning
//! - No-Allocation: Region di-alokasi sekali saat init (atau resize eksplisit)

mod buffer;
mod half;
pub mod mapped;
mod scalar;

pub use buffer::{Buffer, DEFAULT_CAPACITY};
pub use half::Half;
pub use scalar::Scalar;
