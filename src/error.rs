//! Error types untuk subsystem yang bisa gagal
//!
//! `Buffer` sendiri tidak memakai error: write yang ditolak adalah no-op,
//! read yang ditolak mengembalikan nilai kosong.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors saat load atau membaca konfigurasi
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File tidak bisa dibaca
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Isi file bukan dokumen INI yang valid
    #[error("failed to parse ini config: {0}")]
    Ini(#[from] ini::ParseError),

    /// Isi file `.toml` tidak valid
    #[error("failed to parse toml config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Key tidak ada di section
    #[error("missing key {section}:{key}")]
    MissingKey { section: String, key: String },

    /// Value bukan hex sequence yang valid
    #[error("invalid hex sequence at {section}:{key}: {source}")]
    InvalidHex {
        section: String,
        key: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// Errors saat dispatch packet dari buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Tidak ada header lengkap di reader cursor
    #[error("no complete frame header at offset {offset}")]
    Incomplete { offset: usize },

    /// Identifier tidak terdaftar
    #[error("unknown packet id {id:#04x} at offset {offset}")]
    UnknownPacket { id: u8, offset: usize },

    /// Panjang di header tidak sama dengan panjang tetap tipe packet
    #[error("packet {id:#04x} declares length {declared}, expected {expected}")]
    LengthMismatch { id: u8, declared: u16, expected: u16 },

    /// Frame terpotong: butuh `needed` bytes, tersedia `available`
    #[error("packet {id:#04x} truncated: needed {needed} bytes, {available} available")]
    Truncated {
        id: u8,
        needed: usize,
        available: usize,
    },
}
