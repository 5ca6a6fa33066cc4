//! Memory-Mapped Capture Files
//!
//! File capture (deretan packet yang sudah di-pack) di-mmap lalu
//! di-copy sekali ke `Buffer` pre-filled, siap untuk di-dispatch:
//! - Reader cursor di 0
//! - `length == capacity == ukuran file`
//!
//! Kebalikannya, `store` menulis `[0, length)` dari buffer ke file.

use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use super::buffer::Buffer;

/// Load file ke buffer pre-filled
pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Buffer> {
    let file = File::open(path.as_ref())?;
    let size = file.metadata()?.len() as usize;

    // mmap dengan panjang 0 tidak valid di semua platform
    if size == 0 {
        return Ok(Buffer::from_vec(Vec::new()));
    }

    // SAFETY: File dibuka read-only dan hanya dibaca selama fungsi ini;
    // isi di-copy sebelum map dilepas.
    let mmap = unsafe { MmapOptions::new().len(size).map(&file)? };

    tracing::debug!(path = %path.as_ref().display(), size, "capture loaded");
    Ok(Buffer::from_bytes(&mmap[..]))
}

/// Tulis byte yang valid (`[0, length)`) ke file, overwrite jika ada
pub fn store<P: AsRef<Path>>(path: P, buffer: &Buffer) -> io::Result<()> {
    let data = buffer.as_bytes();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path.as_ref())?;

    file.set_len(data.len() as u64)?;
    if data.is_empty() {
        return Ok(());
    }

    // SAFETY: File dibuka dengan read/write permission dan baru di-truncate
    // ke ukuran data; tidak ada mapping lain selama fungsi ini.
    let mut mmap: MmapMut = unsafe { MmapOptions::new().len(data.len()).map_mut(&file)? };
    mmap.copy_from_slice(data);
    mmap.flush()?;

    tracing::debug!(path = %path.as_ref().display(), size = data.len(), "capture stored");
    Ok(())
}
