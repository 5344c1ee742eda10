//! Resource archive (`.res`) container
//!
//! An archive is a flat list of named, typed chunks. Opening one frames the
//! entries; payloads are decoded lazily by [`Archive::decode_model`] and
//! [`Archive::decode_texture`].

mod reader;
mod types;

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

pub use reader::Archive;
pub use types::{FormatGeneration, ResourceEntry, ResourceKind};

use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Read a whole archive from `stream`.
///
/// # Errors
/// Returns an error if reading fails or the container framing is malformed.
pub fn open_archive<R: Read>(mut stream: R) -> Result<Archive> {
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Archive::from_bytes(data)
}

/// Open an archive file, transparently decompressing `.res.gz` files.
///
/// Compression is detected from the gzip magic, not from the extension.
///
/// # Errors
/// Returns an error if the file cannot be read, fails to decompress, or is
/// not a well-formed archive.
pub fn open_archive_file(path: impl AsRef<Path>) -> Result<Archive> {
    let path = path.as_ref();
    let raw = fs::read(path)?;

    let data = if raw.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        tracing::debug!(
            "Decompressed {} ({} -> {} bytes)",
            path.display(),
            raw.len(),
            decoded.len()
        );
        decoded
    } else {
        raw
    };

    Archive::from_bytes(data)
}
