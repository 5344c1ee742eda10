//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Resource archive reader
//!
//! Parsing only frames the container: entry names and kinds are decoded up
//! front, payloads stay untouched until a model or texture is requested.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::formats::bgf::{self, Model, ModelDecodeOptions};
use crate::formats::texture::{self, Texture, TextureCache};
use crate::utils::name::is_valid_padded_name;
use crate::utils::{ByteCursor, Tag, display_name, trim_name};

use super::{FormatGeneration, ResourceEntry, ResourceKind};

/// Size of the container header: tag, size, generation, entry count.
const HEADER_SIZE: usize = 16;

/// An opened resource archive.
///
/// Owns the backing buffer and the texture cache for the lifetime of the
/// session. Models decode from shared references with no cached state;
/// texture decodes go through the cache behind a mutex.
#[derive(Debug)]
pub struct Archive {
    data: Vec<u8>,
    generation: FormatGeneration,
    entries: Vec<ResourceEntry>,
    textures: Mutex<TextureCache>,
}

impl Archive {
    /// Parse the container framing of `data`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedArchive`] if the header, entry count, entry
    /// sizes or name padding are inconsistent with the buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (generation, entries) = read_entries(&data)?;
        tracing::debug!(
            "Opened {generation} archive with {} entries ({} bytes)",
            entries.len(),
            data.len()
        );
        Ok(Self {
            data,
            generation,
            entries,
            textures: Mutex::new(TextureCache::new()),
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> FormatGeneration {
        self.generation
    }

    #[must_use]
    pub fn is_legacy_format(&self) -> bool {
        self.generation == FormatGeneration::Legacy
    }

    /// First entry whose NUL-trimmed name equals the NUL-trimmed `name`.
    #[must_use]
    pub fn entry_by_name(&self, name: impl AsRef<[u8]>) -> Option<&ResourceEntry> {
        let wanted = trim_name(name.as_ref());
        self.entries.iter().find(|e| e.name() == wanted)
    }

    pub fn models(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter().filter(|e| e.kind == ResourceKind::Model)
    }

    pub fn textures(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter().filter(|e| e.kind == ResourceKind::Texture)
    }

    #[must_use]
    pub fn model_names(&self) -> Vec<&[u8]> {
        self.models().map(ResourceEntry::name).collect()
    }

    #[must_use]
    pub fn texture_names(&self) -> Vec<&[u8]> {
        self.textures().map(ResourceEntry::name).collect()
    }

    /// The payload bytes of `entry`, name field excluded.
    #[must_use]
    pub fn payload(&self, entry: &ResourceEntry) -> &[u8] {
        &self.data[entry.payload.clone()]
    }

    /// Decode a model with this archive's generation and default options.
    pub fn decode_model(&self, name: impl AsRef<[u8]>) -> Result<Model> {
        self.decode_model_with(name, &ModelDecodeOptions::default())
    }

    /// Decode a model; `options.generation` overrides the archive marker.
    pub fn decode_model_with(&self, name: impl AsRef<[u8]>, options: &ModelDecodeOptions) -> Result<Model> {
        let entry = self.typed_entry(name.as_ref(), ResourceKind::Model)?;
        let generation = options.generation.unwrap_or(self.generation);
        bgf::read_model(self.payload(entry), entry.name(), generation, options)
    }

    /// Decode a texture once per session; later calls return the cached one.
    ///
    /// Failed decodes are not cached.
    pub fn decode_texture(&self, name: impl AsRef<[u8]>) -> Result<Arc<Texture>> {
        let entry = self.typed_entry(name.as_ref(), ResourceKind::Texture)?;
        self.texture_cache()
            .get_or_decode(entry.name(), |key| texture::read_texture(self.payload(entry), key))
    }

    /// Decode a texture, bypassing the cache.
    pub fn decode_texture_uncached(&self, name: impl AsRef<[u8]>) -> Result<Texture> {
        let entry = self.typed_entry(name.as_ref(), ResourceKind::Texture)?;
        texture::read_texture(self.payload(entry), entry.name())
    }

    /// This session's texture cache. Clearing it is the host's reset point.
    pub fn texture_cache(&self) -> MutexGuard<'_, TextureCache> {
        self.textures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn typed_entry(&self, name: &[u8], kind: ResourceKind) -> Result<&ResourceEntry> {
        let entry = self
            .entry_by_name(name)
            .ok_or_else(|| Error::ResourceNotFound {
                name: display_name(name),
            })?;
        if entry.kind != kind {
            return Err(Error::WrongResourceKind {
                name: entry.display_name(),
                expected: kind.as_str(),
            });
        }
        Ok(entry)
    }
}

fn read_entries(data: &[u8]) -> Result<(FormatGeneration, Vec<ResourceEntry>)> {
    if data.len() < HEADER_SIZE {
        return Err(Error::archive(format!(
            "{} bytes is too small for an archive header",
            data.len()
        )));
    }

    let mut cursor = ByteCursor::new(data);
    let header = cursor.read_chunk_header()?;
    if header.tag != Tag::RESF {
        return Err(Error::archive(format!("expected RESF, found {}", header.tag)));
    }
    if header.end() != data.len() {
        return Err(Error::archive(format!(
            "header declares {} bytes but stream holds {}",
            header.size,
            data.len() - header.start
        )));
    }

    let marker = cursor.read_u32_be()?;
    let generation = FormatGeneration::from_marker(marker)
        .ok_or_else(|| Error::archive(format!("unknown generation marker {marker}")))?;
    let entry_count = cursor.read_u32_be()? as usize;
    let name_width = generation.name_width();

    let mut entries = Vec::with_capacity(entry_count.min(data.len() / 8));
    for index in 0..entry_count {
        if cursor.remaining() < 8 {
            return Err(Error::archive(format!(
                "archive declares {entry_count} entries but the stream ends after {index}"
            )));
        }
        let chunk = cursor.read_chunk_header()?;
        if chunk.end() > data.len() {
            return Err(Error::archive(format!(
                "entry {index} ({}) overruns the stream by {} bytes",
                chunk.tag,
                chunk.end() - data.len()
            )));
        }
        if chunk.size < name_width {
            return Err(Error::archive(format!(
                "entry {index} is {} bytes, smaller than its {name_width}-byte name",
                chunk.size
            )));
        }

        let raw_name = cursor.read_bytes(name_width)?;
        if !is_valid_padded_name(raw_name) {
            return Err(Error::archive(format!(
                "entry {index} has an invalid name field {raw_name:02x?}"
            )));
        }

        entries.push(ResourceEntry {
            raw_name: raw_name.to_vec(),
            kind: ResourceKind::from_tag(chunk.tag),
            payload: chunk.start + name_width..chunk.end(),
        });
        cursor.seek(chunk.end())?;
    }

    if !cursor.is_at_end() {
        return Err(Error::archive(format!(
            "{} trailing bytes after the last of {entry_count} entries",
            cursor.remaining()
        )));
    }

    Ok((generation, entries))
}
