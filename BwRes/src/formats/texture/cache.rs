//! Memoizing texture cache
//!
//! Every [`Archive`](crate::Archive) owns one cache, so each texture name is
//! decoded at most once per opened archive. The host clears it when it
//! resets the viewer and releases its own GPU handles at the same point.

use std::collections::HashMap;
use std::sync::Arc;

use super::Texture;
use crate::error::Result;
use crate::utils::trim_name;

/// Decoded textures keyed by NUL-trimmed name.
#[derive(Debug, Default)]
pub struct TextureCache {
    /// Successful decodes only; failures are returned and retried next time
    textures: HashMap<Vec<u8>, Arc<Texture>>,
    /// Number of decodes performed
    decode_count: usize,
}

impl TextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached texture for `name`, or run `decode` and cache a
    /// successful result.
    ///
    /// `decode` receives the trimmed name.
    pub fn get_or_decode<F>(&mut self, name: &[u8], decode: F) -> Result<Arc<Texture>>
    where
        F: FnOnce(&[u8]) -> Result<Texture>,
    {
        let key = trim_name(name);
        if let Some(texture) = self.textures.get(key) {
            return Ok(Arc::clone(texture));
        }

        let texture = Arc::new(decode(key)?);
        self.decode_count += 1;
        self.textures.insert(key.to_vec(), Arc::clone(&texture));
        Ok(texture)
    }

    /// The cached texture, without decoding.
    #[must_use]
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<Arc<Texture>> {
        self.textures.get(trim_name(name.as_ref())).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        self.textures.contains_key(trim_name(name.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// How many times a texture was actually decoded.
    #[must_use]
    pub fn decode_count(&self) -> usize {
        self.decode_count
    }

    /// Drop every cached texture.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
