//! # BwRes
//!
//! A pure-Rust decoder for Battalion Wars resource archives (`.res`).
//!
//! ## Supported Formats
//!
//! - **Resource archives** - Legacy and current generation, plain or gzipped
//! - **BGF models** - Node hierarchy, materials, GX display-list geometry
//! - **Textures** - DXT1, IA8 and P8 (RGB5A3 palette) decoded to RGBA8
//!
//! ## Quick Start
//!
//! ```no_run
//! use bwres::prelude::*;
//!
//! let archive = open_archive_file("C1_Bonus.res.gz")?;
//! for name in archive.model_names() {
//!     let model = archive.decode_model(name)?;
//!     println!("{} has {} nodes", model.display_name_lossy(), model.nodes.len());
//! }
//!
//! // Textures are memoized per archive
//! let texture = archive.decode_texture("grass")?;
//! println!("{}x{} {}", texture.width(), texture.height(), texture.format);
//! archive.texture_cache().clear();
//! # Ok::<(), bwres::Error>(())
//! ```

use std::sync::Arc;

pub mod archive;
pub mod error;
pub mod formats;
pub mod inspect;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use archive::{Archive, FormatGeneration, ResourceEntry, ResourceKind, open_archive, open_archive_file};
pub use error::{Error, Result};
pub use formats::bgf::{Model, ModelDecodeOptions, Node};
pub use formats::texture::{Texture, TextureCache};
pub use utils::{ByteCursor, Tag};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{Archive, FormatGeneration, ResourceEntry, ResourceKind, open_archive, open_archive_file};
    pub use crate::error::{Error, Result};
    pub use crate::formats::bgf::{
        Aabb, DEFAULT_MAX_HIERARCHY_DEPTH, Material, MeshBatch, MeshVertex, Model, ModelDecodeOptions, Node, PrimitiveBatch,
        Transform,
    };
    pub use crate::formats::gx::{AttributeTuple, Primitive, PrimitiveKind, VertexDescriptor};
    pub use crate::formats::texture::{PixelFormat, Texture, TextureCache};
    pub use crate::inspect::{inspect_model, inspect_texture, list_archive};
    pub use crate::{decode_model, decode_texture};
}

/// Decode the model `name` as the given generation.
///
/// # Errors
/// Returns an error if the entry is missing, is not a model, or is malformed.
pub fn decode_model(archive: &Archive, name: impl AsRef<[u8]>, generation: FormatGeneration) -> Result<Model> {
    archive.decode_model_with(name, &ModelDecodeOptions::new().with_generation(generation))
}

/// Decode the texture `name`, memoized in `archive`'s texture cache.
///
/// # Errors
/// Returns an error if the entry is missing, is not a texture, is malformed,
/// or uses an unsupported pixel format.
pub fn decode_texture(archive: &Archive, name: impl AsRef<[u8]>) -> Result<Arc<Texture>> {
    archive.decode_texture(name)
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
