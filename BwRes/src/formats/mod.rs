//! Resource payload formats
//!
//! - `gx` - GameCube vertex descriptors and display lists
//! - `bgf` - models (node hierarchy, materials, geometry)
//! - `texture` - DXT1, IA8 and P8 textures

pub mod bgf;
pub mod gx;
pub mod texture;

// Re-export main decoded types
pub use bgf::{Material, Model, ModelDecodeOptions, Node, Transform};
pub use texture::{PixelFormat, Texture, TextureCache};
