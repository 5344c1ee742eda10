//! GX (GameCube graphics) geometry encoding
//!
//! Model meshes store their triangles as GX display lists: attribute data lives
//! in separate arrays (`VPOS`, `VNRM`, `VUV*`) and each draw command references
//! it through per-vertex index tuples whose layout the vertex descriptor sets.

pub mod descriptor;
pub mod display_list;

pub use descriptor::{Attribute, AttributeFormat, TEX_SLOTS, VertexDescriptor};
pub use display_list::{AttributeTuple, Primitive, PrimitiveKind, decode_display_list};
