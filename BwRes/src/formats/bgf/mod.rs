//! BGF model format
//!
//! Models are a header followed by a flat list of `NODE` chunks and a
//! connectivity table that links them into a hierarchy.

mod hierarchy;
pub mod mesh;
mod options;
mod reader;
mod types;

pub use mesh::{MeshBatch, MeshStats, MeshVertex};
pub use options::{DEFAULT_MAX_HIERARCHY_DEPTH, ModelDecodeOptions};
pub use reader::read_model;
pub use types::{
    Aabb, MATERIAL_RECORD_SIZE, Material, Model, NON_RENDERABLE_MARKERS, Node, PrimitiveBatch, Transform,
};
