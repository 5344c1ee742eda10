//! Serializable summaries of archives, models and textures

use serde::Serialize;

use crate::archive::{Archive, FormatGeneration};
use crate::error::Result;
use crate::formats::bgf::{MeshStats, Model, Node};
use crate::formats::texture::{PixelFormat, Texture};
use crate::utils::display_name;

/// Archive table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveListing {
    pub generation: FormatGeneration,
    pub entries: Vec<EntryInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub kind: &'static str,
    pub tag: String,
    pub size: usize,
}

/// Model header and per-node summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub generation: FormatGeneration,
    pub format_version: (u32, u32),
    pub node_count: usize,
    pub link_count: usize,
    pub extra_header_ints: Vec<u32>,
    /// Texture names referenced by any material, first use first.
    pub textures: Vec<String>,
    pub nodes: Vec<NodeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub index: usize,
    pub name: String,
    pub parent: Option<usize>,
    pub renderable: bool,
    pub vertex_group_count: u32,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub vertex_scale: f32,
    pub vertices: usize,
    pub normals: usize,
    pub uv_counts: [usize; 4],
    pub primitives: usize,
    pub batches: Vec<MeshStats>,
    pub chunk_tags: Vec<String>,
    pub secondary_positions_seen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureInfo {
    pub name: String,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub usable: bool,
    pub rgba_bytes: usize,
}

#[must_use]
pub fn list_archive(archive: &Archive) -> ArchiveListing {
    ArchiveListing {
        generation: archive.generation(),
        entries: archive
            .entries()
            .iter()
            .map(|entry| EntryInfo {
                name: entry.display_name(),
                kind: entry.kind.as_str(),
                tag: entry.kind.tag().to_string(),
                size: entry.size(),
            })
            .collect(),
    }
}

/// Summarize a model, resolving every node's batches.
///
/// # Errors
/// Fails if a node's geometry references attributes it does not carry.
pub fn inspect_model(model: &Model) -> Result<ModelInfo> {
    let nodes = model
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| inspect_node(index, node))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelInfo {
        name: model.display_name_lossy(),
        generation: model.generation,
        format_version: model.format_version,
        node_count: model.node_count,
        link_count: model.links.len(),
        extra_header_ints: model.extra_header_ints.clone(),
        textures: model
            .referenced_textures()
            .iter()
            .map(|name| display_name(name))
            .collect(),
        nodes,
    })
}

fn inspect_node(index: usize, node: &Node) -> Result<NodeInfo> {
    let batches = node.resolve_batches()?;
    Ok(NodeInfo {
        index,
        name: node.name_lossy(),
        parent: node.parent,
        renderable: node.is_renderable(),
        vertex_group_count: node.vertex_group_count,
        position: node.transform.position.to_array(),
        rotation: node.transform.rotation.to_array(),
        bbox_min: node.bbox.min.to_array(),
        bbox_max: node.bbox.max.to_array(),
        vertex_scale: node.vertex_scale,
        vertices: node.vertices.len(),
        normals: node.normals.len(),
        uv_counts: [0, 1, 2, 3].map(|c| node.uv_channels[c].len()),
        primitives: node.mesh_batches.iter().map(|b| b.primitives.len()).sum(),
        batches: batches.iter().map(MeshStats::from).collect(),
        chunk_tags: node.chunk_tags.iter().map(ToString::to_string).collect(),
        secondary_positions_seen: node.secondary_positions_seen,
    })
}

#[must_use]
pub fn inspect_texture(texture: &Texture) -> TextureInfo {
    TextureInfo {
        name: display_name(&texture.name),
        format: texture.format,
        width: texture.width(),
        height: texture.height(),
        mip_count: texture.mip_count(),
        usable: texture.is_usable(),
        rgba_bytes: texture.rgba.len(),
    }
}
