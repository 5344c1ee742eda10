//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! BGF model reader
//!
//! Layout of a model payload:
//!
//! ```text
//! version u32 BE x2, node_count u16 BE, extra_count u16 BE, link_count u32 BE
//! header floats f32 BE x4
//! [current] display name (u32 BE length + bytes)
//! extra ints u32 BE x extra_count
//! XMEM chunk (unused)
//! NODE chunk x node_count
//! CNCT chunk: (parent u16 LE, child u16 LE) x link_count
//! ```

use glam::{Vec2, Vec3};

use super::hierarchy;
use super::options::ModelDecodeOptions;
use super::types::{Aabb, MATERIAL_RECORD_SIZE, Material, Model, Node, PrimitiveBatch, Transform};
use crate::archive::FormatGeneration;
use crate::error::{Error, Result};
use crate::formats::gx::{VertexDescriptor, decode_display_list};
use crate::utils::{ByteCursor, ChunkHeader, Tag, display_name};

/// Size of the fixed node header following the node name.
const NODE_HEADER_SIZE: usize = 0x38;
const BBOX_SIZE: usize = 24;
const CHUNK_HEADER_SIZE: usize = 8;
/// Fixed-point scale of `VUVn` coordinates.
const UV_SCALE: f32 = 2048.0;

/// Decode one model payload.
///
/// `entry_name` becomes the display name of legacy models, which carry none
/// of their own.
pub fn read_model(
    payload: &[u8],
    entry_name: &[u8],
    generation: FormatGeneration,
    options: &ModelDecodeOptions,
) -> Result<Model> {
    let mut cursor = ByteCursor::new(payload);

    let format_version = (cursor.read_u32_be()?, cursor.read_u32_be()?);
    let node_count = usize::from(cursor.read_u16_be()?);
    let extra_count = usize::from(cursor.read_u16_be()?);
    let link_count = cursor.read_u32_be()? as usize;
    let header_floats = [
        cursor.read_f32_be()?,
        cursor.read_f32_be()?,
        cursor.read_f32_be()?,
        cursor.read_f32_be()?,
    ];

    let model_name = match generation {
        FormatGeneration::Current => cursor.read_prefixed_bytes()?.to_vec(),
        FormatGeneration::Legacy => entry_name.to_vec(),
    };

    let extra_header_ints = read_u32_be_array(&mut cursor, extra_count)?;

    let unused = expect_chunk(&mut cursor, Tag::XMEM, payload.len())?;
    cursor.seek(unused.end())?;

    let mut nodes = Vec::with_capacity(node_count);
    for index in 0..node_count {
        let node = read_node(&mut cursor, extra_count, options)
            .map_err(|e| annotate(e, &format!("node {index}")))?;
        nodes.push(node);
    }

    let links = read_connectivity(&mut cursor, link_count, payload.len())?;
    hierarchy::apply_links(&mut nodes, &links, options.max_hierarchy_depth)?;

    if !cursor.is_at_end() {
        tracing::debug!(
            "{} bytes after the connectivity table of {}",
            cursor.remaining(),
            display_name(&model_name)
        );
    }

    for node in &mut nodes {
        node.world_center = node.bbox.center();
    }

    tracing::debug!(
        "Decoded {generation} model {} (v{}.{}) with {} nodes and {} links",
        display_name(&model_name),
        format_version.0,
        format_version.1,
        nodes.len(),
        links.len()
    );

    Ok(Model {
        generation,
        format_version,
        node_count,
        extra_header_ints,
        header_floats,
        links,
        display_name: model_name,
        nodes,
    })
}

fn read_connectivity(cursor: &mut ByteCursor<'_>, link_count: usize, limit: usize) -> Result<Vec<(u16, u16)>> {
    let chunk = expect_chunk(cursor, Tag::CNCT, limit)?;
    if chunk.size != link_count * 4 {
        return Err(Error::model(format!(
            "connectivity table is {} bytes, header declares {link_count} links",
            chunk.size
        )));
    }

    let mut links = Vec::with_capacity(link_count);
    for _ in 0..link_count {
        let parent = cursor.read_u16_le()?;
        let child = cursor.read_u16_le()?;
        links.push((parent, child));
    }
    expect_end(cursor, &chunk)?;
    Ok(links)
}

/// Mutable state while walking one node's chunks.
struct NodeState {
    node: Node,
    descriptor: VertexDescriptor,
}

fn read_node(cursor: &mut ByteCursor<'_>, extra_count: usize, options: &ModelDecodeOptions) -> Result<Node> {
    let limit = cursor.len();
    let node_chunk = expect_chunk(cursor, Tag::NODE, limit)?;
    let node_end = node_chunk.end();

    let name = cursor.read_prefixed_bytes()?.to_vec();

    let header_start = cursor.tell();
    let unknown_shorts = [cursor.read_u16_le()?, cursor.read_u16_le()?, cursor.read_u16_le()?];
    let padding = cursor.read_u16_le()?;
    if padding != 0 {
        return Err(Error::model(format!(
            "node {} header padding is 0x{padding:04x}, expected 0",
            display_name(&name)
        )));
    }
    let vertex_group_count = cursor.read_u32_le()?;
    let mut floats = [0.0f32; 11];
    for f in &mut floats {
        *f = cursor.read_f32_le()?;
    }
    debug_assert_eq!(cursor.tell() - header_start, NODE_HEADER_SIZE);

    let extra_ints = read_u32_be_array(cursor, extra_count)?;
    let bbox = read_bbox(cursor, node_end)?;

    let mut node = Node {
        name,
        unknown_shorts,
        vertex_group_count,
        transform: Transform::from_floats(floats),
        bbox,
        extra_ints,
        rnod: None,
        vertex_scale: 1.0,
        materials: Vec::new(),
        lods: Vec::new(),
        vertices: Vec::new(),
        normals: Vec::new(),
        binormals: Vec::new(),
        tangents: Vec::new(),
        uv_channels: Default::default(),
        mesh_batches: Vec::new(),
        parent: None,
        chunk_tags: Vec::new(),
        secondary_positions_seen: false,
        world_center: Vec3::ZERO,
    };

    let materials_chunk = read_preamble(cursor, &mut node, node_end, options)?;
    node.materials = read_materials(cursor, &materials_chunk, vertex_group_count)?;

    let mut state = NodeState {
        node,
        descriptor: VertexDescriptor::new(),
    };

    while cursor.tell() < node_end {
        let left = node_end - cursor.tell();
        if left < CHUNK_HEADER_SIZE {
            return Err(Error::model(format!(
                "node {} has {left} stray bytes before its end",
                state.node.name_lossy()
            )));
        }
        let chunk = read_bounded_chunk(cursor, node_end)?;
        state.node.chunk_tags.push(chunk.tag);

        if state.node.secondary_positions_seen {
            cursor.seek(chunk.end())?;
            continue;
        }
        read_trailer_chunk(cursor, &chunk, &mut state)?;
        expect_end(cursor, &chunk)?;
    }

    if cursor.tell() != node_end {
        return Err(Error::model(format!(
            "node {} ended at 0x{:x}, expected 0x{node_end:x}",
            state.node.name_lossy(),
            cursor.tell()
        )));
    }

    Ok(state.node)
}

fn read_bbox(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<Aabb> {
    let chunk = expect_chunk(cursor, Tag::BBOX, limit)?;
    if chunk.size != BBOX_SIZE {
        return Err(Error::model(format!("BBOX is {} bytes, expected {BBOX_SIZE}", chunk.size)));
    }
    let min = read_vec3_le(cursor)?;
    let max = read_vec3_le(cursor)?;
    Ok(Aabb { min, max })
}

/// Consume optional chunks until `MATL`, returning the `MATL` header.
fn read_preamble(
    cursor: &mut ByteCursor<'_>,
    node: &mut Node,
    node_end: usize,
    options: &ModelDecodeOptions,
) -> Result<ChunkHeader> {
    loop {
        let chunk = read_bounded_chunk(cursor, node_end)?;
        match chunk.tag {
            Tag::MATL => return Ok(chunk),
            Tag::RNOD => {
                node.rnod = Some(cursor.read_bytes(chunk.size)?.to_vec());
            }
            Tag::VSCL => {
                expect_size(&chunk, 4)?;
                node.vertex_scale = cursor.read_f32_le()?;
            }
            other if options.strict_preamble => {
                return Err(Error::model(format!(
                    "unexpected {other} chunk before MATL in node {}",
                    node.name_lossy()
                )));
            }
            other => {
                tracing::debug!("Skipping {other} preamble chunk ({} bytes)", chunk.size);
                cursor.seek(chunk.end())?;
            }
        }
        expect_end(cursor, &chunk)?;
    }
}

fn read_materials(cursor: &mut ByteCursor<'_>, chunk: &ChunkHeader, vertex_group_count: u32) -> Result<Vec<Material>> {
    let expected = vertex_group_count as usize * MATERIAL_RECORD_SIZE;
    if chunk.size != expected {
        return Err(Error::model(format!(
            "MATL is {} bytes, {vertex_group_count} vertex groups need {expected}",
            chunk.size
        )));
    }

    let mut materials = Vec::with_capacity(vertex_group_count as usize);
    for _ in 0..vertex_group_count {
        materials.push(Material::from_record(cursor.read_bytes(MATERIAL_RECORD_SIZE)?));
    }
    Ok(materials)
}

fn read_trailer_chunk(cursor: &mut ByteCursor<'_>, chunk: &ChunkHeader, state: &mut NodeState) -> Result<()> {
    let node = &mut state.node;

    match chunk.tag {
        Tag::SCNT => {
            expect_size(chunk, 4)?;
            node.lods.push(cursor.read_u32_be()?);
        }
        Tag::XBS2 => {
            let material_index = cursor.read_u32_be()?;
            if material_index as usize >= node.materials.len() {
                return Err(Error::model(format!(
                    "XBS2 references material {material_index} of {}",
                    node.materials.len()
                )));
            }
            let unknown = (cursor.read_u32_be()?, cursor.read_u32_be()?);
            let gx_size = cursor.read_u32_be()? as usize;
            let gx_end = cursor.tell() + gx_size;
            if gx_end != chunk.end() {
                return Err(Error::model(format!(
                    "XBS2 command stream ends at 0x{gx_end:x}, chunk ends at 0x{:x}",
                    chunk.end()
                )));
            }
            let primitives = decode_display_list(cursor, gx_end, &mut state.descriptor)?;
            node.mesh_batches.push(PrimitiveBatch {
                material_index,
                unknown,
                primitives,
            });
        }
        Tag::VPOS => {
            if !node.vertices.is_empty() {
                tracing::warn!(
                    "Second VPOS chunk in node {}; treating the rest of the node as legacy data",
                    node.name_lossy()
                );
                node.secondary_positions_seen = true;
                cursor.seek(chunk.end())?;
                return Ok(());
            }
            expect_stride(chunk, 6)?;
            node.vertices.reserve(chunk.size / 6);
            for _ in 0..chunk.size / 6 {
                node.vertices
                    .push([cursor.read_i16_be()?, cursor.read_i16_be()?, cursor.read_i16_be()?]);
            }
        }
        Tag::VNRM => {
            expect_stride(chunk, 3)?;
            for _ in 0..chunk.size / 3 {
                let [x, y, z] = [cursor.read_i8()?, cursor.read_i8()?, cursor.read_i8()?];
                node.normals.push(Vec3::new(f32::from(x), f32::from(y), f32::from(z)));
            }
        }
        Tag::VNBT => {
            expect_stride(chunk, 36)?;
            for _ in 0..chunk.size / 36 {
                node.normals.push(read_vec3_be(cursor)?);
                node.binormals.push(read_vec3_be(cursor)?);
                node.tangents.push(read_vec3_be(cursor)?);
            }
        }
        tag => {
            if let Some(channel) = tag.uv_channel() {
                expect_stride(chunk, 4)?;
                let uvs = &mut node.uv_channels[channel];
                for _ in 0..chunk.size / 4 {
                    let u = f32::from(cursor.read_i16_be()?) / UV_SCALE;
                    let v = f32::from(cursor.read_i16_be()?) / UV_SCALE;
                    uvs.push(Vec2::new(u, v));
                }
            } else {
                tracing::debug!("Skipping {tag} chunk ({} bytes)", chunk.size);
                cursor.seek(chunk.end())?;
            }
        }
    }
    Ok(())
}

fn read_u32_be_array(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<u32>> {
    (0..count).map(|_| cursor.read_u32_be()).collect()
}

fn read_vec3_le(cursor: &mut ByteCursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(cursor.read_f32_le()?, cursor.read_f32_le()?, cursor.read_f32_le()?))
}

fn read_vec3_be(cursor: &mut ByteCursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(cursor.read_f32_be()?, cursor.read_f32_be()?, cursor.read_f32_be()?))
}

/// Read a chunk header that must fit before `limit`.
fn read_bounded_chunk(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<ChunkHeader> {
    let chunk = cursor.read_chunk_header()?;
    if chunk.end() > limit {
        return Err(Error::model(format!(
            "{} chunk at 0x{:x} overruns its container by {} bytes",
            chunk.tag,
            chunk.start - 8,
            chunk.end() - limit
        )));
    }
    Ok(chunk)
}

fn expect_chunk(cursor: &mut ByteCursor<'_>, tag: Tag, limit: usize) -> Result<ChunkHeader> {
    let chunk = read_bounded_chunk(cursor, limit)?;
    if chunk.tag != tag {
        return Err(Error::model(format!(
            "expected {tag} chunk at 0x{:x}, found {}",
            chunk.start - 8,
            chunk.tag
        )));
    }
    Ok(chunk)
}

fn expect_size(chunk: &ChunkHeader, size: usize) -> Result<()> {
    if chunk.size == size {
        Ok(())
    } else {
        Err(Error::model(format!(
            "{} chunk is {} bytes, expected {size}",
            chunk.tag, chunk.size
        )))
    }
}

fn expect_stride(chunk: &ChunkHeader, stride: usize) -> Result<()> {
    if chunk.size % stride == 0 {
        Ok(())
    } else {
        Err(Error::model(format!(
            "{} chunk size {} is not a multiple of {stride}",
            chunk.tag, chunk.size
        )))
    }
}

fn expect_end(cursor: &ByteCursor<'_>, chunk: &ChunkHeader) -> Result<()> {
    if cursor.tell() == chunk.end() {
        Ok(())
    } else {
        Err(Error::model(format!(
            "{} chunk consumed to 0x{:x}, declared end 0x{:x}",
            chunk.tag,
            cursor.tell(),
            chunk.end()
        )))
    }
}

/// Prefix model errors with the failing node; other errors pass through.
fn annotate(error: Error, context: &str) -> Error {
    match error {
        Error::MalformedModel { message } => Error::model(format!("{context}: {message}")),
        other => other,
    }
}
