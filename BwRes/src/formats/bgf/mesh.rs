//! Resolve attribute-index primitives into flat triangle meshes

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::types::Node;
use crate::error::{Error, Result};
use crate::formats::gx::{AttributeTuple, Primitive, PrimitiveKind};

/// A vertex with its attributes looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Position after `vertex_scale`.
    pub position: Vec3,
    pub normal: Option<Vec3>,
    pub binormal: Option<Vec3>,
    pub tangent: Option<Vec3>,
    /// One coordinate per UV channel the vertex indexes.
    pub uvs: [Option<Vec2>; 4],
}

/// Triangles drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBatch {
    pub material_index: u32,
    pub vertices: Vec<MeshVertex>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshBatch {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-batch counts for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
}

impl From<&MeshBatch> for MeshStats {
    fn from(batch: &MeshBatch) -> Self {
        Self {
            vertices: batch.vertices.len(),
            triangles: batch.triangle_count(),
        }
    }
}

impl Node {
    /// Look up every primitive's attributes and emit triangle lists.
    ///
    /// Strips are unrolled with alternating winding; strip triangles that
    /// repeat a position index are dropped.
    ///
    /// # Errors
    /// Returns [`Error::MalformedModel`] if a vertex has no position, an index
    /// is outside its attribute array, or a list is not a multiple of three.
    pub fn resolve_batches(&self) -> Result<Vec<MeshBatch>> {
        self.mesh_batches
            .iter()
            .map(|batch| {
                let mut mesh = MeshBatch {
                    material_index: batch.material_index,
                    vertices: Vec::new(),
                    indices: Vec::new(),
                };
                for primitive in &batch.primitives {
                    self.append_primitive(&mut mesh, primitive)?;
                }
                Ok(mesh)
            })
            .collect()
    }

    fn append_primitive(&self, mesh: &mut MeshBatch, primitive: &Primitive) -> Result<()> {
        let base = mesh.vertices.len() as u32;
        for tuple in &primitive.vertices {
            mesh.vertices.push(self.resolve_vertex(tuple)?);
        }

        let tuples = &primitive.vertices;
        match primitive.kind {
            PrimitiveKind::TriangleList => {
                if tuples.len() % 3 != 0 {
                    return Err(Error::model(format!(
                        "triangle list of {} vertices in node {}",
                        tuples.len(),
                        self.name_lossy()
                    )));
                }
                mesh.indices.extend((0..tuples.len() as u32).map(|i| base + i));
            }
            PrimitiveKind::TriangleStrip => {
                for i in 0..tuples.len().saturating_sub(2) {
                    let corners = if i % 2 == 0 { [i, i + 1, i + 2] } else { [i + 1, i, i + 2] };
                    let [a, b, c] = corners.map(|k| tuples[k].position_index);
                    if a == b || b == c || a == c {
                        continue;
                    }
                    mesh.indices.extend(corners.map(|k| base + k as u32));
                }
            }
        }
        Ok(())
    }

    fn resolve_vertex(&self, tuple: &AttributeTuple) -> Result<MeshVertex> {
        let position_index = tuple
            .position_index
            .ok_or_else(|| Error::model(format!("vertex without a position in node {}", self.name_lossy())))?;
        let [x, y, z] = *lookup(&self.vertices, position_index, "position", &self.name)?;
        let position = Vec3::new(f32::from(x), f32::from(y), f32::from(z)) * self.vertex_scale;

        let (normal, binormal, tangent) = match tuple.normal_index {
            Some(index) => {
                let normal = *lookup(&self.normals, index, "normal", &self.name)?;
                let frame = if self.binormals.is_empty() {
                    (None, None)
                } else {
                    (
                        Some(*lookup(&self.binormals, index, "binormal", &self.name)?),
                        Some(*lookup(&self.tangents, index, "tangent", &self.name)?),
                    )
                };
                (Some(normal), frame.0, frame.1)
            }
            None => (None, None, None),
        };

        let mut uvs = [None; 4];
        for (channel, uv) in uvs.iter_mut().enumerate() {
            if let Some(index) = tuple.tex_coord_indices[channel] {
                *uv = Some(*lookup(&self.uv_channels[channel], index, "uv", &self.name)?);
            }
        }

        Ok(MeshVertex {
            position,
            normal,
            binormal,
            tangent,
            uvs,
        })
    }
}

fn lookup<'a, T>(items: &'a [T], index: u16, what: &str, node: &[u8]) -> Result<&'a T> {
    items.get(usize::from(index)).ok_or_else(|| {
        Error::model(format!(
            "{what} index {index} out of range ({} entries) in node {}",
            items.len(),
            String::from_utf8_lossy(node)
        ))
    })
}
