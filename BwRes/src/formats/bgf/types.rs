//! Decoded BGF model data structures

use glam::{Mat4, Quat, Vec2, Vec3};
use indexmap::IndexSet;

use crate::archive::FormatGeneration;
use crate::formats::gx::Primitive;
use crate::utils::{Tag, is_blank_slot, trim_name};

/// Name fragments marking helper geometry that is never drawn.
pub const NON_RENDERABLE_MARKERS: [&[u8]; 4] = [b"NODRAW", b"COLLIDE", b"COLLISION", b"DUMMY"];

/// Width of a material texture-name slot.
pub const MATERIAL_SLOT_WIDTH: usize = 0x20;
/// Opaque bytes trailing the texture slots of a material record.
pub const MATERIAL_DATA_SIZE: usize = 0x24;
/// Full size of one material record.
pub const MATERIAL_RECORD_SIZE: usize = 4 * MATERIAL_SLOT_WIDTH + MATERIAL_DATA_SIZE;

/// A decoded model: header fields plus the node arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub generation: FormatGeneration,
    pub format_version: (u32, u32),
    /// Declared node count; always equal to `nodes.len()`.
    pub node_count: usize,
    pub extra_header_ints: Vec<u32>,
    /// Opaque header floats.
    pub header_floats: [f32; 4],
    /// Connectivity pairs as `(parent, child)` in table order.
    pub links: Vec<(u16, u16)>,
    /// Embedded name for current-generation models, the archive entry name
    /// for legacy ones.
    pub display_name: Vec<u8>,
    pub nodes: Vec<Node>,
}

impl Model {
    #[must_use]
    pub fn display_name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.display_name).into_owned()
    }

    /// Ordered set of texture names referenced by any material.
    #[must_use]
    pub fn referenced_textures(&self) -> IndexSet<Vec<u8>> {
        self.nodes
            .iter()
            .flat_map(|node| node.materials.iter())
            .flat_map(|material| material.textures())
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Position of the first node called `name`.
    #[must_use]
    pub fn node_index(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Indices of drawn nodes in stream order.
    pub fn renderable_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_renderable())
            .map(|(i, _)| i)
    }
}

/// One mesh/transform unit in a model's hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: Vec<u8>,
    /// Header shorts with no known meaning.
    pub unknown_shorts: [u16; 3],
    pub vertex_group_count: u32,
    pub transform: Transform,
    pub bbox: Aabb,
    pub extra_ints: Vec<u32>,
    /// Opaque `RNOD` blob, present on some character models.
    pub rnod: Option<Vec<u8>>,
    pub vertex_scale: f32,
    pub materials: Vec<Material>,
    /// Values of `SCNT` chunks in stream order.
    pub lods: Vec<u32>,
    pub vertices: Vec<[i16; 3]>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub uv_channels: [Vec<Vec2>; 4],
    pub mesh_batches: Vec<PrimitiveBatch>,
    /// Index of the parent node, resolved from the connectivity table.
    pub parent: Option<usize>,
    /// Tags of every trailer chunk, in stream order.
    pub chunk_tags: Vec<Tag>,
    /// A second `VPOS` chunk ended interpretation of this node early.
    pub secondary_positions_seen: bool,
    /// Center of the bounding box, used for render ordering.
    pub world_center: Vec3,
}

impl Node {
    /// Lossy string form of the node name.
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Helper and collision nodes stay in the hierarchy but are not drawn.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        if self.vertex_group_count == 0 {
            return false;
        }
        !NON_RENDERABLE_MARKERS
            .iter()
            .any(|marker| self.name.windows(marker.len()).any(|w| w == *marker))
    }
}

/// Primitives drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveBatch {
    pub material_index: u32,
    /// Two opaque header words of the `XBS2` chunk.
    pub unknown: (u32, u32),
    pub primitives: Vec<Primitive>,
}

/// Local transform block of a node header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Stored as `(x, y, z, w)`; not guaranteed to be normalized.
    pub rotation: Quat,
    /// Four trailing floats with no known meaning.
    pub trailing: [f32; 4],
}

impl Transform {
    #[must_use]
    pub fn from_floats(floats: [f32; 11]) -> Self {
        Self {
            position: Vec3::new(floats[0], floats[1], floats[2]),
            rotation: Quat::from_xyzw(floats[3], floats[4], floats[5], floats[6]),
            trailing: [floats[7], floats[8], floats[9], floats[10]],
        }
    }

    /// Column-major local matrix.
    ///
    /// Uses the homogeneous quaternion form without normalizing, so the
    /// stored rotation is reproduced as-is.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        let [x, y, z, w] = self.rotation.to_array();
        let p = self.position;
        Mat4::from_cols_array(&[
            w * w + x * x - y * y - z * z,
            2.0 * x * y + 2.0 * w * z,
            2.0 * x * z - 2.0 * w * y,
            0.0,
            2.0 * x * y - 2.0 * w * z,
            y * y + w * w - x * x - z * z,
            2.0 * y * z + 2.0 * w * x,
            0.0,
            2.0 * x * z + 2.0 * w * y,
            2.0 * y * z - 2.0 * w * x,
            z * z + w * w - x * x - y * y,
            0.0,
            p.x,
            p.y,
            p.z,
            1.0,
        ])
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }
}

/// A material record: four texture slots and an opaque parameter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Raw slot bytes; `None` when the slot is all NULs.
    pub texture_slots: [Option<Vec<u8>>; 4],
    pub data: [u8; MATERIAL_DATA_SIZE],
}

impl Material {
    /// NUL-trimmed names of the present slots.
    pub fn textures(&self) -> impl Iterator<Item = &[u8]> {
        self.texture_slots
            .iter()
            .flatten()
            .map(|slot| trim_name(slot))
    }

    pub(crate) fn from_record(record: &[u8]) -> Self {
        let slot = |i: usize| {
            let raw = &record[i * MATERIAL_SLOT_WIDTH..(i + 1) * MATERIAL_SLOT_WIDTH];
            (!is_blank_slot(raw)).then(|| raw.to_vec())
        };
        let mut data = [0u8; MATERIAL_DATA_SIZE];
        data.copy_from_slice(&record[4 * MATERIAL_SLOT_WIDTH..MATERIAL_RECORD_SIZE]);
        Self {
            texture_slots: [slot(0), slot(1), slot(2), slot(3)],
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_named(name: &[u8], vertex_group_count: u32) -> Node {
        Node {
            name: name.to_vec(),
            unknown_shorts: [0; 3],
            vertex_group_count,
            transform: Transform::from_floats([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
            bbox: Aabb {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            },
            extra_ints: Vec::new(),
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
        }
    }

    #[test]
    fn test_renderable_markers() {
        assert!(node_named(b"Turret", 1).is_renderable());
        assert!(!node_named(b"Turret", 0).is_renderable());
        assert!(!node_named(b"hull_COLLISION_01", 1).is_renderable());
        assert!(!node_named(b"NODRAW_root", 2).is_renderable());
        assert!(!node_named(b"DUMMY", 1).is_renderable());
        // Markers are case sensitive.
        assert!(node_named(b"dummy", 1).is_renderable());
    }

    #[test]
    fn test_identity_rotation_matrix() {
        let t = Transform::from_floats([1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0, 9.0, 9.0, 9.0, 9.0]);
        assert_eq!(t.to_matrix(), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(t.trailing, [9.0; 4]);
    }

    #[test]
    fn test_unit_quaternion_matches_glam() {
        let q = Quat::from_rotation_y(0.7);
        let t = Transform {
            position: Vec3::new(4.0, -1.0, 0.5),
            rotation: q,
            trailing: [0.0; 4],
        };
        let expected = Mat4::from_rotation_translation(q, Vec3::new(4.0, -1.0, 0.5));
        assert!(t.to_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_material_slots() {
        let mut record = vec![0u8; MATERIAL_RECORD_SIZE];
        record[..5].copy_from_slice(b"grass");
        record[0x40..0x44].copy_from_slice(b"rock");
        record[0x80] = 0x7F;
        let material = Material::from_record(&record);

        assert!(material.texture_slots[1].is_none());
        let names: Vec<_> = material.textures().collect();
        assert_eq!(names, vec![b"grass".as_slice(), b"rock".as_slice()]);
        assert_eq!(material.data[0], 0x7F);
    }

    #[test]
    fn test_aabb_center() {
        let bbox = Aabb {
            min: Vec3::new(-2.0, 0.0, 4.0),
            max: Vec3::new(2.0, 6.0, 8.0),
        };
        assert_eq!(bbox.center(), Vec3::new(0.0, 3.0, 6.0));
    }
}
