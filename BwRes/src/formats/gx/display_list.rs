//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! GX display list interpreter
//!
//! Each `XBS2` chunk embeds a small command stream: register loads that
//! reshape the [`VertexDescriptor`], filler bytes, and draw commands whose
//! vertices are interleaved attribute indices.

use serde::Serialize;

use super::descriptor::{Attribute, AttributeFormat, TEX_SLOTS, VertexDescriptor};
use crate::error::{Error, Result};
use crate::utils::ByteCursor;

const GX_NOP: u8 = 0x00;
const GX_LOAD_CP_REG: u8 = 0x08;
const GX_LOAD_XF_REG: u8 = 0x10;
const GX_DRAW_TRIANGLES: u8 = 0x90;
const GX_DRAW_TRIANGLE_STRIP: u8 = 0x98;

/// Draw opcodes carry the vertex format index in their low bits.
const DRAW_OPCODE_MASK: u8 = 0xFA;

const CP_VCD_LO: u8 = 0x50;
const CP_VCD_HI: u8 = 0x60;

/// Topology of a decoded draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimitiveKind {
    TriangleStrip,
    TriangleList,
}

impl PrimitiveKind {
    fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode & DRAW_OPCODE_MASK {
            GX_DRAW_TRIANGLE_STRIP => Some(PrimitiveKind::TriangleStrip),
            GX_DRAW_TRIANGLES => Some(PrimitiveKind::TriangleList),
            _ => None,
        }
    }
}

/// The attribute indices of one vertex in a draw command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeTuple {
    pub position_index: Option<u16>,
    pub normal_index: Option<u16>,
    pub tex_coord_indices: [Option<u16>; TEX_SLOTS],
}

/// One draw command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub vertices: Vec<AttributeTuple>,
}

/// Decode draw commands from `cursor` until `end`.
///
/// `descriptor` carries over between calls: register loads in one chunk stay
/// in effect for the following chunks of the same node. The cursor must land
/// exactly on `end`.
pub fn decode_display_list(
    cursor: &mut ByteCursor<'_>,
    end: usize,
    descriptor: &mut VertexDescriptor,
) -> Result<Vec<Primitive>> {
    let mut primitives = Vec::new();

    while cursor.tell() < end {
        let offset = cursor.tell();
        let opcode = cursor.read_u8()?;

        match opcode {
            GX_NOP => {}
            GX_LOAD_CP_REG => {
                let register = cursor.read_u8()?;
                let value = cursor.read_u32_be()?;
                match register {
                    CP_VCD_LO => descriptor.load_low(value),
                    CP_VCD_HI => descriptor.load_high(value),
                    other => {
                        return Err(Error::model(format!(
                            "unknown CP register 0x{other:02x} at offset 0x{offset:x}"
                        )));
                    }
                }
            }
            GX_LOAD_XF_REG => {
                // Transform unit state; irrelevant to decoded geometry.
                cursor.skip(8)?;
            }
            _ => {
                let kind = PrimitiveKind::from_opcode(opcode)
                    .ok_or(Error::UnknownOpcode { opcode, offset })?;
                primitives.push(read_primitive(cursor, kind, descriptor)?);
            }
        }
    }

    if cursor.tell() != end {
        return Err(Error::model(format!(
            "display list overran its boundary: ended at 0x{:x}, expected 0x{end:x}",
            cursor.tell()
        )));
    }

    Ok(primitives)
}

fn read_primitive(
    cursor: &mut ByteCursor<'_>,
    kind: PrimitiveKind,
    descriptor: &VertexDescriptor,
) -> Result<Primitive> {
    let vertex_count = cursor.read_u16_be()?;
    let attributes: Vec<_> = descriptor.active_attributes().collect();

    let mut vertices = Vec::with_capacity(usize::from(vertex_count));
    for _ in 0..vertex_count {
        let mut tuple = AttributeTuple::default();
        for &(attribute, format) in &attributes {
            let index = read_attribute_index(cursor, attribute, format)?;
            match attribute {
                Attribute::Position => tuple.position_index = Some(index),
                Attribute::Normal => tuple.normal_index = Some(index),
                Attribute::TexCoord(slot) => {
                    tuple.tex_coord_indices[usize::from(slot)] = Some(index);
                }
                // Consumed to keep the stream aligned.
                Attribute::PositionMatrixIndex
                | Attribute::TexMatrixIndex(_)
                | Attribute::Color(_) => {}
            }
        }
        vertices.push(tuple);
    }

    tracing::trace!("{kind:?} with {vertex_count} vertices");
    Ok(Primitive { kind, vertices })
}

fn read_attribute_index(
    cursor: &mut ByteCursor<'_>,
    attribute: Attribute,
    format: AttributeFormat,
) -> Result<u16> {
    if attribute.is_matrix_index() {
        return cursor.read_u8().map(u16::from);
    }
    match format {
        AttributeFormat::Index8 => cursor.read_u8().map(u16::from),
        AttributeFormat::Index16 => cursor.read_u16_be(),
        AttributeFormat::Direct | AttributeFormat::None => Err(Error::UnsupportedFormat {
            format: format!("{format:?} vertex data for {attribute}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(register: u8, value: u32) -> Vec<u8> {
        let mut out = vec![GX_LOAD_CP_REG, register];
        out.extend_from_slice(&value.to_be_bytes());
        out
    }

    #[test]
    fn test_triangle_list_with_mixed_widths() {
        let mut stream = cp(CP_VCD_LO, (3 << 9) | (2 << 11));
        stream.extend(cp(CP_VCD_HI, 2));
        stream.push(GX_DRAW_TRIANGLES);
        stream.extend_from_slice(&3u16.to_be_bytes());
        for i in 0..3u16 {
            stream.extend_from_slice(&(0x100 + i).to_be_bytes()); // POS index16
            stream.push(i as u8); // NRM index8
            stream.push(7 + i as u8); // TEX0 index8
        }
        stream.push(GX_NOP);

        let mut cursor = ByteCursor::new(&stream);
        let mut vcd = VertexDescriptor::new();
        let prims = decode_display_list(&mut cursor, stream.len(), &mut vcd).unwrap();

        assert_eq!(prims.len(), 1);
        assert_eq!(prims[0].kind, PrimitiveKind::TriangleList);
        assert_eq!(prims[0].vertices.len(), 3);
        assert_eq!(prims[0].vertices[2].position_index, Some(0x102));
        assert_eq!(prims[0].vertices[2].normal_index, Some(2));
        assert_eq!(prims[0].vertices[2].tex_coord_indices[0], Some(9));
        assert_eq!(prims[0].vertices[2].tex_coord_indices[1], None);
    }

    #[test]
    fn test_matrix_and_color_slots_are_skipped() {
        // PNMTXIDX direct, POS index8, CLR0 index16
        let mut stream = cp(CP_VCD_LO, 1 | (2 << 9) | (3 << 13));
        stream.extend_from_slice(&[0x10, 0, 0, 0, 0, 0, 0, 0, 0]); // XF load, ignored
        stream.push(0x99); // strip, vertex format 1
        stream.extend_from_slice(&2u16.to_be_bytes());
        stream.extend_from_slice(&[0xAA, 5, 0xDE, 0xAD]);
        stream.extend_from_slice(&[0xBB, 6, 0xBE, 0xEF]);

        let mut cursor = ByteCursor::new(&stream);
        let mut vcd = VertexDescriptor::new();
        let prims = decode_display_list(&mut cursor, stream.len(), &mut vcd).unwrap();

        assert_eq!(prims[0].kind, PrimitiveKind::TriangleStrip);
        let positions: Vec<_> = prims[0].vertices.iter().map(|v| v.position_index).collect();
        assert_eq!(positions, vec![Some(5), Some(6)]);
        assert_eq!(cursor.tell(), stream.len());
    }

    #[test]
    fn test_unknown_opcode_is_fatal() {
        let stream = [GX_NOP, 0x42];
        let mut cursor = ByteCursor::new(&stream);
        let err = decode_display_list(&mut cursor, 2, &mut VertexDescriptor::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownOpcode { opcode: 0x42, offset: 1 }));
    }

    #[test]
    fn test_overrun_is_malformed() {
        let mut stream = cp(CP_VCD_LO, 2 << 9);
        stream.push(GX_DRAW_TRIANGLES);
        stream.extend_from_slice(&3u16.to_be_bytes());
        stream.extend_from_slice(&[0, 1, 2]);
        let declared = stream.len() - 1;

        let mut cursor = ByteCursor::new(&stream);
        let err = decode_display_list(&mut cursor, declared, &mut VertexDescriptor::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedModel { .. }));
    }

    #[test]
    fn test_direct_position_is_unsupported() {
        let mut stream = cp(CP_VCD_LO, 1 << 9);
        stream.push(GX_DRAW_TRIANGLES);
        stream.extend_from_slice(&1u16.to_be_bytes());
        let mut cursor = ByteCursor::new(&stream);
        let err = decode_display_list(&mut cursor, stream.len(), &mut VertexDescriptor::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
