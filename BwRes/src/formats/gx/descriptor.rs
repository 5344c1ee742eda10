//! GX vertex descriptor
//!
//! The descriptor is a 33-bit mask assembled from two CP register loads.
//! Bits `0..17` come from register `0x50`, bits `17..33` from register `0x60`:
//!
//! ```text
//! bit  0        position/normal matrix index  (1 bit, present = direct u8)
//! bits 1..=8    texture matrix index 0..7     (1 bit each, present = direct u8)
//! bits 9..=10   position                      (2 bit format)
//! bits 11..=12  normal
//! bits 13..=14  color 0
//! bits 15..=16  color 1
//! bits 17..=32  texture coordinate 0..7       (2 bit format each)
//! ```

use std::fmt;

/// Bits owned by the low register (`0x50`).
pub const LOW_MASK: u64 = 0x1FFFF;

/// Number of texture-coordinate (and texture-matrix) slots.
pub const TEX_SLOTS: usize = 8;

/// One logical per-vertex attribute slot, in stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    PositionMatrixIndex,
    TexMatrixIndex(u8),
    Position,
    Normal,
    Color(u8),
    TexCoord(u8),
}

impl Attribute {
    /// Every slot in the order the display list interleaves them.
    pub const ORDER: [Attribute; 21] = [
        Attribute::PositionMatrixIndex,
        Attribute::TexMatrixIndex(0),
        Attribute::TexMatrixIndex(1),
        Attribute::TexMatrixIndex(2),
        Attribute::TexMatrixIndex(3),
        Attribute::TexMatrixIndex(4),
        Attribute::TexMatrixIndex(5),
        Attribute::TexMatrixIndex(6),
        Attribute::TexMatrixIndex(7),
        Attribute::Position,
        Attribute::Normal,
        Attribute::Color(0),
        Attribute::Color(1),
        Attribute::TexCoord(0),
        Attribute::TexCoord(1),
        Attribute::TexCoord(2),
        Attribute::TexCoord(3),
        Attribute::TexCoord(4),
        Attribute::TexCoord(5),
        Attribute::TexCoord(6),
        Attribute::TexCoord(7),
    ];

    /// Matrix index slots are a single presence bit and always a direct byte.
    #[must_use]
    pub fn is_matrix_index(self) -> bool {
        matches!(self, Attribute::PositionMatrixIndex | Attribute::TexMatrixIndex(_))
    }

    /// First bit of this slot's field in the descriptor.
    fn shift(self) -> u32 {
        match self {
            Attribute::PositionMatrixIndex => 0,
            Attribute::TexMatrixIndex(i) => 1 + u32::from(i),
            Attribute::Position => 9,
            Attribute::Normal => 11,
            Attribute::Color(i) => 13 + 2 * u32::from(i),
            Attribute::TexCoord(i) => 17 + 2 * u32::from(i),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::PositionMatrixIndex => write!(f, "PNMTXIDX"),
            Attribute::TexMatrixIndex(i) => write!(f, "TEX{i}MTXIDX"),
            Attribute::Position => write!(f, "POS"),
            Attribute::Normal => write!(f, "NRM"),
            Attribute::Color(i) => write!(f, "CLR{i}"),
            Attribute::TexCoord(i) => write!(f, "TEX{i}"),
        }
    }
}

/// How an attribute is carried in the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    None,
    Direct,
    Index8,
    Index16,
}

impl AttributeFormat {
    fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            0 => AttributeFormat::None,
            1 => AttributeFormat::Direct,
            2 => AttributeFormat::Index8,
            _ => AttributeFormat::Index16,
        }
    }
}

/// Running vertex descriptor state for one node's geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexDescriptor {
    bits: u64,
}

impl VertexDescriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_value(bits: u64) -> Self {
        Self { bits }
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.bits
    }

    /// Register `0x50`: replaces the low 17 bits.
    ///
    /// The value is OR-ed in whole, so stray bits above 17 land in the high
    /// half exactly as the hardware register pair would combine them.
    pub fn load_low(&mut self, value: u32) {
        self.bits = (self.bits & !LOW_MASK) | u64::from(value);
    }

    /// Register `0x60`: replaces everything above the low 17 bits.
    pub fn load_high(&mut self, value: u32) {
        self.bits = (self.bits & LOW_MASK) | (u64::from(value) << 17);
    }

    #[must_use]
    pub fn format(&self, attribute: Attribute) -> AttributeFormat {
        let field = self.bits >> attribute.shift();
        if attribute.is_matrix_index() {
            if field & 1 == 1 {
                AttributeFormat::Direct
            } else {
                AttributeFormat::None
            }
        } else {
            AttributeFormat::from_bits(field)
        }
    }

    /// Present slots and their formats, in stream order.
    pub fn active_attributes(&self) -> impl Iterator<Item = (Attribute, AttributeFormat)> + '_ {
        Attribute::ORDER
            .iter()
            .map(|&attribute| (attribute, self.format(attribute)))
            .filter(|(_, format)| *format != AttributeFormat::None)
    }
}
