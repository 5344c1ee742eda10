//! Texture payload header

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::{ByteCursor, trim_name};

/// Bytes before the optional palette.
pub const HEADER_SIZE: usize = 0x50;
/// 256 RGB5A3 entries.
pub const PALETTE_SIZE: usize = 0x200;
/// Every encoding packs a tile into 32 bytes.
pub const TILE_BYTES: usize = 32;

/// Pixel encoding selected by the header format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelFormat {
    /// 8x8 tiles of four DXT1 sub-blocks.
    Dxt1,
    /// 4x4 tiles of (alpha, intensity) byte pairs.
    Ia8,
    /// 8x4 tiles of palette indices into 256 RGB5A3 colors.
    P8,
}

impl PixelFormat {
    /// Match a format code in mnemonic order (`DXT1`, `IA8`, `P8`).
    #[must_use]
    pub fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            b"DXT1" => Some(PixelFormat::Dxt1),
            b"IA8" => Some(PixelFormat::Ia8),
            b"P8" => Some(PixelFormat::P8),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::Dxt1 => "DXT1",
            PixelFormat::Ia8 => "IA8",
            PixelFormat::P8 => "P8",
        }
    }

    /// Tile dimensions in pixels.
    #[must_use]
    pub fn tile_size(self) -> (usize, usize) {
        match self {
            PixelFormat::Dxt1 => (8, 8),
            PixelFormat::Ia8 => (4, 4),
            PixelFormat::P8 => (8, 4),
        }
    }

    /// Encoded size of a `width` x `height` level, whole tiles included.
    #[must_use]
    pub fn level_size(self, width: usize, height: usize) -> Option<usize> {
        let (tile_w, tile_h) = self.tile_size();
        width
            .div_ceil(tile_w)
            .checked_mul(height.div_ceil(tile_h))?
            .checked_mul(TILE_BYTES)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed texture header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHeader {
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    /// First half of the format field, as stored.
    pub format_tag: [u8; 8],
    /// Second half of the format field; always `8B8G8R8A`.
    pub pixel_layout: [u8; 8],
    pub unknown_ints: [u32; 6],
    pub unknown_bytes: [u8; 16],
}

impl TextureHeader {
    /// Parse and cross-check the two copies of the dimensions.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let width2 = cursor.read_u32_be()?;
        let height2 = cursor.read_u32_be()?;
        let unk1 = cursor.read_u32_be()?;
        let unk2 = cursor.read_u32_be()?;
        let format_tag = cursor.read_array::<8>()?;
        let pixel_layout = cursor.read_array::<8>()?;
        let unk3 = cursor.read_u32_be()?;
        let unk4 = cursor.read_u32_be()?;
        let unk5 = cursor.read_u32_be()?;
        let unk6 = cursor.read_u32_be()?;
        let unknown_bytes = cursor.read_array::<16>()?;
        let mip_count = cursor.read_u32_be()?;
        let width = cursor.read_u32_be()?;
        let height = cursor.read_u32_be()?;
        let mip_count2 = cursor.read_u32_be()?;

        if (width, height) != (width2, height2) {
            return Err(Error::texture(format!(
                "dimension copies disagree: {width}x{height} vs {width2}x{height2}"
            )));
        }
        if mip_count != mip_count2 {
            return Err(Error::texture(format!(
                "mip count copies disagree: {mip_count} vs {mip_count2}"
            )));
        }

        Ok(Self {
            width,
            height,
            mip_count,
            format_tag,
            pixel_layout,
            unknown_ints: [unk1, unk2, unk3, unk4, unk5, unk6],
            unknown_bytes,
        })
    }

    /// The format tag in mnemonic order without padding (`DXT1`).
    #[must_use]
    pub fn format_code(&self) -> Vec<u8> {
        let mut code = self.format_tag;
        code.reverse();
        trim_name(&code).to_vec()
    }

    pub fn pixel_format(&self) -> Result<PixelFormat> {
        let code = self.format_code();
        PixelFormat::from_code(&code).ok_or_else(|| Error::UnsupportedFormat {
            format: format!("texture format {:?}", String::from_utf8_lossy(&code)),
        })
    }
}
