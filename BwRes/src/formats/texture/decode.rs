//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! GX texture decoding to RGBA8
//!
//! All three encodings are tiled. Tiles run left to right, top to bottom, and
//! texels of partial edge tiles outside the image are dropped.

use byteorder::{BigEndian, ByteOrder};

use super::header::{PixelFormat, TILE_BYTES};
use crate::error::{Error, Result};

/// Expand an RGB565 color; channels are scaled by multiplication, not bit
/// replication, so white decodes to `(248, 252, 248)`.
#[must_use]
pub fn decode_rgb565(value: u16) -> [u8; 4] {
    let r = ((value >> 11) & 0x1F) as u8 * 8;
    let g = ((value >> 5) & 0x3F) as u8 * 4;
    let b = (value & 0x1F) as u8 * 8;
    [r, g, b, 255]
}

/// Expand an RGB5A3 color.
///
/// With the top bit set the value is opaque RGB555. Otherwise it is RGB444
/// with a 3-bit alpha taken from bits 10..13 and scaled by 0x20, so `0x0FFF`
/// decodes to alpha `0x60`.
#[must_use]
pub fn decode_rgb5a3(value: u16) -> [u8; 4] {
    if value & 0x8000 != 0 {
        let r = ((value >> 10) & 0x1F) as u8 * 8;
        let g = ((value >> 5) & 0x1F) as u8 * 8;
        let b = (value & 0x1F) as u8 * 8;
        [r, g, b, 255]
    } else {
        let a = ((value >> 10) & 0x7) as u8 * 0x20;
        let r = ((value >> 8) & 0xF) as u8 * 0x11;
        let g = ((value >> 4) & 0xF) as u8 * 0x11;
        let b = (value & 0xF) as u8 * 0x11;
        [r, g, b, a]
    }
}

/// Decode level 0 of `data` into a `width * height * 4` RGBA buffer.
///
/// `palette` is required for [`PixelFormat::P8`] and ignored otherwise.
///
/// # Errors
/// Returns [`Error::MalformedTexture`] if `data` is shorter than the level
/// needs or a palette is missing.
pub fn decode_pixels(
    format: PixelFormat,
    data: &[u8],
    palette: Option<&[[u8; 4]; 256]>,
    width: usize,
    height: usize,
) -> Result<Vec<u8>> {
    let needed = format
        .level_size(width, height)
        .ok_or_else(|| Error::texture(format!("{width}x{height} is too large")))?;
    if data.len() < needed {
        return Err(Error::texture(format!(
            "{format} {width}x{height} needs {needed} bytes of pixel data, found {}",
            data.len()
        )));
    }

    let mut image = Image::new(width, height);
    let (tile_w, tile_h) = format.tile_size();
    let tiles_x = width.div_ceil(tile_w);

    for (index, tile) in data[..needed].chunks_exact(TILE_BYTES).enumerate() {
        let origin_x = (index % tiles_x) * tile_w;
        let origin_y = (index / tiles_x) * tile_h;

        match format {
            PixelFormat::Dxt1 => decode_dxt1_tile(&mut image, tile, origin_x, origin_y),
            PixelFormat::Ia8 => {
                for (i, texel) in tile.chunks_exact(2).enumerate() {
                    let [alpha, intensity] = [texel[0], texel[1]];
                    image.put(origin_x + i % 4, origin_y + i / 4, [intensity, intensity, intensity, alpha]);
                }
            }
            PixelFormat::P8 => {
                let palette = palette.ok_or_else(|| Error::texture("P8 texture without a palette"))?;
                for (i, &entry) in tile.iter().enumerate() {
                    image.put(origin_x + i % 8, origin_y + i / 8, palette[usize::from(entry)]);
                }
            }
        }
    }

    Ok(image.rgba)
}

/// One 8x8 tile: four 4x4 DXT1 blocks in Z order.
fn decode_dxt1_tile(image: &mut Image, tile: &[u8], origin_x: usize, origin_y: usize) {
    for (sub, block) in tile.chunks_exact(8).enumerate() {
        let block_x = origin_x + (sub % 2) * 4;
        let block_y = origin_y + (sub / 2) * 4;
        let colors = dxt1_palette(BigEndian::read_u16(&block[0..2]), BigEndian::read_u16(&block[2..4]));
        let mask = BigEndian::read_u32(&block[4..8]);

        for i in 0..16 {
            let selector = (mask >> ((15 - i) * 2)) & 0b11;
            image.put(block_x + i % 4, block_y + i / 4, colors[selector as usize]);
        }
    }
}

/// The four block colors. Blends use truncating integer division.
#[must_use]
pub fn dxt1_palette(raw0: u16, raw1: u16) -> [[u8; 4]; 4] {
    let c0 = decode_rgb565(raw0);
    let c1 = decode_rgb565(raw1);
    let blend = |wa: u16, wb: u16, div: u16| -> [u8; 4] {
        let mut out = [0, 0, 0, 255];
        for ch in 0..3 {
            out[ch] = ((wa * u16::from(c0[ch]) + wb * u16::from(c1[ch])) / div) as u8;
        }
        out
    };

    if raw0 > raw1 {
        [c0, c1, blend(2, 1, 3), blend(1, 2, 3)]
    } else {
        [c0, c1, blend(1, 1, 2), [0, 0, 0, 0]]
    }
}

/// Decode a big-endian RGB5A3 palette.
pub fn decode_palette(data: &[u8]) -> Result<[[u8; 4]; 256]> {
    if data.len() < 512 {
        return Err(Error::texture(format!("palette is {} bytes, expected 512", data.len())));
    }
    let mut palette = [[0u8; 4]; 256];
    for (entry, raw) in palette.iter_mut().zip(data.chunks_exact(2)) {
        *entry = decode_rgb5a3(BigEndian::read_u16(raw));
    }
    Ok(palette)
}

/// Row-major RGBA8 target that ignores writes outside the image.
struct Image {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Image {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    fn put(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        if x < self.width && y < self.height {
            let offset = (y * self.width + x) * 4;
            self.rgba[offset..offset + 4].copy_from_slice(&pixel);
        }
    }
}
