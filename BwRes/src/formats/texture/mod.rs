//! GX texture format
//!
//! A texture payload is a fixed header, a palette for `P8` textures, and a
//! `MIP ` chunk holding the pixel levels. Only level 0 is decoded.

pub mod cache;
pub mod decode;
pub mod header;

pub use cache::TextureCache;
pub use decode::{decode_pixels, decode_rgb5a3, decode_rgb565};
pub use header::{PixelFormat, TextureHeader};

use crate::error::{Error, Result};
use crate::utils::{ByteCursor, Tag, display_name};

use header::PALETTE_SIZE;

/// A decoded texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: Vec<u8>,
    pub header: TextureHeader,
    pub format: PixelFormat,
    /// Row-major RGBA8, `width * height * 4` bytes; empty when the texture
    /// has no mip levels.
    pub rgba: Vec<u8>,
}

impl Texture {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.header.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.header.height
    }

    #[must_use]
    pub fn mip_count(&self) -> u32 {
        self.header.mip_count
    }

    /// The stored 8-byte format tag.
    #[must_use]
    pub fn format_tag(&self) -> [u8; 8] {
        self.header.format_tag
    }

    /// Whether there are pixels to upload.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.rgba.is_empty()
    }
}

/// Decode one texture payload.
///
/// A texture without mip levels is returned with an empty `rgba`.
///
/// # Errors
/// Returns [`Error::MalformedTexture`] for inconsistent headers or short pixel
/// data and [`Error::UnsupportedFormat`] for unknown format tags.
pub fn read_texture(payload: &[u8], name: &[u8]) -> Result<Texture> {
    let mut cursor = ByteCursor::new(payload);
    let header = TextureHeader::read(&mut cursor)?;

    let format = header.pixel_format().inspect_err(|e| {
        tracing::warn!("Texture {}: {e}", display_name(name));
    })?;

    if header.mip_count == 0 {
        tracing::debug!("Texture {} has no mip levels", display_name(name));
        return Ok(Texture {
            name: name.to_vec(),
            header,
            format,
            rgba: Vec::new(),
        });
    }

    let palette = match format {
        PixelFormat::P8 => Some(decode::decode_palette(cursor.read_bytes(PALETTE_SIZE)?)?),
        PixelFormat::Dxt1 | PixelFormat::Ia8 => None,
    };

    let chunk = cursor.read_chunk_header()?;
    if chunk.tag != Tag::MIP {
        return Err(Error::texture(format!("expected MIP chunk, found {}", chunk.tag)));
    }
    let pixels = cursor.read_bytes(chunk.size)?;

    let rgba = decode_pixels(
        format,
        pixels,
        palette.as_ref(),
        header.width as usize,
        header.height as usize,
    )?;

    tracing::debug!(
        "Decoded {format} texture {} ({}x{}, {} mips)",
        display_name(name),
        header.width,
        header.height,
        header.mip_count
    );

    Ok(Texture {
        name: name.to_vec(),
        header,
        format,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TextureBuilder;

    #[test]
    fn test_ia8_texture() {
        let mut pixels = Vec::new();
        for i in 0..16u8 {
            pixels.extend_from_slice(&[0xFF, i]);
        }
        let data = TextureBuilder::new("IA8", 4, 4).pixels(&pixels).build();
        let texture = read_texture(&data, b"grey").unwrap();

        assert!(texture.is_usable());
        assert_eq!(texture.format, PixelFormat::Ia8);
        assert_eq!((texture.width(), texture.height()), (4, 4));
        assert_eq!(texture.rgba.len(), 64);
        assert_eq!(&texture.rgba[4..8], &[1, 1, 1, 0xFF]);
    }

    #[test]
    fn test_palette_texture() {
        let data = TextureBuilder::new("P8", 8, 4)
            .palette(&[0x8000, 0x0FFF])
            .pixels(&[1; 32])
            .build();
        let texture = read_texture(&data, b"pal").unwrap();
        assert_eq!(&texture.rgba[..4], &[255, 255, 255, 0x60]);
    }

    #[test]
    fn test_extra_mip_levels_are_ignored() {
        let data = TextureBuilder::new("DXT1", 8, 8)
            .mip_count(2)
            .pixels(&[0; 64])
            .build();
        let texture = read_texture(&data, b"mips").unwrap();
        assert_eq!(texture.mip_count(), 2);
        assert_eq!(texture.rgba.len(), 8 * 8 * 4);
    }

    #[test]
    fn test_zero_mips_is_not_usable() {
        let data = TextureBuilder::new("DXT1", 8, 8).mip_count(0).build();
        let texture = read_texture(&data, b"empty").unwrap();
        assert!(!texture.is_usable());
        assert!(texture.rgba.is_empty());
    }

    #[test]
    fn test_short_pixel_data() {
        let data = TextureBuilder::new("DXT1", 16, 16).pixels(&[0; 32]).build();
        assert!(matches!(
            read_texture(&data, b"short"),
            Err(Error::MalformedTexture { .. })
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let data = TextureBuilder::new("CMPR", 8, 8).build();
        assert!(matches!(
            read_texture(&data, b"odd"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }
}
