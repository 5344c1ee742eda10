//! Sequential primitive reader over an in-memory byte buffer
//!
//! Resource files mix endianness: chunk sizes are little-endian while most
//! payload scalars are big-endian, so every reader names its byte order.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// A four-character chunk tag in mnemonic order.
///
/// Tags are stored reversed on disk (`NODE` is the bytes `EDON`);
/// [`ByteCursor::read_tag`] undoes the reversal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const RESF: Tag = Tag(*b"RESF");
    pub const MODL: Tag = Tag(*b"MODL");
    pub const TEXT: Tag = Tag(*b"TEXT");

    pub const XMEM: Tag = Tag(*b"XMEM");
    pub const NODE: Tag = Tag(*b"NODE");
    pub const CNCT: Tag = Tag(*b"CNCT");
    pub const BBOX: Tag = Tag(*b"BBOX");
    pub const RNOD: Tag = Tag(*b"RNOD");
    pub const VSCL: Tag = Tag(*b"VSCL");
    pub const MATL: Tag = Tag(*b"MATL");
    pub const SCNT: Tag = Tag(*b"SCNT");
    pub const VUV1: Tag = Tag(*b"VUV1");
    pub const VUV2: Tag = Tag(*b"VUV2");
    pub const VUV3: Tag = Tag(*b"VUV3");
    pub const VUV4: Tag = Tag(*b"VUV4");
    pub const XBS2: Tag = Tag(*b"XBS2");
    pub const VPOS: Tag = Tag(*b"VPOS");
    pub const VNRM: Tag = Tag(*b"VNRM");
    pub const VNBT: Tag = Tag(*b"VNBT");

    pub const MIP: Tag = Tag(*b"MIP ");

    /// Build a tag from its on-disk (reversed) bytes.
    #[must_use]
    pub fn from_stored(bytes: [u8; 4]) -> Self {
        let [a, b, c, d] = bytes;
        Tag([d, c, b, a])
    }

    /// The on-disk (reversed) byte order of this tag.
    #[must_use]
    pub fn to_stored(self) -> [u8; 4] {
        let [a, b, c, d] = self.0;
        [d, c, b, a]
    }

    /// Index of a `VUV1`..`VUV4` tag, if it is one.
    #[must_use]
    pub fn uv_channel(self) -> Option<usize> {
        match self.0 {
            [b'V', b'U', b'V', n @ b'1'..=b'4'] => Some(usize::from(n - b'1')),
            _ => None,
        }
    }
}

impl From<Tag> for [u8; 4] {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// Header of a tagged chunk: tag, little-endian size, and payload bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: Tag,
    pub size: usize,
    /// Offset of the first payload byte.
    pub start: usize,
}

impl ChunkHeader {
    /// Offset one past the last payload byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.size
    }
}

/// Position-tracking reader over a borrowed byte slice.
///
/// Holds no state beyond the position; every read either consumes exactly the
/// bytes it promises or fails with [`Error::TruncatedInput`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position.
    #[must_use]
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position. Seeking to the end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: pos.saturating_sub(self.pos),
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16_be(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32_be(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32_be(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    /// Read a stored tag, reversing it into mnemonic order.
    pub fn read_tag(&mut self) -> Result<Tag> {
        Ok(Tag::from_stored(self.read_array()?))
    }

    /// Read a tag followed by its little-endian size.
    pub fn read_chunk_header(&mut self) -> Result<ChunkHeader> {
        let tag = self.read_tag()?;
        let size = self.read_u32_le()? as usize;
        Ok(ChunkHeader {
            tag,
            size,
            start: self.pos,
        })
    }

    /// Read a big-endian `u32` length followed by that many bytes.
    pub fn read_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32_be()? as usize;
        self.read_bytes(len)
    }
}
