//! Writers for synthetic resource streams used by the test suites
//!
//! Only depends on `std` so the integration tests can include it verbatim.
//! Tags are passed in mnemonic order and written reversed.

#![allow(dead_code)]

/// Growable big/little-endian byte sink.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn i8(&mut self, v: i8) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn u16_be(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn u16_le(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn i16_be(&mut self, v: i16) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn u32_be(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn u32_le(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn f32_be(&mut self, v: f32) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn f32_le(&mut self, v: f32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    /// A tag in its stored, reversed byte order.
    pub fn tag(&mut self, tag: impl Into<[u8; 4]>) -> &mut Self {
        let mut stored = tag.into();
        stored.reverse();
        self.bytes(&stored)
    }

    /// A name NUL-padded to `width` bytes.
    pub fn padded(&mut self, name: &str, width: usize) -> &mut Self {
        let mut field = vec![0u8; width];
        field[..name.len()].copy_from_slice(name.as_bytes());
        self.bytes(&field)
    }

    /// A `u32` BE length followed by the bytes.
    pub fn prefixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.u32_be(bytes.len() as u32).bytes(bytes)
    }

    /// A chunk whose little-endian size is computed from the body.
    pub fn chunk(&mut self, tag: impl Into<[u8; 4]>, body: impl FnOnce(&mut ByteWriter)) -> &mut Self {
        let mut inner = ByteWriter::new();
        body(&mut inner);
        self.tag(tag).u32_le(inner.len() as u32).bytes(&inner.buf)
    }

    /// GX CP register load.
    pub fn gx_load(&mut self, register: u8, value: u32) -> &mut Self {
        self.u8(0x08).u8(register).u32_be(value)
    }

    /// GX draw command header; the vertex data follows.
    pub fn gx_draw(&mut self, opcode: u8, vertex_count: u16) -> &mut Self {
        self.u8(opcode).u16_be(vertex_count)
    }
}

/// Builds a `RESF` container.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    marker: u32,
    name_width: usize,
    entries: Vec<([u8; 4], String, Vec<u8>)>,
}

impl ArchiveBuilder {
    /// `generation` is anything convertible to the header marker (1 or 2).
    pub fn new(generation: impl Into<u32>) -> Self {
        let marker = generation.into();
        Self {
            marker,
            name_width: if marker == 1 { 0x10 } else { 0x20 },
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, tag: impl Into<[u8; 4]>, name: &str, payload: &[u8]) -> Self {
        self.entries.push((tag.into(), name.to_string(), payload.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = ByteWriter::new();
        out.chunk(*b"RESF", |w| {
            w.u32_be(self.marker).u32_be(self.entries.len() as u32);
            for (tag, name, payload) in &self.entries {
                w.chunk(*tag, |e| {
                    e.padded(name, self.name_width).bytes(payload);
                });
            }
        });
        out.into_inner()
    }
}

/// Builds one `NODE` chunk.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    name: String,
    unknown: [u16; 3],
    vertex_group_count: Option<u32>,
    transform: [f32; 11],
    extra_ints: Vec<u32>,
    bbox: [f32; 6],
    preamble: ByteWriter,
    materials: Vec<[String; 4]>,
    trailer: ByteWriter,
}

impl NodeBuilder {
    pub fn new(name: &str) -> Self {
        let mut transform = [0.0; 11];
        transform[6] = 1.0;
        Self {
            name: name.to_string(),
            unknown: [0; 3],
            vertex_group_count: None,
            transform,
            extra_ints: Vec::new(),
            bbox: [0.0; 6],
            preamble: ByteWriter::new(),
            materials: Vec::new(),
            trailer: ByteWriter::new(),
        }
    }

    pub fn unknown_shorts(mut self, shorts: [u16; 3]) -> Self {
        self.unknown = shorts;
        self
    }

    /// Overrides the count derived from the material list.
    pub fn vertex_group_count(mut self, count: u32) -> Self {
        self.vertex_group_count = Some(count);
        self
    }

    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform[..3].copy_from_slice(&[x, y, z]);
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32, w: f32) -> Self {
        self.transform[3..7].copy_from_slice(&[x, y, z, w]);
        self
    }

    pub fn extra_ints(mut self, ints: &[u32]) -> Self {
        self.extra_ints = ints.to_vec();
        self
    }

    pub fn bbox(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.bbox[..3].copy_from_slice(&min);
        self.bbox[3..].copy_from_slice(&max);
        self
    }

    pub fn vertex_scale(mut self, scale: f32) -> Self {
        self.preamble.chunk(*b"VSCL", |w| {
            w.f32_le(scale);
        });
        self
    }

    pub fn preamble_chunk(mut self, tag: [u8; 4], body: &[u8]) -> Self {
        self.preamble.chunk(tag, |w| {
            w.bytes(body);
        });
        self
    }

    pub fn material(mut self, slots: [&str; 4]) -> Self {
        self.materials.push(slots.map(str::to_string));
        self
    }

    pub fn chunk(mut self, tag: [u8; 4], body: &[u8]) -> Self {
        self.trailer.chunk(tag, |w| {
            w.bytes(body);
        });
        self
    }

    pub fn lod(self, value: u32) -> Self {
        self.chunk(*b"SCNT", &value.to_be_bytes())
    }

    pub fn positions(self, positions: &[[i16; 3]]) -> Self {
        let mut body = ByteWriter::new();
        for p in positions {
            body.i16_be(p[0]).i16_be(p[1]).i16_be(p[2]);
        }
        self.chunk(*b"VPOS", &body.into_inner())
    }

    pub fn byte_normals(self, normals: &[[i8; 3]]) -> Self {
        let mut body = ByteWriter::new();
        for n in normals {
            body.i8(n[0]).i8(n[1]).i8(n[2]);
        }
        self.chunk(*b"VNRM", &body.into_inner())
    }

    /// Interleaved normal, binormal, tangent triples.
    pub fn nbt(self, frames: &[[f32; 9]]) -> Self {
        let mut body = ByteWriter::new();
        for frame in frames {
            for &v in frame {
                body.f32_be(v);
            }
        }
        self.chunk(*b"VNBT", &body.into_inner())
    }

    /// Fixed-point UVs; `channel` is 1-based like the tag.
    pub fn uvs(self, channel: u8, uvs: &[[i16; 2]]) -> Self {
        let mut body = ByteWriter::new();
        for uv in uvs {
            body.i16_be(uv[0]).i16_be(uv[1]);
        }
        self.chunk([b'V', b'U', b'V', b'0' + channel], &body.into_inner())
    }

    pub fn geometry(self, material_index: u32, stream: &[u8]) -> Self {
        let mut body = ByteWriter::new();
        body.u32_be(material_index)
            .u32_be(0)
            .u32_be(0)
            .u32_be(stream.len() as u32)
            .bytes(stream);
        self.chunk(*b"XBS2", &body.into_inner())
    }

    pub fn build(&self) -> Vec<u8> {
        let vertex_group_count = self
            .vertex_group_count
            .unwrap_or(self.materials.len() as u32);

        let mut out = ByteWriter::new();
        out.chunk(*b"NODE", |w| {
            w.prefixed(self.name.as_bytes());
            for s in self.unknown {
                w.u16_le(s);
            }
            w.u16_le(0).u32_le(vertex_group_count);
            for f in self.transform {
                w.f32_le(f);
            }
            for &i in &self.extra_ints {
                w.u32_be(i);
            }
            w.chunk(*b"BBOX", |b| {
                for f in self.bbox {
                    b.f32_le(f);
                }
            });
            w.bytes(&self.preamble.buf);
            w.chunk(*b"MATL", |m| {
                for slots in &self.materials {
                    for slot in slots {
                        m.padded(slot, 0x20);
                    }
                    m.bytes(&[0xEE; 0x24]);
                }
            });
            w.bytes(&self.trailer.buf);
        });
        out.into_inner()
    }
}

/// Builds a model payload (the bytes after the archive entry name).
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    display_name: Option<String>,
    extra_ints: Vec<u32>,
    header_floats: [f32; 4],
    nodes: Vec<Vec<u8>>,
    links: Vec<(u16, u16)>,
}

impl ModelBuilder {
    /// A legacy model: no embedded display name.
    pub fn legacy() -> Self {
        Self::default()
    }

    pub fn current(display_name: &str) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
            ..Self::default()
        }
    }

    pub fn extra_ints(mut self, ints: &[u32]) -> Self {
        self.extra_ints = ints.to_vec();
        self
    }

    pub fn node(mut self, node: &NodeBuilder) -> Self {
        self.nodes.push(node.build());
        self
    }

    pub fn link(mut self, parent: u16, child: u16) -> Self {
        self.links.push((parent, child));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = ByteWriter::new();
        out.u32_be(1)
            .u32_be(0)
            .u16_be(self.nodes.len() as u16)
            .u16_be(self.extra_ints.len() as u16)
            .u32_be(self.links.len() as u32);
        for f in self.header_floats {
            out.f32_be(f);
        }
        if let Some(name) = &self.display_name {
            out.prefixed(name.as_bytes());
        }
        for &i in &self.extra_ints {
            out.u32_be(i);
        }
        out.chunk(*b"XMEM", |w| {
            w.bytes(&[0; 8]);
        });
        for node in &self.nodes {
            out.bytes(node);
        }
        out.chunk(*b"CNCT", |w| {
            for &(parent, child) in &self.links {
                w.u16_le(parent).u16_le(child);
            }
        });
        out.into_inner()
    }
}

/// Builds a texture payload with a single `MIP ` chunk.
#[derive(Debug, Clone)]
pub struct TextureBuilder {
    format: String,
    width: u32,
    height: u32,
    mip_count: u32,
    header_size: Option<(u32, u32)>,
    palette: Vec<u16>,
    pixels: Vec<u8>,
}

impl TextureBuilder {
    pub fn new(format: &str, width: u32, height: u32) -> Self {
        Self {
            format: format.to_string(),
            width,
            height,
            mip_count: 1,
            header_size: None,
            palette: Vec::new(),
            pixels: Vec::new(),
        }
    }

    pub fn mip_count(mut self, count: u32) -> Self {
        self.mip_count = count;
        self
    }

    /// Dimensions written to the second header copy.
    pub fn mismatched_size(mut self, width: u32, height: u32) -> Self {
        self.header_size = Some((width, height));
        self
    }

    /// Palette entries; unset entries are zero.
    pub fn palette(mut self, colors: &[u16]) -> Self {
        self.palette = colors.to_vec();
        self
    }

    pub fn pixels(mut self, data: &[u8]) -> Self {
        self.pixels = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let (width2, height2) = self.header_size.unwrap_or((self.width, self.height));

        let mut format = [0u8; 16];
        let tag = self.format.as_bytes();
        for (i, &b) in tag.iter().rev().enumerate() {
            format[8 - tag.len() + i] = b;
        }
        format[8..].copy_from_slice(b"8B8G8R8A");

        let mut out = ByteWriter::new();
        out.u32_be(width2).u32_be(height2).u32_be(0).u32_be(0);
        out.bytes(&format);
        out.bytes(&[0; 0x20]);
        out.u32_be(self.mip_count)
            .u32_be(self.width)
            .u32_be(self.height)
            .u32_be(self.mip_count);
        if self.format == "P8" {
            for i in 0..256 {
                out.u16_be(self.palette.get(i).copied().unwrap_or(0));
            }
        }
        out.chunk(*b"MIP ", |w| {
            w.bytes(&self.pixels);
        });
        out.into_inner()
    }
}
