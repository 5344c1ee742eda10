//! Shared fixtures for the integration tests

#![allow(dead_code)]

#[path = "../../src/testing.rs"]
mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

pub use writer::*;

/// Triangle list over the first `count` positions, 8-bit indexed.
pub fn triangle_list(count: u8) -> Vec<u8> {
    let mut gx = ByteWriter::new();
    gx.gx_load(0x50, 2 << 9).gx_draw(0x90, u16::from(count));
    for i in 0..count {
        gx.u8(i);
    }
    gx.into_inner()
}

/// A small legacy archive: a two-node tank, its texture, and one sound.
pub fn tank_archive() -> Vec<u8> {
    let hull = NodeBuilder::new("hull")
        .position(1.0, 0.0, 0.0)
        .material(["camo", "", "", ""])
        .positions(&[[0, 0, 0], [1, 0, 0], [0, 1, 0]])
        .geometry(0, &triangle_list(3));
    let model = ModelBuilder::legacy()
        .node(&NodeBuilder::new("COLLISION_root").position(0.0, 0.0, 5.0).material(["", "", "", ""]))
        .node(&hull)
        .link(0, 1)
        .build();

    let pixels: Vec<u8> = (0..16).flat_map(|i| [0xFF, i]).collect();
    let camo = TextureBuilder::new("IA8", 4, 4).pixels(&pixels).build();

    ArchiveBuilder::new(1u32)
        .entry(*b"MODL", "tank", &model)
        .entry(*b"TEXT", "camo", &camo)
        .entry(*b"SFX ", "engine", &[1, 2, 3])
        .build()
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

pub fn write_gzip(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    write_file(dir, name, &encoder.finish().unwrap())
}
