use std::path::Path;

use anyhow::Context;
use bwres::prelude::*;

pub fn execute(source: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let archive = open_archive_file(source)?;
    let texture = decode_texture(&archive, name).with_context(|| format!("Failed to decode texture {name}"))?;
    let info = inspect_texture(&texture);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!(
            "{}: {} {}x{}, {} mip levels, {} RGBA bytes{}",
            info.name,
            info.format,
            info.width,
            info.height,
            info.mip_count,
            info.rgba_bytes,
            if info.usable { "" } else { " (no pixel data)" }
        );
    }
    Ok(())
}
