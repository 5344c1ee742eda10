use std::path::Path;

use anyhow::Context;
use bwres::prelude::*;

pub fn execute(source: &Path, name: &str, json: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let archive = open_archive_file(source)?;
    let model = archive
        .decode_model(name)
        .with_context(|| format!("Failed to decode model {name}"))?;
    let info = inspect_model(&model)?;

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&info)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ Wrote {}", path.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!(
        "{} ({} v{}.{}): {} nodes, {} links",
        info.name, info.generation, info.format_version.0, info.format_version.1, info.node_count, info.link_count
    );
    if !info.textures.is_empty() {
        println!("Textures: {}", info.textures.join(", "));
    }
    for node in &info.nodes {
        let parent = node.parent.map_or_else(|| "-".to_string(), |p| p.to_string());
        let triangles: usize = node.batches.iter().map(|b| b.triangles).sum();
        println!(
            "  [{:>3}] {:<24} parent {:>3}  {:>5} verts  {:>5} tris{}",
            node.index,
            node.name,
            parent,
            node.vertices,
            triangles,
            if node.renderable { "" } else { "  (hidden)" }
        );
    }
    Ok(())
}
