use std::path::Path;

use bwres::prelude::*;

use super::KindFilter;

pub fn execute(source: &Path, kind: Option<KindFilter>, json: bool) -> anyhow::Result<()> {
    let archive = open_archive_file(source)?;
    let mut listing = list_archive(&archive);
    listing.entries.retain(|entry| match kind {
        None => true,
        Some(KindFilter::Model) => entry.kind == ResourceKind::Model.as_str(),
        Some(KindFilter::Texture) => entry.kind == ResourceKind::Texture.as_str(),
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{} ({} format, {} entries)", source.display(), listing.generation, archive.len());
    for entry in &listing.entries {
        println!("  {:<4} {:<32} {:>10} bytes", entry.tag, entry.name, entry.size);
    }
    Ok(())
}
