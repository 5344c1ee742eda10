//! Types for resource archive handling

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::utils::{Tag, display_name, trim_name};

/// Which model generation an archive was authored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatGeneration {
    /// First-generation archives: 16-byte entry names, models without an
    /// embedded display name.
    Legacy,
    /// Second-generation archives: 32-byte entry names, models carry their
    /// own display name.
    Current,
}

impl FormatGeneration {
    /// Parse the archive header marker.
    #[must_use]
    pub fn from_marker(marker: u32) -> Option<Self> {
        match marker {
            1 => Some(FormatGeneration::Legacy),
            2 => Some(FormatGeneration::Current),
            _ => None,
        }
    }

    #[must_use]
    pub fn marker(self) -> u32 {
        match self {
            FormatGeneration::Legacy => 1,
            FormatGeneration::Current => 2,
        }
    }

    /// Width of the NUL-padded name field of every entry.
    #[must_use]
    pub fn name_width(self) -> usize {
        match self {
            FormatGeneration::Legacy => 0x10,
            FormatGeneration::Current => 0x20,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FormatGeneration::Legacy => "legacy",
            FormatGeneration::Current => "current",
        }
    }
}

impl fmt::Display for FormatGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FormatGeneration> for u32 {
    fn from(generation: FormatGeneration) -> Self {
        generation.marker()
    }
}

/// Classification of an archive entry by its chunk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Model,
    Texture,
    /// Any other resource type (sounds, scripts, ...); listed but never decoded.
    Other(Tag),
}

impl ResourceKind {
    #[must_use]
    pub fn from_tag(tag: Tag) -> Self {
        match tag {
            Tag::MODL => ResourceKind::Model,
            Tag::TEXT => ResourceKind::Texture,
            other => ResourceKind::Other(other),
        }
    }

    #[must_use]
    pub fn tag(self) -> Tag {
        match self {
            ResourceKind::Model => Tag::MODL,
            ResourceKind::Texture => Tag::TEXT,
            ResourceKind::Other(tag) => tag,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Model => "model",
            ResourceKind::Texture => "texture",
            ResourceKind::Other(_) => "other",
        }
    }
}

/// One named blob inside an archive.
///
/// The payload is a byte range into the archive's backing buffer; fetch it
/// with [`crate::Archive::payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Raw fixed-width name field, padding included.
    pub raw_name: Vec<u8>,
    pub kind: ResourceKind,
    pub payload: Range<usize>,
}

impl ResourceEntry {
    /// The name without its NUL padding.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        trim_name(&self.raw_name)
    }

    /// Lossy string form of [`Self::name`].
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.raw_name)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}
