//! Model decoding options

use crate::archive::FormatGeneration;

/// Transform chains longer than this are treated as cycles.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 200;

/// Options for decoding a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDecodeOptions {
    /// Force a model generation instead of the archive's marker
    pub generation: Option<FormatGeneration>,
    /// Maximum parent chain length accepted when composing transforms
    pub max_hierarchy_depth: usize,
    /// Reject unknown chunks between `BBOX` and `MATL` instead of skipping them
    pub strict_preamble: bool,
}

impl Default for ModelDecodeOptions {
    fn default() -> Self {
        Self {
            generation: None,
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            strict_preamble: true,
        }
    }
}

impl ModelDecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as the given generation regardless of the archive marker
    #[must_use]
    pub fn with_generation(mut self, generation: FormatGeneration) -> Self {
        self.generation = Some(generation);
        self
    }

    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    /// Skip unknown preamble chunks by size
    #[must_use]
    pub fn lenient_preamble(mut self) -> Self {
        self.strict_preamble = false;
        self
    }
}
