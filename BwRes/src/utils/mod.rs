//! Utility functions

pub mod cursor;
pub mod name;

pub use cursor::{ByteCursor, ChunkHeader, Tag};
pub use name::{display_name, is_blank_slot, trim_name};
