//! Error types for `BwRes`

use thiserror::Error;

/// The error type for `BwRes` operations.
///
/// Failures are local to the unit being decoded: a malformed model or texture
/// is reported for that resource only and never poisons the [`crate::Archive`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a declared field or chunk could be read.
    #[error("truncated input at offset 0x{offset:x}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Cursor position of the failed read.
        offset: usize,
        /// Number of bytes the read asked for.
        needed: usize,
        /// Number of bytes left in the stream.
        available: usize,
    },

    // ==================== Archive Errors ====================
    /// The container framing is inconsistent.
    #[error("malformed archive: {message}")]
    MalformedArchive {
        /// Description of what is invalid.
        message: String,
    },

    /// No entry with the requested name exists in the archive.
    #[error("resource not found: {name}")]
    ResourceNotFound {
        /// The requested name.
        name: String,
    },

    /// The named entry exists but is not of the requested kind.
    #[error("resource {name} is not a {expected}")]
    WrongResourceKind {
        /// The requested name.
        name: String,
        /// The kind the caller asked for.
        expected: &'static str,
    },

    // ==================== Model Errors ====================
    /// A model violated a structural invariant (wrong tag, bad stride,
    /// misaligned boundary, dangling or cyclic hierarchy).
    #[error("malformed model: {message}")]
    MalformedModel {
        /// Description of what is invalid.
        message: String,
    },

    /// The geometry command stream contained an opcode with no decode rule.
    #[error("unknown display list opcode 0x{opcode:02x} at offset 0x{offset:x}")]
    UnknownOpcode {
        /// The opcode byte.
        opcode: u8,
        /// Position of the opcode within the model payload.
        offset: usize,
    },

    // ==================== Texture Errors ====================
    /// A texture header is self-inconsistent or its pixel data is short.
    #[error("malformed texture: {message}")]
    MalformedTexture {
        /// Description of what is invalid.
        message: String,
    },

    /// A texture pixel encoding or vertex attribute encoding is not supported.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// The format identifier or description.
        format: String,
    },
}

impl Error {
    pub(crate) fn archive(message: impl Into<String>) -> Self {
        Error::MalformedArchive {
            message: message.into(),
        }
    }

    pub(crate) fn model(message: impl Into<String>) -> Self {
        Error::MalformedModel {
            message: message.into(),
        }
    }

    pub(crate) fn texture(message: impl Into<String>) -> Self {
        Error::MalformedTexture {
            message: message.into(),
        }
    }
}

/// A specialized Result type for `BwRes` operations.
pub type Result<T> = std::result::Result<T, Error>;
