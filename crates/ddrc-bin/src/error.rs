//! Error types for building and reading binary records.

use std::io;

use ddrc_core::CoreError;

/// Errors that can occur while building, validating or decoding a record.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The buffer length matches neither record layout.
    #[error("record is {len} bytes; expected 324 or 384")]
    InvalidLength {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// A section does not start with its magic bytes.
    #[error("invalid {section} magic at offset {offset}")]
    InvalidMagic {
        /// Section name (`FIDB` or `RDD`).
        section: &'static str,
        /// Offset of the expected magic within the record.
        offset: usize,
    },

    /// A section header declares a body size other than the layout's.
    #[error("{section} size field is {found}, expected {expected}")]
    SizeMismatch {
        /// Section name (`FIDB` or `RDD`).
        section: &'static str,
        /// Body size the layout requires.
        expected: u32,
        /// Body size stored in the header.
        found: u32,
    },

    /// The stored RDD CRC32 does not match the body.
    #[error("RDD checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch {
        /// Checksum read from the record.
        stored: u32,
        /// Checksum computed over the RDD body.
        computed: u32,
    },

    /// A freshly built record broke a structural rule.
    #[error("record invariant violated: {detail}")]
    InvariantViolation {
        /// Description of the violation.
        detail: String,
    },

    /// Configuration or timing error from the encode path.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// I/O error reading a byte source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, FormatError>;
