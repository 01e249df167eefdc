//! Error types for platform profile operations.

use std::path::PathBuf;

/// Errors that can occur while resolving or loading platform profiles.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading a profile file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file not found.
    #[error("platform file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No built-in profile with this name.
    #[error("unknown platform '{name}' (known: {known})")]
    UnknownPlatform {
        /// Requested name.
        name: String,
        /// Comma-separated built-in names.
        known: String,
    },

    /// No built-in chip preset with this name.
    #[error("unknown DDR chip '{name}' (known: {known})")]
    UnknownChip {
        /// Requested name.
        name: String,
        /// Comma-separated preset names.
        known: String,
    },

    /// The platform does not name a default chip preset.
    #[error("platform '{platform}' has no default DDR chip")]
    NoDefaultChip {
        /// Platform name.
        platform: String,
    },

    /// A chip preset did not parse as a configuration.
    #[error(transparent)]
    Core(#[from] ddrc_core::CoreError),

    /// Validation error in a profile definition.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, TargetError>;
