//! Error types for configuration parsing and timing encoding.

/// Errors that can occur while parsing or encoding a DDR configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The configuration document has no section with the required name.
    #[error("no [{section}] section in configuration")]
    MissingSection {
        /// Name of the missing section.
        section: String,
    },

    /// A line could not be parsed as a section header or key/value pair.
    #[error("syntax error on line {line}: {detail}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A parameter value is not an integer where one is required.
    #[error("parameter {key} has non-integer value '{value}'")]
    InvalidValue {
        /// Canonical (upper-case) parameter name.
        key: String,
        /// The raw value text.
        value: String,
    },

    /// The DDR clock frequency cannot produce a positive clock period.
    #[error("invalid DDR frequency {freq_hz} Hz: must be at least 1000 Hz")]
    InvalidFrequency {
        /// The rejected frequency.
        freq_hz: u64,
    },

    /// A value does not fit the byte-sized field it is packed into.
    #[error("{field} = {value} does not fit in one byte (0..=255)")]
    OutOfRange {
        /// Field name (e.g. `tRFC`, `ROW`).
        field: &'static str,
        /// The value that was rejected.
        value: i64,
    },

    /// A DRAM type name was not recognized.
    #[error("unknown DRAM type '{0}' (expected ddr2, ddr3, lpddr, lpddr2 or lpddr3)")]
    UnknownDramType(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
