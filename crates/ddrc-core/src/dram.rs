//! DRAM type identification and the RDD type-code table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// DRAM technology family of the attached memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DramType {
    Ddr2,
    Ddr3,
    Lpddr2,
    Lpddr,
    Lpddr3,
    Unknown,
}

/// Substrings matched by [`DramType::detect_from_identifier`], in priority order.
const IDENTIFIER_PATTERNS: [(&str, DramType); 5] = [
    ("lpddr3", DramType::Lpddr3),
    ("lpddr2", DramType::Lpddr2),
    ("lpddr", DramType::Lpddr),
    ("ddr3", DramType::Ddr3),
    ("ddr2", DramType::Ddr2),
];

impl DramType {
    /// All concrete (non-`Unknown`) types.
    pub const ALL: [DramType; 5] = [
        DramType::Ddr2,
        DramType::Ddr3,
        DramType::Lpddr2,
        DramType::Lpddr,
        DramType::Lpddr3,
    ];

    /// Type code stored at RDD body offset 0x04.
    ///
    /// This is the RDD encoding, not the DDRC/DDRP register encoding.
    /// `Unknown` is written as 0.
    pub fn code(self) -> u32 {
        match self {
            DramType::Ddr3 => 0,
            DramType::Ddr2 => 1,
            DramType::Lpddr2 | DramType::Lpddr => 2,
            DramType::Lpddr3 => 4,
            DramType::Unknown => 0,
        }
    }

    /// Map an RDD type code back to a type.
    ///
    /// Code 2 is shared by LPDDR2 and LPDDR and decodes as `Lpddr2`.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => DramType::Ddr3,
            1 => DramType::Ddr2,
            2 => DramType::Lpddr2,
            4 => DramType::Lpddr3,
            _ => DramType::Unknown,
        }
    }

    /// Display name of an RDD type code, as reported by the vendor tool.
    pub fn code_name(code: u32) -> &'static str {
        match code {
            0 => "DDR3",
            1 => "DDR2",
            2 => "LPDDR2/LPDDR",
            4 => "LPDDR3",
            _ => "Unknown",
        }
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            DramType::Ddr2 => "DDR2",
            DramType::Ddr3 => "DDR3",
            DramType::Lpddr2 => "LPDDR2",
            DramType::Lpddr => "LPDDR",
            DramType::Lpddr3 => "LPDDR3",
            DramType::Unknown => "Unknown",
        }
    }

    /// Whether the mode-register pair carries the combined RL/WL code
    /// instead of raw CL/BL.
    pub fn uses_rl_wl(self) -> bool {
        matches!(self, DramType::Lpddr2 | DramType::Lpddr)
    }

    /// Infer the type from an external identifier such as a config file path.
    ///
    /// Returns `None` when no known substring is present. Callers that need
    /// the vendor behavior default to DDR2 in that case.
    #[deprecated(note = "set the DRAM type explicitly; substring matching is kept for old config trees")]
    pub fn detect_from_identifier(identifier: &str) -> Option<Self> {
        let lower = identifier.to_ascii_lowercase();
        IDENTIFIER_PATTERNS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, ty)| *ty)
    }
}

impl fmt::Display for DramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DramType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DramType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownDramType(s.to_string()))
    }
}
