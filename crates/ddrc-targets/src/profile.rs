//! Platform profile model and built-in registry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Platform identifier found in every known vendor FIDB block.
pub const DEFAULT_PLATFORM_ID: u32 = 0x1980_0000;

/// Board and SoC values written into the FIDB block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformProfile {
    /// Platform name (e.g., "t31").
    pub name: String,
    /// Crystal oscillator frequency in Hz.
    pub crystal_freq_hz: u32,
    /// CPU clock in Hz.
    pub cpu_freq_hz: u32,
    /// Default DDR clock in Hz, used when no override is given.
    pub ddr_freq_hz: u32,
    /// Bootloader console baud rate.
    pub uart_baud: u32,
    /// Memory size field in bytes. Vendor blobs use a working-region size
    /// here, not the full DRAM size.
    pub mem_size_bytes: u32,
    /// Platform identifier word.
    #[serde(default = "default_platform_id")]
    pub platform_id: u32,
    /// Chip preset used when a build names neither a configuration file
    /// nor a chip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_chip: Option<String>,
}

fn default_platform_id() -> u32 {
    DEFAULT_PLATFORM_ID
}

impl PlatformProfile {
    /// Profile shared by the XBurst1 T3x parts and the T41 stock cloner.
    fn ingenic_default(name: &str, default_chip: &str) -> Self {
        Self {
            name: name.into(),
            crystal_freq_hz: 24_000_000,
            cpu_freq_hz: 576_000_000,
            ddr_freq_hz: 400_000_000,
            uart_baud: 115_200,
            mem_size_bytes: 8 * 1024 * 1024,
            platform_id: DEFAULT_PLATFORM_ID,
            default_chip: Some(default_chip.into()),
        }
    }

    /// T31 family.
    pub fn t31() -> Self {
        Self::ingenic_default("t31", "M14D1G1664A_DDR2")
    }

    /// T30 family.
    pub fn t30() -> Self {
        Self::ingenic_default("t30", "M14D1G1664A_DDR2")
    }

    /// T41 family. The stock cloner runs the CPU at 576 MHz and DDR at
    /// 400 MHz for T41N with W631GU6NG.
    pub fn t41() -> Self {
        Self::ingenic_default("t41", "W631GU6NG_DDR3")
    }

    /// Look up a built-in profile by case-insensitive name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "t31" => Some(Self::t31()),
            "t30" => Some(Self::t30()),
            "t41" => Some(Self::t41()),
            _ => None,
        }
    }

    /// DDR clock actually used: the override if given, else the default.
    pub fn effective_ddr_freq(&self, ddr_freq_override: Option<u32>) -> u32 {
        ddr_freq_override.unwrap_or(self.ddr_freq_hz)
    }
}

/// Names and descriptions of the built-in profiles.
pub fn builtin_platforms() -> Vec<(&'static str, &'static str)> {
    vec![
        ("t30", "Ingenic T30 (XBurst1), 400 MHz DDR"),
        ("t31", "Ingenic T31 (XBurst1), 400 MHz DDR"),
        ("t41", "Ingenic T41 (XBurst2), 400 MHz DDR"),
    ]
}

/// Resolve a built-in profile, failing on unknown names.
pub fn resolve_platform(name: &str) -> Result<PlatformProfile> {
    PlatformProfile::builtin(name).ok_or_else(|| TargetError::UnknownPlatform {
        name: name.into(),
        known: builtin_platforms()
            .iter()
            .map(|(n, _)| *n)
            .collect::<Vec<_>>()
            .join(", "),
    })
}
