//! Built-in DDR chip presets.
//!
//! A preset is the `[ddr]` section of a known memory part, so common boards
//! can be compiled without a configuration file. Presets are rendered to the
//! same INI text a user would write and parsed through [`ConfigModel`], which
//! keeps them on the exact encode path of hand-written configurations.

use serde::Serialize;

use ddrc_core::{ConfigModel, DramType, Unit};

use crate::error::{Result, TargetError};
use crate::profile::PlatformProfile;

/// One timing parameter of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChipTiming {
    pub key: &'static str,
    pub value: i64,
    pub unit: Unit,
}

const fn ps(key: &'static str, value: i64) -> ChipTiming {
    ChipTiming {
        key,
        value,
        unit: Unit::Picoseconds,
    }
}

const fn tck(key: &'static str, value: i64) -> ChipTiming {
    ChipTiming {
        key,
        value,
        unit: Unit::Cycles,
    }
}

/// A named memory part and its datasheet timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipPreset {
    /// Preset name (e.g., "M14D1G1664A_DDR2").
    pub name: &'static str,
    pub vendor: &'static str,
    pub dram_type: DramType,
    pub row_bits: u8,
    pub col_bits: u8,
    pub cl: u8,
    pub bl: u8,
    /// Read/write latency for types that encode RL/WL instead of CL/BL.
    pub rl_wl: Option<(u8, u8)>,
    pub timings: &'static [ChipTiming],
}

const M14D1G1664A_TIMINGS: [ChipTiming; 10] = [
    ps("tRAS", 45_000),
    ps("tRC", 57_000),
    ps("tRCD", 16_000),
    ps("tRP", 16_000),
    ps("tRFC", 127_500),
    ps("tRTP", 7_500),
    ps("tFAW", 45_000),
    ps("tRRD", 10_000),
    ps("tWTR", 7_500),
    ps("tREFI", 7_800_000),
];

const W631GU6NG_TIMINGS: [ChipTiming; 10] = [
    ps("tRAS", 35_000),
    ps("tRC", 48_750),
    ps("tRCD", 13_750),
    ps("tRP", 13_750),
    ps("tRFC", 110_000),
    tck("tRTP", 4),
    tck("tWTR", 4),
    ps("tRRD", 7_500),
    ps("tFAW", 40_000),
    ps("tREFI", 7_800_000),
];

static BUILTIN_CHIPS: [ChipPreset; 2] = [
    ChipPreset {
        name: "M14D1G1664A_DDR2",
        vendor: "ESMT",
        dram_type: DramType::Ddr2,
        row_bits: 13,
        col_bits: 10,
        cl: 7,
        bl: 8,
        rl_wl: None,
        timings: &M14D1G1664A_TIMINGS,
    },
    ChipPreset {
        name: "W631GU6NG_DDR3",
        vendor: "Winbond",
        dram_type: DramType::Ddr3,
        row_bits: 13,
        col_bits: 10,
        cl: 7,
        bl: 8,
        rl_wl: None,
        timings: &W631GU6NG_TIMINGS,
    },
];

impl ChipPreset {
    /// The preset as a `[ddr]` configuration document.
    pub fn to_ddr_section(&self) -> String {
        let mut lines = vec![
            format!("; {} {}", self.vendor, self.name),
            "[ddr]".to_string(),
            format!("TYPE = {}", self.dram_type.name().to_ascii_lowercase()),
            format!("ROW = {}", self.row_bits),
            format!("COL = {}", self.col_bits),
        ];
        match self.rl_wl {
            Some((rl, wl)) => lines.extend([format!("RL = {rl}"), format!("WL = {wl}")]),
            None => lines.extend([format!("CL = {}", self.cl), format!("BL = {}", self.bl)]),
        }
        lines.extend(
            self.timings
                .iter()
                .map(|t| format!("{} = {},{}", t.key, t.value, t.unit)),
        );
        lines.push(String::new());
        lines.join("\n")
    }

    /// Parse the preset into a configuration model.
    pub fn config(&self) -> Result<ConfigModel> {
        Ok(ConfigModel::parse(&self.to_ddr_section())?)
    }
}

/// All built-in chip presets.
pub fn builtin_chips() -> &'static [ChipPreset] {
    &BUILTIN_CHIPS
}

/// Presets of one DRAM type.
pub fn chips_by_type(dram_type: DramType) -> impl Iterator<Item = &'static ChipPreset> {
    BUILTIN_CHIPS.iter().filter(move |c| c.dram_type == dram_type)
}

/// Look up a preset by case-insensitive name, failing on unknown names.
pub fn resolve_chip(name: &str) -> Result<&'static ChipPreset> {
    BUILTIN_CHIPS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| TargetError::UnknownChip {
            name: name.into(),
            known: BUILTIN_CHIPS
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// The preset a platform pairs with by default.
pub fn default_chip(platform: &PlatformProfile) -> Result<&'static ChipPreset> {
    match &platform.default_chip {
        Some(name) => resolve_chip(name),
        None => Err(TargetError::NoDefaultChip {
            platform: platform.name.clone(),
        }),
    }
}
