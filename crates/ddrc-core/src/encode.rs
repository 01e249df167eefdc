//! Per-DRAM-type conversion of a configuration into clock-cycle counts.
//!
//! Every type runs the same conversion; only the default picosecond values
//! and the refresh rounding rule differ, and those live in
//! [`TimingDefaults`].

use serde::Serialize;

use crate::config::ConfigModel;
use crate::dram::DramType;
use crate::error::{CoreError, Result};
use crate::timing::TimingConverter;

/// How tRFC is rounded to cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshRounding {
    /// Ceiling at double granularity, then halved.
    Halved,
    /// Plain ceiling.
    Plain,
}

/// Default timing values in picoseconds, used when a key is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingDefaults {
    pub t_rtp: i64,
    pub t_wtr: i64,
    pub t_ras: i64,
    pub t_rc: i64,
    pub t_rcd: i64,
    pub t_rp: i64,
    pub t_rfc: i64,
    pub t_refi: i64,
    pub t_rrd: i64,
    pub t_faw: i64,
    pub rfc_rounding: RefreshRounding,
}

pub const DDR2_DEFAULTS: TimingDefaults = TimingDefaults {
    t_rtp: 7_500,
    t_wtr: 7_500,
    t_ras: 42_000,
    t_rc: 60_000,
    t_rcd: 15_000,
    t_rp: 15_000,
    t_rfc: 127_500,
    t_refi: 7_800_000,
    t_rrd: 10_000,
    t_faw: 50_000,
    rfc_rounding: RefreshRounding::Halved,
};

pub const DDR3_DEFAULTS: TimingDefaults = TimingDefaults {
    t_rtp: 7_500,
    t_wtr: 7_500,
    t_ras: 35_000,
    t_rc: 48_750,
    t_rcd: 13_750,
    t_rp: 13_750,
    t_rfc: 160_000,
    t_refi: 7_800_000,
    t_rrd: 6_000,
    t_faw: 40_000,
    rfc_rounding: RefreshRounding::Halved,
};

pub const LPDDR2_DEFAULTS: TimingDefaults = TimingDefaults {
    t_rtp: 7_500,
    t_wtr: 7_500,
    t_ras: 42_000,
    t_rc: 57_000,
    t_rcd: 18_000,
    t_rp: 18_000,
    t_rfc: 90_000,
    t_refi: 7_800_000,
    t_rrd: 10_000,
    t_faw: 50_000,
    rfc_rounding: RefreshRounding::Plain,
};

impl TimingDefaults {
    /// Defaults table for a DRAM type.
    ///
    /// LPDDR shares the LPDDR2 table. LPDDR3 and unknown types have no table
    /// of their own and use DDR2.
    pub fn for_type(dram_type: DramType) -> &'static TimingDefaults {
        match dram_type {
            DramType::Ddr3 => &DDR3_DEFAULTS,
            DramType::Lpddr2 | DramType::Lpddr => &LPDDR2_DEFAULTS,
            DramType::Ddr2 | DramType::Lpddr3 | DramType::Unknown => &DDR2_DEFAULTS,
        }
    }

    /// Whether `dram_type` borrows another type's table.
    pub fn is_fallback(dram_type: DramType) -> bool {
        matches!(dram_type, DramType::Lpddr3 | DramType::Unknown)
    }
}

/// Timing parameters in DDR clock cycles.
///
/// Values are not range-checked here; the record builder decides whether an
/// out-of-byte value is masked or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedTiming {
    #[serde(rename = "tRAS")]
    pub t_ras: i64,
    #[serde(rename = "tRC")]
    pub t_rc: i64,
    #[serde(rename = "tRCD")]
    pub t_rcd: i64,
    #[serde(rename = "tRP")]
    pub t_rp: i64,
    #[serde(rename = "tRFC")]
    pub t_rfc: i64,
    #[serde(rename = "tRTP")]
    pub t_rtp: i64,
    #[serde(rename = "tFAW")]
    pub t_faw: i64,
    #[serde(rename = "tRRD")]
    pub t_rrd: i64,
    #[serde(rename = "tWTR")]
    pub t_wtr: i64,
    /// Refresh interval. Informational only, never written to the record.
    #[serde(rename = "tREFI")]
    pub t_refi: i64,
}

impl EncodedTiming {
    /// The nine values stored in the record, with their names.
    pub fn record_values(&self) -> [(&'static str, i64); 9] {
        [
            ("tRAS", self.t_ras),
            ("tRC", self.t_rc),
            ("tRCD", self.t_rcd),
            ("tRP", self.t_rp),
            ("tRFC", self.t_rfc),
            ("tRTP", self.t_rtp),
            ("tFAW", self.t_faw),
            ("tRRD", self.t_rrd),
            ("tWTR", self.t_wtr),
        ]
    }
}

/// Convert the timing parameters of `config` to clock cycles.
pub fn encode_timing(config: &ConfigModel, conv: &TimingConverter) -> Result<EncodedTiming> {
    let dram_type = config.dram_type();
    if TimingDefaults::is_fallback(dram_type) {
        tracing::warn!(%dram_type, "no timing table for this DRAM type, using DDR2 defaults");
    }
    let d = TimingDefaults::for_type(dram_type);
    let ceil = |key: &str, default: i64| -> Result<i64> {
        Ok(conv.ps_to_cycles_ceil(config.get_ps(key, conv, default)?, 1))
    };

    let rfc_ps = config.get_ps("tRFC", conv, d.t_rfc)?;
    let t_rfc = match d.rfc_rounding {
        RefreshRounding::Halved => conv.ps_to_cycles_ceil(rfc_ps, 2) / 2,
        RefreshRounding::Plain => conv.ps_to_cycles_ceil(rfc_ps, 1),
    };

    let timing = EncodedTiming {
        t_rtp: ceil("tRTP", d.t_rtp)?,
        t_wtr: ceil("tWTR", d.t_wtr)?,
        t_ras: ceil("tRAS", d.t_ras)?,
        t_rc: ceil("tRC", d.t_rc)?,
        t_rcd: ceil("tRCD", d.t_rcd)?,
        t_rp: ceil("tRP", d.t_rp)?,
        t_rfc,
        t_refi: conv.ps_to_cycles_floor(config.get_ps("tREFI", conv, d.t_refi)?),
        t_rrd: ceil("tRRD", d.t_rrd)?,
        t_faw: ceil("tFAW", d.t_faw)?,
    };
    tracing::debug!(?timing, "encoded timing");
    Ok(timing)
}

/// The two mode-register bytes at RDD body offsets 0x1c and 0x1d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeRegisters {
    /// CL, or the RL/WL code.
    pub first: i64,
    /// BL, or the RL/WL code again.
    pub second: i64,
}

/// Combined RL/WL codes, keyed by `RL << 4 | WL`.
const RL_WL_CODES: [(i64, u8); 6] = [
    (0x31, 1),
    (0x42, 2),
    (0x52, 3),
    (0x63, 4),
    (0x74, 5),
    (0x84, 6),
];

/// LPDDR2 read/write latency code. Unlisted combinations map to 1.
pub fn rl_wl_code(rl: i64, wl: i64) -> u8 {
    let combined = wl | (rl << 4);
    RL_WL_CODES
        .iter()
        .find(|(key, _)| *key == combined)
        .map_or(1, |(_, code)| *code)
}

/// Mode-register pair for the configuration's DRAM type.
pub fn encode_mode_registers(config: &ConfigModel) -> Result<ModeRegisters> {
    if config.dram_type().uses_rl_wl() {
        let rl = config.get_int("RL", 3)?;
        let wl = config.get_int("WL", 1)?;
        let code = i64::from(rl_wl_code(rl, wl));
        Ok(ModeRegisters {
            first: code,
            second: code,
        })
    } else {
        Ok(ModeRegisters {
            first: config.get_int("CL", 6)?,
            second: config.get_int("BL", 8)?,
        })
    }
}

/// Reduce a value to the byte stored in the record.
///
/// Returns the masked byte and whether masking changed the value. In strict
/// mode a value outside `0..=255` is an error instead.
pub fn fit_byte(field: &'static str, value: i64, strict: bool) -> Result<(u8, bool)> {
    match u8::try_from(value) {
        Ok(b) => Ok((b, false)),
        Err(_) if strict => Err(CoreError::OutOfRange { field, value }),
        Err(_) => Ok(((value & 0xFF) as u8, true)),
    }
}
