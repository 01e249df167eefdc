//! Assembles the classic 324-byte record.

use serde::Serialize;

use ddrc_core::encode::{encode_mode_registers, fit_byte};
use ddrc_core::{ConfigModel, EncodedTiming};
use ddrc_targets::PlatformProfile;

use crate::error::{FormatError, Result};
use crate::layout::*;
use crate::record::DdrBinaryRecord;

/// A value that did not fit its byte and was masked to the low 8 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub field: &'static str,
    pub value: i64,
    pub stored: u8,
}

/// A built record and the values that were masked while packing it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub record: DdrBinaryRecord,
    pub truncations: Vec<Truncation>,
}

/// Writes the FIDB and RDD sections for one platform.
///
/// In lenient mode (the default, matching vendor output) byte fields are
/// masked with `& 0xFF`; strict mode rejects values outside `0..=255`.
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    platform: &'a PlatformProfile,
    strict: bool,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(platform: &'a PlatformProfile) -> Self {
        Self {
            platform,
            strict: false,
        }
    }

    /// Reject out-of-range byte fields instead of masking them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn platform(&self) -> &PlatformProfile {
        self.platform
    }

    /// FIDB header and body.
    pub fn build_fidb(&self, ddr_freq: Option<u32>) -> [u8; FIDB_SECTION_LEN] {
        let p = self.platform;
        let mut section = [0u8; FIDB_SECTION_LEN];
        section[..4].copy_from_slice(&FIDB_MAGIC);
        write_u32(&mut section, 4, FIDB_BODY_LEN as u32);

        let body = &mut section[HEADER_LEN..];
        write_u32(body, FIDB_CRYSTAL, p.crystal_freq_hz);
        write_u32(body, FIDB_CPU, p.cpu_freq_hz);
        write_u32(body, FIDB_DDR, p.effective_ddr_freq(ddr_freq));
        write_u32(body, FIDB_UART, p.uart_baud);
        write_u32(body, FIDB_MEM_SIZE, p.mem_size_bytes);
        write_u32(body, FIDB_PLATFORM_ID, p.platform_id);
        for (offset, value) in FIDB_FIXED_WORDS {
            write_u32(body, offset, value);
        }
        section
    }

    /// RDD header and body, with the CRC filled in.
    ///
    /// Masked values are appended to `truncations`.
    pub fn build_rdd(
        &self,
        config: &ConfigModel,
        timing: &EncodedTiming,
        ddr_freq: Option<u32>,
        truncations: &mut Vec<Truncation>,
    ) -> Result<[u8; RDD_SECTION_LEN]> {
        let mut section = [0u8; RDD_SECTION_LEN];
        section[..4].copy_from_slice(&RDD_MAGIC);
        write_u32(&mut section, 4, CLASSIC_RDD_BODY_LEN as u32);

        let freq_hz = self.platform.effective_ddr_freq(ddr_freq);
        let mode = encode_mode_registers(config)?;
        let row = config.get_int("ROW", 13)?;
        let col = config.get_int("COL", 10)?;

        let mut bytes: Vec<(usize, &'static str, i64)> = vec![
            (RDD_MODE_FIRST, "mode[0]", mode.first),
            (RDD_MODE_SECOND, "mode[1]", mode.second),
            (RDD_ROW, "ROW", row),
            (RDD_COL, "COL-6", col.saturating_sub(COL_BIAS)),
        ];
        let timing_offsets = [
            RDD_T_RAS, RDD_T_RC, RDD_T_RCD, RDD_T_RP, RDD_T_RFC, RDD_T_RTP, RDD_T_FAW, RDD_T_RRD,
            RDD_T_WTR,
        ];
        for (offset, (name, value)) in timing_offsets.into_iter().zip(timing.record_values()) {
            bytes.push((offset, name, value));
        }

        let body = &mut section[HEADER_LEN..];
        write_u32(body, RDD_TYPE, config.dram_type().code());
        write_u32(body, RDD_FREQ_WORD, freq_hz / FREQ_WORD_DIVISOR);
        write_u32(body, RDD_CONST_WORD, RDD_CONST_VALUE);
        body[RDD_FIXED_BYTES..RDD_FIXED_BYTES + 4].copy_from_slice(&RDD_FIXED_VALUE);

        for (offset, field, value) in bytes {
            let (stored, masked) = fit_byte(field, value, self.strict)?;
            if masked {
                tracing::warn!(field, value, stored, "value does not fit in one byte, masked");
                truncations.push(Truncation {
                    field,
                    value,
                    stored,
                });
            }
            body[offset] = stored;
        }
        for (offset, value) in RDD_TIMING_PADDING {
            body[offset] = value;
        }
        body[RDD_DQ_MAP..RDD_DQ_MAP + DQ_MAP.len()].copy_from_slice(&DQ_MAP);

        let crc = crc32fast::hash(&body[RDD_CRC + 4..]);
        write_u32(body, RDD_CRC, crc);
        tracing::debug!(crc = format_args!("0x{crc:08x}"), "RDD checksum");
        Ok(section)
    }

    /// Complete record: FIDB followed by RDD.
    pub fn build(
        &self,
        config: &ConfigModel,
        timing: &EncodedTiming,
        ddr_freq: Option<u32>,
    ) -> Result<BuildOutput> {
        let mut truncations = Vec::new();
        let fidb = self.build_fidb(ddr_freq);
        let rdd = self.build_rdd(config, timing, ddr_freq, &mut truncations)?;

        let mut bytes = Vec::with_capacity(CLASSIC_LEN);
        bytes.extend_from_slice(&fidb);
        bytes.extend_from_slice(&rdd);
        if bytes.len() != CLASSIC_LEN {
            return Err(FormatError::InvariantViolation {
                detail: format!("built record is {} bytes, expected {CLASSIC_LEN}", bytes.len()),
            });
        }

        Ok(BuildOutput {
            record: DdrBinaryRecord::from_validated(bytes, Layout::Classic),
            truncations,
        })
    }
}
