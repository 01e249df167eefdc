//! Typed view of a record.
//!
//! Classic records decode fully. Extended records decode the FIDB block and
//! the RDD header; their body layout is not known, so detail fields come
//! back as [`FieldValue::Unknown`].

use std::fmt;

use serde::Serialize;

use ddrc_core::DramType;

use crate::error::{FormatError, Result};
use crate::layout::*;
use crate::record::DdrBinaryRecord;

/// Decode settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Fail with [`FormatError::ChecksumMismatch`] when the stored CRC is
    /// wrong. Off by default: vendor blobs are reported, not rejected.
    pub verify_crc: bool,
}

/// FIDB block fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FidbFields {
    pub size: u32,
    pub crystal_freq_hz: u32,
    pub cpu_freq_hz: u32,
    pub ddr_freq_hz: u32,
    pub ddr_freq_mhz: f64,
    pub uart_baud: u32,
    pub mem_size_bytes: u32,
    pub platform_id: u32,
}

/// RDD header and checksum, present for both layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RddHeader {
    pub size: u32,
    pub crc_stored: u32,
    pub crc_computed: u32,
    pub type_code: u32,
    pub type_name: &'static str,
}

impl RddHeader {
    pub fn crc_ok(&self) -> bool {
        self.crc_stored == self.crc_computed
    }
}

/// Decoded classic RDD body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RddDetail {
    pub dram_type: DramType,
    pub freq_word: u32,
    pub const_word: u32,
    pub fixed_bytes: [u8; 4],
    pub mode: [u8; 2],
    pub row_bits: u8,
    /// Column bits with the stored bias added back.
    pub col_bits: u16,
    pub t_ras: u8,
    pub t_rc: u8,
    pub t_rcd: u8,
    pub t_rp: u8,
    pub t_rfc: u8,
    pub t_rtp: u8,
    pub t_faw: u8,
    pub t_rrd: u8,
    pub t_wtr: u8,
    pub padding: [u8; 3],
    pub dq_map: [u8; 20],
}

impl RddDetail {
    fn read(body: &[u8]) -> Self {
        let mut fixed_bytes = [0u8; 4];
        fixed_bytes.copy_from_slice(&body[RDD_FIXED_BYTES..RDD_FIXED_BYTES + 4]);
        let mut dq_map = [0u8; 20];
        dq_map.copy_from_slice(&body[RDD_DQ_MAP..RDD_DQ_MAP + 20]);
        let type_code = read_u32(body, RDD_TYPE);

        Self {
            dram_type: DramType::from_code(type_code),
            freq_word: read_u32(body, RDD_FREQ_WORD),
            const_word: read_u32(body, RDD_CONST_WORD),
            fixed_bytes,
            mode: [body[RDD_MODE_FIRST], body[RDD_MODE_SECOND]],
            row_bits: body[RDD_ROW],
            col_bits: u16::from(body[RDD_COL]) + COL_BIAS as u16,
            t_ras: body[RDD_T_RAS],
            t_rc: body[RDD_T_RC],
            t_rcd: body[RDD_T_RCD],
            t_rp: body[RDD_T_RP],
            t_rfc: body[RDD_T_RFC],
            t_rtp: body[RDD_T_RTP],
            t_faw: body[RDD_T_FAW],
            t_rrd: body[RDD_T_RRD],
            t_wtr: body[RDD_T_WTR],
            padding: RDD_TIMING_PADDING.map(|(offset, _)| body[offset]),
            dq_map,
        }
    }
}

/// Everything [`DdrBinaryRecord::decode`] extracts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    pub layout: Layout,
    pub total_len: usize,
    pub fidb: FidbFields,
    pub rdd: RddHeader,
    /// `None` for the extended layout.
    pub detail: Option<RddDetail>,
}

/// A named value for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u64),
    Text(String),
    /// Not decodable for this layout.
    Unknown,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Unknown => f.write_str("unknown"),
        }
    }
}

fn int(name: &'static str, value: impl Into<u64>) -> Field {
    Field {
        name,
        value: FieldValue::Int(value.into()),
    }
}

fn text(name: &'static str, value: String) -> Field {
    Field {
        name,
        value: FieldValue::Text(value),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Names of the classic-only fields, in listing order.
const DETAIL_FIELDS: [&str; 17] = [
    "freq_word", "const_word", "fixed_bytes", "mode[0]", "mode[1]", "row_bits", "col_bits",
    "tRAS", "tRC", "tRCD", "tRP", "tRFC", "tRTP", "tFAW", "tRRD", "tWTR", "dq_map",
];

impl DecodedRecord {
    /// Flat field listing in record order.
    ///
    /// Extended records list the classic-only fields with an unknown value.
    pub fn fields(&self) -> Vec<Field> {
        let f = &self.fidb;
        let mut out = vec![
            int("fidb.size", f.size),
            int("crystal_freq_hz", f.crystal_freq_hz),
            int("cpu_freq_hz", f.cpu_freq_hz),
            int("ddr_freq_hz", f.ddr_freq_hz),
            text("ddr_freq_mhz", format!("{:.1}", f.ddr_freq_mhz)),
            int("uart_baud", f.uart_baud),
            int("mem_size_bytes", f.mem_size_bytes),
            text("platform_id", format!("0x{:08x}", f.platform_id)),
            int("rdd.size", self.rdd.size),
            text("crc_stored", format!("0x{:08x}", self.rdd.crc_stored)),
            text("crc_computed", format!("0x{:08x}", self.rdd.crc_computed)),
            int("type_code", self.rdd.type_code),
            text("type_name", self.rdd.type_name.to_string()),
        ];

        match &self.detail {
            Some(d) => out.extend([
                int("freq_word", d.freq_word),
                text("const_word", format!("0x{:08x}", d.const_word)),
                text("fixed_bytes", hex(&d.fixed_bytes)),
                int("mode[0]", d.mode[0]),
                int("mode[1]", d.mode[1]),
                int("row_bits", d.row_bits),
                int("col_bits", d.col_bits),
                int("tRAS", d.t_ras),
                int("tRC", d.t_rc),
                int("tRCD", d.t_rcd),
                int("tRP", d.t_rp),
                int("tRFC", d.t_rfc),
                int("tRTP", d.t_rtp),
                int("tFAW", d.t_faw),
                int("tRRD", d.t_rrd),
                int("tWTR", d.t_wtr),
                text("dq_map", hex(&d.dq_map)),
            ]),
            None => out.extend(DETAIL_FIELDS.map(|name| Field {
                name,
                value: FieldValue::Unknown,
            })),
        }
        out
    }
}

pub(crate) fn decode(record: &DdrBinaryRecord, options: &DecodeOptions) -> Result<DecodedRecord> {
    let bytes = record.as_bytes();
    let fidb_body = &bytes[HEADER_LEN..FIDB_SECTION_LEN];
    let rdd_body = record.rdd_body();

    let ddr_freq_hz = read_u32(fidb_body, FIDB_DDR);
    let fidb = FidbFields {
        size: read_u32(bytes, 4),
        crystal_freq_hz: read_u32(fidb_body, FIDB_CRYSTAL),
        cpu_freq_hz: read_u32(fidb_body, FIDB_CPU),
        ddr_freq_hz,
        ddr_freq_mhz: f64::from(ddr_freq_hz) / 1_000_000.0,
        uart_baud: read_u32(fidb_body, FIDB_UART),
        mem_size_bytes: read_u32(fidb_body, FIDB_MEM_SIZE),
        platform_id: read_u32(fidb_body, FIDB_PLATFORM_ID),
    };

    let type_code = read_u32(rdd_body, RDD_TYPE);
    let rdd = RddHeader {
        size: read_u32(bytes, RDD_OFFSET + 4),
        crc_stored: record.stored_crc(),
        crc_computed: record.computed_crc(),
        type_code,
        type_name: DramType::code_name(type_code),
    };

    if !rdd.crc_ok() {
        if options.verify_crc {
            return Err(FormatError::ChecksumMismatch {
                stored: rdd.crc_stored,
                computed: rdd.crc_computed,
            });
        }
        tracing::warn!(
            stored = format_args!("0x{:08x}", rdd.crc_stored),
            computed = format_args!("0x{:08x}", rdd.crc_computed),
            "RDD checksum mismatch"
        );
    }

    let detail = match record.layout() {
        Layout::Classic => Some(RddDetail::read(rdd_body)),
        Layout::Extended => None,
    };

    Ok(DecodedRecord {
        layout: record.layout(),
        total_len: record.len(),
        fidb,
        rdd,
        detail,
    })
}
