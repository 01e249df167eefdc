//! Byte layout of the FIDB/RDD record.
//!
//! Offsets prefixed `FIDB_` and `RDD_` are relative to the start of the
//! respective section body, matching how the vendor tool addresses them.

use serde::Serialize;

/// FIDB section magic.
pub const FIDB_MAGIC: [u8; 4] = *b"FIDB";

/// RDD section magic, including its leading reserved byte.
pub const RDD_MAGIC: [u8; 4] = *b"\0RDD";

/// Size of each section header (magic + little-endian body size).
pub const HEADER_LEN: usize = 8;

/// FIDB body size, identical in both layouts.
pub const FIDB_BODY_LEN: usize = 184;

/// FIDB header plus body.
pub const FIDB_SECTION_LEN: usize = HEADER_LEN + FIDB_BODY_LEN;

/// Absolute offset of the RDD header.
pub const RDD_OFFSET: usize = FIDB_SECTION_LEN;

/// Absolute offset of the RDD body.
pub const RDD_BODY_OFFSET: usize = RDD_OFFSET + HEADER_LEN;

/// Classic RDD body size.
pub const CLASSIC_RDD_BODY_LEN: usize = 124;

/// Extended RDD body size.
pub const EXTENDED_RDD_BODY_LEN: usize = 184;

/// Classic RDD header plus body.
pub const RDD_SECTION_LEN: usize = HEADER_LEN + CLASSIC_RDD_BODY_LEN;

/// Total classic record size.
pub const CLASSIC_LEN: usize = FIDB_SECTION_LEN + RDD_SECTION_LEN;

/// Total extended record size.
pub const EXTENDED_LEN: usize = FIDB_SECTION_LEN + HEADER_LEN + EXTENDED_RDD_BODY_LEN;

// FIDB body fields.
pub const FIDB_CRYSTAL: usize = 0x00;
pub const FIDB_CPU: usize = 0x04;
pub const FIDB_DDR: usize = 0x08;
pub const FIDB_RESERVED: usize = 0x0c;
pub const FIDB_ENABLE: usize = 0x10;
pub const FIDB_UART: usize = 0x14;
pub const FIDB_FLAG_A: usize = 0x18;
pub const FIDB_MEM_SIZE: usize = 0x20;
pub const FIDB_FLAG_B: usize = 0x24;
pub const FIDB_FLAG_C: usize = 0x2c;
pub const FIDB_PLATFORM_ID: usize = 0x30;

/// Fixed flag words of the FIDB body as (offset, value).
pub const FIDB_FIXED_WORDS: [(usize, u32); 5] = [
    (FIDB_RESERVED, 0x0000_0000),
    (FIDB_ENABLE, 0x0000_0001),
    (FIDB_FLAG_A, 0x0000_0001),
    (FIDB_FLAG_B, 0x0000_0001),
    (FIDB_FLAG_C, 0x0000_0011),
];

// RDD body fields.
pub const RDD_CRC: usize = 0x00;
pub const RDD_TYPE: usize = 0x04;
pub const RDD_FREQ_WORD: usize = 0x10;
pub const RDD_CONST_WORD: usize = 0x14;
pub const RDD_FIXED_BYTES: usize = 0x18;
pub const RDD_MODE_FIRST: usize = 0x1c;
pub const RDD_MODE_SECOND: usize = 0x1d;
pub const RDD_ROW: usize = 0x1e;
pub const RDD_COL: usize = 0x1f;
pub const RDD_T_RAS: usize = 0x20;
pub const RDD_T_RC: usize = 0x21;
pub const RDD_T_RCD: usize = 0x22;
pub const RDD_T_RP: usize = 0x23;
pub const RDD_T_RFC: usize = 0x24;
pub const RDD_T_RTP: usize = 0x26;
pub const RDD_T_FAW: usize = 0x28;
pub const RDD_T_RRD: usize = 0x2a;
pub const RDD_T_WTR: usize = 0x2b;

/// Constant word at RDD body 0x14.
pub const RDD_CONST_VALUE: u32 = 0x0000_2800;

/// Unknown fixed bytes at RDD body 0x18..0x1c.
pub const RDD_FIXED_VALUE: [u8; 4] = [0x01, 0x00, 0xc2, 0x00];

/// Fixed bytes between the timing values as (offset, value).
pub const RDD_TIMING_PADDING: [(usize, u8); 3] = [(0x25, 0x04), (0x27, 0x20), (0x29, 0x00)];

/// Column bits are stored minus this bias.
pub const COL_BIAS: i64 = 6;

/// The frequency word is the DDR clock divided by this.
pub const FREQ_WORD_DIVISOR: u32 = 100_000;

/// Default DQ bit mapping, stored in the last 20 bytes of the RDD body.
pub const DQ_MAP: [u8; 20] = [12, 13, 14, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 15, 16, 17, 18, 19];

/// Offset of the DQ mapping inside the classic RDD body.
pub const RDD_DQ_MAP: usize = CLASSIC_RDD_BODY_LEN - DQ_MAP.len();

/// Which record variant a byte sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// 324 bytes, fully decoded.
    Classic,
    /// 384 bytes, header-level decode only.
    Extended,
}

impl Layout {
    /// Layouts in the order the scanner tries them.
    pub const SCAN_ORDER: [Layout; 2] = [Layout::Classic, Layout::Extended];

    pub fn total_len(self) -> usize {
        match self {
            Layout::Classic => CLASSIC_LEN,
            Layout::Extended => EXTENDED_LEN,
        }
    }

    /// Expected value of the RDD size field.
    pub fn rdd_body_len(self) -> usize {
        match self {
            Layout::Classic => CLASSIC_RDD_BODY_LEN,
            Layout::Extended => EXTENDED_RDD_BODY_LEN,
        }
    }

    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            CLASSIC_LEN => Some(Layout::Classic),
            EXTENDED_LEN => Some(Layout::Extended),
            _ => None,
        }
    }
}

/// Read a little-endian u32. `buf` must hold 4 bytes at `offset`.
pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

pub(crate) fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_add_up() {
        assert_eq!(FIDB_SECTION_LEN, 192);
        assert_eq!(RDD_SECTION_LEN, 132);
        assert_eq!(CLASSIC_LEN, 324);
        assert_eq!(EXTENDED_LEN, 384);
        assert_eq!(RDD_BODY_OFFSET, 200);
        assert_eq!(RDD_DQ_MAP, 104);
    }

    #[test]
    fn layout_lookup() {
        assert_eq!(Layout::from_len(324), Some(Layout::Classic));
        assert_eq!(Layout::from_len(384), Some(Layout::Extended));
        assert_eq!(Layout::from_len(332), None);
        assert_eq!(Layout::Extended.rdd_body_len(), 184);
    }

    #[test]
    fn le_helpers() {
        let mut buf = [0u8; 8];
        write_u32(&mut buf, 2, 0x1980_0000);
        assert_eq!(buf, [0, 0, 0x00, 0x00, 0x80, 0x19, 0, 0]);
        assert_eq!(read_u32(&buf, 2), 0x1980_0000);
    }
}
