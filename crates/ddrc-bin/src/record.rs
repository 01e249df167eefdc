//! Validated, immutable record bytes.

use sha2::{Digest, Sha256};

use crate::decode::{decode, DecodeOptions, DecodedRecord};
use crate::error::{FormatError, Result};
use crate::layout::{
    read_u32, Layout, FIDB_MAGIC, RDD_BODY_OFFSET, RDD_CRC, RDD_MAGIC, RDD_OFFSET,
};

/// A structurally valid FIDB/RDD record.
///
/// Either built by [`crate::RecordBuilder`] or copied out of a scanned
/// buffer. The bytes never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdrBinaryRecord {
    bytes: Vec<u8>,
    layout: Layout,
}

impl DdrBinaryRecord {
    /// Validate `data` as a complete record. The length selects the layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let layout = Layout::from_len(data.len())
            .ok_or(FormatError::InvalidLength { len: data.len() })?;
        check_structure(data, layout)?;
        Ok(Self {
            bytes: data.to_vec(),
            layout,
        })
    }

    /// Wrap bytes that were already checked against `layout`.
    pub(crate) fn from_validated(bytes: Vec<u8>, layout: Layout) -> Self {
        debug_assert_eq!(bytes.len(), layout.total_len());
        Self { bytes, layout }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The RDD body, whose size depends on the layout.
    pub fn rdd_body(&self) -> &[u8] {
        &self.bytes[RDD_BODY_OFFSET..]
    }

    /// CRC32 stored at the start of the RDD body.
    pub fn stored_crc(&self) -> u32 {
        read_u32(self.rdd_body(), RDD_CRC)
    }

    /// CRC32 recomputed over the RDD body after the CRC field.
    pub fn computed_crc(&self) -> u32 {
        crc32fast::hash(&self.rdd_body()[4..])
    }

    /// SHA-256 of the whole record as lowercase hex.
    pub fn digest(&self) -> String {
        let hash: [u8; 32] = Sha256::digest(&self.bytes).into();
        hash.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode the record into typed fields.
    pub fn decode(&self, options: &DecodeOptions) -> Result<DecodedRecord> {
        decode(self, options)
    }
}

impl AsRef<[u8]> for DdrBinaryRecord {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Check the header-level invariants of a record starting at `data[0]`.
///
/// `data` must hold at least `layout.total_len()` bytes. The FIDB size field
/// is not checked; vendor tooling does not rely on it.
pub(crate) fn check_structure(data: &[u8], layout: Layout) -> Result<()> {
    if data.len() < layout.total_len() {
        return Err(FormatError::InvalidLength { len: data.len() });
    }
    if data[..4] != FIDB_MAGIC {
        return Err(FormatError::InvalidMagic {
            section: "FIDB",
            offset: 0,
        });
    }
    if data[RDD_OFFSET..RDD_OFFSET + 4] != RDD_MAGIC {
        return Err(FormatError::InvalidMagic {
            section: "RDD",
            offset: RDD_OFFSET,
        });
    }
    let rdd_size = read_u32(data, RDD_OFFSET + 4);
    let expected = layout.rdd_body_len() as u32;
    if rdd_size != expected {
        return Err(FormatError::SizeMismatch {
            section: "RDD",
            expected,
            found: rdd_size,
        });
    }
    Ok(())
}
