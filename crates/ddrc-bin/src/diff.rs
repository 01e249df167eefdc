//! Byte and field comparison of two records.

use serde::Serialize;

use crate::decode::{DecodeOptions, FieldValue};
use crate::error::Result;
use crate::record::DdrBinaryRecord;

/// One differing byte. `None` means the offset is past the end of that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByteDiff {
    pub offset: usize,
    pub left: Option<u8>,
    pub right: Option<u8>,
}

/// One differing decoded field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub name: &'static str,
    pub left: FieldValue,
    pub right: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDiff {
    pub left_len: usize,
    pub right_len: usize,
    pub bytes: Vec<ByteDiff>,
    pub fields: Vec<FieldDiff>,
}

impl RecordDiff {
    pub fn is_identical(&self) -> bool {
        self.left_len == self.right_len && self.bytes.is_empty()
    }
}

/// Differences between two byte buffers, including any length tail.
pub fn compare_bytes(left: &[u8], right: &[u8]) -> Vec<ByteDiff> {
    (0..left.len().max(right.len()))
        .filter_map(|offset| {
            let (l, r) = (left.get(offset).copied(), right.get(offset).copied());
            (l != r).then_some(ByteDiff {
                offset,
                left: l,
                right: r,
            })
        })
        .collect()
}

/// Compare two records byte by byte and field by field.
///
/// Records of different layouts are compared over the fields both listings
/// share by name.
pub fn compare(left: &DdrBinaryRecord, right: &DdrBinaryRecord) -> Result<RecordDiff> {
    let options = DecodeOptions::default();
    let left_fields = left.decode(&options)?.fields();
    let right_fields = right.decode(&options)?.fields();

    let fields = left_fields
        .into_iter()
        .filter_map(|l| {
            let r = right_fields.iter().find(|r| r.name == l.name)?;
            (l.value != r.value).then(|| FieldDiff {
                name: l.name,
                left: l.value,
                right: r.value.clone(),
            })
        })
        .collect();

    let diff = RecordDiff {
        left_len: left.len(),
        right_len: right.len(),
        bytes: compare_bytes(left.as_bytes(), right.as_bytes()),
        fields,
    };
    tracing::debug!(
        bytes = diff.bytes.len(),
        fields = diff.fields.len(),
        "records compared"
    );
    Ok(diff)
}
