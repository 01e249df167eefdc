//! `ddrc inspect`: validate and decode a record file.

use std::path::Path;

use anyhow::Result;
use ddrc_bin::{DdrBinaryRecord, DecodeOptions, DecodedRecord};
use serde::Serialize;

use super::{load_record, wants_json};

#[derive(Serialize)]
struct Report<'a> {
    file: String,
    sha256: String,
    #[serde(flatten)]
    decoded: &'a DecodedRecord,
}

pub fn run(path: &Path, verify_crc: bool, format: Option<&str>) -> Result<()> {
    let json = wants_json(format)?;
    let record = load_record(path)?;
    let decoded = record.decode(&DecodeOptions { verify_crc })?;

    if json {
        let report = Report {
            file: path.display().to_string(),
            sha256: record.digest(),
            decoded: &decoded,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== {} ===", path.display());
        print_record(&record, &decoded);
    }
    Ok(())
}

/// Human-readable field listing.
pub fn print_record(record: &DdrBinaryRecord, decoded: &DecodedRecord) {
    println!("Layout:  {:?} ({} bytes)", decoded.layout, decoded.total_len);
    println!("SHA-256: {}", record.digest());
    println!(
        "CRC:     stored 0x{:08x}, computed 0x{:08x} [{}]",
        decoded.rdd.crc_stored,
        decoded.rdd.crc_computed,
        if decoded.rdd.crc_ok() { "ok" } else { "MISMATCH" },
    );
    if decoded.detail.is_none() {
        println!("Note:    extended layout, RDD body fields are not decoded");
    }
    println!();
    for field in decoded.fields() {
        println!("  {:<16} {}", field.name, field.value);
    }
}
