//! `ddrc compare`: diff two record files.

use std::path::Path;

use anyhow::Result;
use ddrc_bin::compare;

use super::{load_record, wants_json};

/// Print the differences. Returns `true` if the records are identical.
pub fn run(left: &Path, right: &Path, format: Option<&str>) -> Result<bool> {
    let json = wants_json(format)?;
    let l = load_record(left)?;
    let r = load_record(right)?;
    let diff = compare(&l, &r)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(diff.is_identical());
    }

    if diff.is_identical() {
        println!("Identical ({} bytes, SHA-256 {})", l.len(), l.digest());
        return Ok(true);
    }

    println!("--- {} ({} bytes)", left.display(), diff.left_len);
    println!("+++ {} ({} bytes)", right.display(), diff.right_len);
    println!();
    println!("Fields:");
    for f in &diff.fields {
        println!("  {:<16} {} -> {}", f.name, f.left, f.right);
    }
    println!();
    println!("Bytes ({} differ):", diff.bytes.len());
    for b in &diff.bytes {
        let side = |v: Option<u8>| v.map_or_else(|| "--".to_string(), |v| format!("{v:02x}"));
        println!("  0x{:04x}  {} -> {}", b.offset, side(b.left), side(b.right));
    }
    Ok(false)
}
