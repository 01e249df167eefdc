//! `ddrc extract`: pull records out of a raw buffer.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ddrc_bin::{scan_source, DecodeOptions, FileSource};

use super::inspect::print_record;
use super::write_atomic;

/// Output name used when none is given.
pub const DEFAULT_OUTPUT: &str = "vendor_ddr_extracted.bin";

pub fn run(input: &Path, output: Option<&Path>, all: bool) -> Result<()> {
    let candidates = scan_source(&FileSource::new(input))
        .with_context(|| format!("reading {}", input.display()))?;
    let Some(first) = candidates.first() else {
        bail!("no FIDB/RDD record found in {}", input.display());
    };

    let output = output.unwrap_or(Path::new(DEFAULT_OUTPUT));
    println!(
        "Found {} record(s) in {}",
        candidates.len(),
        input.display()
    );

    if all {
        for candidate in &candidates {
            let path = numbered_path(output, candidate.offset);
            write_atomic(&path, candidate.record.as_bytes())?;
            println!(
                "  0x{:06x}  {:?}  -> {}",
                candidate.offset,
                candidate.record.layout(),
                path.display()
            );
        }
    } else {
        write_atomic(output, first.record.as_bytes())?;
        println!(
            "  0x{:06x}  {:?}  -> {}",
            first.offset,
            first.record.layout(),
            output.display()
        );
    }

    println!();
    let decoded = first.record.decode(&DecodeOptions::default())?;
    print_record(&first.record, &decoded);
    Ok(())
}

/// `dir/name.bin` -> `dir/name_0x154.bin`.
fn numbered_path(base: &Path, offset: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "record".into());
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{offset:#x}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{offset:#x}"),
    };
    base.with_file_name(name)
}
