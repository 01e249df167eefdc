//! CLI command implementations.

pub mod build;
pub mod chip;
pub mod compare;
pub mod extract;
pub mod inspect;
pub mod platform;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ddrc_bin::DdrBinaryRecord;
use tempfile::NamedTempFile;

/// Where the `[ddr]` configuration for a build comes from.
#[derive(Debug, Clone)]
pub enum ConfigArg {
    File(PathBuf),
    /// Built-in chip preset name, or "default" for the platform's chip.
    Chip(String),
}

/// Where the platform profile for a build comes from.
#[derive(Debug, Clone)]
pub enum PlatformArg {
    Builtin(String),
    File(PathBuf),
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The destination is either left untouched or replaced in full.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("writing {}", tmp.path().display()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "output written");
    Ok(())
}

/// Read and validate a record file.
pub fn load_record(path: &Path) -> Result<DdrBinaryRecord> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    DdrBinaryRecord::from_bytes(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Whether `format` asks for JSON output.
pub fn wants_json(format: Option<&str>) -> Result<bool> {
    match format {
        None | Some("text") => Ok(false),
        Some("json") => Ok(true),
        Some(other) => bail!("unknown format '{other}'. Use 'text' or 'json'."),
    }
}
