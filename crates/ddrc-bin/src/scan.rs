//! Locating records inside arbitrary byte buffers.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::{Layout, FIDB_MAGIC};
use crate::record::{check_structure, DdrBinaryRecord};

/// A record found at `offset` in the scanned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub offset: usize,
    pub record: DdrBinaryRecord,
}

/// Anything that can hand over a byte buffer to scan.
pub trait ByteSource {
    fn get_bytes(&self) -> Result<Vec<u8>>;
}

/// A file read in full.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

impl ByteSource for [u8] {
    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl ByteSource for Vec<u8> {
    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// Find every valid record in `data`, in ascending offset order.
///
/// Each `FIDB` occurrence is tried as a classic record first, then as an
/// extended one; the first layout that validates wins. The search resumes
/// one byte after the marker, so overlapping records are all reported.
pub fn scan(data: &[u8]) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(hit) = find_marker(&data[pos..]) {
        let offset = pos + hit;
        let tail = &data[offset..];
        for layout in Layout::SCAN_ORDER {
            match check_structure(tail, layout) {
                Ok(()) => {
                    let bytes = tail[..layout.total_len()].to_vec();
                    tracing::debug!(offset, ?layout, "record found");
                    found.push(Candidate {
                        offset,
                        record: DdrBinaryRecord::from_validated(bytes, layout),
                    });
                    break;
                }
                Err(e) => tracing::trace!(offset, ?layout, error = %e, "candidate rejected"),
            }
        }
        pos = offset + 1;
    }

    tracing::info!(candidates = found.len(), len = data.len(), "scan finished");
    found
}

/// Read a source and scan it.
pub fn scan_source<S: ByteSource + ?Sized>(source: &S) -> Result<Vec<Candidate>> {
    let data = source.get_bytes()?;
    Ok(scan(&data))
}

fn find_marker(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(FIDB_MAGIC.len())
        .position(|w| w == FIDB_MAGIC)
}
