//! Binary FIDB/RDD DDR configuration records.
//!
//! Builds the record a vendor bootloader expects, and finds, validates and
//! decodes records inside arbitrary byte buffers.
//!
//! ## Record Layout (classic, 324 bytes)
//!
//! ```text
//! ┌──────────────────────────────┐ 0x000
//! │ "FIDB"  body size (184)      │  8 bytes
//! │ FIDB body                    │  184 bytes
//! │   clocks, baud, memory size, │
//! │   platform id                │
//! ├──────────────────────────────┤ 0x0C0
//! │ "\0RDD" body size (124)      │  8 bytes
//! │ RDD body                     │  124 bytes
//! │   CRC32 of body[4..]         │
//! │   type, frequency word       │
//! │   mode registers, geometry   │
//! │   timing bytes               │
//! │   DQ mapping (last 20 bytes) │
//! └──────────────────────────────┘ 0x144
//! ```
//!
//! An extended 384-byte variant (RDD body of 184 bytes) is recognized, but
//! only its headers are decoded.

pub mod builder;
pub mod compile;
pub mod decode;
pub mod diff;
pub mod error;
pub mod layout;
pub mod record;
pub mod scan;

pub use builder::{BuildOutput, RecordBuilder, Truncation};
pub use compile::{compile, CompileOptions, Compiled};
pub use decode::{DecodeOptions, DecodedRecord, FidbFields, Field, FieldValue, RddDetail, RddHeader};
pub use diff::{compare, compare_bytes, ByteDiff, FieldDiff, RecordDiff};
pub use error::{FormatError, Result};
pub use layout::Layout;
pub use record::DdrBinaryRecord;
pub use scan::{scan, scan_source, ByteSource, Candidate, FileSource};
