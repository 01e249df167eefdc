//! SoC platform profiles for the DDR configuration compiler.
//!
//! A [`PlatformProfile`] carries the board-level values written into the FIDB
//! block: crystal, CPU and default DDR clocks, console baud rate, memory size
//! and the platform identifier. Profiles come from the built-in registry or
//! from `.platform.toml` files.
//!
//! The crate also carries the built-in [`ChipPreset`] table, so a record can
//! be compiled for a known memory part without a configuration file.

pub mod chip;
pub mod error;
pub mod parse;
pub mod profile;

pub use chip::{builtin_chips, chips_by_type, default_chip, resolve_chip, ChipPreset, ChipTiming};
pub use error::{Result, TargetError};
pub use profile::{builtin_platforms, resolve_platform, PlatformProfile};
