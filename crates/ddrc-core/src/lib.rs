//! Core model for compiling DDR timing configurations.
//!
//! The encode path runs in three steps:
//! - **Config:** parse a `[ddr]` INI document into a [`ConfigModel`]
//! - **Convert:** build a [`TimingConverter`] for the effective DDR clock
//! - **Encode:** turn the model into clock-cycle counts with [`encode_timing`]
//!
//! The resulting [`EncodedTiming`] and [`ModeRegisters`] are packed into the
//! binary record by the `ddrc-bin` crate.

pub mod config;
pub mod dram;
pub mod encode;
pub mod error;
pub mod timing;

pub use config::{ConfigModel, Param, ParamValue, TypeSource, Unit};
pub use dram::DramType;
pub use encode::{encode_mode_registers, encode_timing, EncodedTiming, ModeRegisters, TimingDefaults};
pub use error::{CoreError, Result};
pub use timing::TimingConverter;
