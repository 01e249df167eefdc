//! End-to-end compile: configuration and platform in, record out.

use ddrc_core::{encode_timing, ConfigModel, EncodedTiming, TimingConverter};
use ddrc_targets::PlatformProfile;

use crate::builder::{BuildOutput, RecordBuilder};
use crate::error::Result;

/// Settings for [`compile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// DDR clock in Hz, overriding the platform default.
    pub ddr_freq: Option<u32>,
    /// Reject out-of-range byte fields instead of masking them.
    pub strict: bool,
}

/// Output of a successful compile.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub output: BuildOutput,
    /// Cycle counts the record was built from, including tREFI.
    pub timing: EncodedTiming,
    pub clock_period_ps: i64,
}

/// Run the encode path:
/// frequency -> timing conversion -> record assembly.
pub fn compile(
    config: &ConfigModel,
    platform: &PlatformProfile,
    options: &CompileOptions,
) -> Result<Compiled> {
    let freq_hz = platform.effective_ddr_freq(options.ddr_freq);
    let converter = TimingConverter::new(freq_hz)?;
    let timing = encode_timing(config, &converter)?;

    let output = RecordBuilder::new(platform)
        .strict(options.strict)
        .build(config, &timing, options.ddr_freq)?;

    tracing::info!(
        platform = %platform.name,
        dram_type = %config.dram_type(),
        freq_hz,
        truncations = output.truncations.len(),
        "record compiled"
    );

    Ok(Compiled {
        output,
        timing,
        clock_period_ps: converter.clock_period_ps(),
    })
}
