//! `ddrc build`: compile a configuration into a record file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ddrc_bin::{compile, CompileOptions};
use ddrc_core::{ConfigModel, DramType, TypeSource};
use ddrc_targets::{default_chip, parse, resolve_chip, resolve_platform, PlatformProfile};

use super::{write_atomic, ConfigArg, PlatformArg};

/// Chip name that selects the platform's default preset.
const DEFAULT_CHIP: &str = "default";

pub struct BuildArgs<'a> {
    pub config: &'a ConfigArg,
    pub output: &'a Path,
    pub platform: &'a PlatformArg,
    pub freq: Option<u32>,
    pub dram_type: Option<&'a str>,
    pub strict: bool,
    /// Print the cycle table, including tREFI.
    pub show_timing: bool,
}

pub fn run(args: &BuildArgs<'_>) -> Result<()> {
    let platform = load_platform(args.platform)?;
    let config = load_config(args.config, args.dram_type, &platform)?;

    match config.type_source() {
        TypeSource::Inferred => eprintln!(
            "warning: DRAM type {} guessed from the file name; pass --type or set TYPE in [ddr]",
            config.dram_type()
        ),
        TypeSource::Defaulted => eprintln!(
            "warning: no DRAM type given, assuming {}; pass --type or set TYPE in [ddr]",
            config.dram_type()
        ),
        TypeSource::Explicit => {}
    }

    let options = CompileOptions {
        ddr_freq: args.freq,
        strict: args.strict,
    };
    let compiled = compile(&config, &platform, &options)?;

    for t in &compiled.output.truncations {
        eprintln!(
            "warning: {} = {} does not fit in a byte, stored as {}",
            t.field, t.value, t.stored
        );
    }

    let record = &compiled.output.record;
    write_atomic(args.output, record.as_bytes())?;

    println!(
        "Wrote {} ({} bytes, {} @ {} Hz, platform {})",
        args.output.display(),
        record.len(),
        config.dram_type(),
        platform.effective_ddr_freq(args.freq),
        platform.name,
    );
    println!("SHA-256: {}", record.digest());

    if args.show_timing {
        println!();
        println!("Clock period: {} ps", compiled.clock_period_ps);
        for (name, cycles) in compiled.timing.record_values() {
            println!("  {name:<6} {cycles:>5}");
        }
        println!("  {:<6} {:>5}  (not stored)", "tREFI", compiled.timing.t_refi);
    }
    Ok(())
}

fn load_config(
    arg: &ConfigArg,
    dram_type: Option<&str>,
    platform: &PlatformProfile,
) -> Result<ConfigModel> {
    let path = match arg {
        ConfigArg::File(path) => path,
        ConfigArg::Chip(name) => {
            if dram_type.is_some() {
                bail!("--type cannot be combined with a chip preset");
            }
            let chip = if name.eq_ignore_ascii_case(DEFAULT_CHIP) {
                default_chip(platform)?
            } else {
                resolve_chip(name)?
            };
            tracing::info!(chip = chip.name, vendor = chip.vendor, "using built-in chip preset");
            return chip
                .config()
                .with_context(|| format!("loading chip preset {}", chip.name));
        }
    };

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match dram_type {
        Some(name) => {
            let ty: DramType = name.parse()?;
            ConfigModel::parse_with_type(&text, ty)
        }
        None => ConfigModel::parse_with_identifier(&text, &path.to_string_lossy()),
    }
    .with_context(|| format!("parsing {}", path.display()))
}

fn load_platform(arg: &PlatformArg) -> Result<PlatformProfile> {
    match arg {
        PlatformArg::Builtin(name) => Ok(resolve_platform(name)?),
        PlatformArg::File(path) => {
            let (profile, warnings) = parse::load_validated(path)?;
            for issue in &warnings {
                eprintln!("warning: {}: {}", path.display(), issue.message);
            }
            Ok(profile)
        }
    }
}
