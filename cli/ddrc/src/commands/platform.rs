//! `ddrc platform`: platform listing and description.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ddrc_targets::parse::{discover_profiles, profile_to_toml};
use ddrc_targets::{builtin_platforms, resolve_platform};

/// List all built-in platforms, plus the custom profiles found in `dir`.
pub fn list(dir: Option<&Path>) -> Result<()> {
    println!("Built-in platforms:");
    println!();
    for (name, description) in builtin_platforms() {
        println!("  {name:<8} {description}");
    }
    println!();

    if let Some(dir) = dir {
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }
        let found = discover_profiles(dir)
            .with_context(|| format!("scanning {}", dir.display()))?;
        println!("Custom profiles in {}:", dir.display());
        println!();
        if found.is_empty() {
            println!("  (none)");
        }
        for (name, path) in &found {
            println!("  {name:<16} {}", path.display());
        }
        println!();
        println!("Build with 'ddrc build --platform-file <path>'.");
    }
    println!("Use 'ddrc platform describe <name>' for details.");
    Ok(())
}

/// Describe a platform profile.
pub fn describe(name: &str, format: Option<&str>) -> Result<()> {
    let platform = resolve_platform(name)?;
    match format {
        None | Some("text") => {}
        Some("toml") => {
            print!("{}", profile_to_toml(&platform)?);
            return Ok(());
        }
        Some(other) => bail!("unknown format '{other}'. Use 'text' or 'toml'."),
    }

    println!("=== Platform: {} ===", platform.name);
    println!("  Crystal:     {} Hz", platform.crystal_freq_hz);
    println!("  CPU:         {} Hz", platform.cpu_freq_hz);
    println!(
        "  DDR:         {} Hz ({:.1} MHz)",
        platform.ddr_freq_hz,
        f64::from(platform.ddr_freq_hz) / 1_000_000.0
    );
    println!("  UART:        {} baud", platform.uart_baud);
    println!(
        "  Memory size: {} bytes ({} MiB)",
        platform.mem_size_bytes,
        platform.mem_size_bytes / (1024 * 1024)
    );
    println!("  Platform ID: 0x{:08x}", platform.platform_id);
    if let Some(chip) = &platform.default_chip {
        println!("  Default chip: {chip}");
    }
    Ok(())
}
