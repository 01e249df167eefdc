//! `ddrc chip`: built-in chip preset listing and description.

use anyhow::{bail, Result};
use ddrc_core::DramType;
use ddrc_targets::{builtin_chips, chips_by_type, resolve_chip, ChipPreset};

/// List chip presets, grouped by DRAM type.
pub fn list(dram_type: Option<&str>) -> Result<()> {
    let types = match dram_type {
        Some(name) => vec![name.parse::<DramType>()?],
        None => DramType::ALL.to_vec(),
    };

    println!("Built-in DDR chips:");
    for ty in types {
        let chips: Vec<_> = chips_by_type(ty).collect();
        if chips.is_empty() {
            continue;
        }
        println!();
        println!("  {ty}:");
        for chip in chips {
            println!("    {:<20} {}", chip.name, chip.vendor);
        }
    }
    println!();
    println!(
        "{} presets. Use 'ddrc chip describe <name>' for timing, or 'ddrc build --chip <name>'.",
        builtin_chips().len()
    );
    Ok(())
}

/// Describe a chip preset.
pub fn describe(name: &str, format: Option<&str>) -> Result<()> {
    let chip = resolve_chip(name)?;
    match format {
        None | Some("text") => print_chip(chip),
        Some("ini") => print!("{}", chip.to_ddr_section()),
        Some("json") => println!("{}", serde_json::to_string_pretty(chip)?),
        Some(other) => bail!("unknown format '{other}'. Use 'text', 'ini' or 'json'."),
    }
    Ok(())
}

fn print_chip(chip: &ChipPreset) {
    println!("=== Chip: {} ===", chip.name);
    println!("  Vendor:   {}", chip.vendor);
    println!("  Type:     {} (RDD code {})", chip.dram_type, chip.dram_type.code());
    println!("  Geometry: {} row bits, {} column bits", chip.row_bits, chip.col_bits);
    match chip.rl_wl {
        Some((rl, wl)) => println!("  Latency:  RL {rl}, WL {wl}"),
        None => println!("  Latency:  CL {}, BL {}", chip.cl, chip.bl),
    }
    println!("  Timing:");
    for t in chip.timings {
        println!("    {:<6} {:>8} {}", t.key, t.value, t.unit);
    }
}
