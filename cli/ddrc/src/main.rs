//! ddrc: compile DDR timing configurations into FIDB/RDD blobs and pull them
//! back out of firmware dumps and captures.

mod commands;

use std::path::PathBuf;
use std::process;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ddrc", version, about = "FIDB/RDD DDR configuration blob tool")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a [ddr] configuration into a 324-byte record
    Build {
        /// Input configuration (INI with a [ddr] section) and output binary
        /// path; with --chip, only the output path
        #[arg(required = true, num_args = 1..=2, value_names = ["CONFIG", "OUTPUT"])]
        paths: Vec<PathBuf>,
        /// Built-in chip preset instead of a configuration file
        /// ("default" selects the platform's usual chip)
        #[arg(long, conflicts_with = "dram_type")]
        chip: Option<String>,
        /// Built-in platform (t30, t31, t41)
        #[arg(long, default_value = "t31", conflicts_with = "platform_file")]
        platform: String,
        /// Custom .platform.toml profile
        #[arg(long)]
        platform_file: Option<PathBuf>,
        /// DDR clock in Hz, overriding the platform default
        #[arg(long)]
        freq: Option<u32>,
        /// DRAM type (ddr2, ddr3, lpddr, lpddr2, lpddr3)
        #[arg(long = "type")]
        dram_type: Option<String>,
        /// Reject values that do not fit in a byte instead of masking them
        #[arg(long)]
        strict: bool,
    },
    /// Find records in a raw buffer and write them out
    Extract {
        /// Raw buffer file (firmware dump, reconstructed capture payload)
        input: PathBuf,
        /// Output path for the first record
        output: Option<PathBuf>,
        /// Write every record found, not just the first
        #[arg(long)]
        all: bool,
    },
    /// Validate and decode a record file
    Inspect {
        /// Record file (324 or 384 bytes)
        file: PathBuf,
        /// Fail if the RDD checksum does not match
        #[arg(long)]
        verify_crc: bool,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Compare two record files byte by byte and field by field
    Compare {
        left: PathBuf,
        right: PathBuf,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Manage platform profiles
    Platform {
        #[command(subcommand)]
        action: PlatformAction,
    },
    /// Browse built-in DDR chip presets
    Chip {
        #[command(subcommand)]
        action: ChipAction,
    },
}

#[derive(Subcommand)]
enum PlatformAction {
    /// List built-in platforms
    List {
        /// Also list the .platform.toml profiles in this directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show the values of a platform profile
    Describe {
        /// Platform name
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum ChipAction {
    /// List built-in chip presets
    List {
        /// Only presets of this DRAM type
        #[arg(long = "type")]
        dram_type: Option<String>,
    },
    /// Show a chip preset
    Describe {
        /// Chip name (e.g., M14D1G1664A_DDR2)
        name: String,
        /// Output format (default: human-readable, "ini" for a [ddr] section, "json")
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build {
            paths,
            chip,
            platform,
            platform_file,
            freq,
            dram_type,
            strict,
        } => {
            let (config, output) = match (chip, paths.as_slice()) {
                (Some(name), [output]) => (commands::ConfigArg::Chip(name), output),
                (None, [config, output]) => (commands::ConfigArg::File(config.clone()), output),
                (Some(_), _) => bail!("with --chip, give only the output path"),
                (None, _) => bail!("expected both <CONFIG> and <OUTPUT>"),
            };
            let platform = match platform_file {
                Some(path) => commands::PlatformArg::File(path),
                None => commands::PlatformArg::Builtin(platform),
            };
            commands::build::run(&commands::build::BuildArgs {
                config: &config,
                output: output.as_path(),
                platform: &platform,
                freq,
                dram_type: dram_type.as_deref(),
                strict,
                show_timing: cli.verbose > 0,
            })
        }
        Commands::Extract { input, output, all } => {
            commands::extract::run(&input, output.as_deref(), all)
        }
        Commands::Inspect {
            file,
            verify_crc,
            format,
        } => commands::inspect::run(&file, verify_crc, format.as_deref()),
        Commands::Compare {
            left,
            right,
            format,
        } => {
            let identical = commands::compare::run(&left, &right, format.as_deref())?;
            if !identical {
                process::exit(1);
            }
            Ok(())
        }
        Commands::Platform { action } => match action {
            PlatformAction::List { dir } => commands::platform::list(dir.as_deref()),
            PlatformAction::Describe { name, format } => {
                commands::platform::describe(&name, format.as_deref())
            }
        },
        Commands::Chip { action } => match action {
            ChipAction::List { dram_type } => commands::chip::list(dram_type.as_deref()),
            ChipAction::Describe { name, format } => {
                commands::chip::describe(&name, format.as_deref())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use commands::build::BuildArgs;
    use commands::{ConfigArg, PlatformArg};

    const DDR3_CONFIG: &str = "[ddr]\nTYPE = ddr3\nROW = 13\nCOL = 10\nCL = 7\n";

    fn build_args<'a>(
        config: &'a ConfigArg,
        output: &'a std::path::Path,
        platform: &'a PlatformArg,
    ) -> BuildArgs<'a> {
        BuildArgs {
            config,
            output,
            platform,
            freq: None,
            dram_type: None,
            strict: false,
            show_timing: true,
        }
    }

    #[test]
    fn cli_parses_build() {
        let cli = Cli::try_parse_from([
            "ddrc", "-vv", "build", "w631.cfg", "out.bin", "--platform", "t41", "--freq",
            "450000000", "--type", "ddr3", "--strict",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build {
                paths,
                chip,
                platform,
                freq,
                dram_type,
                strict,
                ..
            } => {
                assert_eq!(paths, [PathBuf::from("w631.cfg"), PathBuf::from("out.bin")]);
                assert!(chip.is_none());
                assert_eq!(platform, "t41");
                assert_eq!(freq, Some(450_000_000));
                assert_eq!(dram_type.as_deref(), Some("ddr3"));
                assert!(strict);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn cli_parses_chip_build() {
        let cli = Cli::try_parse_from(["ddrc", "build", "--chip", "W631GU6NG_DDR3", "out.bin"])
            .unwrap();
        match cli.command {
            Commands::Build { paths, chip, .. } => {
                assert_eq!(paths, [PathBuf::from("out.bin")]);
                assert_eq!(chip.as_deref(), Some("W631GU6NG_DDR3"));
            }
            _ => panic!("expected build"),
        }

        assert!(Cli::try_parse_from(["ddrc", "build"]).is_err());
        assert!(Cli::try_parse_from(["ddrc", "build", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from([
            "ddrc", "build", "--chip", "W631GU6NG_DDR3", "--type", "ddr2", "out.bin"
        ])
        .is_err());
    }

    #[test]
    fn chip_with_config_path_is_rejected() {
        let cli = Cli::try_parse_from([
            "ddrc", "build", "--chip", "W631GU6NG_DDR3", "a.cfg", "out.bin",
        ])
        .unwrap();
        assert!(run(cli).is_err());
    }

    #[test]
    fn cli_rejects_both_platform_sources() {
        let result = Cli::try_parse_from([
            "ddrc",
            "build",
            "a.cfg",
            "b.bin",
            "--platform",
            "t31",
            "--platform-file",
            "x.platform.toml",
        ]);
        assert!(result.is_err());
    }

    /// build -> inspect -> extract -> compare on a temp directory.
    #[test]
    fn build_extract_compare_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("w631gu6ng.cfg");
        std::fs::write(&config, DDR3_CONFIG).unwrap();
        let source = ConfigArg::File(config);
        let built = dir.path().join("ddr.bin");
        let platform = PlatformArg::Builtin("t31".into());

        commands::build::run(&build_args(&source, &built, &platform)).unwrap();
        let bytes = std::fs::read(&built).unwrap();
        assert_eq!(bytes.len(), 324);

        commands::inspect::run(&built, true, None).unwrap();
        commands::inspect::run(&built, true, Some("json")).unwrap();

        let mut dump = vec![0u8; 100];
        dump.extend_from_slice(&bytes);
        dump.extend_from_slice(&[0xEE; 50]);
        let dump_path = dir.path().join("flash.bin");
        std::fs::write(&dump_path, &dump).unwrap();

        let extracted = dir.path().join("extracted.bin");
        commands::extract::run(&dump_path, Some(extracted.as_path()), false).unwrap();
        assert_eq!(std::fs::read(&extracted).unwrap(), bytes);

        assert!(commands::compare::run(&built, &extracted, None).unwrap());
        assert!(commands::compare::run(&built, &extracted, Some("json")).unwrap());
    }

    #[test]
    fn compare_detects_difference() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("a.cfg");
        std::fs::write(&config, DDR3_CONFIG).unwrap();
        let source = ConfigArg::File(config);
        let platform = PlatformArg::Builtin("t31".into());

        let a = dir.path().join("a.bin");
        commands::build::run(&build_args(&source, &a, &platform)).unwrap();

        let b = dir.path().join("b.bin");
        let mut args = build_args(&source, &b, &platform);
        args.freq = Some(533_000_000);
        commands::build::run(&args).unwrap();

        assert!(!commands::compare::run(&a, &b, None).unwrap());
    }

    #[test]
    fn extract_all_writes_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("a.cfg");
        std::fs::write(&config, DDR3_CONFIG).unwrap();
        let source = ConfigArg::File(config);
        let platform = PlatformArg::Builtin("t31".into());
        let rec = dir.path().join("rec.bin");
        commands::build::run(&build_args(&source, &rec, &platform)).unwrap();
        let bytes = std::fs::read(&rec).unwrap();

        let mut dump = bytes.clone();
        dump.extend_from_slice(&[0u8; 16]);
        dump.extend_from_slice(&bytes);
        let dump_path = dir.path().join("dump.bin");
        std::fs::write(&dump_path, &dump).unwrap();

        let out = dir.path().join("found.bin");
        commands::extract::run(&dump_path, Some(out.as_path()), true).unwrap();
        assert!(dir.path().join("found_0x0.bin").is_file());
        assert!(dir.path().join("found_0x154.bin").is_file());
    }

    #[test]
    fn extract_without_record_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dump_path = dir.path().join("empty.bin");
        std::fs::write(&dump_path, [0u8; 1000]).unwrap();
        let out = dir.path().join("out.bin");
        assert!(commands::extract::run(&dump_path, Some(out.as_path()), false).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn failed_build_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("bad.cfg");
        std::fs::write(&config, "[ddr]\nTYPE = ddr3\ntRC = 700,ns\n").unwrap();
        let source = ConfigArg::File(config);
        let out = dir.path().join("out.bin");
        let platform = PlatformArg::Builtin("t31".into());

        let mut args = build_args(&source, &out, &platform);
        args.strict = true;
        assert!(commands::build::run(&args).is_err());
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn build_with_platform_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("a.cfg");
        std::fs::write(&config, DDR3_CONFIG).unwrap();
        let source = ConfigArg::File(config);
        let profile = dir.path().join("board.platform.toml");
        std::fs::write(
            &profile,
            "name = \"board\"\ncrystal-freq-hz = 24000000\ncpu-freq-hz = 600000000\n\
             ddr-freq-hz = 450000000\nuart-baud = 115200\nmem-size-bytes = 8388608\n",
        )
        .unwrap();
        let out = dir.path().join("out.bin");
        let platform = PlatformArg::File(profile);
        commands::build::run(&build_args(&source, &out, &platform)).unwrap();

        let record = ddrc_bin::DdrBinaryRecord::from_bytes(&std::fs::read(&out).unwrap()).unwrap();
        let decoded = record.decode(&Default::default()).unwrap();
        assert_eq!(decoded.fidb.cpu_freq_hz, 600_000_000);
        assert_eq!(decoded.fidb.ddr_freq_hz, 450_000_000);
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("a.cfg");
        std::fs::write(&config, DDR3_CONFIG).unwrap();
        let source = ConfigArg::File(config);
        let out = dir.path().join("out.bin");
        let platform = PlatformArg::Builtin("x2000".into());
        assert!(commands::build::run(&build_args(&source, &out, &platform)).is_err());
    }

    #[test]
    fn chip_preset_matches_equivalent_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let preset = ddrc_targets::resolve_chip("M14D1G1664A_DDR2").unwrap();
        let config = dir.path().join("m14d1g1664a.cfg");
        std::fs::write(&config, preset.to_ddr_section()).unwrap();
        let platform = PlatformArg::Builtin("t31".into());

        let from_file = dir.path().join("file.bin");
        let source = ConfigArg::File(config);
        commands::build::run(&build_args(&source, &from_file, &platform)).unwrap();

        let from_chip = dir.path().join("chip.bin");
        let source = ConfigArg::Chip("m14d1g1664a_ddr2".into());
        commands::build::run(&build_args(&source, &from_chip, &platform)).unwrap();

        assert!(commands::compare::run(&from_file, &from_chip, None).unwrap());
    }

    #[test]
    fn default_chip_follows_platform() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("t41.bin");
        let source = ConfigArg::Chip("default".into());
        let platform = PlatformArg::Builtin("t41".into());
        commands::build::run(&build_args(&source, &out, &platform)).unwrap();

        let record = ddrc_bin::DdrBinaryRecord::from_bytes(&std::fs::read(&out).unwrap()).unwrap();
        let decoded = record.decode(&Default::default()).unwrap();
        assert_eq!(decoded.rdd.type_name, "DDR3");
    }

    #[test]
    fn unknown_chip_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bin");
        let source = ConfigArg::Chip("MT41K128M16".into());
        let platform = PlatformArg::Builtin("t31".into());
        assert!(commands::build::run(&build_args(&source, &out, &platform)).is_err());
        assert!(!out.exists());
    }
}
