//! TOML parsing, serialization, validation, and discovery for platform profiles.
//!
//! Custom profiles are stored as `.platform.toml` files:
//!
//! ```toml
//! name = "t31-custom"
//! crystal-freq-hz = 24000000
//! cpu-freq-hz = 576000000
//! ddr-freq-hz = 450000000
//! uart-baud = 115200
//! mem-size-bytes = 8388608
//! default-chip = "M14D1G1664A_DDR2"
//! ```

use std::path::{Path, PathBuf};

use crate::chip::resolve_chip;
use crate::error::{Result, TargetError};
use crate::profile::PlatformProfile;

/// File suffix of profile definitions.
pub const PROFILE_SUFFIX: &str = ".platform.toml";

/// A validation issue found in a profile definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a profile from a `.platform.toml` file.
pub fn load_profile_toml(path: &Path) -> Result<PlatformProfile> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_profile_toml(&content)
}

/// Parse a profile from a TOML string.
pub fn parse_profile_toml(toml_str: &str) -> Result<PlatformProfile> {
    let profile: PlatformProfile = toml::from_str(toml_str)?;
    Ok(profile)
}

/// Serialize a profile to pretty TOML.
pub fn profile_to_toml(profile: &PlatformProfile) -> Result<String> {
    let toml_str = toml::to_string_pretty(profile)?;
    Ok(toml_str)
}

/// Validate a profile for values the record cannot represent.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_profile(profile: &PlatformProfile) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if profile.name.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "profile name is empty".into(),
        });
    }

    // The clock period is derived from whole kHz.
    if profile.ddr_freq_hz < 1000 {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!(
                "ddr-freq-hz {} is below 1 kHz; no clock period can be derived",
                profile.ddr_freq_hz
            ),
        });
    } else if profile.ddr_freq_hz % 100_000 != 0 {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!(
                "ddr-freq-hz {} is not a multiple of 100 kHz; the RDD frequency word truncates to {}",
                profile.ddr_freq_hz,
                profile.ddr_freq_hz / 100_000
            ),
        });
    }

    if profile.crystal_freq_hz == 0 {
        issues.push(ValidationIssue {
            severity: "error",
            message: "crystal-freq-hz is zero".into(),
        });
    }

    if profile.cpu_freq_hz == 0 {
        issues.push(ValidationIssue {
            severity: "error",
            message: "cpu-freq-hz is zero".into(),
        });
    }

    if profile.uart_baud == 0 {
        issues.push(ValidationIssue {
            severity: "error",
            message: "uart-baud is zero".into(),
        });
    }

    if profile.mem_size_bytes == 0 {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "mem-size-bytes is zero".into(),
        });
    }

    if let Some(chip) = &profile.default_chip {
        if resolve_chip(chip).is_err() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("default-chip '{chip}' is not a built-in chip preset"),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Load and validate a profile file.
///
/// Fails with [`TargetError::Validation`] if any issue is an error; warnings
/// are returned alongside the profile.
pub fn load_validated(path: &Path) -> Result<(PlatformProfile, Vec<ValidationIssue>)> {
    let profile = load_profile_toml(path)?;
    let issues = validate_profile(&profile).err().unwrap_or_default();
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.severity == "error")
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        return Err(TargetError::Validation {
            detail: format!("{}: {}", path.display(), errors.join("; ")),
        });
    }
    Ok((profile, issues))
}

/// Discover all `.platform.toml` files in a directory.
///
/// Returns a list of (profile_name, file_path) pairs sorted by name.
pub fn discover_profiles(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(PROFILE_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name {
            profiles.push((name, path));
        }
    }
    profiles.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_builtin() {
        let original = PlatformProfile::t31();
        let toml_str = profile_to_toml(&original).unwrap();
        let parsed = parse_profile_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn platform_id_defaults() {
        let parsed = parse_profile_toml(
            r#"
name = "custom"
crystal-freq-hz = 24000000
cpu-freq-hz = 576000000
ddr-freq-hz = 450000000
uart-baud = 115200
mem-size-bytes = 8388608
"#,
        )
        .unwrap();
        assert_eq!(parsed.platform_id, 0x1980_0000);
        assert_eq!(parsed.ddr_freq_hz, 450_000_000);
        assert_eq!(parsed.default_chip, None);
    }

    #[test]
    fn missing_field_rejected() {
        let result = parse_profile_toml("name = \"broken\"\n");
        assert!(matches!(result, Err(TargetError::Toml(_))));
    }

    #[test]
    fn builtins_validate() {
        assert!(validate_profile(&PlatformProfile::t31()).is_ok());
        assert!(validate_profile(&PlatformProfile::t41()).is_ok());
    }

    #[test]
    fn validation_reports_problems() {
        let mut p = PlatformProfile::t31();
        p.ddr_freq_hz = 500;
        p.uart_baud = 0;
        let issues = validate_profile(&p).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == "error"));

        let mut p = PlatformProfile::t31();
        p.ddr_freq_hz = 433_333_333;
        let issues = validate_profile(&p).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, "warning");
    }

    #[test]
    fn default_chip_must_exist() {
        let mut p = PlatformProfile::t31();
        p.default_chip = Some("NOPE_DDR2".into());
        let issues = validate_profile(&p).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, "warning");
        assert!(issues[0].message.contains("NOPE_DDR2"));

        p.default_chip = Some("w631gu6ng_ddr3".into());
        assert!(validate_profile(&p).is_ok());
    }

    #[test]
    fn load_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board-a.platform.toml");
        std::fs::write(&path, profile_to_toml(&PlatformProfile::t30()).unwrap()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let found = discover_profiles(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "board-a");

        let loaded = load_profile_toml(&found[0].1).unwrap();
        assert_eq!(loaded.name, "t30");
    }

    #[test]
    fn load_validated_splits_warnings_and_errors() {
        let dir = tempfile::tempdir().unwrap();

        let mut p = PlatformProfile::t31();
        p.ddr_freq_hz = 433_333_333;
        let warn_path = dir.path().join("warn.platform.toml");
        std::fs::write(&warn_path, profile_to_toml(&p).unwrap()).unwrap();
        let (loaded, warnings) = load_validated(&warn_path).unwrap();
        assert_eq!(loaded.ddr_freq_hz, 433_333_333);
        assert_eq!(warnings.len(), 1);

        p.cpu_freq_hz = 0;
        let bad_path = dir.path().join("bad.platform.toml");
        std::fs::write(&bad_path, profile_to_toml(&p).unwrap()).unwrap();
        match load_validated(&bad_path) {
            Err(TargetError::Validation { detail }) => assert!(detail.contains("cpu-freq-hz")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_missing_file() {
        let result = load_profile_toml(Path::new("/nonexistent/x.platform.toml"));
        assert!(matches!(result, Err(TargetError::NotFound { .. })));
    }
}
