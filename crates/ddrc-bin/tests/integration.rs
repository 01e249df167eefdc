//! Integration tests for the encode and decode paths.

use ddrc_bin::{
    compile, compare, scan, scan_source, CompileOptions, DdrBinaryRecord, DecodeOptions,
    FileSource, FormatError, Layout,
};
use ddrc_core::{ConfigModel, CoreError, DramType};
use ddrc_targets::{resolve_chip, PlatformProfile};

const W631GU6NG: &str = r#"
; Winbond W631GU6NG, 1Gbit DDR3L
[ddr]
TYPE = ddr3
ROW = 13
COL = 10
CL = 7
BL = 8
tRAS = 35,ns
tRC = 48750,ps
tRCD = 13750,ps
tRP = 13750,ps
tRFC = 110,ns
tRTP = 4,tck
tWTR = 4,tck
tRRD = 7500,ps
tFAW = 40,ns
tREFI = 7800,ns
tXP = -1,tck
"#;

fn build(text: &str, options: &CompileOptions) -> DdrBinaryRecord {
    let config = ConfigModel::parse(text).expect("parse config");
    compile(&config, &PlatformProfile::t31(), options)
        .expect("compile")
        .output
        .record
}

#[test]
fn ddr3_reference_config() {
    let config = ConfigModel::parse(W631GU6NG).expect("parse config");
    assert_eq!(config.dram_type(), DramType::Ddr3);

    let compiled =
        compile(&config, &PlatformProfile::t31(), &CompileOptions::default()).expect("compile");
    assert!(compiled.output.truncations.is_empty());

    let t = compiled.timing;
    assert_eq!(t.t_ras, 14);
    assert_eq!(t.t_rc, 20);
    assert_eq!(t.t_rcd, 6);
    assert_eq!(t.t_rp, 6);
    // (110000 + 4999) / 2500 = 45, halved = 22
    assert_eq!(t.t_rfc, 22);
    assert_eq!(t.t_rtp, 4);
    assert_eq!(t.t_wtr, 4);
    assert_eq!(t.t_rrd, 3);
    assert_eq!(t.t_faw, 16);
    assert_eq!(t.t_refi, 3120);
}

#[test]
fn round_trip_recovers_fields() {
    let record = build(W631GU6NG, &CompileOptions::default());
    let decoded = record
        .decode(&DecodeOptions { verify_crc: true })
        .expect("decode");

    assert_eq!(decoded.layout, Layout::Classic);
    assert_eq!(decoded.fidb.size, 184);
    assert_eq!(decoded.fidb.crystal_freq_hz, 24_000_000);
    assert_eq!(decoded.fidb.cpu_freq_hz, 576_000_000);
    assert_eq!(decoded.fidb.ddr_freq_hz, 400_000_000);
    assert_eq!(decoded.fidb.ddr_freq_mhz, 400.0);
    assert_eq!(decoded.rdd.size, 124);
    assert_eq!(decoded.rdd.type_code, 0);
    assert_eq!(decoded.rdd.type_name, "DDR3");

    let d = decoded.detail.expect("classic detail");
    assert_eq!(d.dram_type, DramType::Ddr3);
    assert_eq!(d.freq_word, 4000);
    assert_eq!(d.const_word, 0x2800);
    assert_eq!(d.fixed_bytes, [0x01, 0x00, 0xc2, 0x00]);
    assert_eq!(d.mode, [7, 8]);
    assert_eq!(d.row_bits, 13);
    assert_eq!(d.col_bits, 10);
    assert_eq!(
        [d.t_ras, d.t_rc, d.t_rcd, d.t_rp, d.t_rfc, d.t_rtp, d.t_faw, d.t_rrd, d.t_wtr],
        [14, 20, 6, 6, 22, 4, 16, 3, 4]
    );
    assert_eq!(d.padding, [0x04, 0x20, 0x00]);
    assert_eq!(
        d.dq_map,
        [12, 13, 14, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 15, 16, 17, 18, 19]
    );
}

#[test]
fn lpddr2_round_trip() {
    let text = "[ddr]\nTYPE = lpddr2\nRL = 8\nWL = 4\nROW = 14\nCOL = 9\n";
    let record = build(text, &CompileOptions::default());
    let decoded = record.decode(&DecodeOptions::default()).expect("decode");
    assert_eq!(decoded.rdd.type_code, 2);
    assert_eq!(decoded.rdd.type_name, "LPDDR2/LPDDR");

    let d = decoded.detail.expect("classic detail");
    assert_eq!(d.mode, [6, 6]);
    assert_eq!(d.row_bits, 14);
    assert_eq!(d.col_bits, 9);
    assert_eq!(d.t_ras, 17);
    assert_eq!(d.t_rc, 23);
    assert_eq!(d.t_rcd, 8);
    assert_eq!(d.t_rfc, 36);
}

#[test]
fn checksum_invariant_holds() {
    for text in [W631GU6NG, "[ddr]\n", "[ddr]\nTYPE = lpddr\n"] {
        let record = build(text, &CompileOptions::default());
        let body = record.rdd_body();
        let stored = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
        assert_eq!(stored, crc32fast::hash(&body[4..]));
        assert_eq!(record.stored_crc(), record.computed_crc());
    }
}

#[test]
fn output_is_deterministic() {
    let a = build(W631GU6NG, &CompileOptions::default());
    let b = build(W631GU6NG, &CompileOptions::default());
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.digest(), b.digest());
    assert!(compare(&a, &b).expect("compare").is_identical());
}

#[test]
fn column_bias() {
    for (col, stored) in [(10, 4u8), (16, 10)] {
        let record = build(&format!("[ddr]\nCOL = {col}\n"), &CompileOptions::default());
        assert_eq!(record.rdd_body()[0x1f], stored);
    }
}

#[test]
fn strict_mode_rejects_oversized_timing() {
    let text = "[ddr]\nTYPE = ddr3\ntRC = 700,ns\n";
    let config = ConfigModel::parse(text).expect("parse config");
    let options = CompileOptions {
        ddr_freq: None,
        strict: true,
    };
    let err = compile(&config, &PlatformProfile::t31(), &options).expect_err("out of range");
    assert!(matches!(
        err,
        FormatError::Core(CoreError::OutOfRange { field: "tRC", value: 280 })
    ));

    let lenient = compile(&config, &PlatformProfile::t31(), &CompileOptions::default())
        .expect("lenient compile");
    assert_eq!(lenient.output.truncations.len(), 1);
    assert_eq!(lenient.output.record.rdd_body()[0x21], 24);
}

#[test]
fn extreme_values_saturate_instead_of_overflowing() {
    let text = "[ddr]\nTYPE = ddr3\ntRAS = 9223372036854775807,ps\ntRFC = 10000000000000000,ns\n\
                tWTR = 9000000000000000,tck\nCOL = -9223372036854775808\n";
    let config = ConfigModel::parse(text).expect("parse config");

    let lenient = compile(&config, &PlatformProfile::t31(), &CompileOptions::default())
        .expect("lenient compile");
    let t = lenient.timing;
    assert_eq!(t.t_ras, i64::MAX / 2500 + 1);
    assert_eq!(t.t_rfc, (i64::MAX / 2500 + 2) / 2);
    assert_eq!(t.t_wtr, i64::MAX / 2500 + 1);

    let fields: Vec<_> = lenient.output.truncations.iter().map(|n| n.field).collect();
    assert_eq!(fields, ["COL-6", "tRAS", "tRFC", "tWTR"]);
    assert_eq!(lenient.output.truncations[0].value, i64::MIN);

    let body = lenient.output.record.rdd_body();
    assert_eq!(body[0x1f], 0);
    assert_eq!(body[0x20], 151);
    assert_eq!(body[0x24], 204);

    let strict = CompileOptions {
        ddr_freq: None,
        strict: true,
    };
    let err = compile(&config, &PlatformProfile::t31(), &strict).expect_err("out of range");
    assert!(matches!(
        err,
        FormatError::Core(CoreError::OutOfRange { field: "COL-6", value: i64::MIN })
    ));

    let config = ConfigModel::parse("[ddr]\nTYPE = ddr3\ntRAS = 9223372036854775807,ps\n")
        .expect("parse config");
    let err = compile(&config, &PlatformProfile::t31(), &strict).expect_err("out of range");
    assert!(matches!(
        err,
        FormatError::Core(CoreError::OutOfRange { field: "tRAS", .. })
    ));
}

#[test]
fn chip_preset_encodes_like_its_config_text() {
    let preset = resolve_chip("W631GU6NG_DDR3").expect("preset");
    let from_preset = compile(
        &preset.config().expect("preset config"),
        &PlatformProfile::t41(),
        &CompileOptions::default(),
    )
    .expect("compile preset");
    let from_text = compile(
        &ConfigModel::parse(W631GU6NG).expect("parse config"),
        &PlatformProfile::t41(),
        &CompileOptions::default(),
    )
    .expect("compile text");

    assert_eq!(from_preset.timing, from_text.timing);
    assert_eq!(
        from_preset.output.record.as_bytes(),
        from_text.output.record.as_bytes()
    );
}

#[test]
fn scan_finds_built_records_in_a_dump() {
    let record = build(W631GU6NG, &CompileOptions::default());
    let mut dump = vec![0x5Au8; 10];
    dump.extend_from_slice(record.as_bytes());
    dump.extend_from_slice(b"FIDB garbage");
    dump.extend_from_slice(record.as_bytes());
    dump.extend_from_slice(&[0u8; 17]);

    let found = scan(&dump);
    let offsets: Vec<_> = found.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![10, 10 + 324 + 12]);
    assert_eq!(found[0].record, record);
    assert_eq!(found[1].record, record);
}

#[test]
fn scan_from_file() {
    let record = build(W631GU6NG, &CompileOptions::default());
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("capture.bin");
    let mut dump = b"USB capture payload ".to_vec();
    dump.extend_from_slice(record.as_bytes());
    std::fs::write(&path, &dump).expect("write dump");

    let found = scan_source(&FileSource::new(&path)).expect("scan");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].record.digest(), record.digest());
}

#[test]
fn decoded_record_serializes_to_json() {
    let record = build(W631GU6NG, &CompileOptions::default());
    let decoded = record.decode(&DecodeOptions::default()).expect("decode");
    let json = serde_json::to_value(&decoded).expect("serialize");
    assert_eq!(json["layout"], "classic");
    assert_eq!(json["fidb"]["ddr_freq_hz"], 400_000_000);
    assert_eq!(json["rdd"]["type_name"], "DDR3");
    assert_eq!(json["detail"]["col_bits"], 10);
    assert_eq!(json["detail"]["dram_type"], "ddr3");
}

#[test]
fn compare_reports_changed_timing() {
    let a = build(W631GU6NG, &CompileOptions::default());
    let b = build(&W631GU6NG.replace("tRFC = 110,ns", "tRFC = 160,ns"), &CompileOptions::default());
    let diff = compare(&a, &b).expect("compare");
    assert!(!diff.is_identical());
    let names: Vec<_> = diff.fields.iter().map(|f| f.name).collect();
    assert!(names.contains(&"tRFC"));
    assert!(names.contains(&"crc_stored"));
    assert!(!names.contains(&"tRAS"));
}
