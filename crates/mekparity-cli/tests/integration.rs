//! Integration tests for CLI commands.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn minimal_atlas() -> String {
    let mut text = String::from(
        "chassis:Atlas\nmodel:AS7-D\nConfig:Biped\ntechbase:Inner Sphere\nera:2755\nrules level:1\n\n\
         mass:100\nengine:300 Fusion Engine\nwalk mp:3\njump mp:0\n\n\
         armor:Standard(Inner Sphere)\nLA armor:34\nRA armor:34\n\n",
    );
    let arm = [
        "Shoulder",
        "Upper Arm Actuator",
        "Lower Arm Actuator",
        "Hand Actuator",
    ];
    let leg = [
        "Hip",
        "Upper Leg Actuator",
        "Lower Leg Actuator",
        "Foot Actuator",
    ];
    for (header, fixed, capacity) in [
        ("Left Arm:", &arm[..], 12),
        ("Right Arm:", &arm[..], 12),
        ("Left Torso:", &[][..], 12),
        ("Right Torso:", &[][..], 12),
        ("Center Torso:", &["Fusion Engine", "Fusion Engine", "Fusion Engine", "Gyro"][..], 12),
        ("Head:", &["Life Support", "Sensors", "Cockpit"][..], 6),
        ("Left Leg:", &leg[..], 6),
        ("Right Leg:", &leg[..], 6),
    ] {
        text.push_str(header);
        text.push('\n');
        for index in 0..capacity {
            text.push_str(fixed.get(index).copied().unwrap_or("-Empty-"));
            text.push('\n');
        }
        text.push('\n');
    }
    text
}

fn write(dir: &Path, relative: &str, content: &str) -> String {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_mekparity"))
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

#[test]
fn test_render_then_compare_passes() {
    let temp_dir = TempDir::new().unwrap();
    let original = write(temp_dir.path(), "atlas.mtf", &minimal_atlas());

    let (success, rendered, _) = run_cli(&["render", &original]);
    assert!(success);
    assert!(rendered.starts_with("chassis:Atlas\n"));
    let generated = write(temp_dir.path(), "out/atlas.mtf", &rendered);

    let (success, stdout, _) = run_cli(&["compare", &original, &generated]);
    assert!(success, "{}", stdout);
    assert!(stdout.contains("Status: passed"));
}

#[test]
fn test_compare_reports_discrepancies() {
    let temp_dir = TempDir::new().unwrap();
    let original = write(temp_dir.path(), "atlas.mtf", &minimal_atlas());
    let changed = write(
        temp_dir.path(),
        "changed.mtf",
        &minimal_atlas().replace("LA armor:34", "LA armor:30"),
    );

    let (success, stdout, _) = run_cli(&["compare", &original, &changed]);
    assert!(!success);
    assert!(stdout.contains("ARMOR_MISMATCH"));

    let (success, stdout, _) = run_cli(&["compare", &original, &changed, "--json"]);
    assert!(!success);
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(result["status"], "issues_found");
    assert_eq!(result["discrepancies"][0]["expected"], "34");
    assert_eq!(result["discrepancies"][0]["actual"], "30");
}

#[test]
fn test_parse_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "atlas.mtf", &minimal_atlas());

    let (success, stdout, _) = run_cli(&["parse", &file, "--json"]);
    assert!(success);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(value["grammar"], "mtf");
    assert_eq!(value["record"]["chassis"], "Atlas");
    assert_eq!(value["record"]["tonnage"], 100.0);
    assert!(value["digest"].as_str().unwrap().starts_with("sha-256:"));

    let (success, again, _) = run_cli(&["parse", &file, "--json"]);
    assert!(success);
    let again: serde_json::Value = serde_json::from_str(&again).unwrap();
    assert_eq!(value["digest"], again["digest"]);
}

#[test]
fn test_parse_tag_block_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(
        temp_dir.path(),
        "demolisher.blk",
        include_str!("../../mekparity-formats/tests/fixtures/demolisher.blk"),
    );

    let (success, stdout, _) = run_cli(&["parse", &file]);
    assert!(success);
    assert!(stdout.contains("\"chassis\": \"Demolisher Heavy Tank\""));
    assert!(stdout.contains("Digest: sha-256:"));
}

#[test]
fn test_parse_missing_chassis_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "headless.mtf", "model:X-1\nConfig:Biped\n");

    let (success, _, stderr) = run_cli(&["parse", &file]);
    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("chassis"));
}

#[test]
fn test_unknown_extension_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "notes.txt", "chassis:Atlas\n");

    let (success, _, stderr) = run_cli(&["render", &file]);
    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_compare_grammar_mismatch_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mtf = write(temp_dir.path(), "atlas.mtf", &minimal_atlas());
    let blk = write(
        temp_dir.path(),
        "demolisher.blk",
        include_str!("../../mekparity-formats/tests/fixtures/demolisher.blk"),
    );

    let (success, _, stderr) = run_cli(&["compare", &mtf, &blk]);
    assert!(!success);
    assert!(stderr.contains("grammar mismatch"));
}

#[test]
fn test_validate_clean_corpus_succeeds() {
    let corpus = TempDir::new().unwrap();
    write(corpus.path(), "mechs/atlas.mtf", &minimal_atlas());
    let out = TempDir::new().unwrap();
    let out_path = out.path().to_string_lossy().to_string();

    let (success, stdout, _) = run_cli(&[
        "validate",
        &corpus.path().to_string_lossy(),
        "--out",
        &out_path,
    ]);
    assert!(success, "{}", stdout);
    assert!(stdout.contains("Units validated:  1"));
    assert!(stdout.contains("Pass rate:        100.0%"));
    assert!(out.path().join("manifest.json").is_file());
    assert!(out.path().join("generated/mechs/atlas.mtf").is_file());
}

#[test]
fn test_validate_with_failures_exits_nonzero() {
    let corpus = TempDir::new().unwrap();
    write(corpus.path(), "mechs/atlas.mtf", &minimal_atlas());
    write(corpus.path(), "mechs/headless.mtf", "model:X-1\nConfig:Biped\n");
    let out = TempDir::new().unwrap();
    let out_path = out.path().to_string_lossy().to_string();

    let (success, stdout, _) = run_cli(&[
        "validate",
        &corpus.path().to_string_lossy(),
        "--out",
        &out_path,
        "--jobs",
        "2",
    ]);
    assert!(!success);
    assert!(stdout.contains("Parse errors:     1"));
    assert!(stdout.contains("PARSE_ERROR"));
    assert!(out.path().join("issues/headless.json").is_file());
}

#[test]
fn test_validate_filters_by_include_and_format() {
    let corpus = TempDir::new().unwrap();
    write(corpus.path(), "mechs/atlas.mtf", &minimal_atlas());
    write(corpus.path(), "broken/headless.mtf", "model:X-1\nConfig:Biped\n");
    write(
        corpus.path(),
        "vehicles/demolisher.blk",
        include_str!("../../mekparity-formats/tests/fixtures/demolisher.blk"),
    );
    let out = TempDir::new().unwrap();
    let out_path = out.path().to_string_lossy().to_string();

    let (success, stdout, _) = run_cli(&[
        "validate",
        &corpus.path().to_string_lossy(),
        "--out",
        &out_path,
        "--include",
        "mechs",
        "--format",
        "mtf",
        "--verbose",
    ]);
    assert!(success, "{}", stdout);
    assert!(stdout.contains("Units validated:  1"));
}
