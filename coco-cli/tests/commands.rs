use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("coco-parser")
        .join("samples")
        .join(name)
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("command output is JSON")
}

#[test]
fn symbols_lists_declarations() {
    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("symbols").arg(sample_path("taste.atg"));
    let output = cmd.assert().success().get_output().stdout.clone();

    let json = stdout_json(&output);
    assert_eq!(json["grammar_name"]["name"], "Taste");
    assert_eq!(json["tokens"].as_array().unwrap().len(), 2);
    assert_eq!(json["legal_constructs"], serde_json::json!([]));
}

#[test]
fn complete_after_productions_keyword() {
    // minimal.atg line 2 is `PRODUCTIONS`
    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("complete")
        .arg(sample_path("minimal.atg"))
        .args(["--line", "2", "--column", "12"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let json = stdout_json(&output);
    let legal = json["legal_constructs"].as_array().unwrap();
    assert!(legal.contains(&serde_json::json!("ProductionName")));
    assert!(!legal.contains(&serde_json::json!("Compiler")));
}

#[test]
fn complete_respects_config_overrides() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("coco.toml");
    fs::write(&config, "[completion]\ninclude_keywords = false\n").unwrap();

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("complete")
        .arg(sample_path("minimal.atg"))
        .args(["--line", "4", "--column", "1"])
        .arg("--config")
        .arg(&config);
    let output = cmd.assert().success().get_output().stdout.clone();

    let json = stdout_json(&output);
    let legal = json["legal_constructs"].as_array().unwrap();
    assert!(legal.contains(&serde_json::json!("End")));
    let labels: Vec<&str> = json["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|candidate| candidate["label"].as_str())
        .collect();
    assert!(!labels.contains(&"END"));
}

#[test]
fn remap_and_map_commands() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("parser.atgmap"), "Calc.atg\n99,8,9,4,12\n").unwrap();
    let generated = dir.path().join("Parser.cs");

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("remap").arg(&generated).args(["100", "12"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let json = stdout_json(&output);
    assert_eq!(json["line"], 10);
    assert_eq!(json["column"], 8);

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("remap").arg(&generated).args(["1", "1"]);
    cmd.assert().success().stdout(predicate::str::contains("null"));

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("map").arg(dir.path().join("parser.atgmap"));
    let output = cmd.assert().success().get_output().stdout.clone();
    let json = stdout_json(&output);
    assert_eq!(json["grammar"], "Calc.atg");
    assert_eq!(json["entries"][0]["line"], 99);
    assert_eq!(json["entries"][0]["target_line"], 9);
}

#[test]
fn remap_log_resolves_files_next_to_the_log() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("parser.atgmap"), "Calc.atg\n99,8,9,4,12\n").unwrap();
    let log = dir.path().join("build.log");
    fs::write(
        &log,
        "Parser.cs(100,9): error CS1002: ; expected\nBuild FAILED.\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("remap-log").arg(&log);
    let output = cmd.assert().success().get_output().stdout.clone();
    let json = stdout_json(&output);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "error CS1002: ; expected");
    assert_eq!(entries[0]["origin"]["line"], 10);
    assert_eq!(entries[0]["origin"]["column"], 5);
}

#[test]
fn generator_log_lists_grammar_errors() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("coco.log");
    fs::write(
        &log,
        "Coco/R (Apr 19, 2011)\n-- line 4 col 1: \".\" expected\n1 errors detected\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("generator-log").arg(&log);
    let output = cmd.assert().success().get_output().stdout.clone();
    let json = stdout_json(&output);
    assert_eq!(
        json,
        serde_json::json!([{ "line": 4, "column": 1, "message": "\".\" expected" }])
    );
}

#[test]
fn missing_input_fails_with_a_message() {
    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("symbols").arg("does-not-exist.atg");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn malformed_map_is_reported() {
    let dir = tempdir().unwrap();
    let map = dir.path().join("parser.atgmap");
    fs::write(&map, "Calc.atg\n1,2,3\n").unwrap();

    let mut cmd = cargo_bin_cmd!("coco");
    cmd.arg("map").arg(&map);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("malformed map entry on line 2"));
}
