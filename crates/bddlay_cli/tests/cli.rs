use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SCENARIO: &str = "[(0,1)]\n[(-2,-1)],[(-2,-1)]\n[0,1]\n";

fn bddlay(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bddlay"))
        .current_dir(dir)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn write_input(dir: &Path, text: &str) {
    fs::write(dir.join("d.bdd"), text).unwrap();
}

#[test]
fn inspect_prints_statistics() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), SCENARIO);
    let out = bddlay(tmp.path(), &["inspect", "d.bdd"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("transistors: 6"), "{stdout}");
    assert!(stdout.contains("nets: 3"), "{stdout}");
}

#[test]
fn inspect_json_includes_diagnostics() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), "[(0,1)],[0,1,2]\n[(-1,-2)]\n[0,1]\n");
    let out = bddlay(tmp.path(), &["inspect", "d.bdd", "--format", "json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["stats"]["transistors"], 4);
    let codes: Vec<u64> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["code"]["number"].as_u64())
        .collect();
    assert!(codes.contains(&201), "{codes:?}");
}

#[test]
fn malformed_input_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), "[(0,1]\n[0]\n");
    let out = bddlay(tmp.path(), &["inspect", "d.bdd"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("E101"), "{stderr}");
}

#[test]
fn missing_file_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    let out = bddlay(tmp.path(), &["place", "absent.bdd"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn place_is_reproducible_with_seed() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), SCENARIO);
    let args = ["place", "d.bdd", "--model", "standard-cell", "--seed", "8", "--format", "json"];
    let first = bddlay(tmp.path(), &args);
    let second = bddlay(tmp.path(), &args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["model"], "standard-cell");
    assert!(json["standard_cell"]["violation"].is_null());
}

#[test]
fn place_reads_config_beside_input() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), SCENARIO);
    fs::write(
        tmp.path().join("bddlay.toml"),
        "[anneal]\nseed = 1\nmax_iterations = 10\n\n[single_row]\nw_wire = 1.0\nw_area = 0.0\n",
    )
    .unwrap();
    let out = bddlay(tmp.path(), &["place", "d.bdd", "--format", "json", "-o", "r.json"]);
    assert!(out.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("r.json")).unwrap()).unwrap();
    assert_eq!(json["iterations"], 10);
    assert_eq!(json["row"]["weights"]["w_area"], 0.0);
}

#[test]
fn invalid_config_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    write_input(tmp.path(), SCENARIO);
    fs::write(tmp.path().join("bddlay.toml"), "[anneal]\ncooling_rate = 1.5\n").unwrap();
    let out = bddlay(tmp.path(), &["place", "d.bdd"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("cooling_rate"), "{stderr}");
}
