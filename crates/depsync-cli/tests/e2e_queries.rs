//! E2E tests for the graph query commands: `deps`, `rdeps`, `cycles`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn dsync_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dsync"));
    cmd.current_dir(dir);
    cmd.env("DEPSYNC_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_targets(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("targets.json");
    std::fs::write(&path, json).expect("write targets");
    path
}

const DIAMOND: &str = r#"{
  "targets": {
    "A":   {"deps": ["B", "BB", "BBB"]},
    "B":   {"deps": ["C"]},
    "BB":  {"deps": ["B", "C", "CC"]},
    "BBB": {"deps": ["C", "CC", "CCC"]},
    "C": null
  }
}"#;

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn deps_direct_text() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);

    dsync_cmd(dir.path())
        .args(["deps", targets.to_str().expect("utf8"), "BB", "--format", "text"])
        .assert()
        .success()
        .stdout("B\nC\nCC\n");
}

#[test]
fn deps_transitive_json_is_breadth_first() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);

    let json = json_output(dsync_cmd(dir.path()).args([
        "deps",
        targets.to_str().expect("utf8"),
        "A",
        "--transitive",
        "--json",
    ]));

    assert_eq!(json["known"], true);
    assert_eq!(strings(&json["deps"]), vec!["B", "BB", "BBB", "C", "CC", "CCC"]);
}

#[test]
fn deps_transitive_with_precompute_config() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);
    std::fs::create_dir_all(dir.path().join(".depsync")).expect("config dir");
    std::fs::write(dir.path().join(".depsync/config.toml"), "[graph]\nprecompute = true\n")
        .expect("write config");

    let json = json_output(dsync_cmd(dir.path()).args([
        "deps",
        targets.to_str().expect("utf8"),
        "BBB",
        "-t",
        "--json",
    ]));
    assert_eq!(strings(&json["deps"]), vec!["C", "CC", "CCC"]);
}

#[test]
fn deps_unknown_target_is_empty_not_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);

    let json = json_output(dsync_cmd(dir.path()).args([
        "deps",
        targets.to_str().expect("utf8"),
        "//nowhere",
        "--json",
    ]));
    assert_eq!(json["known"], false);
    assert!(json["deps"].as_array().expect("array").is_empty());
}

#[test]
fn rdeps_direct_and_transitive() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);
    let path = targets.to_str().expect("utf8");

    let direct = json_output(dsync_cmd(dir.path()).args(["rdeps", path, "C", "--json"]));
    assert_eq!(strings(&direct["dependents"]), vec!["B", "BB", "BBB"]);

    let impact =
        json_output(dsync_cmd(dir.path()).args(["rdeps", path, "CC", "--transitive", "--json"]));
    assert_eq!(strings(&impact["dependents"]), vec!["BB", "BBB", "A"]);
}

#[test]
fn rdeps_dangling_dependency_has_dependents() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);

    dsync_cmd(dir.path())
        .args(["rdeps", targets.to_str().expect("utf8"), "CCC", "--format", "text"])
        .assert()
        .success()
        .stdout("BBB\n");
}

#[test]
fn cycles_reports_members_and_path() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(
        dir.path(),
        r#"{"targets": {"a": {"deps": ["b"]}, "b": {"deps": ["c"]}, "c": {"deps": ["a"]}, "d": {"deps": ["d"]}}}"#,
    );

    let json = json_output(dsync_cmd(dir.path()).args([
        "cycles",
        targets.to_str().expect("utf8"),
        "--json",
    ]));
    let cycles = json["cycles"].as_array().expect("cycles array");
    assert_eq!(cycles.len(), 2);
    assert_eq!(strings(&cycles[0]["members"]), vec!["a", "b", "c"]);
    assert_eq!(strings(&cycles[0]["path"]), vec!["a", "b", "c", "a"]);
    assert_eq!(strings(&cycles[1]["path"]), vec!["d", "d"]);
}

#[test]
fn cycles_pretty_when_acyclic() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), DIAMOND);

    dsync_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["cycles", targets.to_str().expect("utf8")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cycles found."));
}

#[test]
fn invalid_target_document_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let targets = write_targets(dir.path(), r#"{"targets": [1, 2, 3]}"#);

    dsync_cmd(dir.path())
        .args(["cycles", targets.to_str().expect("utf8"), "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn missing_target_document_fails() {
    let dir = TempDir::new().expect("tempdir");

    dsync_cmd(dir.path())
        .args(["deps", "does-not-exist.json", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
