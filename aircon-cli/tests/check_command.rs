//! Tests for `aircon check`.

mod common;

use common::{TestEnv, BROKEN_SCHEMA, VALID_SCHEMA};
use predicates::prelude::*;

#[test]
fn test_check_valid_schema() {
    let env = TestEnv::new();
    env.write("schema.yaml", VALID_SCHEMA);

    env.command()
        .args(["check", "schema.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 5 config(s) in 2 group(s)"));
    assert!(!env.path("generated").exists());
}

#[test]
fn test_check_reports_every_diagnostic() {
    let env = TestEnv::new();
    env.write("schema.yaml", BROKEN_SCHEMA);

    let output = env.command().args(["check", "schema.yaml"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("error[cyclic-default] features[0].configs[0] (A, B)"));
    assert!(lines[1].starts_with("error[missing-default] features[0].configs[2] (HOMEPAGE)"));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("schema check failed with 2 error(s)"));
}

#[test]
fn test_check_json_output() {
    let env = TestEnv::new();
    env.write("schema.yaml", BROKEN_SCHEMA);

    let output = env
        .command()
        .args(["check", "schema.yaml", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let diagnostics: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let diagnostics = diagnostics.as_array().unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0]["kind"], "cyclic-default");
    assert_eq!(diagnostics[0]["keys"], serde_json::json!(["A", "B"]));
    assert_eq!(diagnostics[1]["kind"], "missing-default");
}

#[test]
fn test_check_json_clean() {
    let env = TestEnv::new();
    env.write("schema.yaml", VALID_SCHEMA);

    env.command()
        .args(["check", "schema.yaml", "--format", "json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_check_duplicate_key_fails_fast() {
    let env = TestEnv::new();
    env.write(
        "schema.yaml",
        r"
sources: [{ id: remote }]
features:
  - name: F
    source: remote
    configs:
      - { key: A, type: boolean }
      - { key: A, type: nonsense }
",
    );

    env.command()
        .args(["check", "schema.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[duplicate-key]"))
        .stdout(predicate::str::contains("unknown-type").not());
}

#[test]
fn test_check_missing_file() {
    let env = TestEnv::new();
    env.command()
        .args(["check", "nope.yaml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("schema file not found"));
}

#[test]
fn test_check_multiple_files() {
    let env = TestEnv::new();
    env.write("sources.yaml", "sources: [{ id: remote }]\n");
    env.write(
        "features.yaml",
        "features: [{ name: Flags, source: remote, configs: [{ key: ON, type: boolean }] }]\n",
    );

    env.command()
        .args(["check", "sources.yaml", "features.yaml"])
        .assert()
        .success();
    env.command()
        .args(["check", "features.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unknown-source"));
}
