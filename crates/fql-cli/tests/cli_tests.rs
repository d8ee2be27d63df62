//! Integration tests for the `fql` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the decode, get,
//! encode, and response subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fql() -> Command {
    Command::cargo_bin("fql").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_stdin_to_stdout() {
    fql()
        .arg("decode")
        .write_stdin(r#"{"@ref":{"id":"101","class":{"@ref":{"id":"spells"}}}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"Ref(id="101", class=Ref(id="spells"))"#));
}

#[test]
fn decode_file_shows_special_values() {
    fql()
        .args(["decode", "-i", &fixture("instance.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timestamp(1970-01-01T00:05:00+00:00)"))
        .stdout(predicate::str::contains("Date(1970-01-03)"))
        .stdout(predicate::str::contains(r#""name": "Fire""#));
}

#[test]
fn decode_file_to_file() {
    let output = std::env::temp_dir().join("fql-test-decode-output.txt");
    let _ = std::fs::remove_file(&output);

    fql()
        .args(["decode", "-i", &fixture("instance.json"), "-o"])
        .arg(&output)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).expect("output file must exist");
    assert!(content.contains("Ref(id=\"101\""));
    let _ = std::fs::remove_file(&output);
}

#[test]
fn decode_invalid_json_fails() {
    fql()
        .arg("decode")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode wire JSON"));
}

#[test]
fn decode_top_level_scalar_fails() {
    fql()
        .arg("decode")
        .write_stdin("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported top-level JSON type"));
}

#[test]
fn decode_bad_timestamp_reports_fragment() {
    fql()
        .arg("decode")
        .write_stdin(r#"{"@ts":"yesterday"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timestamp: yesterday"));
}

#[test]
fn decode_missing_file_fails() {
    fql()
        .args(["decode", "-i", "/nonexistent/instance.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Get subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_nested_field() {
    fql()
        .args(["get", "-p", "data.items.1.name", "-i", &fixture("instance.json")])
        .assert()
        .success()
        .stdout("\"staff\"\n");
}

#[test]
fn get_integer_field() {
    fql()
        .args(["get", "-p", "data.cost", "-i", &fixture("instance.json")])
        .assert()
        .success()
        .stdout("10\n");
}

#[test]
fn get_missing_field_names_segment() {
    fql()
        .args(["get", "-p", "data.missing", "-i", &fixture("instance.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"segment "missing" not found at data"#));
}

#[test]
fn get_invalid_path_fails() {
    fql()
        .args(["get", "-p", "data..name", "-i", &fixture("instance.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse path"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_wraps_objects_in_request_form() {
    let output = fql()
        .arg("encode")
        .write_stdin(r#"{"data":{"ref":{"@ref":{"id":"1"}}},"n":1}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let actual: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected: serde_json::Value = serde_json::from_str(
        r#"{"object":{"data":{"object":{"ref":{"@ref":{"id":"1"}}}},"n":1}}"#,
    )
    .unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn encode_keeps_tagged_values() {
    fql()
        .arg("encode")
        .write_stdin(r#"[{"@ts":"1970-01-01T00:05:00Z"},{"@bytes":"AQID"}]"#)
        .assert()
        .success()
        .stdout(r#"[{"@ts":"1970-01-01T00:05:00.000Z"},{"@bytes":"AQID"}]"#);
}

#[test]
fn encode_pretty() {
    fql()
        .args(["encode", "--pretty"])
        .write_stdin(r#"[1,2]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("[\n  1,\n  2\n]"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Response subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn response_prints_resource() {
    fql()
        .args(["response", "-i", &fixture("response_ok.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "Ice""#));
}

#[test]
fn response_with_errors_fails() {
    fql()
        .args(["response", "-i", &fixture("response_err.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"))
        .stderr(predicate::str::contains("(at create)"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    fql()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("response"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    fql()
        .args(["--verbose", "decode"])
        .env_remove("RUST_LOG")
        .write_stdin(r#"{"@ref":{"id":"classes"}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"Ref(id="classes")"#))
        .stderr(predicate::str::contains("resolved native reference"));
}
