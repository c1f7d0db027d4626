//! End-to-end tests for the benchskip binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SKIP_LIST: &str = r#"
gemm:
  - triton_tma_persistent_matmul
ragged_attention:
"#;

fn fixture(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("skip_tests_h100_pytorch.yaml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn benchskip() -> Command {
    Command::cargo_bin("benchskip").unwrap()
}

#[test]
fn test_check_active_implementation() {
    let (_dir, path) = fixture(SKIP_LIST);
    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "gemm", "other_impl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active: gemm/other_impl (partial)"));
}

#[test]
fn test_check_excluded_implementation() {
    let (_dir, path) = fixture(SKIP_LIST);
    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "gemm", "triton_tma_persistent_matmul"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("excluded: gemm/triton_tma_persistent_matmul"));
}

#[test]
fn test_check_operator_only() {
    let (_dir, path) = fixture(SKIP_LIST);

    // Partially excluded operator still runs
    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "gemm"])
        .assert()
        .success();

    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "ragged_attention"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("(entire)"));

    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "unknown_op", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not_excluded"));
}

#[test]
fn test_check_json() {
    let (_dir, path) = fixture(SKIP_LIST);
    let output = benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "ragged_attention", "anything", "--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["operator"], "ragged_attention");
    assert_eq!(report["implementation"], "anything");
    assert_eq!(report["status"], "entire");
    assert_eq!(report["active"], false);
}

#[test]
fn test_list_text() {
    let (_dir, path) = fixture(SKIP_LIST);
    benchskip()
        .arg("-f")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemm\n  - triton_tma_persistent_matmul"))
        .stdout(predicate::str::contains("ragged_attention (entire operator)"));
}

#[test]
fn test_list_json() {
    let (_dir, path) = fixture(SKIP_LIST);
    let output = benchskip()
        .arg("-f")
        .arg(&path)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        listing["gemm"],
        serde_json::json!(["triton_tma_persistent_matmul"])
    );
    assert!(listing["ragged_attention"].is_null());
}

#[test]
fn test_validate_reports_counts() {
    let (_dir, path) = fixture(SKIP_LIST);
    benchskip()
        .arg("-f")
        .arg(&path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 2 operators (1 entire, 1 partial)"));
}

#[test]
fn test_validate_rejects_sequence_root() {
    let (_dir, path) = fixture("- gemm\n- softmax\n");
    benchskip()
        .arg("-f")
        .arg(&path)
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed skip list"))
        .stderr(predicate::str::contains("sequence"));
}

#[test]
fn test_malformed_list_blocks_check() {
    let (_dir, path) = fixture("gemm:\n  - impl: nested\n");
    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "softmax", "triton_softmax"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_duplicate_operator_warns() {
    let (_dir, path) = fixture("gemm:\n  - a\ngemm:\n  - b\n");
    benchskip()
        .arg("-f")
        .arg(&path)
        .args(["check", "gemm", "a"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Operator listed more than once"));
}

#[test]
fn test_duplicate_operator_strict() {
    let (_dir, path) = fixture("gemm:\n  - a\ngemm:\n  - b\n");
    benchskip()
        .arg("--strict")
        .arg("-f")
        .arg(&path)
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate operator 'gemm'"));
}

#[test]
fn test_fmt_output_reloads() {
    let (dir, path) = fixture("softmax:\ngemm:\n  - z_impl\n  - a_impl\n");
    let output = benchskip()
        .arg("-f")
        .arg(&path)
        .arg("fmt")
        .output()
        .unwrap();
    assert!(output.status.success());

    let formatted = String::from_utf8(output.stdout).unwrap();
    assert!(formatted.find("gemm:").unwrap() < formatted.find("softmax:").unwrap());

    let reformatted = dir.path().join("formatted.yaml");
    fs::write(&reformatted, &formatted).unwrap();
    benchskip()
        .arg("-f")
        .arg(&reformatted)
        .arg("fmt")
        .assert()
        .success()
        .stdout(predicate::str::diff(formatted));
}

#[test]
fn test_mode_through_config() {
    let (dir, _path) = fixture(SKIP_LIST);
    let config = dir.path().join("benchskip.toml");
    fs::write(&config, "skip_dir = \".\"\n").unwrap();

    benchskip()
        .arg("-c")
        .arg(&config)
        .args(["-m", "h100_pytorch", "check", "ragged_attention"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_mode_file() {
    let (dir, _path) = fixture(SKIP_LIST);
    let config = dir.path().join("benchskip.toml");
    fs::write(&config, "skip_dir = \".\"\n").unwrap();

    benchskip()
        .arg("-c")
        .arg(&config)
        .args(["-m", "b200_triton_main", "validate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("b200_triton_main"));
}

#[test]
fn test_no_mode_and_no_default() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("benchskip.toml");
    fs::write(&config, "").unwrap();

    benchskip()
        .arg("-c")
        .arg(&config)
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No run mode given"));
}
