//! Integration tests for the `init` command.

use tempfile::TempDir;

mod common;
use common::run_querydeck_in_dir;

#[test]
fn init_creates_layout() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_querydeck_in_dir(temp_dir.path(), &["init", "--quiet"]);
    assert!(output.status.success(), "Init command should succeed");
    assert!(output.stdout.is_empty(), "--quiet prints nothing");

    let dir = temp_dir.path().join(".querydeck");
    assert!(dir.is_dir());
    assert!(dir.join("queries.jsonl").is_file());

    let config = std::fs::read_to_string(dir.join("config.yaml")).unwrap();
    assert!(config.contains("id-prefix: q"));
    assert!(config.contains("backend: jsonl"));
}

#[test]
fn init_reports_paths() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_querydeck_in_dir(temp_dir.path(), &["init", "--prefix", "dash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initialized querydeck"));
    assert!(stdout.contains("ID prefix: dash"));
}

#[test]
fn init_twice_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run_querydeck_in_dir(temp_dir.path(), &["init", "-q"]).status.success());

    let output = run_querydeck_in_dir(temp_dir.path(), &["init", "-q"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already initialized"));
}

#[test]
fn init_rejects_bad_prefix() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_querydeck_in_dir(temp_dir.path(), &["init", "--prefix", "my-app"]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join(".querydeck").exists());
}

#[test]
fn commands_work_from_subdirectory() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run_querydeck_in_dir(temp_dir.path(), &["init", "-q"]).status.success());

    let nested = temp_dir.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();

    let output = run_querydeck_in_dir(&nested, &["list"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No saved queries."));
}
