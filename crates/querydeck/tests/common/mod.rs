//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Schema for a `GameScore` class used by the CLI tests.
pub const GAME_SCORE_SCHEMA: &str = r#"{
  "results": [
    {
      "className": "GameScore",
      "fields": {
        "objectId": { "type": "String" },
        "playerName": { "type": "String" },
        "score": { "type": "Number" },
        "player": { "type": "Pointer", "targetClass": "_User" }
      }
    },
    { "className": "_User", "fields": { "username": { "type": "String" } } }
  ]
}"#;

/// Run the querydeck binary in `dir`.
///
/// Colors are disabled so assertions can match plain text.
pub fn run_querydeck_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_querydeck"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute querydeck binary")
}

/// Run the querydeck binary in `dir`, feeding `stdin` to it.
pub fn run_querydeck_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_querydeck"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn querydeck binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for querydeck")
}

/// Save a query through the CLI and return its ID.
pub fn save_query(dir: &Path, constraint: &str, key: &str) -> String {
    let output = run_querydeck_in_dir(
        dir,
        &["--json", "save", "--constraint", constraint, "--key", key],
    );
    assert!(
        output.status.success(),
        "save failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("save prints JSON");
    json["id"].as_str().expect("saved query has an id").to_string()
}

/// Write the `GameScore` schema into `dir` and return its file name.
pub fn write_schema(dir: &Path) -> &'static str {
    std::fs::write(dir.join("schema.json"), GAME_SCORE_SCHEMA).expect("write schema");
    "schema.json"
}
