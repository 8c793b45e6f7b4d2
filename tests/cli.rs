//! CLI integration tests for the lazy-openai binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Build a command for the binary with an isolated config dir and no inherited key
fn lazy_openai_cmd(config_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("lazy-openai");
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(config_dir);
    cmd
}

#[test]
fn test_check_with_env_key() {
    let dir = TempDir::new().unwrap();

    lazy_openai_cmd(dir.path())
        .env("OPENAI_API_KEY", "test-api-key-123")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: https://api.openai.com/v1"));
}

#[test]
fn test_check_without_key_fails() {
    let dir = TempDir::new().unwrap();

    lazy_openai_cmd(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Environment variable OPENAI_API_KEY must be set",
        ));
}

#[test]
fn test_check_with_key_from_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("lazy-openai.toml"),
        "api_key = \"explicit-test-key\"\n",
    )
    .unwrap();

    lazy_openai_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: https://api.openai.com/v1"));
}

#[test]
fn test_missing_config_dir_is_reported() {
    let dir = TempDir::new().unwrap();

    lazy_openai_cmd(&dir.path().join("typo"))
        .env("OPENAI_API_KEY", "test-api-key-123")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_chat_without_key_fails() {
    let dir = TempDir::new().unwrap();

    lazy_openai_cmd(dir.path())
        .args(["chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Environment variable OPENAI_API_KEY must be set",
        ));
}
