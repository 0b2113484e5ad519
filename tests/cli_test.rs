//
//  fryends-client
//  tests/cli_test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Binary smoke tests. None of these reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fryends(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fryends").unwrap();
    cmd.env("FRYENDS_CONFIG", dir.path().join("config.toml"))
        .env_remove("FRYENDS_ENV")
        .env_remove("FRYENDS_BASE_URL")
        .env_remove("FRYENDS_LOG");
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fryends version "));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillr"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn test_completion_bash() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fryends"));
}

#[test]
fn test_config_path_honours_override() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join("config.toml").display().to_string();
    fryends(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["config", "set", "environment", "staging"])
        .assert()
        .success();

    fryends(&dir)
        .args(["config", "get", "environment"])
        .assert()
        .success()
        .stdout("staging\n");

    assert!(dir.path().join("config.toml").is_file());
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_rejects_bad_value() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["config", "set", "environment", "moon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown environment"));
}

#[test]
fn test_auth_status_logged_out() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["auth", "status", "--ephemeral"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_auth_status_json() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["auth", "status", "--ephemeral", "--json", "--env", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"logged_in\": false"))
        .stdout(predicate::str::contains("api-production.fryends.com"));
}

#[test]
fn test_auth_token_requires_login() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["auth", "token", "--ephemeral"])
        .assert()
        .code(4);
}

#[test]
fn test_favourites_require_login() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["skillr", "list", "--favourites", "--ephemeral"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("fryends auth login"));
}

#[test]
fn test_upload_needs_known_kind() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "hello").unwrap();

    fryends(&dir)
        .args(["upload", "https://bucket.example.com/key"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--kind"));
}

#[test]
fn test_invalid_environment_is_usage_error() {
    let dir = TempDir::new().unwrap();
    fryends(&dir)
        .args(["auth", "status", "--env", "moon"])
        .assert()
        .code(2);
}
