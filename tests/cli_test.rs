#![allow(deprecated)]

/// Binary-level tests for the `solace` command
///
/// These run the real binary against a throwaway sled store so nothing
/// touches the user's data directory, and never need a backend.
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;

fn solace(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("solace").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(store.path().join("missing.yaml"))
        .arg("--storage-path")
        .arg(store.path().join("store"));
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("solace").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("solace"));
}

#[test]
fn test_sessions_list_empty_store() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved conversations found."));
}

#[test]
fn test_sessions_new_prints_base36_id() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .args(["sessions", "new"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-z]{12,}\n$").unwrap());
}

#[test]
fn test_sessions_show_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .args(["sessions", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found: session nope"));
}

#[test]
fn test_whoami_without_token() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_invalid_base_url_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file("api:\n  base_url: ftp://example.org\n");

    let mut cmd = Command::cargo_bin("solace").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .arg("--storage-path")
        .arg(tmp.path().join("store"))
        .args(["sessions", "list"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must use http or https"));
}

#[test]
fn test_zero_timeout_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_config_dir, config_path) = common::temp_config_file("api:\n  timeout_seconds: 0\n");

    let mut cmd = Command::cargo_bin("solace").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .arg("--storage-path")
        .arg(tmp.path().join("store"))
        .args(["sessions", "list"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_admin_add_user_is_rejected_before_request() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .args(["admin", "users", "add", r#"{"username":"x"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be added"));
}

#[test]
fn test_update_profile_requires_login() {
    let tmp = TempDir::new().unwrap();
    solace(&tmp)
        .args(["update-profile", r#"{"email":"amy@example.org"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication error"));
}
