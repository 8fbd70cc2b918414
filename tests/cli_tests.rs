//! Binary smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("trackmux")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("remux"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn test_inspect_requires_a_file() {
    Command::cargo_bin("trackmux")
        .unwrap()
        .arg("inspect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<FILE>"));
}

#[test]
fn test_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("trackmux")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("TRACKMUX_CONFIG")
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["verify", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory does not exist"));
}

#[test]
fn test_plex_without_token_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("trackmux")
        .unwrap()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("TRACKMUX_CONFIG")
        .env("TRACKMUX_METADATA_PROVIDER", "plex")
        .env_remove("PLEX_ACCESS_TOKEN")
        .args(["verify", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("token"));
}
