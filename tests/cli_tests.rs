//! Binary-level tests for the teamctl CLI surface.
//!
//! These only exercise parsing, help output, and the error path for an
//! unreachable cluster; anything touching a live store is covered by the
//! unit tests against the in-memory store.

use assert_cmd::Command;
use predicates::prelude::*;

fn teamctl() -> Command {
    Command::cargo_bin("teamctl").unwrap()
}

#[test]
fn test_cli_help() {
    teamctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("teamctl"));
}

#[test]
fn test_delete_quickstartlocation_help() {
    teamctl()
        .args(["delete", "quickstartlocation", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Delete a quickstart location from the team settings",
        ));
}

#[test]
fn test_delete_alias_qsloc() {
    teamctl()
        .args(["delete", "qsloc", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--owner"));
}

#[test]
fn test_create_quickstartlocation_help() {
    teamctl()
        .args(["create", "quickstartlocation", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Add a quickstart location to the team settings",
        ));
}

#[test]
fn test_get_quickstartlocations_help() {
    teamctl()
        .args(["get", "quickstartlocations", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "List the quickstart locations configured for the team",
        ));
}

#[test]
fn test_completion_bash() {
    teamctl()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("teamctl"));
}

#[test]
fn test_unreachable_cluster_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    // Port 1 is never listening; the command should surface the client
    // error and exit non-zero.
    teamctl()
        .env("TEAMCTL_SERVER", "http://127.0.0.1:1")
        .env("TEAMCTL_CONFIG", dir.path().join("config.json"))
        .env_remove("TEAMCTL_TOKEN")
        .env_remove("TEAMCTL_TOKEN_FILE")
        .args(["get", "quickstartlocations"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
