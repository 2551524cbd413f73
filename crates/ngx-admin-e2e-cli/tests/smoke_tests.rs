//! Smoke tests for the ngx-e2e binary
//!
//! Only commands that need neither Chromium nor a running application.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VARS: [&str; 7] = [
    "BASE_URL",
    "TEST_USER_EMAIL",
    "TEST_USER_PASSWORD",
    "TEST_DELETE_EMAIL",
    "TEST_EDIT_EMAIL",
    "TEST_AGE_FILTERS",
    "CI",
];

/// Command with the suite variables cleared, run where no `.env` exists
fn ngx_e2e(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ngx-e2e").expect("ngx-e2e binary should exist");
    cmd.current_dir(dir.path());
    for var in VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

/// [`ngx_e2e`] with a complete environment
fn configured(dir: &TempDir) -> Command {
    let mut cmd = ngx_e2e(dir);
    cmd.env("BASE_URL", "http://localhost:4200/")
        .env("TEST_USER_EMAIL", "qa@example.com")
        .env("TEST_USER_PASSWORD", "s3cret-pass")
        .env("TEST_DELETE_EMAIL", "mdo@gmail.com")
        .env("TEST_EDIT_EMAIL", "fat@yandex.ru")
        .env("TEST_AGE_FILTERS", "20, 30,,200");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("env"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_fails() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir).assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--retries"))
        .stdout(predicate::str::contains("--no-sandbox"))
        .stdout(predicate::str::contains("--fail-fast"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_shows_every_area() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("navigation/"))
        .stdout(predicate::str::contains("forms/"))
        .stdout(predicate::str::contains("modal-overlays/"))
        .stdout(predicate::str::contains("tables/"))
        .stdout(predicate::str::contains("iot-dashboard/"))
        .stdout(predicate::str::contains("theming/"))
        .stdout(predicate::str::contains("[skipped: "));
}

#[test]
fn test_list_filter() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .args(["list", "--filter", "THEMING/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theming/"))
        .stdout(predicate::str::contains("forms/").not());
}

#[test]
fn test_list_needs_no_environment() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .args(["list", "--filter", "no-such-scenario"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 scenarios"));
}

// ============================================================================
// env
// ============================================================================

#[test]
fn test_env_missing_variable_fails() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .arg("env")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Required environment variable BASE_URL is not defined",
        ));
}

#[test]
fn test_env_prints_masked_values() {
    let dir = TempDir::new().unwrap();
    configured(&dir)
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:4200"))
        .stdout(predicate::str::contains("mdo@gmail.com"))
        .stdout(predicate::str::contains("20, 30, 200"))
        .stdout(predicate::str::contains("s3cret-pass").not());
}

#[test]
fn test_env_reads_dotenv_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "BASE_URL=http://from-dotenv:4200\n\
         TEST_USER_EMAIL=qa@example.com\n\
         TEST_USER_PASSWORD=pw\n\
         TEST_DELETE_EMAIL=mdo@gmail.com\n\
         TEST_EDIT_EMAIL=fat@yandex.ru\n",
    )
    .unwrap();
    ngx_e2e(&dir)
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://from-dotenv:4200"));
}

#[test]
fn test_empty_variable_counts_as_missing() {
    let dir = TempDir::new().unwrap();
    configured(&dir)
        .arg("env")
        .env("TEST_EDIT_EMAIL", "")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("TEST_EDIT_EMAIL"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_without_environment_fails_before_launch() {
    let dir = TempDir::new().unwrap();
    ngx_e2e(&dir)
        .args(["run", "--no-sandbox"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("BASE_URL"));
}

#[test]
fn test_run_unmatched_filter_fails() {
    let dir = TempDir::new().unwrap();
    configured(&dir)
        .args(["run", "--filter", "no-such-scenario"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scenario matches"));
}
