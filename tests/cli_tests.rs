//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docsync"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("aggregating documentation"))
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_missing_config_error() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--config")
        .arg("nonexistent.yaml")
        .assert()
        .failure()
        .code(1) // Configuration error
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_default_config_path_is_used() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("./docsync.yaml"));
}

#[test]
fn test_invalid_yaml_syntax() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("docsync.yaml"),
        "repositories: [ { repo: acme/api, target: api\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Failed to parse YAML configuration"));
}

#[test]
fn test_schema_violation_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("docsync.yaml"),
        r#"
repositories:
  - repo: "acme/api"
    target: "api"
    tag: "v1"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration validation failed"))
        .stdout(predicate::str::contains("/repositories/0"));
}

#[test]
fn test_duplicate_targets_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("docsync.yaml"),
        r#"
repositories:
  - repo: "acme/api"
    target: "shared"
  - repo: "acme/guide"
    target: "./shared"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("both use target"));
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config_content = r#"
docsRoot: "site/docs"
workDir: "work"
repositories:
  - repo: "acme/api"
    target: "api"
    source: "docs"
  - repo: "acme/handbook"
    target: "handbook"
    branch: "stable"
"#;
    fs::write(temp_dir.path().join("docsync.yaml"), config_content).unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run preview"))
        .stdout(predicate::str::contains("https://github.com/acme/api.git"))
        .stdout(predicate::str::contains("stable"));

    assert!(!temp_dir.path().join("site").exists());
    assert!(!temp_dir.path().join("work").exists());
}

#[test]
fn test_dry_run_reports_skipped_targets() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("docs/api")).unwrap();
    fs::write(
        temp_dir.path().join("docsync.yaml"),
        r#"
repositories:
  - repo: "acme/api"
    target: "api"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn test_docs_root_override_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("docsync.yaml"),
        r#"
repositories:
  - repo: "acme/api"
    target: "api"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docsync").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("DOCSYNC_DOCS_ROOT", "elsewhere")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere/api"));
}
