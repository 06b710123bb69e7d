// ABOUTME: Integration tests for the caravel CLI commands.
// ABOUTME: Validates --help output and init command behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn caravel_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("caravel"))
}

#[test]
fn help_shows_commands() {
    caravel_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("caravel.yml");

    caravel_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "caravel.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(
        content.contains("repository:"),
        "Config should have repository field"
    );
    assert!(content.contains("source:"), "Config should have source field");
}

#[test]
fn init_accepts_service_and_repository() {
    let temp_dir = tempfile::tempdir().unwrap();

    caravel_cmd()
        .current_dir(temp_dir.path())
        .args([
            "init",
            "--service",
            "estate-genius",
            "--repository",
            "estate-genius-ai",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("caravel.yml")).unwrap();
    assert!(content.contains("service: estate-genius"));
    assert!(content.contains("repository: estate-genius-ai"));
}

#[test]
fn init_rejects_invalid_service_name() {
    let temp_dir = tempfile::tempdir().unwrap();

    caravel_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--service", "Bad Name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("caravel.yml");

    fs::write(&config_path, "existing: config").unwrap();

    caravel_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("caravel.yml");

    fs::write(&config_path, "existing: config").unwrap();

    caravel_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("service:"));
}

#[test]
fn deploy_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    caravel_cmd()
        .current_dir(temp_dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
