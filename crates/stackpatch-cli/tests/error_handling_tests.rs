//! Exit codes and suggestions for failing invocations.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn boilerplate() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../boilerplate")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.toml"), "").unwrap();
    dir
}

fn stackpatch(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("stackpatch");
    cmd.current_dir(dir.path())
        .env_remove("STACKPATCH_BOILERPLATE_DIR")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.path().join("empty.toml"));
    cmd
}

#[test]
fn unknown_patch_exits_with_user_error() {
    let dir = workspace();
    stackpatch(&dir)
        .args(["add", "payments", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown patch 'payments'"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn missing_package_json_is_a_configuration_error() {
    let dir = workspace();
    fs::create_dir(dir.path().join("empty")).unwrap();
    stackpatch(&dir)
        .args(["add", "auth", "empty", "--yes", "--skip-install", "--boilerplate-dir"])
        .arg(boilerplate())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No package.json"));

    assert_eq!(fs::read_dir(dir.path().join("empty")).unwrap().count(), 0);
}

#[test]
fn missing_boilerplate_is_not_found() {
    let dir = workspace();
    stackpatch(&dir)
        .args(["add", "auth", ".", "--yes", "--boilerplate-dir"])
        .arg(dir.path().join("nowhere"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Boilerplate not found"));
}

#[test]
fn declined_conflict_leaves_project_untouched() {
    let dir = workspace();
    let root = dir.path().join("site");
    fs::create_dir_all(root.join("app/auth/login")).unwrap();
    fs::write(
        root.join("package.json"),
        r#"{"dependencies":{"next":"15.1.0","react":"19.0.0"}}"#,
    )
    .unwrap();
    fs::write(root.join("app/auth/login/page.tsx"), "export default function Mine() {}\n").unwrap();

    // Without --yes and without a terminal, conflicts are declined.
    stackpatch(&dir)
        .args(["add", "auth", "site", "--skip-install", "--provider", "github"])
        .arg("--boilerplate-dir")
        .arg(boilerplate())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("would be overwritten"));

    assert_eq!(
        fs::read_to_string(root.join("app/auth/login/page.tsx")).unwrap(),
        "export default function Mine() {}\n"
    );
    assert!(!root.join(".stackpatch").exists());
    assert!(!root.join("lib").exists());
}

#[test]
fn invalid_route_is_rejected_before_writing() {
    let dir = workspace();
    let root = dir.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("package.json"), r#"{"dependencies":{"next":"16.0.0"}}"#).unwrap();

    stackpatch(&dir)
        .args(["add", "auth", "site", "--yes", "--skip-install", "--protect", "dashboard"])
        .arg("--boilerplate-dir")
        .arg(boilerplate())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid protected route"));

    assert!(!root.join(".stackpatch").exists());
}

#[test]
fn create_without_name_off_terminal_fails() {
    let dir = workspace();
    stackpatch(&dir)
        .arg("create")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project name is required"));
}

#[test]
fn create_rejects_bad_names() {
    let dir = workspace();
    stackpatch(&dir)
        .args(["create", "My App"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project name"));
}

#[test]
fn unreadable_config_file_is_a_configuration_error() {
    let dir = workspace();
    fs::write(dir.path().join("empty.toml"), "[install\nbroken").unwrap();
    stackpatch(&dir)
        .args(["config", "show"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_config_key() {
    let dir = workspace();
    stackpatch(&dir)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn bad_flag_value_is_a_usage_error() {
    let dir = workspace();
    stackpatch(&dir)
        .args(["add", "auth", "--session", "forever"])
        .assert()
        .code(2);
}
