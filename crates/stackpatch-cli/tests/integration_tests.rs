//! End-to-end tests for the `stackpatch` binary.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LAYOUT: &str = r#"export default function RootLayout({
  children,
}: Readonly<{
  children: React.ReactNode;
}>) {
  return (
    <html lang="en">
      <body>{children}</body>
    </html>
  );
}
"#;

const PACKAGE_JSON: &str = r#"{
  "name": "site",
  "version": "0.1.0",
  "private": true,
  "dependencies": {
    "next": "15.1.0",
    "react": "19.0.0",
    "react-dom": "19.0.0"
  },
  "devDependencies": {
    "typescript": "^5"
  }
}
"#;

fn boilerplate() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../boilerplate")
}

/// A fresh app-router project plus an empty config file.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("site");
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("package.json"), PACKAGE_JSON).unwrap();
    fs::write(root.join("app/layout.tsx"), LAYOUT).unwrap();
    fs::write(
        root.join("tsconfig.json"),
        "{\n  \"compilerOptions\": {\n    \"paths\": { \"@/*\": [\"./*\"] }\n  }\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("empty.toml"), "").unwrap();
    dir
}

/// `stackpatch` isolated from the caller's environment and config.
fn stackpatch(dir: &TempDir) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("stackpatch");
    cmd.current_dir(dir.path())
        .env_remove("STACKPATCH_BOILERPLATE_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.path().join("empty.toml"));
    cmd
}

fn add_auth(dir: &TempDir) -> Command {
    let mut cmd = stackpatch(dir);
    cmd.args(["add", "auth", "site", "--yes", "--skip-install"])
        .args(["--session", "stateless", "--provider", "github"])
        .args(["--protect", "/", "--protect", "/stackpatch"])
        .arg("--boilerplate-dir")
        .arg(boilerplate());
    cmd
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(dir: &Path, root: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn help_lists_commands() {
    cargo::cargo_bin_cmd!("stackpatch")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("revert"))
        .stdout(predicate::str::contains("create"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("stackpatch")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn add_auth_writes_files_and_manifest() {
    let dir = project();
    add_auth(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("auth patch installed"))
        .stderr(predicate::str::contains("npm install better-auth sonner"));

    let root = dir.path().join("site");
    for file in [
        "lib/auth.ts",
        "lib/auth-client.ts",
        "app/api/auth/[...all]/route.ts",
        "middleware.ts",
        ".env.example",
        ".env.local",
        "app/auth/login/page.tsx",
        ".stackpatch/manifest.json",
    ] {
        assert!(root.join(file).is_file(), "{file} missing");
    }

    let auth = fs::read_to_string(root.join("lib/auth.ts")).unwrap();
    assert!(auth.contains("github"));
    assert!(!auth.contains("drizzle"));

    let layout = fs::read_to_string(root.join("app/layout.tsx")).unwrap();
    assert!(layout.contains("<AuthWrapper>"));
    assert!(layout.contains("<Toaster />"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join(".stackpatch/manifest.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["patchName"], "auth");
    assert_eq!(manifest["files"]["modified"][0]["path"], "app/layout.tsx");
    assert_eq!(manifest["files"]["modified"][0]["originalContent"], LAYOUT);
}

#[test]
fn add_then_revert_restores_the_project() {
    let dir = project();
    let root = dir.path().join("site");
    let before = snapshot(&root);

    add_auth(&dir).assert().success();
    assert_ne!(snapshot(&root), before);

    stackpatch(&dir)
        .args(["revert", "site", "--yes", "--boilerplate-dir"])
        .arg(boilerplate())
        .assert()
        .success()
        .stdout(predicate::str::contains("Revert complete"));

    assert_eq!(snapshot(&root), before);
    assert!(!root.join(".stackpatch").exists());
    assert!(!root.join("lib").exists());
}

#[test]
fn json_output_is_parseable() {
    let dir = project();
    let assert = add_auth(&dir).arg("--output-format").arg("json").assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["routeGuard"], "middleware.ts");
    assert!(
        outcome["manifest"]["files"]["added"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == "lib/auth.ts")
    );
}

#[test]
fn quiet_add_prints_nothing_on_stdout() {
    let dir = project();
    add_auth(&dir)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn revert_without_manifest_is_a_no_op() {
    let dir = project();
    let root = dir.path().join("site");
    let before = snapshot(&root);

    stackpatch(&dir)
        .args(["revert", "site", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to revert"));

    assert_eq!(snapshot(&root), before);
}

#[test]
fn no_ui_skips_boilerplate_and_layout() {
    let dir = project();
    let root = dir.path().join("site");
    stackpatch(&dir)
        .args(["add", "auth", "site", "--yes", "--skip-install", "--no-ui"])
        .arg("--boilerplate-dir")
        .arg(boilerplate())
        .assert()
        .success();

    assert!(root.join("lib/auth.ts").is_file());
    assert!(!root.join("app/auth").exists());
    assert_eq!(fs::read_to_string(root.join("app/layout.tsx")).unwrap(), LAYOUT);
}

#[test]
fn config_show_prints_toml() {
    let dir = project();
    stackpatch(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[install]"))
        .stdout(predicate::str::contains("skip_dependencies = false"));
}

#[test]
fn config_file_values_are_used() {
    let dir = project();
    fs::write(
        dir.path().join("empty.toml"),
        "[install]\npackage_manager = \"pnpm\"\n",
    )
    .unwrap();
    stackpatch(&dir)
        .args(["config", "get", "install.package_manager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pnpm"));
}

#[test]
fn config_package_manager_shapes_manual_command() {
    let dir = project();
    fs::write(
        dir.path().join("empty.toml"),
        "[install]\npackage_manager = \"pnpm\"\n",
    )
    .unwrap();
    add_auth(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("pnpm add better-auth sonner"));
}

#[test]
fn shell_completions() {
    cargo::cargo_bin_cmd!("stackpatch")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackpatch"));
}
