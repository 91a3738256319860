//! CLI binary integration tests.
//!
//! These tests exercise the compiled `burnlink` binary to verify that
//! top-level command routing, help text, and the create/redeem flow work
//! end to end against a throwaway SQLite database.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Locate the compiled `burnlink` binary in the workspace target directory.
///
/// Returns `None` when the binary has not been built (e.g. when only this
/// package was compiled), in which case the test is skipped.
fn burnlink_bin() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir.parent()?.parent()?;
    let bin = workspace_root.join("target").join("debug").join("burnlink");
    if bin.exists() {
        Some(bin)
    } else {
        eprintln!(
            "burnlink binary not found at {}; run `cargo build -p burnlink-cli` first",
            bin.display()
        );
        None
    }
}

/// A command isolated from the user's home and environment overrides.
fn burnlink_cmd(bin: &Path, home: &Path) -> Command {
    let mut cmd = Command::new(bin);
    cmd.env("BURNLINK_HOME", home)
        .env_remove("BURNLINK_CONFIG")
        .env_remove("BURNLINK_DATABASE")
        .env_remove("BURNLINK_TTL_SECS")
        .env_remove("BURNLINK_REAPER_INTERVAL_SECS")
        .env_remove("BURNLINK_BASE_URL");
    cmd
}

#[test]
fn test_cli_version() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();
    let output = burnlink_cmd(&bin, home.path())
        .arg("version")
        .output()
        .expect("failed to run burnlink");
    assert!(output.status.success(), "version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("burnlink"),
        "version output should contain 'burnlink', got: {}",
        stdout
    );
}

#[test]
fn test_cli_help() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();
    let output = burnlink_cmd(&bin, home.path())
        .arg("--help")
        .output()
        .expect("failed to run burnlink");
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["create", "redeem", "sweep"] {
        assert!(
            stdout.contains(command),
            "help output should mention '{}', got: {}",
            command,
            stdout
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();
    let output = burnlink_cmd(&bin, home.path())
        .arg("nonexistent-command")
        .output()
        .expect("failed to run burnlink");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_cli_create_then_redeem_once() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();

    let mut child = burnlink_cmd(&bin, home.path())
        .args(["create", "--stdin", "--base-url", "https://burn.example/s/"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run burnlink create");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"correct horse battery staple")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "create should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let link = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert!(link.starts_with("https://burn.example/s/"), "got: {}", link);

    let output = burnlink_cmd(&bin, home.path())
        .args(["redeem", &link])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"correct horse battery staple");

    let output = burnlink_cmd(&bin, home.path())
        .args(["redeem", &link])
        .output()
        .unwrap();
    assert!(!output.status.success(), "second redeem must fail");
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "got: {}", stderr);
}

#[test]
fn test_cli_status_json() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();
    let output = burnlink_cmd(&bin, home.path())
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["backend"], "sqlite");
    assert_eq!(status["live_shares"], 0);
    assert_eq!(status["ttl_secs"], 7200);
}

#[test]
fn test_cli_config_path_honours_home() {
    let Some(bin) = burnlink_bin() else { return };
    let home = TempDir::new().unwrap();
    let output = burnlink_cmd(&bin, home.path())
        .args(["config", "path"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.trim().starts_with(&*home.path().to_string_lossy()),
        "got: {}",
        stdout
    );
}
