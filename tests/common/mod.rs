#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub fn kvnotes_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kvnotes").unwrap();
    cmd.env_remove("KVNOTES_ROOT");
    cmd.env_remove("KVNOTES_BACKEND");
    cmd.env_remove("KVNOTES_LOG");
    cmd.env_remove("REDIS_URL");
    cmd
}

/// Temp directory initialized as a file-backed workspace
pub fn file_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    kvnotes_cmd()
        .arg("init")
        .arg(temp.path())
        .arg("--backend")
        .arg("file")
        .assert()
        .success();
    temp
}

/// Run `kvnotes <args>` in `dir`, expect success, and return stdout
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = kvnotes_cmd().current_dir(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "kvnotes {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Create a note and return its id (parsed from "Created note <id>")
pub fn add_note(dir: &Path, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let stdout = run_ok(dir, &full);
    stdout
        .trim()
        .strip_prefix("Created note ")
        .unwrap_or_else(|| panic!("Unexpected add output: {}", stdout))
        .to_string()
}
