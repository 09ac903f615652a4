//! Shared E2E test helpers for `rolebind` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables that would leak host settings into a test run.
const HOST_VARS: &[&str] = &[
    "ROLEBIND_DEBUG",
    "ROLEBIND_STATE_FILE",
    "ROLEBIND_DIRECTORY_FILE",
    "ROLEBIND_LOG_LEVEL",
    "ROLEBIND_PRUNE_LOCKS",
    "RUST_LOG",
];

/// An isolated workspace: directory file, state file and config root in
/// one temp dir. Keep it alive for the test's duration.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    /// Creates a workspace whose directory knows the given users and groups.
    pub fn new(users: &[&str], groups: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir for workspace");
        let directory = serde_json::json!({ "users": users, "groups": groups });
        std::fs::write(
            dir.path().join("directory.json"),
            serde_json::to_string_pretty(&directory).expect("serialize directory"),
        )
        .expect("write directory file");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_file(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    /// A `rolebind` command wired to this workspace's files.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("rolebind");
        cmd.timeout(TIMEOUT_BASIC);
        for var in HOST_VARS {
            cmd.env_remove(var);
        }
        let path = |p: PathBuf| p.to_str().expect("valid utf8").to_string();
        cmd.args([
            "-C".to_string(),
            path(self.dir.path().to_path_buf()),
            "--config".to_string(),
            path(self.dir.path().join("absent.toml")),
            "--state-file".to_string(),
            path(self.state_file()),
            "--directory-file".to_string(),
            path(self.dir.path().join("directory.json")),
        ]);
        cmd
    }
}
