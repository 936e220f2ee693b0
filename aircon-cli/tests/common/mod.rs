//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A schema that compiles cleanly.
#[allow(dead_code)]
pub const VALID_SCHEMA: &str = r"
sources:
  - id: remote
  - id: prefs
    writable: true
features:
  - name: Onboarding
    source: remote
    configs:
      - { key: ENABLED, type: boolean, default: { value: false } }
      - { key: ANOTHER_FLAG, type: boolean, default: { config: ENABLED } }
      - { key: MAX_TIMES_TO_SHOW, type: integer, min: 0, max: 10, range_fallback: clamp }
      - { key: MESSAGE, type: string, default: { resource: onboarding_message } }
      - { key: SEEN_COUNT, type: integer, source: prefs, mutable: true }
    groups:
      - key: MY_GROUP
        configs: [MAX_TIMES_TO_SHOW, MESSAGE]
";

/// A schema with a default cycle and a missing default.
#[allow(dead_code)]
pub const BROKEN_SCHEMA: &str = r"
sources: [{ id: remote }]
features:
  - name: Broken
    source: remote
    configs:
      - { key: A, type: boolean, default: { config: B } }
      - { key: B, type: boolean, default: { config: A } }
      - { key: HOMEPAGE, type: url }
";

/// Test environment with an isolated working and home directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Working directory for commands.
    pub work_dir: PathBuf,
    /// Stand-in home directory, so no real user settings leak in.
    pub home_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Creates the environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let work_dir = temp_dir.path().join("work");
        let home_dir = temp_dir.path().join("home");
        std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");
        std::fs::create_dir_all(&home_dir).expect("Failed to create home dir");
        Self {
            temp_dir,
            work_dir,
            home_dir,
        }
    }

    /// The aircon binary, run in the working directory with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("aircon").expect("Failed to find aircon binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", &self.home_dir)
            .env_remove("AIRCON_SETTINGS")
            .env_remove("AIRCON_OUTPUT_DIR")
            .env_remove("AIRCON_RUNTIME_PATH")
            .env_remove("AIRCON_EMIT_MOD_FILE")
            .env_remove("AIRCON_HEADER")
            .env_remove("AIRCON_LOG_MODE")
            .env_remove("AIRCON_OUTPUT_FORMAT");
        cmd
    }

    /// Writes a file under the working directory and returns its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Reads a file under the working directory.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.work_dir.join(name)).expect("Failed to read file")
    }

    /// Path under the working directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// The working directory.
    pub fn dir(&self) -> &Path {
        &self.work_dir
    }
}
