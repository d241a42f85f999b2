//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own project directory plus private data and config
/// directories, so stores, vaults and pull records never leak between tests.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    Self { temp }
  }

  /// Directory the commands run in.
  pub fn project_path(&self) -> PathBuf {
    let p = self.temp.path().join("project");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Data path for stores, the file vault and pull records.
  pub fn data_path(&self) -> PathBuf {
    let p = self.temp.path().join("data");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn config_path(&self) -> PathBuf {
    let p = self.temp.path().join("config");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.project_path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.project_path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  pub fn remove_file(&self, relative_path: &str) {
    std::fs::remove_file(self.project_path().join(relative_path)).unwrap();
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.project_path().join(relative_path).exists()
  }

  /// Get a pre-configured Command for the cstore binary.
  ///
  /// Runs in the project directory and sets:
  /// - `XDG_DATA_HOME`: Isolated data path
  /// - `XDG_CONFIG_HOME`: Isolated config path
  /// - `APPDATA`: Isolated data path (for Windows)
  pub fn cstore_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("cstore");
    cmd.current_dir(self.project_path());
    cmd.env("XDG_DATA_HOME", self.data_path());
    cmd.env("XDG_CONFIG_HOME", self.config_path());
    cmd.env("APPDATA", self.data_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
