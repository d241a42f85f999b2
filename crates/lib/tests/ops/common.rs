//! Shared helpers for operation tests.

use std::path::PathBuf;

use cstore_lib::catalog::Catalog;
use cstore_lib::config::Settings;
use cstore_lib::options::UserOptions;
use cstore_lib::remote::Registry;
use tempfile::TempDir;

/// A project directory with its own data directory.
///
/// Each test gets a fresh catalog location and isolated stores and vaults.
pub struct Workspace {
  pub temp: TempDir,
  pub registry: Registry,
}

impl Workspace {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("project")).unwrap();
    let registry = Registry::bundled(Settings::rooted_at(&temp.path().join("data")));
    Self { temp, registry }
  }

  pub fn root(&self) -> PathBuf {
    self.temp.path().join("project")
  }

  pub fn path(&self, rel: &str) -> PathBuf {
    self.root().join(rel)
  }

  pub fn write(&self, rel: &str, content: &str) {
    let path = self.path(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
  }

  pub fn read(&self, rel: &str) -> String {
    std::fs::read_to_string(self.path(rel)).unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
  }

  pub fn exists(&self, rel: &str) -> bool {
    self.path(rel).exists()
  }

  pub fn remove(&self, rel: &str) {
    std::fs::remove_file(self.path(rel)).unwrap();
  }

  pub fn catalog(&self) -> Catalog {
    Catalog::load(&self.path("cstore.yml")).unwrap().unwrap()
  }

  /// Location of the `file` store's current blob for `path`.
  pub fn blob(&self, path: &str) -> PathBuf {
    let catalog = self.catalog();
    let entry = catalog.get(path).unwrap();
    self
      .registry
      .settings()
      .store_dir
      .join(&catalog.context)
      .join(entry.key())
      .join("current")
  }
}

/// Options selecting `paths`.
pub fn paths(paths: &[&str]) -> UserOptions {
  UserOptions {
    paths: paths.iter().map(|p| p.to_string()).collect(),
    ..Default::default()
  }
}
