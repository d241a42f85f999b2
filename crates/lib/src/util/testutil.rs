//! Back-end doubles for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::store::{Attributes, Feature, Store, StoreError};
use crate::vault::{Vault, VaultError};

/// A vault whose pre-flight always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingVault;

impl Vault for FailingVault {
  fn name(&self) -> &'static str {
    "failing"
  }

  fn description(&self) -> &'static str {
    "always refuses access"
  }

  fn pre(
    &mut self,
    _catalog: &Catalog,
    _entry: &mut FileEntry,
    _access: Option<&dyn Vault>,
    _options: &UserOptions,
    _prompt: &mut dyn Prompt,
  ) -> Result<(), VaultError> {
    Err(VaultError::Access("no credentials".to_string()))
  }

  fn get(&self, _context: &str, group: &str, prop: &str) -> Result<String, VaultError> {
    Err(VaultError::NotFound(format!("{}/{}", group, prop)))
  }

  fn set(&mut self, _context: &str, _group: &str, _prop: &str, _value: &str) -> Result<(), VaultError> {
    Err(VaultError::Access("no credentials".to_string()))
  }

  fn delete(&mut self, _context: &str, _group: &str, _prop: &str) -> Result<(), VaultError> {
    Err(VaultError::Access("no credentials".to_string()))
  }

  fn build_key(&self, _context: &str, group: &str, prop: &str) -> String {
    format!("{}/{}", group, prop)
  }
}

/// Shared blob map behind [`MemoryStore`]; keys are `context/entry-key/label`.
pub type Blobs = Rc<RefCell<BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>>;

/// An in-memory versioned store.
///
/// Purging a version listed in `failing_versions` fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  pub blobs: Blobs,
  pub failing_versions: Vec<String>,
  context: String,
}

impl MemoryStore {
  pub fn new(blobs: Blobs) -> Self {
    Self {
      blobs,
      ..Default::default()
    }
  }

  fn blob_key(&self, entry: &FileEntry, version: Option<&str>) -> String {
    format!("{}/{}/{}", self.context, entry.key(), version.unwrap_or("current"))
  }
}

impl Store for MemoryStore {
  fn name(&self) -> &'static str {
    "memory"
  }

  fn description(&self) -> &'static str {
    "in-memory blobs"
  }

  fn supports_feature(&self, feature: Feature) -> bool {
    feature == Feature::Versioning
  }

  fn supports_file_type(&self, _file_type: &str) -> bool {
    true
  }

  fn pre(
    &mut self,
    catalog: &Catalog,
    _entry: &mut FileEntry,
    _access: &dyn Vault,
    _options: &UserOptions,
    _prompt: &mut dyn Prompt,
  ) -> Result<(), StoreError> {
    self.context = catalog.context.clone();
    Ok(())
  }

  fn push(&mut self, entry: &mut FileEntry, bytes: &[u8], version: Option<&str>) -> Result<(), StoreError> {
    if bytes.is_empty() {
      return Err(StoreError::EmptyInput);
    }
    let key = self.blob_key(entry, version);
    self.blobs.borrow_mut().insert(key, (bytes.to_vec(), Utc::now()));
    Ok(())
  }

  fn pull(&mut self, entry: &FileEntry, version: Option<&str>) -> Result<(Vec<u8>, Attributes), StoreError> {
    let key = self.blob_key(entry, version);
    match self.blobs.borrow().get(&key) {
      Some((bytes, at)) => Ok((
        bytes.clone(),
        Attributes {
          last_modified: Some(*at),
        },
      )),
      None => Err(StoreError::NotFound(key)),
    }
  }

  fn purge(&mut self, entry: &mut FileEntry, version: Option<&str>) -> Result<(), StoreError> {
    if let Some(version) = version
      && self.failing_versions.iter().any(|v| v == version)
    {
      return Err(StoreError::Remote(format!("cannot purge {}", version)));
    }
    let key = self.blob_key(entry, version);
    self.blobs.borrow_mut().remove(&key);
    Ok(())
  }

  fn changed(
    &mut self,
    entry: &FileEntry,
    _bytes: &[u8],
    version: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>, StoreError> {
    let key = self.blob_key(entry, version);
    Ok(self.blobs.borrow().get(&key).map(|(_, at)| *at))
  }
}

/// A project directory plus an isolated data directory for the bundled
/// back-ends.
pub struct Project {
  temp: tempfile::TempDir,
}

impl Project {
  pub fn new() -> Self {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("project")).unwrap();
    Self { temp }
  }

  pub fn root(&self) -> std::path::PathBuf {
    self.temp.path().join("project")
  }

  pub fn data_dir(&self) -> std::path::PathBuf {
    self.temp.path().join("data")
  }

  pub fn registry(&self) -> crate::remote::Registry {
    crate::remote::Registry::bundled(crate::config::Settings::rooted_at(&self.data_dir()))
  }

  pub fn path(&self, rel: &str) -> std::path::PathBuf {
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
    std::fs::read_to_string(self.path(rel)).unwrap()
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
}

/// Options selecting `paths`.
pub fn options(paths: &[&str]) -> UserOptions {
  UserOptions {
    paths: paths.iter().map(|p| p.to_string()).collect(),
    ..Default::default()
  }
}
