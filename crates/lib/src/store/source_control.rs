//! Files that stay in source control.
//!
//! Nothing is uploaded. Cataloging such a file still gives it tags, versions
//! in git and a place in `list` and `pull` output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{Attributes, Feature, Store, StoreError};
use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::vault::Vault;

#[derive(Debug, Default)]
pub struct SourceControlStore {
  root: Option<PathBuf>,
}

impl SourceControlStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn local_path(&self, entry: &FileEntry) -> Result<PathBuf, StoreError> {
    let root: &Path = self.root.as_deref().ok_or(StoreError::NotReady)?;
    Ok(root.join(&entry.path))
  }
}

impl Store for SourceControlStore {
  fn name(&self) -> &'static str {
    "source-control"
  }

  fn description(&self) -> &'static str {
    "Leaves files in source control. Push only validates the file, pull reads it from the working tree \
     and purge deletes the local copy."
  }

  fn supports_feature(&self, feature: Feature) -> bool {
    matches!(feature, Feature::SourceControl)
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
    self.root = Some(catalog.dir().to_path_buf());
    Ok(())
  }

  fn push(&mut self, _entry: &mut FileEntry, bytes: &[u8], _version: Option<&str>) -> Result<(), StoreError> {
    if bytes.is_empty() {
      return Err(StoreError::EmptyInput);
    }
    Ok(())
  }

  fn pull(&mut self, entry: &FileEntry, _version: Option<&str>) -> Result<(Vec<u8>, Attributes), StoreError> {
    let path = self.local_path(entry)?;
    match fs::read(&path) {
      Ok(bytes) => Ok((bytes, Attributes::default())),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(entry.path.clone())),
      Err(source) => Err(StoreError::Io { path, source }),
    }
  }

  fn purge(&mut self, entry: &mut FileEntry, _version: Option<&str>) -> Result<(), StoreError> {
    let path = self.local_path(entry)?;
    match fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(StoreError::Io { path, source }),
    }
  }

  fn changed(
    &mut self,
    _entry: &FileEntry,
    _bytes: &[u8],
    _version: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>, StoreError> {
    Ok(None)
  }
}
