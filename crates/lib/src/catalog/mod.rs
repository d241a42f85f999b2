//! The catalog: the document listing tracked files and how to reach them.
//!
//! A catalog lives next to the files it tracks (conventionally `cstore.yml`).
//! Each entry is keyed by a hash of its path and names the store and vaults
//! responsible for it. Remote keys are always namespaced by the catalog's
//! `context`, so unrelated projects can share a back-end.

mod filter;
pub mod ghost;
pub mod pulls;
mod storage;
mod types;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use filter::Filter;
pub use pulls::PullLog;
pub use storage::SaveOutcome;
pub use types::{FileEntry, Vaults};

use crate::consts::CATALOG_VERSION;
use crate::path::{dir_of, extension};
use crate::util::hash::entry_key;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("failed to serialize catalog: {0}")]
  Serialize(#[source] serde_yaml::Error),

  #[error("catalog version '{0}' is not supported")]
  UnsupportedVersion(String),

  #[error("catalog {0} has no context")]
  MissingContext(PathBuf),

  #[error("'{path}' is stored in '{from}'; run 'cstore purge {path}' and then 'cstore push {path}' to change store")]
  StoreChange { path: String, from: String, to: String },

  #[error("invalid pull time")]
  InvalidPullTime,
}

/// The catalog document plus where it was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
  pub version: String,

  /// Project namespace for remote keys. Never changes once set.
  pub context: String,

  #[serde(default)]
  pub files: BTreeMap<String, FileEntry>,

  /// Location of the working directory relative to the catalog, when the
  /// command runs from a ghost-marked subdirectory.
  #[serde(skip)]
  pub cwd: String,

  /// Catalog file on disk.
  #[serde(skip)]
  pub path: PathBuf,

  /// Serialized form as last read or written.
  #[serde(skip)]
  loaded: Option<String>,
}

impl Catalog {
  /// A fresh catalog with a newly generated context.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      version: CATALOG_VERSION.to_string(),
      context: uuid::Uuid::new_v4().to_string(),
      files: BTreeMap::new(),
      cwd: String::new(),
      path: path.into(),
      loaded: None,
    }
  }

  /// Whether the catalog exists on disk.
  pub fn exists(&self) -> bool {
    self.loaded.is_some()
  }

  /// Directory holding the catalog file.
  pub fn dir(&self) -> &Path {
    match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    }
  }

  /// Local filesystem location of a logical entry path.
  pub fn local_path(&self, path: &str) -> PathBuf {
    self.dir().join(path)
  }

  /// Prefix a working-directory relative path with the ghost location.
  pub fn full_path(&self, path: &str) -> String {
    crate::path::build_path(&self.cwd, path)
  }

  /// `context/key`, the identity of an entry across projects.
  pub fn context_key(&self, key: &str) -> String {
    format!("{}/{}", self.context, key)
  }

  pub fn get(&self, path: &str) -> Option<&FileEntry> {
    self.files.get(&entry_key(path))
  }

  /// Find the entry for `path`, or build a new one from the file's bytes.
  ///
  /// The boolean reports whether the entry already existed. A new entry takes
  /// its type from the file extension and becomes a reference when the bytes
  /// are themselves a catalog.
  pub fn lookup_entry(&self, path: &str, bytes: &[u8]) -> (FileEntry, bool) {
    if let Some(entry) = self.get(path).filter(|e| !e.is_ref) {
      return (entry.clone(), true);
    }

    let mut entry = FileEntry::new(path);
    entry.is_ref = Catalog::detect(bytes);
    entry.file_type = extension(path);
    (entry, false)
  }

  /// Insert or replace an entry.
  ///
  /// Moving an existing entry to a different store is refused; the old
  /// remote copy would be orphaned.
  pub fn update_entry(&mut self, entry: FileEntry) -> Result<(), CatalogError> {
    let key = entry.key();
    if let Some(existing) = self.files.get(&key)
      && !entry.store.is_empty()
      && !existing.store.is_empty()
      && entry.store != existing.store
    {
      return Err(CatalogError::StoreChange {
        path: entry.path,
        from: existing.store.clone(),
        to: entry.store,
      });
    }
    self.files.insert(key, entry);
    Ok(())
  }

  pub fn remove_entry(&mut self, path: &str) -> Option<FileEntry> {
    self.files.remove(&entry_key(path))
  }

  /// Whether any entry lives directly in `dir` (with trailing `/`).
  pub fn any_files_in(&self, dir: &str) -> bool {
    self.files.values().any(|f| dir_of(&f.path) == dir)
  }

  /// Cataloged paths in a stable order.
  pub fn paths(&self) -> Vec<String> {
    let mut paths: Vec<String> = self.files.values().map(|f| f.path.clone()).collect();
    paths.sort();
    paths
  }
}
