//! Content stores.
//!
//! A store keeps the bytes of tracked files. Every operation is scoped to one
//! catalog entry and is preceded by [`Store::pre`], which lets the store
//! authenticate and cache whatever it needs for that entry.
//!
//! Bundled stores:
//!
//! ```text
//! file            opaque blobs in a local directory, versioned
//!   <store_dir>/<context>/<entry-key>/current
//!   <store_dir>/<context>/<entry-key>/versions/<label>
//! records         one record per env variable, diffed on push
//!   <store_dir>/<context>/<entry-key>.records/<NAME>
//! source-control  nothing remote; the file stays in the repository
//! ```

mod file;
mod records;
mod source_control;

use std::fmt;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use file::FileStore;
pub use records::RecordsStore;
pub use source_control::SourceControlStore;

use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::records::RecordError;
use crate::vault::Vault;

/// Optional store capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
  /// Keeps labelled copies next to the current one.
  Versioning,
  /// Leaves the content in source control.
  SourceControl,
}

impl fmt::Display for Feature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Feature::Versioning => f.write_str("versioning"),
      Feature::SourceControl => f.write_str("source-control"),
    }
  }
}

/// Metadata returned with pulled content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
  pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("{0} not found")]
  NotFound(String),

  #[error("empty file")]
  EmptyInput,

  #[error("{0}")]
  Unsupported(String),

  #[error("store not initialized for this entry")]
  NotReady,

  #[error("access denied: {0}")]
  Access(String),

  #[error("failed to access {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Records(#[from] RecordError),

  #[error("{0}")]
  Remote(String),
}

impl StoreError {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.into();
    move |source| StoreError::Io { path, source }
  }
}

/// A content back-end.
pub trait Store {
  fn name(&self) -> &'static str;

  fn description(&self) -> &'static str;

  fn supports_feature(&self, feature: Feature) -> bool;

  fn supports_file_type(&self, file_type: &str) -> bool;

  /// Prepare for operations on `entry`. Must run before any other call.
  fn pre(
    &mut self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    access: &dyn Vault,
    options: &UserOptions,
    prompt: &mut dyn Prompt,
  ) -> Result<(), StoreError>;

  /// Upload `bytes` as the current content, or as `version` when given.
  ///
  /// The store may keep per-entry state in `entry.data`.
  fn push(&mut self, entry: &mut FileEntry, bytes: &[u8], version: Option<&str>) -> Result<(), StoreError>;

  /// Retrieve what was last pushed.
  fn pull(&mut self, entry: &FileEntry, version: Option<&str>) -> Result<(Vec<u8>, Attributes), StoreError>;

  /// Delete one version, or the base object when `version` is `None`.
  fn purge(&mut self, entry: &mut FileEntry, version: Option<&str>) -> Result<(), StoreError>;

  /// Most recent remote modification, `None` when no remote copy exists.
  fn changed(
    &mut self,
    entry: &FileEntry,
    bytes: &[u8],
    version: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>, StoreError>;
}

/// Modification time of a local file, `None` when it doesn't exist.
pub(crate) fn modified(path: &std::path::Path) -> Result<Option<DateTime<Utc>>, StoreError> {
  match std::fs::metadata(path) {
    Ok(meta) => {
      let time = meta.modified().map_err(StoreError::io(path))?;
      Ok(Some(DateTime::<Utc>::from(time)))
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(StoreError::Io {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Write through a temp file and rename into place.
pub(crate) fn write_atomic(path: &std::path::Path, bytes: &[u8]) -> Result<(), StoreError> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
  }
  let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);
  std::fs::write(&temp_path, bytes).map_err(StoreError::io(&temp_path))?;
  std::fs::rename(&temp_path, path).map_err(StoreError::io(path))
}
