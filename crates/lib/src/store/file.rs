//! Opaque blobs in a local directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{Attributes, Feature, Store, StoreError, modified, write_atomic};
use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::vault::Vault;

/// `entry.data` key remembering which directory holds the entry.
pub const STORE_DIR_KEY: &str = "storeDir";

const CURRENT: &str = "current";
const VERSIONS: &str = "versions";

#[derive(Debug)]
pub struct FileStore {
  default_dir: PathBuf,
  /// Entry directory, set by `pre`.
  entry_dir: Option<PathBuf>,
  dir: Option<PathBuf>,
}

impl FileStore {
  pub fn new(default_dir: impl Into<PathBuf>) -> Self {
    Self {
      default_dir: default_dir.into(),
      entry_dir: None,
      dir: None,
    }
  }

  fn entry_dir(&self) -> Result<&Path, StoreError> {
    self.entry_dir.as_deref().ok_or(StoreError::NotReady)
  }

  fn blob_path(&self, version: Option<&str>) -> Result<PathBuf, StoreError> {
    let dir = self.entry_dir()?;
    Ok(match version {
      Some(version) => dir.join(VERSIONS).join(version),
      None => dir.join(CURRENT),
    })
  }
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
  match fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(StoreError::Io {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Remove `dir` if it holds nothing.
fn prune(dir: &Path) {
  match fs::remove_dir(dir) {
    Ok(()) => debug!(path = %dir.display(), "removed empty store directory"),
    Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::DirectoryNotEmpty) => {}
    Err(e) => warn!(path = %dir.display(), error = %e, "could not remove empty store directory"),
  }
}

impl Store for FileStore {
  fn name(&self) -> &'static str {
    "file"
  }

  fn description(&self) -> &'static str {
    "Keeps files as blobs in a local directory, with labelled versions. \
     The directory defaults to the configured store_dir and is remembered per file."
  }

  fn supports_feature(&self, feature: Feature) -> bool {
    matches!(feature, Feature::Versioning)
  }

  fn supports_file_type(&self, _file_type: &str) -> bool {
    true
  }

  fn pre(
    &mut self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    _access: &dyn Vault,
    _options: &UserOptions,
    _prompt: &mut dyn Prompt,
  ) -> Result<(), StoreError> {
    let dir = entry
      .data
      .get(STORE_DIR_KEY)
      .map(PathBuf::from)
      .unwrap_or_else(|| self.default_dir.clone());
    self.entry_dir = Some(dir.join(&catalog.context).join(entry.key()));
    self.dir = Some(dir);
    Ok(())
  }

  fn push(&mut self, entry: &mut FileEntry, bytes: &[u8], version: Option<&str>) -> Result<(), StoreError> {
    if bytes.is_empty() {
      return Err(StoreError::EmptyInput);
    }
    let path = self.blob_path(version)?;
    write_atomic(&path, bytes)?;
    debug!(path = %path.display(), "stored blob");

    if let Some(dir) = &self.dir {
      entry
        .data
        .insert(STORE_DIR_KEY.to_string(), dir.to_string_lossy().into_owned());
    }
    Ok(())
  }

  fn pull(&mut self, entry: &FileEntry, version: Option<&str>) -> Result<(Vec<u8>, Attributes), StoreError> {
    let path = self.blob_path(version)?;
    let bytes = match fs::read(&path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        let what = match version {
          Some(version) => format!("{} ({})", entry.path, version),
          None => entry.path.clone(),
        };
        return Err(StoreError::NotFound(what));
      }
      Err(source) => return Err(StoreError::Io { path, source }),
    };
    let attributes = Attributes {
      last_modified: modified(&path)?,
    };
    Ok((bytes, attributes))
  }

  fn purge(&mut self, _entry: &mut FileEntry, version: Option<&str>) -> Result<(), StoreError> {
    let path = self.blob_path(version)?;
    remove_if_exists(&path)?;

    let entry_dir = self.entry_dir()?;
    prune(&entry_dir.join(VERSIONS));
    prune(entry_dir);
    Ok(())
  }

  fn changed(
    &mut self,
    _entry: &FileEntry,
    _bytes: &[u8],
    version: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>, StoreError> {
    modified(&self.blob_path(version)?)
  }
}
