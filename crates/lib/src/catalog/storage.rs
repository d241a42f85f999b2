//! Reading and writing catalog files.
//!
//! Catalogs are YAML with a short explanatory header. Writes go to a temp
//! file that is renamed over the catalog, and are skipped entirely when the
//! document is unchanged since it was read.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::ghost::Ghost;
use super::{Catalog, CatalogError};
use crate::consts::SUPPORTED_VERSIONS;

const HEADER: &str = "\
# This catalog lists files stored remotely based on their location relative to it.
# To restore the files, run 'cstore pull' in the same directory as this catalog.
# Deleting this file without running 'cstore purge' first orphans the remote data.
";

/// What [`Catalog::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  Written,
  Removed,
  Unchanged,
}

#[derive(Deserialize)]
struct Probe {
  #[serde(default)]
  version: String,
  #[serde(default)]
  context: String,
}

impl Catalog {
  /// Whether `bytes` hold a catalog document this version can read.
  pub fn detect(bytes: &[u8]) -> bool {
    match serde_yaml::from_slice::<Probe>(bytes) {
      Ok(probe) => !probe.context.is_empty() && SUPPORTED_VERSIONS.contains(&probe.version.as_str()),
      Err(_) => false,
    }
  }

  /// Load a catalog file.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  pub fn load(path: &Path) -> Result<Option<Self>, CatalogError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => {
        return Err(CatalogError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let mut catalog: Catalog = serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    if !SUPPORTED_VERSIONS.contains(&catalog.version.as_str()) {
      return Err(CatalogError::UnsupportedVersion(catalog.version));
    }
    if catalog.context.is_empty() {
      return Err(CatalogError::MissingContext(path.to_path_buf()));
    }

    catalog.path = path.to_path_buf();
    catalog.loaded = Some(catalog.serialize()?);
    debug!(path = %path.display(), files = catalog.files.len(), "loaded catalog");
    Ok(Some(catalog))
  }

  /// Open the catalog named `name` for a command run from `working_dir`.
  ///
  /// When `working_dir` holds no catalog but does hold a ghost marker, the
  /// catalog is looked up as many levels above as the marker's location
  /// descends, and `cwd` is set to that location. A catalog that doesn't
  /// exist yet is returned fresh and unsaved.
  pub fn open(working_dir: &Path, name: &str) -> Result<Self, CatalogError> {
    let direct = working_dir.join(name);
    if direct.exists() {
      return Self::load_or_new(&direct, String::new());
    }

    match Ghost::read(working_dir)? {
      Some(ghost) => {
        let mut root = working_dir.to_path_buf();
        for _ in 0..crate::path::depth(&ghost.location) {
          root.push("..");
        }
        debug!(location = %ghost.location, "following ghost marker");
        Self::load_or_new(&root.join(name), ghost.location)
      }
      None => Self::load_or_new(&direct, String::new()),
    }
  }

  fn load_or_new(path: &Path, cwd: String) -> Result<Self, CatalogError> {
    let mut catalog = match Self::load(path)? {
      Some(catalog) => catalog,
      None => Self::new(path),
    };
    catalog.cwd = cwd;
    Ok(catalog)
  }

  /// Whether the in-memory document differs from what is on disk.
  pub fn is_changed(&self) -> Result<bool, CatalogError> {
    let current = self.serialize()?;
    Ok(self.loaded.as_deref() != Some(current.as_str()))
  }

  fn serialize(&self) -> Result<String, CatalogError> {
    serde_yaml::to_string(self).map_err(CatalogError::Serialize)
  }

  /// Persist the catalog.
  ///
  /// An empty catalog is removed from disk instead of written. An unchanged
  /// catalog is left alone.
  pub fn save(&mut self) -> Result<SaveOutcome, CatalogError> {
    if self.files.is_empty() {
      if !self.exists() {
        return Ok(SaveOutcome::Unchanged);
      }
      match fs::remove_file(&self.path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
          return Err(CatalogError::Write {
            path: self.path.clone(),
            source,
          });
        }
      }
      self.loaded = None;
      info!(path = %self.path.display(), "removed empty catalog");
      return Ok(SaveOutcome::Removed);
    }

    let content = self.serialize()?;
    if self.loaded.as_deref() == Some(content.as_str()) {
      return Ok(SaveOutcome::Unchanged);
    }
    self.write_content(content)?;
    Ok(SaveOutcome::Written)
  }

  /// Write the catalog even when it holds no entries.
  pub fn write(&mut self) -> Result<(), CatalogError> {
    let content = self.serialize()?;
    self.write_content(content)
  }

  fn write_content(&mut self, content: String) -> Result<(), CatalogError> {
    let write_err = |source| CatalogError::Write {
      path: self.path.clone(),
      source,
    };
    let temp_path = self.path.with_extension("yml.tmp");
    fs::write(&temp_path, format!("{}{}", HEADER, content)).map_err(write_err)?;
    fs::rename(&temp_path, &self.path).map_err(write_err)?;

    self.loaded = Some(content);
    debug!(path = %self.path.display(), "saved catalog");
    Ok(())
  }
}
