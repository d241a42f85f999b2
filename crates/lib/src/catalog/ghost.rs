//! Ghost markers.
//!
//! A ghost marker (`.cstore`) sits in a directory holding remotely stored
//! files when that directory is not the catalog's own. It records the
//! directory's location relative to the catalog, so commands can run from
//! there.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::consts::GHOST_FILENAME;

const HEADER: &str = "\
# Ghost markers are created in the directories of remotely stored files.
# They let cstore commands run from this directory even though the catalog
# lives in a parent directory.
";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
  /// This directory, relative to the catalog's directory.
  pub location: String,
}

impl Ghost {
  pub fn path_in(dir: &Path) -> PathBuf {
    dir.join(GHOST_FILENAME)
  }

  /// Read the marker in `dir`, if any.
  pub fn read(dir: &Path) -> Result<Option<Ghost>, CatalogError> {
    let path = Self::path_in(dir);
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(CatalogError::Read { path, source }),
    };

    let ghost: Ghost = serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse { path, source })?;
    Ok(Some(ghost))
  }

  /// Write a marker for `location` into `dir`.
  pub fn write(dir: &Path, location: &str) -> Result<(), CatalogError> {
    let ghost = Ghost {
      location: location.to_string(),
    };
    let body = serde_yaml::to_string(&ghost).map_err(CatalogError::Serialize)?;
    let path = Self::path_in(dir);
    fs::write(&path, format!("{}{}", HEADER, body)).map_err(|source| CatalogError::Write { path, source })
  }

  /// Remove the marker in `dir`. A missing marker is not an error.
  pub fn remove(dir: &Path) -> Result<(), CatalogError> {
    let path = Self::path_in(dir);
    match fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(CatalogError::Write { path, source }),
    }
  }
}
