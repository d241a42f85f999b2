//! Per-user record of when each entry was last pulled.
//!
//! Kept outside the catalog (under the data directory) so checkout timing is
//! never shared through source control. Keys are `context/entry-key`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use super::CatalogError;

type Pulls = BTreeMap<String, DateTime<Utc>>;

#[derive(Debug, Clone)]
pub struct PullLog {
  path: PathBuf,
}

impl PullLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<Pulls, CatalogError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Pulls::new()),
      Err(source) => {
        return Err(CatalogError::Read {
          path: self.path.clone(),
          source,
        });
      }
    };
    if content.trim().is_empty() {
      return Ok(Pulls::new());
    }
    serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
      path: self.path.clone(),
      source,
    })
  }

  fn save(&self, pulls: &Pulls) -> Result<(), CatalogError> {
    let write_err = |source| CatalogError::Write {
      path: self.path.clone(),
      source,
    };
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(write_err)?;
    }
    let content = serde_yaml::to_string(pulls).map_err(CatalogError::Serialize)?;
    let temp_path = self.path.with_extension("yml.tmp");
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, &self.path).map_err(write_err)
  }

  /// Record that `key` was pulled at `at`.
  pub fn record(&self, key: &str, at: DateTime<Utc>) -> Result<(), CatalogError> {
    if at.timestamp() <= 0 {
      return Err(CatalogError::InvalidPullTime);
    }
    let mut pulls = self.load()?;
    pulls.insert(key.to_string(), at);
    self.save(&pulls)
  }

  /// Forget `key`.
  pub fn remove(&self, key: &str) -> Result<(), CatalogError> {
    let mut pulls = self.load()?;
    if pulls.remove(key).is_some() {
      self.save(&pulls)?;
    }
    Ok(())
  }

  pub fn last_pull(&self, key: &str) -> Result<Option<DateTime<Utc>>, CatalogError> {
    Ok(self.load()?.get(key).copied())
  }

  /// Whether the local copy of `key` is at least as new as a remote change
  /// made at `last_change`.
  ///
  /// No remote change means current. An unreadable record or no recorded
  /// pull means not current.
  pub fn is_current(&self, key: &str, last_change: Option<DateTime<Utc>>) -> bool {
    let Some(last_change) = last_change else {
      return true;
    };
    match self.last_pull(key) {
      Ok(Some(pulled)) => pulled >= last_change,
      Ok(None) => false,
      Err(e) => {
        warn!(error = %e, "could not read pull record");
        false
      }
    }
  }
}
