//! Env files decomposed into one record per variable.
//!
//! Pushing diffs the new records against what is stored: removed variables
//! are deleted, changed ones rewritten, unchanged ones left untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Attributes, Feature, Store, StoreError, modified, write_atomic};
use crate::catalog::{Catalog, FileEntry};
use crate::consts::SECRET;
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::records;
use crate::vault::Vault;

#[derive(Debug)]
pub struct RecordsStore {
  root: PathBuf,
  dir: Option<PathBuf>,
}

impl RecordsStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      dir: None,
    }
  }

  fn dir(&self) -> Result<&Path, StoreError> {
    self.dir.as_deref().ok_or(StoreError::NotReady)
  }

  /// Stored records by name, `None` when nothing is stored.
  fn stored(&self) -> Result<Option<BTreeMap<String, String>>, StoreError> {
    let dir = self.dir()?;
    let entries = match fs::read_dir(dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => {
        return Err(StoreError::Io {
          path: dir.to_path_buf(),
          source,
        });
      }
    };

    let mut stored = BTreeMap::new();
    for item in entries {
      let item = item.map_err(StoreError::io(dir))?;
      let path = item.path();
      if !path.is_file() {
        continue;
      }
      let name = item.file_name().to_string_lossy().into_owned();
      if name.ends_with(".tmp") {
        continue;
      }
      let value = fs::read_to_string(&path).map_err(StoreError::io(&path))?;
      stored.insert(name, value);
    }
    Ok(Some(stored))
  }
}

fn valid_name(name: &str) -> bool {
  !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Store for RecordsStore {
  fn name(&self) -> &'static str {
    "records"
  }

  fn description(&self) -> &'static str {
    "Keeps each variable of an env file as its own record in a local directory. \
     Only changed variables are rewritten on push. Supports env files only."
  }

  fn supports_feature(&self, _feature: Feature) -> bool {
    false
  }

  fn supports_file_type(&self, file_type: &str) -> bool {
    file_type.eq_ignore_ascii_case("env")
  }

  fn pre(
    &mut self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    _access: &dyn Vault,
    _options: &UserOptions,
    _prompt: &mut dyn Prompt,
  ) -> Result<(), StoreError> {
    self.dir = Some(self.root.join(&catalog.context).join(format!("{}.records", entry.key())));
    Ok(())
  }

  fn push(&mut self, entry: &mut FileEntry, bytes: &[u8], version: Option<&str>) -> Result<(), StoreError> {
    if version.is_some() {
      return Err(StoreError::Unsupported("records store does not support versions".to_string()));
    }
    if bytes.is_empty() {
      return Err(StoreError::EmptyInput);
    }

    let incoming = records::parse(bytes)?;
    if let Some((name, _)) = incoming.iter().find(|(name, _)| !valid_name(name)) {
      return Err(StoreError::Unsupported(format!("invalid variable name '{}'", name)));
    }

    let dir = self.dir()?.to_path_buf();
    let stored = self.stored()?.unwrap_or_default();

    for name in stored.keys() {
      if !incoming.iter().any(|(n, _)| n == name) {
        let path = dir.join(name);
        fs::remove_file(&path).map_err(StoreError::io(&path))?;
        entry.data.remove(name);
        debug!(record = %name, "deleted record");
      }
    }

    for (name, value) in &incoming {
      if stored.get(name) != Some(value) {
        write_atomic(&dir.join(name), value.as_bytes())?;
        debug!(record = %name, "wrote record");
      }
      entry.data.insert(name.clone(), SECRET.to_string());
    }

    Ok(())
  }

  fn pull(&mut self, entry: &FileEntry, version: Option<&str>) -> Result<(Vec<u8>, Attributes), StoreError> {
    if version.is_some() {
      return Err(StoreError::Unsupported("records store does not support versions".to_string()));
    }
    let stored = match self.stored()? {
      Some(stored) if !stored.is_empty() => stored,
      _ => return Err(StoreError::NotFound(entry.path.clone())),
    };
    let bytes = records::render(stored.iter().map(|(n, v)| (n.as_str(), v.as_str())));
    let attributes = Attributes {
      last_modified: self.changed(entry, &bytes, None)?,
    };
    Ok((bytes, attributes))
  }

  fn purge(&mut self, entry: &mut FileEntry, version: Option<&str>) -> Result<(), StoreError> {
    if version.is_some() {
      return Err(StoreError::Unsupported("records store does not support versions".to_string()));
    }
    let dir = self.dir()?.to_path_buf();
    match fs::remove_dir_all(&dir) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(source) => return Err(StoreError::Io { path: dir, source }),
    }
    entry.data.retain(|_, v| v != SECRET);
    Ok(())
  }

  fn changed(
    &mut self,
    _entry: &FileEntry,
    _bytes: &[u8],
    _version: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>, StoreError> {
    let dir = self.dir()?;
    let Some(stored) = self.stored()? else {
      return Ok(None);
    };
    let mut latest = None;
    for name in stored.keys() {
      let time = modified(&dir.join(name))?;
      latest = latest.max(time);
    }
    Ok(latest)
  }
}
