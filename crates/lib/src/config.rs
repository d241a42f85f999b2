//! User configuration.
//!
//! Settings are read from `<config_dir>/config.yml`. The file and every field
//! in it are optional; missing values fall back to the bundled defaults.
//!
//! ```yaml
//! store: file
//! access_vault: env
//! secrets_vault: file
//! store_dir: /home/me/.local/share/cstore/store
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILENAME, DEFAULT_ACCESS_VAULT, DEFAULT_SECRETS_VAULT, DEFAULT_STORE, PULLS_FILENAME};
use crate::platform::paths::{config_dir, data_dir};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Content store used when an entry names none.
  pub store: String,
  /// Access vault used when an entry names none.
  pub access_vault: String,
  /// Secrets vault used when an entry names none.
  pub secrets_vault: String,
  /// Root directory of the local content stores.
  pub store_dir: PathBuf,
  /// Backing file of the `file` vault. Its key lives next to it in `<vault_file>.key`.
  pub vault_file: PathBuf,
  /// Pull-time record.
  pub pulls_file: PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self::rooted_at(&data_dir())
  }
}

impl Settings {
  /// Default settings keeping all per-user state under `data_dir`.
  pub fn rooted_at(data_dir: &Path) -> Self {
    Self {
      store: DEFAULT_STORE.to_string(),
      access_vault: DEFAULT_ACCESS_VAULT.to_string(),
      secrets_vault: DEFAULT_SECRETS_VAULT.to_string(),
      store_dir: data_dir.join("store"),
      vault_file: data_dir.join("vault.age"),
      pulls_file: data_dir.join(PULLS_FILENAME),
    }
  }

  /// Path of the user configuration file.
  pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILENAME)
  }

  /// Load settings from the user configuration file.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&Self::config_path())
  }

  /// Load settings from `path`, using defaults when the file doesn't exist.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    if content.trim().is_empty() {
      return Ok(Self::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}
