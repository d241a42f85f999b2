//! Vaults hold small named values: credentials for stores (the access vault)
//! and values externalized from tracked files (the secrets vault).
//!
//! Values are addressed by `(context, group, prop)`; each vault composes its
//! own native key from those with [`Vault::build_key`].

mod env;
mod file;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use env::EnvVault;
pub use file::FileVault;

use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;

#[derive(Debug, Error)]
pub enum VaultError {
  /// The value doesn't exist. Distinct from every transport failure.
  #[error("{0} not found")]
  NotFound(String),

  #[error("access denied: {0}")]
  Access(String),

  #[error("failed to access {path}: {source}")]
  Io {
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

  #[error("failed to serialize vault: {0}")]
  Serialize(#[source] serde_yaml::Error),

  #[error("vault encryption failed for {path}: {message}")]
  Crypto { path: PathBuf, message: String },
}

impl VaultError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, VaultError::NotFound(_))
  }
}

/// A secret or access back-end.
pub trait Vault {
  fn name(&self) -> &'static str;

  fn description(&self) -> &'static str;

  /// Prepare for operations on `entry`. A secrets vault receives the
  /// resolved access vault to authenticate through.
  fn pre(
    &mut self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    access: Option<&dyn Vault>,
    options: &UserOptions,
    prompt: &mut dyn Prompt,
  ) -> Result<(), VaultError>;

  fn get(&self, context: &str, group: &str, prop: &str) -> Result<String, VaultError>;

  /// Insert or update one value, keeping its siblings.
  fn set(&mut self, context: &str, group: &str, prop: &str, value: &str) -> Result<(), VaultError>;

  /// Remove one value. Removing a missing value succeeds.
  fn delete(&mut self, context: &str, group: &str, prop: &str) -> Result<(), VaultError>;

  fn build_key(&self, context: &str, group: &str, prop: &str) -> String;
}
