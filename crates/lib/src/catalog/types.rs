//! Catalog entry types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::SECRET;
use crate::util::hash::entry_key;

/// Vault back-ends bound to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaults {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub access: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub secrets: String,
}

impl Vaults {
  pub fn is_empty(&self) -> bool {
    self.access.is_empty() && self.secrets.is_empty()
  }
}

fn is_false(value: &bool) -> bool {
  !*value
}

/// One tracked file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
  /// Location relative to the catalog. Identity of the entry.
  pub path: String,

  /// Second local destination written on pull.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alternate_path: Option<String>,

  /// Content store holding this entry. Empty until first resolved.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub store: String,

  /// The entry is a linked catalog, not remote content.
  #[serde(default)]
  pub is_ref: bool,

  /// File type tag such as `env` or `json`.
  #[serde(rename = "type", default)]
  pub file_type: String,

  /// Back-end scratch pad, round-tripped untouched by the core.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub data: BTreeMap<String, String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,

  #[serde(default, skip_serializing_if = "Vaults::is_empty")]
  pub vaults: Vaults,

  /// Version labels acknowledged as pushed.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub versions: Vec<String>,

  #[serde(default, skip_serializing_if = "is_false")]
  pub delete_after_push: bool,
}

impl FileEntry {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      ..Default::default()
    }
  }

  /// Catalog key of this entry.
  pub fn key(&self) -> String {
    entry_key(&self.path)
  }

  /// Key namespaced by a catalog context.
  pub fn context_key(&self, context: &str) -> String {
    format!("{}/{}", context, self.key())
  }

  /// Whether tokens can be extracted from and injected into this file type.
  pub fn supports_secrets(&self) -> bool {
    crate::token::supports_secrets(&self.file_type)
  }

  /// Whether the content is `NAME=VALUE` records.
  pub fn is_env(&self) -> bool {
    self.file_type.eq_ignore_ascii_case("env")
  }

  pub fn has_version(&self, version: &str) -> bool {
    self.versions.iter().any(|v| v == version)
  }

  /// Append a version label unless already present.
  pub fn add_version(&mut self, version: &str) {
    if !self.has_version(version) {
      self.versions.push(version.to_string());
    }
  }

  pub fn remove_version(&mut self, version: &str) {
    self.versions.retain(|v| v != version);
  }

  /// Properties whose values live in a secrets vault.
  pub fn secret_props(&self) -> impl Iterator<Item = &str> {
    self
      .data
      .iter()
      .filter(|(_, v)| v.as_str() == SECRET)
      .map(|(k, _)| k.as_str())
  }
}
