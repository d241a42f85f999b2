//! Back-end registry and per-entry resolution.
//!
//! The registry is an explicit table of named factories built at startup.
//! Every entry gets fresh store and vault instances, so state cached by one
//! entry's pre-flight never leaks into another's.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, FileEntry, PullLog};
use crate::config::Settings;
use crate::options::UserOptions;
use crate::prompt::Prompt;
use crate::store::{FileStore, RecordsStore, SourceControlStore, Store, StoreError};
use crate::vault::{EnvVault, FileVault, Vault, VaultError};

type StoreFactory = Box<dyn Fn() -> Box<dyn Store>>;
type VaultFactory = Box<dyn Fn() -> Box<dyn Vault>>;

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("store '{0}' is not registered")]
  UnknownStore(String),

  #[error("vault '{0}' is not registered")]
  UnknownVault(String),

  #[error("vault '{name}' failed pre-flight: {source}")]
  Vault {
    name: String,
    #[source]
    source: VaultError,
  },

  #[error("store '{name}' failed pre-flight: {source}")]
  Store {
    name: String,
    #[source]
    source: StoreError,
  },
}

/// The back-ends bound to one entry.
pub struct Components {
  pub store: Box<dyn Store>,
  pub access: Box<dyn Vault>,
  pub secrets: Box<dyn Vault>,
}

pub struct Registry {
  settings: Settings,
  stores: BTreeMap<&'static str, StoreFactory>,
  vaults: BTreeMap<&'static str, VaultFactory>,
}

impl Registry {
  /// An empty registry.
  pub fn new(settings: Settings) -> Self {
    Self {
      settings,
      stores: BTreeMap::new(),
      vaults: BTreeMap::new(),
    }
  }

  /// A registry holding the bundled local back-ends.
  pub fn bundled(settings: Settings) -> Self {
    let mut registry = Self::new(settings);

    let store_dir = registry.settings.store_dir.clone();
    registry.register_store(move || Box::new(FileStore::new(store_dir.clone())));
    let store_dir = registry.settings.store_dir.clone();
    registry.register_store(move || Box::new(RecordsStore::new(store_dir.clone())));
    registry.register_store(|| Box::new(SourceControlStore::new()));

    let env = EnvVault::new();
    registry.register_vault(move || Box::new(env.clone()));
    let vault_file = registry.settings.vault_file.clone();
    registry.register_vault(move || Box::new(FileVault::new(vault_file.clone())));

    registry
  }

  /// Add a store. A store with the same name is replaced.
  pub fn register_store(&mut self, factory: impl Fn() -> Box<dyn Store> + 'static) {
    let name = factory().name();
    self.stores.insert(name, Box::new(factory));
  }

  /// Add a vault. A vault with the same name is replaced.
  pub fn register_vault(&mut self, factory: impl Fn() -> Box<dyn Vault> + 'static) {
    let name = factory().name();
    self.vaults.insert(name, Box::new(factory));
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn pull_log(&self) -> PullLog {
    PullLog::new(&self.settings.pulls_file)
  }

  pub fn store(&self, name: &str) -> Result<Box<dyn Store>, ResolveError> {
    self
      .stores
      .get(name)
      .map(|factory| factory())
      .ok_or_else(|| ResolveError::UnknownStore(name.to_string()))
  }

  pub fn vault(&self, name: &str) -> Result<Box<dyn Vault>, ResolveError> {
    self
      .vaults
      .get(name)
      .map(|factory| factory())
      .ok_or_else(|| ResolveError::UnknownVault(name.to_string()))
  }

  /// Registered stores as `(name, description)`.
  pub fn stores(&self) -> Vec<(&'static str, &'static str)> {
    self
      .stores
      .values()
      .map(|factory| {
        let store = factory();
        (store.name(), store.description())
      })
      .collect()
  }

  /// Registered vaults as `(name, description)`.
  pub fn vaults(&self) -> Vec<(&'static str, &'static str)> {
    self
      .vaults
      .values()
      .map(|factory| {
        let vault = factory();
        (vault.name(), vault.description())
      })
      .collect()
  }

  /// Bind `entry` to its access vault, secrets vault and store, running each
  /// pre-flight in that order. The resolved names are written back into the
  /// entry.
  pub fn resolve(
    &self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    options: &UserOptions,
    prompt: &mut dyn Prompt,
  ) -> Result<Components, ResolveError> {
    let access_name = pick(&entry.vaults.access, &self.settings.access_vault);
    let mut access = self.vault(&access_name)?;
    access
      .pre(catalog, entry, None, options, prompt)
      .map_err(|source| ResolveError::Vault {
        name: access_name.clone(),
        source,
      })?;

    let secrets_name = pick(&entry.vaults.secrets, &self.settings.secrets_vault);
    let mut secrets = self.vault(&secrets_name)?;
    secrets
      .pre(catalog, entry, Some(access.as_ref()), options, prompt)
      .map_err(|source| ResolveError::Vault {
        name: secrets_name.clone(),
        source,
      })?;

    let store_name = pick(&entry.store, &self.settings.store);
    let mut store = self.store(&store_name)?;
    store
      .pre(catalog, entry, access.as_ref(), options, prompt)
      .map_err(|source| ResolveError::Store {
        name: store_name.clone(),
        source,
      })?;

    debug!(path = %entry.path, store = %store_name, access = %access_name, secrets = %secrets_name, "resolved");
    entry.vaults.access = access.name().to_string();
    entry.vaults.secrets = secrets.name().to_string();
    entry.store = store.name().to_string();

    Ok(Components { store, access, secrets })
  }
}

fn pick(chosen: &str, default: &str) -> String {
  if chosen.is_empty() {
    default.to_string()
  } else {
    chosen.to_string()
  }
}
