//! Values from process environment variables.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Vault, VaultError};
use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;

/// Reads `GROUP_PROP` environment variables.
///
/// The environment of a running process can't be changed safely, so writes
/// land in an overlay that shadows the environment for as long as the vault
/// (and its clones) live.
#[derive(Debug, Clone, Default)]
pub struct EnvVault {
  overlay: Rc<RefCell<BTreeMap<String, String>>>,
}

impl EnvVault {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Vault for EnvVault {
  fn name(&self) -> &'static str {
    "env"
  }

  fn description(&self) -> &'static str {
    "Reads values from environment variables named GROUP_PROP (upper case, '/' and '-' as '_'). \
     Values set during a command are kept in memory for that command."
  }

  fn pre(
    &mut self,
    _catalog: &Catalog,
    _entry: &mut FileEntry,
    _access: Option<&dyn Vault>,
    _options: &UserOptions,
    _prompt: &mut dyn Prompt,
  ) -> Result<(), VaultError> {
    Ok(())
  }

  fn get(&self, context: &str, group: &str, prop: &str) -> Result<String, VaultError> {
    let key = self.build_key(context, group, prop);
    if let Some(value) = self.overlay.borrow().get(&key) {
      return Ok(value.clone());
    }
    std::env::var(&key).map_err(|_| VaultError::NotFound(key))
  }

  fn set(&mut self, context: &str, group: &str, prop: &str, value: &str) -> Result<(), VaultError> {
    let key = self.build_key(context, group, prop);
    self.overlay.borrow_mut().insert(key, value.to_string());
    Ok(())
  }

  fn delete(&mut self, context: &str, group: &str, prop: &str) -> Result<(), VaultError> {
    let key = self.build_key(context, group, prop);
    self.overlay.borrow_mut().remove(&key);
    Ok(())
  }

  fn build_key(&self, _context: &str, group: &str, prop: &str) -> String {
    let raw = if prop.is_empty() {
      group.to_string()
    } else {
      format!("{}_{}", group, prop)
    };
    raw.replace(['/', '-'], "_").to_uppercase()
  }
}
