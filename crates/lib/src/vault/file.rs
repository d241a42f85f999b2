//! Values in a local encrypted file.
//!
//! The vault is a YAML map encrypted with an age X25519 identity. The
//! identity is generated on first write and kept in `<vault>.key`; sharing
//! that key file shares access to the vault. Both files are created owner
//! read/write only on unix.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use age::secrecy::ExposeSecret;
use age::x25519;
use tracing::{debug, info};

use super::{Vault, VaultError};
use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;
use crate::prompt::Prompt;

/// Keeps values in an encrypted YAML map keyed `context/group/prop`.
#[derive(Debug, Clone)]
pub struct FileVault {
  path: PathBuf,
}

/// Create or replace `path` with owner-only permissions.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let mut options = fs::OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
  }
  let mut file = options.open(path)?;
  file.write_all(bytes)?;
  file.sync_all()
}

impl FileVault {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Location of the identity that decrypts the vault.
  pub fn key_path(&self) -> PathBuf {
    let mut name = self.path.as_os_str().to_os_string();
    name.push(".key");
    name.into()
  }

  fn io_err(&self, path: &Path) -> impl FnOnce(io::Error) -> VaultError {
    let path = path.to_path_buf();
    move |source| VaultError::Io { path, source }
  }

  fn crypto_err(&self, message: impl ToString) -> VaultError {
    VaultError::Crypto {
      path: self.path.clone(),
      message: message.to_string(),
    }
  }

  fn read_identity(&self) -> Result<Option<x25519::Identity>, VaultError> {
    let key_path = self.key_path();
    let content = match fs::read_to_string(&key_path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(VaultError::Io { path: key_path, source }),
    };
    x25519::Identity::from_str(content.trim())
      .map(Some)
      .map_err(|e| self.crypto_err(format!("invalid key file {}: {}", key_path.display(), e)))
  }

  /// The vault identity, generating and storing a new one when none exists.
  fn identity(&self) -> Result<x25519::Identity, VaultError> {
    if let Some(identity) = self.read_identity()? {
      return Ok(identity);
    }
    let identity = x25519::Identity::generate();
    let key_path = self.key_path();
    let content = format!("{}\n", identity.to_string().expose_secret());
    write_private(&key_path, content.as_bytes()).map_err(self.io_err(&key_path))?;
    info!(path = %key_path.display(), "generated vault key");
    Ok(identity)
  }

  fn load(&self) -> Result<BTreeMap<String, String>, VaultError> {
    let encrypted = match fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
      Err(source) => {
        return Err(VaultError::Io {
          path: self.path.clone(),
          source,
        });
      }
    };
    if encrypted.is_empty() {
      return Ok(BTreeMap::new());
    }

    let Some(identity) = self.read_identity()? else {
      return Err(VaultError::Access(format!(
        "missing key file {} for vault {}",
        self.key_path().display(),
        self.path.display()
      )));
    };
    let content = age::decrypt(&identity, &encrypted).map_err(|e| self.crypto_err(e))?;
    serde_yaml::from_slice(&content).map_err(|source| VaultError::Parse {
      path: self.path.clone(),
      source,
    })
  }

  fn save(&self, values: &BTreeMap<String, String>) -> Result<(), VaultError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(self.io_err(parent))?;
    }
    let identity = self.identity()?;
    let content = serde_yaml::to_string(values).map_err(VaultError::Serialize)?;
    let encrypted = age::encrypt(&identity.to_public(), content.as_bytes()).map_err(|e| self.crypto_err(e))?;

    let temp_path = self.path.with_extension("tmp");
    write_private(&temp_path, &encrypted).map_err(self.io_err(&temp_path))?;
    fs::rename(&temp_path, &self.path).map_err(self.io_err(&self.path))?;
    debug!(path = %self.path.display(), count = values.len(), "saved vault");
    Ok(())
  }
}

impl Vault for FileVault {
  fn name(&self) -> &'static str {
    "file"
  }

  fn description(&self) -> &'static str {
    "Keeps values in an age-encrypted file under the user's data directory (vault_file in config.yml). \
     The key is kept next to it in <vault_file>.key; share the key file to share access."
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
    self.load()?.remove(&key).ok_or(VaultError::NotFound(key))
  }

  fn set(&mut self, context: &str, group: &str, prop: &str, value: &str) -> Result<(), VaultError> {
    let mut values = self.load()?;
    values.insert(self.build_key(context, group, prop), value.to_string());
    self.save(&values)
  }

  fn delete(&mut self, context: &str, group: &str, prop: &str) -> Result<(), VaultError> {
    let mut values = self.load()?;
    if values.remove(&self.build_key(context, group, prop)).is_some() {
      self.save(&values)?;
    }
    Ok(())
  }

  fn build_key(&self, context: &str, group: &str, prop: &str) -> String {
    format!("{}/{}/{}", context, group, prop)
  }
}
