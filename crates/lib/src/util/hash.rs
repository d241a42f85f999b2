//! Hashing for catalog entry keys.
//!
//! An entry key is the truncated SHA-256 of the entry's logical path, so two
//! entries collide only when their paths are equal.

use sha2::{Digest, Sha256};

use crate::consts::ENTRY_KEY_LEN;

/// Hash arbitrary bytes into a full 64-character hex digest.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  hex::encode(hasher.finalize())
}

/// Deterministic key for the entry tracking `path`.
pub fn entry_key(path: &str) -> String {
  let full = hash_bytes(path.as_bytes());
  full[..ENTRY_KEY_LEN].to_string()
}
