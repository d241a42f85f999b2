//! Tokens externalize values from tracked files.
//!
//! A file may reference a value kept in a secrets vault with
//! `{{group/prop}}`, or carry the value inline once with
//! `{{group/prop::value}}` so a push can move it into the vault.
//!
//! Where a token sits gives it its identity: in an `env` file it is the
//! variable name of the line, in a `json` file the `/`-joined path of the
//! string leaf. Two tokens are equal when their [`Token::key`] is.

mod env;
mod json;
pub mod parse;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::consts::NOT_FOUND;
use parse::{RawToken, Segment};

/// Tokens keyed by [`Token::key`].
pub type Tokens = BTreeMap<String, Token>;

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("file type '{0}' does not support tokens")]
  UnsupportedType(String),

  #[error("file content is not valid UTF-8")]
  Encoding(#[source] std::str::Utf8Error),

  #[error("failed to parse json: {0}")]
  Json(#[source] serde_json::Error),
}

/// A token bound to its location in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  /// Variable name (env) or leaf path (json) the token sits in.
  pub env_var: String,
  /// Reference segments before the last `/`.
  pub group: String,
  /// Last reference segment.
  pub prop: String,
  /// Default carried by the token, or `[NOT_FOUND]`.
  pub value: String,
}

fn dashed(name: &str) -> String {
  name.replace('_', "-")
}

impl Token {
  pub(crate) fn from_raw(env_var: &str, raw: &RawToken<'_>, lowercase_prop: bool) -> Self {
    let (group, prop) = match raw.reference.rfind('/') {
      Some(split) => (&raw.reference[..split], &raw.reference[split + 1..]),
      None => ("", raw.reference),
    };
    let prop = if lowercase_prop {
      prop.to_lowercase()
    } else {
      prop.to_string()
    };
    Self {
      env_var: env_var.to_string(),
      group: group.to_string(),
      prop,
      value: raw.default.unwrap_or(NOT_FOUND).to_string(),
    }
  }

  /// Canonical identity: `group/env-var/prop`.
  pub fn key(&self) -> String {
    format!("{}/{}", self.secret_key(), self.prop)
  }

  /// Vault group the token's value is stored under.
  pub fn secret_key(&self) -> String {
    if self.group.is_empty() {
      dashed(&self.env_var)
    } else {
      format!("{}/{}", self.group, dashed(&self.env_var))
    }
  }

  /// `group/prop` as written inside the braces.
  pub fn reference(&self) -> String {
    if self.group.is_empty() {
      self.prop.clone()
    } else {
      format!("{}/{}", self.group, self.prop)
    }
  }

  /// `{{group/prop::value}}`
  pub fn formatted(&self) -> String {
    format!("{{{{{}::{}}}}}", self.reference(), self.value)
  }

  pub fn has_value(&self) -> bool {
    self.value != NOT_FOUND
  }
}

/// Whether tokens can be used in files of this type.
pub fn supports_secrets(file_type: &str) -> bool {
  matches!(file_type.to_ascii_lowercase().as_str(), "env" | "json")
}

fn as_str(bytes: &[u8]) -> Result<&str, TokenError> {
  std::str::from_utf8(bytes).map_err(TokenError::Encoding)
}

/// Extract tokens from `bytes`.
///
/// With `with_values`, only tokens carrying a default are returned and the
/// default becomes the token's value. Otherwise only bare references are
/// returned, valued `[NOT_FOUND]`.
pub fn find(bytes: &[u8], file_type: &str, with_values: bool) -> Result<Tokens, TokenError> {
  match file_type.to_ascii_lowercase().as_str() {
    "env" => Ok(env::find(as_str(bytes)?, with_values)),
    "json" => json::find(bytes, with_values),
    other => Err(TokenError::UnsupportedType(other.to_string())),
  }
}

/// Substitute every token of `bytes` found in `tokens`.
///
/// With `formatted`, tokens are rewritten as `{{group/prop::value}}`;
/// otherwise they become the bare value.
pub fn replace(bytes: &[u8], file_type: &str, tokens: &Tokens, formatted: bool) -> Result<Vec<u8>, TokenError> {
  match file_type.to_ascii_lowercase().as_str() {
    "env" => Ok(env::replace(as_str(bytes)?, tokens, formatted).into_bytes()),
    "json" => json::replace(bytes, tokens, formatted),
    other => Err(TokenError::UnsupportedType(other.to_string())),
  }
}

/// Remove the `::value` part of every token.
pub fn strip_defaults(bytes: &[u8]) -> Result<Vec<u8>, TokenError> {
  let text = as_str(bytes)?;
  let mut out = String::with_capacity(text.len());
  for segment in parse::parse(text) {
    match segment {
      Segment::Literal(literal) => out.push_str(literal),
      Segment::Token(token) => {
        out.push_str("{{");
        out.push_str(token.reference);
        out.push_str("}}");
      }
    }
  }
  Ok(out.into_bytes())
}

/// Rebuild `text` with the tokens known to `tokens` substituted.
///
/// `locate` turns a raw token into its keyed form for the current location.
fn substitute(text: &str, tokens: &Tokens, formatted: bool, locate: impl Fn(&RawToken<'_>) -> Token) -> String {
  let mut out = String::with_capacity(text.len());
  for segment in parse::parse(text) {
    match segment {
      Segment::Literal(literal) => out.push_str(literal),
      Segment::Token(raw) => match tokens.get(&locate(&raw).key()) {
        Some(token) if formatted => out.push_str(&token.formatted()),
        Some(token) => out.push_str(&token.value),
        None => {
          out.push_str("{{");
          out.push_str(raw.reference);
          if let Some(default) = raw.default {
            out.push_str("::");
            out.push_str(default);
          }
          out.push_str("}}");
        }
      },
    }
  }
  out
}
