//! Tokens in JSON documents.
//!
//! Every string leaf reachable through objects is scanned. Arrays are not
//! descended into. A document is only re-serialized when a substitution
//! changed it.

use serde_json::{Map, Value};

use super::{Token, TokenError, Tokens, parse, substitute};

fn leaf_path(root: &str, name: &str) -> String {
  if root.is_empty() {
    name.to_string()
  } else {
    format!("{}/{}", root, name)
  }
}

pub(super) fn find(bytes: &[u8], with_values: bool) -> Result<Tokens, TokenError> {
  let doc: Value = serde_json::from_slice(bytes).map_err(TokenError::Json)?;
  let mut tokens = Tokens::new();
  if let Value::Object(map) = &doc {
    collect(map, "", with_values, &mut tokens);
  }
  Ok(tokens)
}

fn collect(map: &Map<String, Value>, root: &str, with_values: bool, tokens: &mut Tokens) {
  for (name, value) in map {
    let path = leaf_path(root, name);
    match value {
      Value::Object(inner) => collect(inner, &path, with_values, tokens),
      Value::String(text) => {
        for raw in parse::tokens(text) {
          if raw.default.is_some() != with_values {
            continue;
          }
          let token = Token::from_raw(&path, &raw, false);
          tokens.insert(token.key(), token);
        }
      }
      _ => {}
    }
  }
}

pub(super) fn replace(bytes: &[u8], tokens: &Tokens, formatted: bool) -> Result<Vec<u8>, TokenError> {
  let mut doc: Value = serde_json::from_slice(bytes).map_err(TokenError::Json)?;
  let changed = match &mut doc {
    Value::Object(map) => rewrite(map, "", tokens, formatted),
    _ => false,
  };
  if !changed {
    return Ok(bytes.to_vec());
  }
  serde_json::to_vec_pretty(&doc).map_err(TokenError::Json)
}

fn rewrite(map: &mut Map<String, Value>, root: &str, tokens: &Tokens, formatted: bool) -> bool {
  let mut changed = false;
  for (name, value) in map.iter_mut() {
    let path = leaf_path(root, name);
    match value {
      Value::Object(inner) => changed |= rewrite(inner, &path, tokens, formatted),
      Value::String(text) => {
        let next = substitute(text, tokens, formatted, |raw| Token::from_raw(&path, raw, false));
        if next != *text {
          *text = next;
          changed = true;
        }
      }
      _ => {}
    }
  }
  changed
}
