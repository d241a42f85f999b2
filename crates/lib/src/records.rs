//! `NAME=VALUE` record handling for `env` content.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to parse env records: {0}")]
  Parse(#[source] dotenvy::Error),
}

/// Parse env content into records in file order. A repeated name keeps its
/// first position and its last value.
pub fn parse(bytes: &[u8]) -> Result<Vec<(String, String)>, RecordError> {
  let mut records: Vec<(String, String)> = Vec::new();
  let mut index: BTreeMap<String, usize> = BTreeMap::new();

  for item in dotenvy::from_read_iter(bytes) {
    let (name, value) = item.map_err(RecordError::Parse)?;
    match index.get(&name) {
      Some(&at) => records[at].1 = value,
      None => {
        index.insert(name.clone(), records.len());
        records.push((name, value));
      }
    }
  }

  Ok(records)
}

fn quote(value: &str) -> String {
  let plain = value
    .chars()
    .all(|c| !c.is_whitespace() && !matches!(c, '#' | '"' | '\'' | '\\' | '$'));
  if plain {
    return value.to_string();
  }
  if !value.contains('\'') {
    return format!("'{}'", value);
  }

  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' | '\\' | '$' => {
        out.push('\\');
        out.push(c);
      }
      '\n' => out.push_str("\\n"),
      _ => out.push(c),
    }
  }
  out.push('"');
  out
}

/// Render records as `NAME=VALUE` lines, quoting values that need it.
pub fn render<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<u8> {
  let mut out = String::new();
  for (name, value) in records {
    out.push_str(name);
    out.push('=');
    out.push_str(&quote(value));
    out.push('\n');
  }
  out.into_bytes()
}

/// Drop the records whose names are already set in the process environment.
pub fn without_existing(bytes: &[u8]) -> Result<Vec<u8>, RecordError> {
  let records = parse(bytes)?;
  Ok(render(
    records
      .iter()
      .filter(|(name, _)| std::env::var_os(name).is_none())
      .map(|(n, v)| (n.as_str(), v.as_str())),
  ))
}
