//! Logical path helpers.
//!
//! Catalog paths are always `/`-separated and relative to the catalog's
//! directory, regardless of platform.

use std::path::{Component, Path};

/// Normalize a user supplied path into the catalog's logical form.
///
/// Backslashes become `/`, leading `./` segments and duplicate separators are
/// dropped.
pub fn normalize(path: &str) -> String {
  let unified = path.replace('\\', "/");
  unified
    .split('/')
    .filter(|part| !part.is_empty() && *part != ".")
    .collect::<Vec<_>>()
    .join("/")
}

/// Directory portion of a logical path including the trailing `/`, or an empty
/// string for paths at the catalog root.
pub fn dir_of(path: &str) -> String {
  match path.rfind('/') {
    Some(end) => path[..=end].to_string(),
    None => String::new(),
  }
}

/// Join a logical prefix and a path.
pub fn build_path(root: &str, path: &str) -> String {
  if root.is_empty() {
    path.to_string()
  } else if root.ends_with('/') {
    format!("{}{}", root, path)
  } else {
    format!("{}/{}", root, path)
  }
}

/// Tags derived from a path's directory components.
pub fn tags_from(path: &str) -> Vec<String> {
  let dir = dir_of(path);
  dir
    .split('/')
    .filter(|part| !part.is_empty() && *part != "..")
    .map(str::to_string)
    .collect()
}

/// Lower-case extension of a path without the dot.
pub fn extension(path: &str) -> String {
  Path::new(path)
    .extension()
    .map(|ext| ext.to_string_lossy().to_lowercase())
    .unwrap_or_default()
}

/// Number of directory levels a relative directory descends.
pub fn depth(dir: &str) -> usize {
  Path::new(dir)
    .components()
    .filter(|c| matches!(c, Component::Normal(_)))
    .count()
}

/// Replace `${NAME}` references with environment variable values.
///
/// Unset variables are left in place.
pub fn substitute_env(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  let mut rest = value;

  while let Some(start) = rest.find("${") {
    out.push_str(&rest[..start]);
    let after = &rest[start + 2..];
    let Some(end) = after.find('}') else {
      out.push_str(&rest[start..]);
      return out;
    };

    let name = &after[..end];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    match std::env::var(name) {
      Ok(found) if valid => out.push_str(&found),
      _ => out.push_str(&rest[start..start + 2 + end + 1]),
    }
    rest = &after[end + 1..];
  }

  out.push_str(rest);
  out
}
