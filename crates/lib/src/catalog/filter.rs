//! Entry selection by path, tag expression and version.

use super::{Catalog, FileEntry};
use crate::options::TagFilter;

/// Selection criteria. Empty criteria select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
  pub paths: Vec<String>,
  pub tags: TagFilter,
  pub version: Option<String>,
}

impl Filter {
  fn keeps_path(&self, entry: &FileEntry) -> bool {
    self.paths.is_empty() || self.paths.iter().any(|p| *p == entry.path)
  }

  fn keeps_tags(&self, entry: &FileEntry) -> bool {
    (entry.is_ref && entry.tags.is_empty()) || self.tags.matches(&entry.tags)
  }

  fn keeps_version(&self, entry: &FileEntry) -> bool {
    match self.version.as_deref() {
      None | Some("") => true,
      Some(version) => entry.has_version(version),
    }
  }

  pub fn keeps(&self, entry: &FileEntry) -> bool {
    self.keeps_path(entry) && self.keeps_tags(entry) && self.keeps_version(entry)
  }

  /// The same filter without the version criterion.
  pub fn without_version(&self) -> Self {
    Self {
      version: None,
      ..self.clone()
    }
  }
}

impl Catalog {
  /// Entries matching every criterion of `filter`, ordered by path.
  pub fn files_by(&self, filter: &Filter) -> Vec<FileEntry> {
    let mut files: Vec<FileEntry> = self.files.values().filter(|f| filter.keeps(f)).cloned().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
  }

  /// Entries for a recursive walk: the matching entries plus every linked
  /// catalog, ordered by path.
  pub fn walk_files(&self, filter: &Filter) -> Vec<FileEntry> {
    let mut files: Vec<FileEntry> = self
      .files
      .values()
      .filter(|f| f.is_ref || filter.keeps(f))
      .cloned()
      .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
  }
}
