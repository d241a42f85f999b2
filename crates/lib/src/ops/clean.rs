//! Delete local copies of cataloged files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{
  CleanResult, OpError, Visited, filter_for, linked_filter, load_linked, open_existing, secrets_path,
};
use crate::catalog::{Catalog, Filter};
use crate::options::UserOptions;
use crate::path::substitute_env;

/// Remove the primary, `.secrets` and alternate copies of every selected
/// entry, descending into linked catalogs. Missing files are skipped.
pub fn clean(working_dir: &Path, options: &UserOptions) -> Result<CleanResult, OpError> {
  let catalog = open_existing(working_dir, options)?;
  let filter = Filter {
    version: None,
    ..filter_for(&catalog, options)
  };
  if catalog.files_by(&filter).is_empty() {
    return Err(OpError::NotCataloged);
  }

  let mut result = CleanResult::default();
  let mut visited = Visited::default();
  clean_catalog(&catalog, &filter, 0, &mut visited, &mut result);
  Ok(result)
}

fn clean_catalog(catalog: &Catalog, filter: &Filter, depth: usize, visited: &mut Visited, result: &mut CleanResult) {
  if !visited.enter(catalog, depth) {
    return;
  }

  for entry in catalog.walk_files(filter) {
    if entry.is_ref {
      if let Some(linked_filter) = linked_filter(filter, &entry) {
        match load_linked(catalog, &entry) {
          Ok(linked) => clean_catalog(&linked, &linked_filter, depth + 1, visited, result),
          Err(e) => debug!(path = %entry.path, error = %e, "skipping unreadable linked catalog"),
        }
      }
      continue;
    }

    let local = catalog.local_path(&entry.path);
    let mut targets: Vec<PathBuf> = vec![secrets_path(&local), local];
    if let Some(alternate) = &entry.alternate_path {
      targets.push(catalog.local_path(&substitute_env(alternate)));
    }
    for target in targets {
      remove(target, result);
    }
  }
}

fn remove(path: PathBuf, result: &mut CleanResult) {
  match fs::remove_file(&path) {
    Ok(()) => {
      debug!(path = %path.display(), "removed local file");
      result.removed.push(path);
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => result.failed.push((path, e)),
  }
}
