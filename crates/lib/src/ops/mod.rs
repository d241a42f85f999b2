//! The cstore operations.
//!
//! Each operation opens the catalog for the working directory, selects
//! entries, works through them one by one and saves the catalog at the end.
//! Back-ends come from a [`Registry`](crate::remote::Registry) and every
//! question goes through a [`Prompt`](crate::prompt::Prompt).

mod clean;
mod export;
mod init;
mod list;
mod pull;
mod purge;
mod push;
mod types;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

pub use clean::clean;
pub use export::format_export;
pub use init::init;
pub use list::list;
pub use pull::pull;
pub use purge::purge;
pub use push::push;
pub use types::*;

use crate::catalog::{Catalog, FileEntry, Filter};
use crate::consts::{MAX_REF_DEPTH, SECRETS_SUFFIX};
use crate::options::UserOptions;
use crate::path::{dir_of, normalize};

/// Open the catalog for `working_dir`, failing when it doesn't exist yet.
fn open_existing(working_dir: &Path, options: &UserOptions) -> Result<Catalog, OpError> {
  let catalog = Catalog::open(working_dir, &options.catalog)?;
  if !catalog.exists() {
    return Err(OpError::NoCatalog(catalog.path.clone()));
  }
  Ok(catalog)
}

/// User supplied paths in catalog form.
fn user_paths(catalog: &Catalog, options: &UserOptions) -> Vec<String> {
  options
    .paths
    .iter()
    .map(|p| catalog.full_path(&normalize(p)))
    .collect()
}

fn filter_for(catalog: &Catalog, options: &UserOptions) -> Filter {
  Filter {
    paths: user_paths(catalog, options),
    tags: options.tags.clone(),
    version: options.version.clone(),
  }
}

fn outcome(prefix: &str, entry: &FileEntry, version: Option<&str>, state: EntryState) -> EntryOutcome {
  EntryOutcome {
    path: crate::path::build_path(prefix, &entry.path),
    version: version.map(str::to_string),
    store: entry.store.clone(),
    state,
  }
}

fn write_local(path: &Path, bytes: &[u8]) -> Result<(), EntryError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(EntryError::io(parent))?;
  }
  fs::write(path, bytes).map_err(EntryError::io(path))
}

/// `<path>.secrets`, the injected sibling of a pulled file.
fn secrets_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(SECRETS_SUFFIX);
  name.into()
}

/// Catalogs already entered during a recursive walk.
#[derive(Debug, Default)]
struct Visited {
  seen: BTreeSet<PathBuf>,
}

impl Visited {
  /// Mark `catalog` as entered at `depth`. Returns `false` when it was
  /// entered before or the walk is too deep.
  fn enter(&mut self, catalog: &Catalog, depth: usize) -> bool {
    if depth > MAX_REF_DEPTH {
      warn!(path = %catalog.path.display(), "linked catalogs nested too deeply, skipping");
      return false;
    }
    let id = dunce::canonicalize(&catalog.path).unwrap_or_else(|_| catalog.path.clone());
    if !self.seen.insert(id) {
      warn!(path = %catalog.path.display(), "catalog already visited, skipping link");
      return false;
    }
    true
  }
}

/// Load the catalog a reference entry points at.
fn load_linked(catalog: &Catalog, entry: &FileEntry) -> Result<Catalog, EntryError> {
  let path = catalog.local_path(&entry.path);
  match Catalog::load(&path)? {
    Some(linked) => Ok(linked),
    None => Err(EntryError::NotFound(path.display().to_string())),
  }
}

/// Narrow `filter` to a linked catalog in `link`'s directory.
///
/// Paths below the link's directory are rebased onto it; naming the link
/// itself selects everything in it. Returns `None` when the user named paths
/// and none of them lead into the link.
fn linked_filter(filter: &Filter, link: &FileEntry) -> Option<Filter> {
  if filter.paths.is_empty() || filter.paths.contains(&link.path) {
    return Some(Filter {
      paths: Vec::new(),
      ..filter.clone()
    });
  }
  let dir = dir_of(&link.path);
  let paths: Vec<String> = filter
    .paths
    .iter()
    .filter_map(|p| p.strip_prefix(dir.as_str()))
    .filter(|p| !p.is_empty())
    .map(str::to_string)
    .collect();
  if paths.is_empty() {
    None
  } else {
    Some(Filter {
      paths,
      ..filter.clone()
    })
  }
}
