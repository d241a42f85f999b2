//! Catalog listing.

use std::path::Path;

use super::{ListNode, ListResult, OpError, Visited, filter_for, linked_filter, load_linked, open_existing};
use crate::catalog::{Catalog, FileEntry, Filter};
use crate::options::UserOptions;

/// Build the tree of entries selected by `options`, expanding linked
/// catalogs in place.
pub fn list(working_dir: &Path, options: &UserOptions) -> Result<ListResult, OpError> {
  let catalog = open_existing(working_dir, options)?;
  let filter = Filter {
    version: None,
    ..filter_for(&catalog, options)
  };

  let mut visited = Visited::default();
  let nodes = list_catalog(&catalog, &filter, 0, &mut visited);
  Ok(ListResult {
    catalog: catalog.path.clone(),
    nodes,
  })
}

fn node(entry: FileEntry, children: Vec<ListNode>, error: Option<String>) -> ListNode {
  ListNode {
    path: entry.path,
    store: entry.store,
    tags: entry.tags,
    versions: entry.versions,
    children,
    is_ref: entry.is_ref,
    error,
  }
}

fn list_catalog(catalog: &Catalog, filter: &Filter, depth: usize, visited: &mut Visited) -> Vec<ListNode> {
  if !visited.enter(catalog, depth) {
    return Vec::new();
  }

  let mut nodes = Vec::new();
  for entry in catalog.walk_files(filter) {
    if !entry.is_ref {
      nodes.push(node(entry, Vec::new(), None));
      continue;
    }
    let Some(linked_filter) = linked_filter(filter, &entry) else {
      continue;
    };
    let listed = match load_linked(catalog, &entry) {
      Ok(linked) => node(entry, list_catalog(&linked, &linked_filter, depth + 1, visited), None),
      Err(e) => node(entry, Vec::new(), Some(e.to_string())),
    };
    nodes.push(listed);
  }
  nodes
}
