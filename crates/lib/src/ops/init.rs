//! Create a catalog without touching any back-end.

use std::fs;
use std::path::Path;

use tracing::info;

use super::push::apply_options;
use super::{EntryError, EntryState, InitResult, OpError, Report, outcome, user_paths};
use crate::catalog::{Catalog, FileEntry};
use crate::options::UserOptions;

/// Write the catalog for `working_dir`, adding the paths named in `options`.
///
/// Entries get their type, tags and link status from the local files; store
/// and vaults stay as given until the first push resolves them.
pub fn init(working_dir: &Path, options: &UserOptions) -> Result<InitResult, OpError> {
  let mut catalog = Catalog::open(working_dir, &options.catalog)?;
  let created = !catalog.exists();
  let mut report = Report::default();

  for path in user_paths(&catalog, options) {
    let local = catalog.local_path(&path);
    let added = fs::read(&local).map_err(EntryError::io(&local)).and_then(|bytes| {
      let (mut entry, _) = catalog.lookup_entry(&path, &bytes);
      apply_options(&mut entry, options)?;
      let is_ref = entry.is_ref;
      catalog.update_entry(entry.clone())?;
      Ok((entry, is_ref))
    });
    match added {
      Ok((entry, is_ref)) => {
        let state = if is_ref { EntryState::Linked } else { EntryState::Done };
        report.push(outcome("", &entry, None, state));
      }
      Err(e) => report.push(outcome("", &FileEntry::new(&path), None, EntryState::Failed(e))),
    }
  }

  catalog.write()?;
  info!(path = %catalog.path.display(), created, "initialized catalog");
  Ok(InitResult {
    catalog: catalog.path.clone(),
    created,
    report,
  })
}
