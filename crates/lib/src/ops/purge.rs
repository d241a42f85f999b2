//! Delete remote copies.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{EntryError, EntryState, OpError, PurgeResult, Report, filter_for, open_existing, outcome};
use crate::catalog::ghost::Ghost;
use crate::catalog::{Catalog, FileEntry, PullLog};
use crate::options::UserOptions;
use crate::path::dir_of;
use crate::prompt::{Prompt, Severity};
use crate::remote::Registry;

fn confirmation(files: &[FileEntry], version: Option<&str>) -> String {
  let mut message = String::from(
    "File data will be permanently deleted from remote storage! Local files and secrets will not be affected.\n\n",
  );
  for file in files {
    match version {
      Some(version) => message.push_str(&format!("Delete [{}]({}) from [{}]\n", file.path, version, file.store)),
      None => message.push_str(&format!("Delete [{}] from [{}]\n", file.path, file.store)),
    }
  }
  message.push_str("\nContinue?");
  message
}

/// Purge the entries selected by `options` after a danger confirmation.
///
/// Without a version every version and then the base object are purged and
/// the entry leaves the catalog. The base is kept when any version fails, so
/// the entry keeps exactly the versions still stored. Links are only removed
/// from the catalog; linked catalogs are never touched.
pub fn purge(
  registry: &Registry,
  working_dir: &Path,
  options: &UserOptions,
  prompt: &mut dyn Prompt,
) -> Result<PurgeResult, OpError> {
  let mut catalog = open_existing(working_dir, options)?;
  let files = catalog.files_by(&filter_for(&catalog, options));
  if files.is_empty() {
    return Ok(PurgeResult::NothingMatched);
  }

  let version = options.version.as_deref();
  let message = confirmation(&files, version);
  if !prompt.confirm(&message, Severity::Danger).map_err(OpError::Prompt)? {
    info!("purge aborted");
    return Ok(PurgeResult::Aborted);
  }

  let log = registry.pull_log();
  let mut report = Report::default();
  for mut entry in files {
    if entry.is_ref {
      catalog.remove_entry(&entry.path);
      debug!(path = %entry.path, "unlinked catalog");
      report.push(outcome("", &entry, None, EntryState::Linked));
      continue;
    }

    if let Some(access) = &options.access_vault {
      entry.vaults.access = access.clone();
    }
    if let Some(secrets) = &options.secrets_vault {
      entry.vaults.secrets = secrets.clone();
    }

    let state = match purge_entry(registry, &mut catalog, &log, &mut entry, options, prompt) {
      Ok(()) => EntryState::Done,
      Err(e) => {
        debug!(path = %entry.path, error = %e, "purge failed");
        EntryState::Failed(e)
      }
    };
    report.push(outcome("", &entry, version, state));
  }

  let saved = catalog.save()?;
  Ok(PurgeResult::Purged { report, catalog: saved })
}

fn purge_entry(
  registry: &Registry,
  catalog: &mut Catalog,
  log: &PullLog,
  entry: &mut FileEntry,
  options: &UserOptions,
  prompt: &mut dyn Prompt,
) -> Result<(), EntryError> {
  let mut components = registry.resolve(catalog, entry, options, prompt)?;
  let store = components.store.as_mut();

  if let Some(version) = options.version.as_deref() {
    store.purge(entry, Some(version))?;
    entry.remove_version(version);
    catalog.update_entry(entry.clone())?;
    info!(path = %entry.path, version, "purged version");
    return Ok(());
  }

  let mut first_error = None;
  for version in entry.versions.clone() {
    match store.purge(entry, Some(&version)) {
      Ok(()) => entry.remove_version(&version),
      Err(e) => {
        warn!(path = %entry.path, version = %version, error = %e, "could not purge version");
        first_error.get_or_insert(e);
      }
    }
  }
  if let Some(e) = first_error {
    catalog.update_entry(entry.clone())?;
    return Err(e.into());
  }

  store.purge(entry, None)?;
  catalog.remove_entry(&entry.path);

  if let Err(e) = log.remove(&catalog.context_key(&entry.key())) {
    warn!(path = %entry.path, error = %e, "could not remove pull record");
  }

  let dir = dir_of(&entry.path);
  if !dir.is_empty()
    && !catalog.any_files_in(&dir)
    && let Err(e) = Ghost::remove(&catalog.local_path(&dir))
  {
    warn!(dir = %dir, error = %e, "could not remove ghost marker");
  }

  info!(path = %entry.path, "purged");
  Ok(())
}
