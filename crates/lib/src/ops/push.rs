//! Upload local files to their stores.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use super::{EntryError, EntryState, OpError, PushResult, Report, outcome, secrets_path, user_paths};
use crate::catalog::ghost::Ghost;
use crate::catalog::{Catalog, CatalogError, FileEntry, Filter, PullLog};
use crate::options::UserOptions;
use crate::path::{dir_of, tags_from};
use crate::prompt::{Prompt, Severity};
use crate::remote::Registry;
use crate::store::Feature;
use crate::token;

/// Push the files named in `options`, or every cataloged file when none are
/// named.
///
/// The catalog is created on first push and saved once every entry has been
/// processed.
pub fn push(
  registry: &Registry,
  working_dir: &Path,
  options: &UserOptions,
  prompt: &mut dyn Prompt,
) -> Result<PushResult, OpError> {
  let mut catalog = Catalog::open(working_dir, &options.catalog)?;
  let log = registry.pull_log();
  let mut report = Report::default();

  for path in paths_to_push(&catalog, options) {
    let mut entry = FileEntry::new(&path);
    let state = match push_entry(registry, &mut catalog, &log, &mut entry, options, prompt) {
      Ok(state) => state,
      Err(e) => {
        debug!(path = %path, error = %e, "push failed");
        EntryState::Failed(e)
      }
    };
    report.push(outcome("", &entry, options.version.as_deref(), state));
  }

  let saved = catalog.save()?;
  Ok(PushResult {
    report,
    catalog: saved,
  })
}

fn paths_to_push(catalog: &Catalog, options: &UserOptions) -> Vec<String> {
  let candidates = if options.paths.is_empty() {
    let filter = Filter {
      tags: options.tags.clone(),
      ..Default::default()
    };
    catalog
      .files_by(&filter)
      .into_iter()
      .filter(|f| !f.is_ref)
      .map(|f| f.path)
      .collect()
  } else {
    user_paths(catalog, options)
  };

  let mut paths: Vec<String> = Vec::with_capacity(candidates.len());
  for path in candidates {
    if !paths.contains(&path) {
      paths.push(path);
    }
  }
  paths
}

/// Apply the per-invocation choices to an entry.
pub(super) fn apply_options(entry: &mut FileEntry, options: &UserOptions) -> Result<(), EntryError> {
  if let Some(alternate) = &options.alternate_path {
    entry.alternate_path = Some(alternate.clone());
  }
  if options.delete_after_push {
    entry.delete_after_push = true;
  }

  if !options.paths.is_empty() && !options.tags.is_empty() {
    entry.tags = options.tags.tags.clone();
  } else if entry.tags.is_empty() {
    entry.tags = tags_from(&entry.path);
  }

  if let Some(store) = &options.store {
    if !entry.store.is_empty() && entry.store != *store {
      return Err(
        CatalogError::StoreChange {
          path: entry.path.clone(),
          from: entry.store.clone(),
          to: store.clone(),
        }
        .into(),
      );
    }
    entry.store = store.clone();
  }
  if let Some(access) = &options.access_vault {
    entry.vaults.access = access.clone();
  }
  if let Some(secrets) = &options.secrets_vault {
    entry.vaults.secrets = secrets.clone();
  }
  Ok(())
}

fn push_entry(
  registry: &Registry,
  catalog: &mut Catalog,
  log: &PullLog,
  entry: &mut FileEntry,
  options: &UserOptions,
  prompt: &mut dyn Prompt,
) -> Result<EntryState, EntryError> {
  let local = catalog.local_path(&entry.path);
  let bytes = fs::read(&local).map_err(|source| match source.kind() {
    io::ErrorKind::NotFound => EntryError::NotFound(local.display().to_string()),
    _ => EntryError::Io {
      path: local.clone(),
      source,
    },
  })?;

  let (found, _) = catalog.lookup_entry(&entry.path, &bytes);
  *entry = found;
  apply_options(entry, options)?;

  if entry.is_ref {
    catalog.update_entry(entry.clone())?;
    info!(path = %entry.path, "linked catalog");
    return Ok(EntryState::Linked);
  }

  if bytes.is_empty() {
    return Err(EntryError::InvalidInput(format!("{} is empty", entry.path)));
  }

  let mut components = registry.resolve(catalog, entry, options, prompt)?;
  let store = components.store.as_mut();

  if !store.supports_file_type(&entry.file_type) {
    return Err(EntryError::Unsupported(format!(
      "store '{}' does not support '{}' files",
      store.name(),
      entry.file_type
    )));
  }

  let version = options.version.as_deref();
  if version.is_some() && !store.supports_feature(Feature::Versioning) {
    return Err(EntryError::Unsupported(format!(
      "store '{}' does not support {}",
      store.name(),
      Feature::Versioning
    )));
  }

  let context_key = catalog.context_key(&entry.key());
  match store.changed(entry, &bytes, version) {
    Ok(Some(last)) if !log.is_current(&context_key, Some(last)) => {
      let message = format!(
        "Remotely stored data '{}' was modified on {}. Overwrite?",
        entry.path,
        last.format("%Y-%m-%d %H:%M:%S UTC")
      );
      if !prompt.confirm(&message, Severity::Warn).map_err(EntryError::Prompt)? {
        return Ok(EntryState::Skipped("remote copy changed since last pull".to_string()));
      }
    }
    Ok(_) => {}
    Err(e) => warn!(path = %entry.path, error = %e, "could not check for remote changes"),
  }

  let mut payload = bytes;
  if entry.supports_secrets() {
    let tokens = token::find(&payload, &entry.file_type, true)?;
    if !tokens.is_empty() {
      for token in tokens.values() {
        components
          .secrets
          .set(&catalog.context, &token.secret_key(), &token.prop, &token.value)?;
      }
      payload = token::strip_defaults(&payload)?;
      if let Err(e) = fs::write(&local, &payload) {
        warn!(path = %local.display(), error = %e, "could not remove secrets from local file");
      }
      debug!(path = %entry.path, count = tokens.len(), "moved secrets to vault");
    }
  }

  components.store.push(entry, &payload, version)?;
  if let Some(version) = version {
    entry.add_version(version);
  }
  catalog.update_entry(entry.clone())?;

  if let Err(e) = log.record(&context_key, Utc::now() + Duration::seconds(1)) {
    warn!(path = %entry.path, error = %e, "could not record pull time");
  }

  let dir = dir_of(&entry.path);
  if !dir.is_empty()
    && let Err(e) = Ghost::write(&catalog.local_path(&dir), &dir)
  {
    warn!(dir = %dir, error = %e, "could not write ghost marker");
  }

  if entry.delete_after_push {
    remove_local(&local);
    remove_local(&secrets_path(&local));
  }

  info!(path = %entry.path, store = %entry.store, "pushed");
  Ok(EntryState::Done)
}

fn remove_local(path: &Path) {
  match fs::remove_file(path) {
    Ok(()) => debug!(path = %path.display(), "deleted local file"),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => warn!(path = %path.display(), error = %e, "could not delete local file"),
  }
}
