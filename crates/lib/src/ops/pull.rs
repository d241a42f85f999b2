//! Restore files from their stores.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{
  EntryError, EntryState, OpError, PullResult, Report, Visited, filter_for, format_export, linked_filter, load_linked,
  open_existing, outcome, secrets_path, write_local,
};
use crate::catalog::{Catalog, FileEntry, Filter, PullLog};
use crate::options::UserOptions;
use crate::path::{build_path, dir_of, substitute_env};
use crate::prompt::Prompt;
use crate::records;
use crate::remote::Registry;
use crate::token;

struct Puller<'a> {
  registry: &'a Registry,
  options: &'a UserOptions,
  log: PullLog,
  visited: Visited,
  report: Report,
  /// Env content collected for export, in pull order.
  export: Vec<u8>,
}

/// Pull the entries selected by `options`, descending into linked catalogs.
///
/// Fails with [`OpError::NotCataloged`] when nothing matches. With an export
/// format set, env content is collected and formatted instead of written.
pub fn pull(
  registry: &Registry,
  working_dir: &Path,
  options: &UserOptions,
  prompt: &mut dyn Prompt,
) -> Result<PullResult, OpError> {
  let catalog = open_existing(working_dir, options)?;
  let filter = filter_for(&catalog, options);

  let mut puller = Puller {
    registry,
    options,
    log: registry.pull_log(),
    visited: Visited::default(),
    report: Report::default(),
    export: Vec::new(),
  };
  puller.walk(&catalog, "", &filter, 0, prompt);

  if puller.report.entries.is_empty() {
    return Err(OpError::NotCataloged);
  }

  let export = match options.export {
    Some(format) if !puller.export.is_empty() => Some(format_export(format, &puller.export)?),
    _ => None,
  };
  Ok(PullResult {
    report: puller.report,
    export,
  })
}

impl Puller<'_> {
  fn walk(&mut self, catalog: &Catalog, prefix: &str, filter: &Filter, depth: usize, prompt: &mut dyn Prompt) {
    if !self.visited.enter(catalog, depth) {
      return;
    }

    let mut selected = filter.clone();
    if selected.version.is_some() && catalog.files_by(&selected).is_empty() {
      debug!(version = ?selected.version, "no entries at version, pulling current");
      selected = selected.without_version();
    }

    for mut entry in catalog.walk_files(&selected) {
      if entry.is_ref {
        self.follow(catalog, prefix, &entry, &selected, depth, prompt);
        continue;
      }

      self.apply_options(&mut entry);
      let version = selected.version.as_deref();
      let state = match self.pull_entry(catalog, &mut entry, version, prompt) {
        Ok(state) => state,
        Err(e) => {
          debug!(path = %entry.path, error = %e, "pull failed");
          EntryState::Failed(e)
        }
      };
      self.report.push(outcome(prefix, &entry, version, state));
    }
  }

  fn follow(
    &mut self,
    catalog: &Catalog,
    prefix: &str,
    link: &FileEntry,
    filter: &Filter,
    depth: usize,
    prompt: &mut dyn Prompt,
  ) {
    let Some(linked_filter) = linked_filter(filter, link) else {
      return;
    };
    match load_linked(catalog, link) {
      Ok(linked) => {
        let prefix = build_path(prefix, &dir_of(&link.path));
        self.walk(&linked, &prefix, &linked_filter, depth + 1, prompt);
      }
      Err(e) => self.report.push(outcome(prefix, link, None, EntryState::Failed(e))),
    }
  }

  fn apply_options(&self, entry: &mut FileEntry) {
    if let Some(access) = &self.options.access_vault {
      entry.vaults.access = access.clone();
    }
    if let Some(secrets) = &self.options.secrets_vault {
      entry.vaults.secrets = secrets.clone();
    }
    if let Some(alternate) = &self.options.alternate_path {
      entry.alternate_path = Some(alternate.clone());
    }
  }

  fn pull_entry(
    &mut self,
    catalog: &Catalog,
    entry: &mut FileEntry,
    version: Option<&str>,
    prompt: &mut dyn Prompt,
  ) -> Result<EntryState, EntryError> {
    let options = self.options;
    let components = self.registry.resolve(catalog, entry, options, prompt)?;
    let mut store = components.store;
    let (mut bytes, _) = store.pull(entry, version)?;

    if options.no_overwrite && entry.is_env() {
      bytes = records::without_existing(&bytes)?;
    }

    let mut file = bytes.clone();
    let mut with_secrets = bytes;
    if options.inject_secrets || options.modify_secrets {
      if !entry.supports_secrets() {
        return Err(EntryError::Unsupported(format!(
          "'{}' files do not support secrets",
          entry.file_type
        )));
      }
      let mut tokens = token::find(&file, &entry.file_type, false)?;
      for token in tokens.values_mut() {
        token.value = components
          .secrets
          .get(&catalog.context, &token.secret_key(), &token.prop)?;
      }
      if options.modify_secrets {
        file = token::replace(&file, &entry.file_type, &tokens, true)?;
      }
      if options.inject_secrets {
        with_secrets = token::replace(&with_secrets, &entry.file_type, &tokens, false)?;
      }
    }

    if options.export.is_some() {
      if !entry.is_env() {
        return Err(EntryError::Unsupported(format!(
          "export formats apply to env files, not '{}'",
          entry.file_type
        )));
      }
      self.export.extend_from_slice(&with_secrets);
      if !self.export.is_empty() && !self.export.ends_with(b"\n") {
        self.export.push(b'\n');
      }
      return Ok(EntryState::Done);
    }

    let local = catalog.local_path(&entry.path);
    if options.alternate_path.is_none() {
      write_local(&local, &file)?;
    }
    if options.inject_secrets {
      write_local(&secrets_path(&local), &with_secrets)?;
    }
    if let Some(alternate) = &entry.alternate_path {
      write_local(&catalog.local_path(&substitute_env(alternate)), &with_secrets)?;
    }

    if let Err(e) = self.log.record(&catalog.context_key(&entry.key()), Utc::now()) {
      warn!(path = %entry.path, error = %e, "could not record pull time");
    }

    info!(path = %entry.path, store = %entry.store, "pulled");
    Ok(EntryState::Done)
  }
}
