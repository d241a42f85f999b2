//! Types shared by the cstore operations.
//!
//! Operations never stop at the first failing entry. Each entry ends in an
//! [`EntryState`], collected into a [`Report`] the caller prints and turns
//! into an exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{CatalogError, SaveOutcome};
use crate::records::RecordError;
use crate::remote::ResolveError;
use crate::store::StoreError;
use crate::token::TokenError;
use crate::vault::VaultError;

/// Why a single entry failed.
#[derive(Debug, Error)]
pub enum EntryError {
  #[error("{0} not found")]
  NotFound(String),

  #[error("{0}")]
  Unsupported(String),

  #[error("{0}")]
  Conflict(String),

  #[error(transparent)]
  Access(#[from] ResolveError),

  #[error("{0}")]
  Remote(String),

  #[error("{0}")]
  Parse(String),

  #[error("{0}")]
  InvalidInput(String),

  #[error("failed to access {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("confirmation failed: {0}")]
  Prompt(#[source] io::Error),
}

impl EntryError {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> EntryError {
    let path = path.into();
    move |source| EntryError::Io { path, source }
  }
}

impl From<StoreError> for EntryError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::NotFound(what) => EntryError::NotFound(what),
      StoreError::EmptyInput => EntryError::InvalidInput("empty file".to_string()),
      StoreError::Unsupported(what) => EntryError::Unsupported(what),
      StoreError::Io { path, source } => EntryError::Io { path, source },
      StoreError::Records(e) => EntryError::Parse(e.to_string()),
      other => EntryError::Remote(other.to_string()),
    }
  }
}

impl From<VaultError> for EntryError {
  fn from(e: VaultError) -> Self {
    match e {
      VaultError::NotFound(what) => EntryError::NotFound(what),
      other => EntryError::Remote(other.to_string()),
    }
  }
}

impl From<TokenError> for EntryError {
  fn from(e: TokenError) -> Self {
    match e {
      TokenError::UnsupportedType(_) => EntryError::Unsupported(e.to_string()),
      other => EntryError::Parse(other.to_string()),
    }
  }
}

impl From<CatalogError> for EntryError {
  fn from(e: CatalogError) -> Self {
    match e {
      CatalogError::StoreChange { .. } => EntryError::Conflict(e.to_string()),
      other => EntryError::Parse(other.to_string()),
    }
  }
}

impl From<RecordError> for EntryError {
  fn from(e: RecordError) -> Self {
    EntryError::Parse(e.to_string())
  }
}

/// Errors that end a whole operation.
#[derive(Debug, Error)]
pub enum OpError {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("no catalog found at {0}")]
  NoCatalog(PathBuf),

  #[error("requested files not cataloged")]
  NotCataloged,

  #[error("confirmation failed: {0}")]
  Prompt(#[source] io::Error),

  #[error("failed to format export: {0}")]
  Export(String),
}

/// How one entry ended.
#[derive(Debug)]
pub enum EntryState {
  /// The operation completed.
  Done,
  /// A linked catalog was recorded or unlinked; nothing remote happened.
  Linked,
  /// The user declined; not a failure.
  Skipped(String),
  Failed(EntryError),
}

/// One entry's result.
#[derive(Debug)]
pub struct EntryOutcome {
  /// Path relative to the catalog the operation started from.
  pub path: String,
  pub version: Option<String>,
  pub store: String,
  pub state: EntryState,
}

impl EntryOutcome {
  pub fn is_failed(&self) -> bool {
    matches!(self.state, EntryState::Failed(_))
  }
}

/// Per-entry outcomes of one operation, in processing order.
#[derive(Debug, Default)]
pub struct Report {
  pub entries: Vec<EntryOutcome>,
}

impl Report {
  pub fn push(&mut self, outcome: EntryOutcome) {
    self.entries.push(outcome);
  }

  /// Entries that touched remote content.
  pub fn attempted(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|e| !matches!(e.state, EntryState::Linked))
      .count()
  }

  pub fn succeeded(&self) -> usize {
    self.entries.iter().filter(|e| matches!(e.state, EntryState::Done)).count()
  }

  pub fn skipped(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|e| matches!(e.state, EntryState::Skipped(_)))
      .count()
  }

  pub fn failed(&self) -> usize {
    self.entries.iter().filter(|e| e.is_failed()).count()
  }

  /// Entries failed and none succeeded.
  pub fn is_failure(&self) -> bool {
    self.failed() > 0 && self.succeeded() == 0
  }
}

#[derive(Debug)]
pub struct PushResult {
  pub report: Report,
  pub catalog: SaveOutcome,
}

#[derive(Debug)]
pub struct PullResult {
  pub report: Report,
  /// Formatted export, when one was requested.
  pub export: Option<Vec<u8>>,
}

#[derive(Debug)]
pub enum PurgeResult {
  /// Nothing matched the selection.
  NothingMatched,
  /// The user declined the confirmation.
  Aborted,
  Purged { report: Report, catalog: SaveOutcome },
}

/// One node of a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
  pub path: String,
  pub store: String,
  pub tags: Vec<String>,
  pub versions: Vec<String>,
  /// Entries of a linked catalog; empty for plain files.
  pub children: Vec<ListNode>,
  pub is_ref: bool,
  /// A linked catalog that could not be read.
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult {
  pub catalog: PathBuf,
  pub nodes: Vec<ListNode>,
}

impl ListResult {
  /// Plain files across every nesting level.
  pub fn file_count(&self) -> usize {
    fn count(nodes: &[ListNode]) -> usize {
      nodes
        .iter()
        .map(|n| if n.is_ref { count(&n.children) } else { 1 })
        .sum()
    }
    count(&self.nodes)
  }
}

#[derive(Debug)]
pub struct InitResult {
  pub catalog: PathBuf,
  /// The catalog did not exist before.
  pub created: bool,
  /// Files added to the catalog.
  pub report: Report,
}

#[derive(Debug, Default)]
pub struct CleanResult {
  /// Local files that were deleted.
  pub removed: Vec<PathBuf>,
  /// Files that could not be deleted.
  pub failed: Vec<(PathBuf, io::Error)>,
}
