//! The option envelope every command receives.

use std::fmt;
use std::str::FromStr;

use crate::consts::CATALOG_FILENAME;

/// Tag expression parsed from `a&b` (all) or `a|b` (any).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
  pub tags: Vec<String>,
  /// Every tag must be present when true, any one when false.
  pub all: bool,
}

impl TagFilter {
  /// Parse a tag expression.
  ///
  /// A single `|` anywhere turns the whole expression into a disjunction.
  pub fn parse(expr: &str) -> Self {
    let all = !expr.contains('|');
    let tags = expr
      .split(['&', '|'])
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_string)
      .collect();
    Self { tags, all }
  }

  pub fn is_empty(&self) -> bool {
    self.tags.is_empty()
  }

  /// Whether an entry carrying `tags` passes this filter.
  pub fn matches(&self, tags: &[String]) -> bool {
    if self.tags.is_empty() {
      return true;
    }
    if self.all {
      self.tags.iter().all(|t| tags.contains(t))
    } else {
      self.tags.iter().any(|t| tags.contains(t))
    }
  }
}

/// Shapes pulled `env` content can be exported as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
  /// `export KEY='VALUE'` lines.
  #[default]
  TerminalExport,
  /// A flat JSON object.
  JsonObject,
  /// `[{"name": .., "value": ..}]`
  TaskDefEnv,
  /// `[{"name": .., "valueFrom": ..}]`
  TaskDefSecrets,
}

impl ExportFormat {
  pub const ALL: [ExportFormat; 4] = [
    ExportFormat::TerminalExport,
    ExportFormat::JsonObject,
    ExportFormat::TaskDefEnv,
    ExportFormat::TaskDefSecrets,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      ExportFormat::TerminalExport => "terminal-export",
      ExportFormat::JsonObject => "json-object",
      ExportFormat::TaskDefEnv => "task-def-env",
      ExportFormat::TaskDefSecrets => "task-def-secrets",
    }
  }
}

impl fmt::Display for ExportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ExportFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ExportFormat::ALL
      .into_iter()
      .find(|f| f.as_str() == s)
      .ok_or_else(|| format!("unknown export format '{}'", s))
  }
}

/// Everything the user asked for on one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOptions {
  /// Catalog file name.
  pub catalog: String,
  pub paths: Vec<String>,
  pub tags: TagFilter,
  pub version: Option<String>,
  pub store: Option<String>,
  pub access_vault: Option<String>,
  pub secrets_vault: Option<String>,
  pub alternate_path: Option<String>,
  pub delete_after_push: bool,
  pub modify_secrets: bool,
  pub inject_secrets: bool,
  pub no_overwrite: bool,
  pub export: Option<ExportFormat>,
  /// Let back-ends ask for missing credentials during pre-flight.
  pub prompt: bool,
  pub view_tags: bool,
  pub view_versions: bool,
}

impl Default for UserOptions {
  fn default() -> Self {
    Self {
      catalog: CATALOG_FILENAME.to_string(),
      paths: Vec::new(),
      tags: TagFilter::default(),
      version: None,
      store: None,
      access_vault: None,
      secrets_vault: None,
      alternate_path: None,
      delete_after_push: false,
      modify_secrets: false,
      inject_secrets: false,
      no_overwrite: false,
      export: None,
      prompt: false,
      view_tags: false,
      view_versions: false,
    }
  }
}
