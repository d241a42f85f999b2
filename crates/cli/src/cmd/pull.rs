//! Implementation of the `cstore pull` command.
//!
//! With `--export` the combined env content goes to stdout and the per-entry
//! lines to stderr, so the output can be piped or evaluated.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use cstore_lib::ops::{EntryState, pull};
use cstore_lib::options::UserOptions;
use cstore_lib::prompt::Prompt;
use cstore_lib::remote::Registry;

use super::handle;
use crate::output::{print_error, print_report};

pub fn cmd_pull(registry: &Registry, cwd: &Path, options: &UserOptions, prompt: &mut dyn Prompt) -> Result<ExitCode> {
  let result = match pull(registry, cwd, options, prompt) {
    Ok(result) => result,
    Err(e) => return handle(e),
  };

  let Some(export) = result.export else {
    return Ok(print_report(&result.report, "pulled"));
  };

  for outcome in &result.report.entries {
    if let EntryState::Failed(e) = &outcome.state {
      print_error(&format!("{}: {}", outcome.path, e));
    }
  }

  let mut stdout = io::stdout().lock();
  stdout.write_all(&export).context("Failed to write export")?;
  stdout.flush().context("Failed to write export")?;

  if result.report.is_failure() {
    Ok(ExitCode::FAILURE)
  } else {
    Ok(ExitCode::SUCCESS)
  }
}
