//! Implementation of the `cstore init` command.
//!
//! Records files in a catalog without contacting any back-end.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use cstore_lib::ops::{EntryState, init};
use cstore_lib::options::UserOptions;

use super::handle;
use crate::output::{print_error, print_info, print_success};

pub fn cmd_init(cwd: &Path, options: &UserOptions) -> Result<ExitCode> {
  let result = match init(cwd, options) {
    Ok(result) => result,
    Err(e) => return handle(e),
  };

  for outcome in &result.report.entries {
    match &outcome.state {
      EntryState::Failed(e) => print_error(&format!("{}: {}", outcome.path, e)),
      EntryState::Linked => print_info(&format!("{} (linked catalog)", outcome.path)),
      _ => print_info(&outcome.path),
    }
  }

  if result.created {
    print_success(&format!("Created {}", result.catalog.display()));
  } else {
    print_success(&format!("Updated {}", result.catalog.display()));
  }

  if result.report.is_failure() {
    Ok(ExitCode::FAILURE)
  } else {
    Ok(ExitCode::SUCCESS)
  }
}
