//! Implementation of the `cstore clean` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use cstore_lib::ops::clean;
use cstore_lib::options::UserOptions;

use super::handle;
use crate::output::{print_error, print_info, print_success};

pub fn cmd_clean(cwd: &Path, options: &UserOptions) -> Result<ExitCode> {
  let result = match clean(cwd, options) {
    Ok(result) => result,
    Err(e) => return handle(e),
  };

  for path in &result.removed {
    print_success(&format!("Removed {}", path.display()));
  }
  for (path, e) in &result.failed {
    print_error(&format!("Could not remove {}: {}", path.display(), e));
  }
  if result.removed.is_empty() && result.failed.is_empty() {
    print_info("No local files to remove.");
  }

  if !result.failed.is_empty() && result.removed.is_empty() {
    Ok(ExitCode::FAILURE)
  } else {
    Ok(ExitCode::SUCCESS)
  }
}
