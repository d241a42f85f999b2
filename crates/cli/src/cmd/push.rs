//! Implementation of the `cstore push` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use cstore_lib::catalog::SaveOutcome;
use cstore_lib::ops::push;
use cstore_lib::options::UserOptions;
use cstore_lib::prompt::Prompt;
use cstore_lib::remote::Registry;

use super::handle;
use crate::output::{print_info, print_report};

pub fn cmd_push(registry: &Registry, cwd: &Path, options: &UserOptions, prompt: &mut dyn Prompt) -> Result<ExitCode> {
  let result = match push(registry, cwd, options, prompt) {
    Ok(result) => result,
    Err(e) => return handle(e),
  };

  if result.report.entries.is_empty() {
    print_info("Nothing to push.");
    return Ok(ExitCode::SUCCESS);
  }

  let code = print_report(&result.report, "pushed");
  if result.catalog == SaveOutcome::Written {
    print_info(&format!("Catalog updated: {}", options.catalog));
  }
  Ok(code)
}
