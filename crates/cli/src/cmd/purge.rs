//! Implementation of the `cstore purge` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use cstore_lib::ops::{PurgeResult, purge};
use cstore_lib::options::UserOptions;
use cstore_lib::prompt::Prompt;
use cstore_lib::remote::Registry;

use super::handle;
use crate::output::{print_info, print_report};

pub fn cmd_purge(registry: &Registry, cwd: &Path, options: &UserOptions, prompt: &mut dyn Prompt) -> Result<ExitCode> {
  match purge(registry, cwd, options, prompt) {
    Ok(PurgeResult::NothingMatched) => {
      print_info("No matching files to purge.");
      Ok(ExitCode::SUCCESS)
    }
    Ok(PurgeResult::Aborted) => {
      print_info("Aborted.");
      Ok(ExitCode::SUCCESS)
    }
    Ok(PurgeResult::Purged { report, .. }) => Ok(print_report(&report, "purged")),
    Err(e) => handle(e),
  }
}
