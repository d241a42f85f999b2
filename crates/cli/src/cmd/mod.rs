mod backends;
mod clean;
mod init;
mod list;
mod pull;
mod purge;
mod push;

pub use backends::{cmd_stores, cmd_vaults};
pub use clean::cmd_clean;
pub use init::cmd_init;
pub use list::cmd_list;
pub use pull::cmd_pull;
pub use purge::cmd_purge;
pub use push::cmd_push;

use std::process::ExitCode;

use cstore_lib::ops::OpError;

use crate::output::print_error;

/// Map the command level errors that have a defined exit status.
///
/// A missing catalog or an empty selection is reported and exits 1. Anything
/// else propagates to `main`.
fn handle(error: OpError) -> anyhow::Result<ExitCode> {
  match error {
    OpError::NoCatalog(path) => {
      print_error(&format!("No catalog found at {}", path.display()));
      Ok(ExitCode::FAILURE)
    }
    OpError::NotCataloged => {
      print_error("Requested files are not cataloged");
      Ok(ExitCode::FAILURE)
    }
    other => Err(other.into()),
  }
}
