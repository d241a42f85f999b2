//! Implementation of the `cstore stores` and `cstore vaults` commands.

use std::process::ExitCode;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use cstore_lib::remote::Registry;

use crate::output::{print_error, symbols};

fn show(kind: &str, entries: &[(&str, &str)], name: Option<&str>) -> ExitCode {
  match name {
    None => {
      for (name, _) in entries {
        println!("  {} {}", symbols::INFO, name.if_supports_color(Stream::Stdout, |s| s.bold()));
      }
      ExitCode::SUCCESS
    }
    Some(wanted) => match entries.iter().find(|(name, _)| *name == wanted) {
      Some((name, description)) => {
        println!("{}", name.if_supports_color(Stream::Stdout, |s| s.bold()));
        println!();
        println!("{}", description);
        ExitCode::SUCCESS
      }
      None => {
        print_error(&format!("Unknown {} '{}'", kind, wanted));
        ExitCode::FAILURE
      }
    },
  }
}

pub fn cmd_stores(registry: &Registry, name: Option<&str>) -> Result<ExitCode> {
  Ok(show("store", &registry.stores(), name))
}

pub fn cmd_vaults(registry: &Registry, name: Option<&str>) -> Result<ExitCode> {
  Ok(show("vault", &registry.vaults(), name))
}
