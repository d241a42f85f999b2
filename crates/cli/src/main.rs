use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cstore_lib::config::Settings;
use cstore_lib::consts::CATALOG_FILENAME;
use cstore_lib::options::{ExportFormat, TagFilter, UserOptions};
use cstore_lib::remote::Registry;

mod cmd;
mod output;
mod prompts;

use cmd::{cmd_clean, cmd_init, cmd_list, cmd_pull, cmd_purge, cmd_push, cmd_stores, cmd_vaults};
use prompts::TerminalPrompt;

/// cstore - Push, pull and version config files against remote stores
#[derive(Parser)]
#[command(name = "cstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Catalog file name
  #[arg(short = 'f', long, global = true, default_value = CATALOG_FILENAME)]
  catalog: String,

  /// Vault holding back-end credentials
  #[arg(short = 'c', long = "access", global = true, value_name = "VAULT")]
  access_vault: Option<String>,

  /// Vault holding extracted secrets
  #[arg(short = 'x', long = "secrets", global = true, value_name = "VAULT")]
  secrets_vault: Option<String>,

  /// Let back-ends ask for missing credentials
  #[arg(short, long, global = true)]
  prompt: bool,

  /// Answer yes to every confirmation
  #[arg(short, long, global = true)]
  yes: bool,

  /// Enable verbose output
  #[arg(long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// File selection shared by most commands.
#[derive(Args)]
struct Selection {
  /// Files to act on, relative to the working directory
  paths: Vec<String>,

  /// Tag expression: `a&b` needs every tag, `a|b` any of them
  #[arg(short, long)]
  tags: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a catalog for files without uploading them
  Init {
    #[command(flatten)]
    selection: Selection,

    /// Store to record for new entries
    #[arg(short, long)]
    store: Option<String>,
  },

  /// Upload files and record them in the catalog
  Push {
    #[command(flatten)]
    selection: Selection,

    /// Store to push to
    #[arg(short, long)]
    store: Option<String>,

    /// Version label for the uploaded copy
    #[arg(short, long)]
    version: Option<String>,

    /// Delete local copies after a successful push
    #[arg(short, long = "delete")]
    delete_after_push: bool,

    /// Extra location the file is also written to on pull
    #[arg(short, long, value_name = "PATH")]
    alternate_path: Option<String>,
  },

  /// Download cataloged files
  Pull {
    #[command(flatten)]
    selection: Selection,

    /// Version label to restore
    #[arg(short, long)]
    version: Option<String>,

    /// Write a `.secrets` copy with tokens replaced by vault values
    #[arg(short, long)]
    inject_secrets: bool,

    /// Replace tokens in place with their vault values
    #[arg(short, long)]
    modify_secrets: bool,

    /// Write to this location instead of the cataloged path
    #[arg(short, long, value_name = "PATH")]
    alternate_path: Option<String>,

    /// Skip variables already set in the environment
    #[arg(short, long)]
    no_overwrite: bool,

    /// Print env content instead of writing files
    #[arg(short, long)]
    export: bool,

    /// Export format (implies --export)
    #[arg(long, value_name = "FORMAT")]
    export_format: Option<ExportFormat>,
  },

  /// Delete remote copies of cataloged files
  Purge {
    #[command(flatten)]
    selection: Selection,

    /// Only purge this version
    #[arg(short, long)]
    version: Option<String>,
  },

  /// Show the catalog as a tree
  List {
    #[command(flatten)]
    selection: Selection,

    /// Show tags
    #[arg(short = 'g', long)]
    view_tags: bool,

    /// Show versions
    #[arg(short = 'v', long)]
    view_versions: bool,
  },

  /// Delete local copies of cataloged files
  Clean {
    #[command(flatten)]
    selection: Selection,
  },

  /// List stores, or describe one
  Stores { name: Option<String> },

  /// List vaults, or describe one
  Vaults { name: Option<String> },

  /// Print the version
  Version,
}

impl Cli {
  fn options(&self, selection: &Selection) -> UserOptions {
    UserOptions {
      catalog: self.catalog.clone(),
      paths: selection.paths.clone(),
      tags: selection.tags.as_deref().map(TagFilter::parse).unwrap_or_default(),
      access_vault: self.access_vault.clone(),
      secrets_vault: self.secrets_vault.clone(),
      prompt: self.prompt,
      ..Default::default()
    }
  }
}

fn registry() -> Result<Registry> {
  let settings = Settings::load().context("Failed to load settings")?;
  Ok(Registry::bundled(settings))
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cwd: PathBuf = std::env::current_dir().context("Failed to read working directory")?;
  debug!(cwd = %cwd.display(), "starting");
  let mut prompt = TerminalPrompt::new(cli.yes);

  match &cli.command {
    Commands::Init { selection, store } => {
      let options = UserOptions {
        store: store.clone(),
        ..cli.options(selection)
      };
      cmd_init(&cwd, &options)
    }
    Commands::Push {
      selection,
      store,
      version,
      delete_after_push,
      alternate_path,
    } => {
      let options = UserOptions {
        store: store.clone(),
        version: version.clone(),
        delete_after_push: *delete_after_push,
        alternate_path: alternate_path.clone(),
        ..cli.options(selection)
      };
      cmd_push(&registry()?, &cwd, &options, &mut prompt)
    }
    Commands::Pull {
      selection,
      version,
      inject_secrets,
      modify_secrets,
      alternate_path,
      no_overwrite,
      export,
      export_format,
    } => {
      let export = (*export || export_format.is_some()).then(|| export_format.unwrap_or_default());
      let options = UserOptions {
        version: version.clone(),
        inject_secrets: *inject_secrets,
        modify_secrets: *modify_secrets,
        alternate_path: alternate_path.clone(),
        no_overwrite: *no_overwrite,
        export,
        ..cli.options(selection)
      };
      cmd_pull(&registry()?, &cwd, &options, &mut prompt)
    }
    Commands::Purge { selection, version } => {
      let options = UserOptions {
        version: version.clone(),
        ..cli.options(selection)
      };
      cmd_purge(&registry()?, &cwd, &options, &mut prompt)
    }
    Commands::List {
      selection,
      view_tags,
      view_versions,
    } => {
      let options = UserOptions {
        view_tags: *view_tags,
        view_versions: *view_versions,
        ..cli.options(selection)
      };
      cmd_list(&cwd, &options)
    }
    Commands::Clean { selection } => cmd_clean(&cwd, &cli.options(selection)),
    Commands::Stores { name } => cmd_stores(&registry()?, name.as_deref()),
    Commands::Vaults { name } => cmd_vaults(&registry()?, name.as_deref()),
    Commands::Version => {
      println!("cstore {}", env!("CARGO_PKG_VERSION"));
      Ok(ExitCode::SUCCESS)
    }
  }
}
