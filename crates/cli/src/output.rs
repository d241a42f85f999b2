//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, per-entry outcome lines and the closing summary.

use std::process::ExitCode;

use owo_colors::{OwoColorize, Stream};

use cstore_lib::ops::{EntryOutcome, EntryState, Report};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const BRANCH: &str = "├──";
  pub const LAST: &str = "└──";
  pub const PIPE: &str = "│  ";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// `path`, `path(version)` with the store appended.
pub fn describe(outcome: &EntryOutcome) -> String {
  match &outcome.version {
    Some(version) => format!("{}({}) {} {}", outcome.path, version, symbols::ARROW, outcome.store),
    None => format!("{} {} {}", outcome.path, symbols::ARROW, outcome.store),
  }
}

/// Print one line per entry and the `N of M` summary.
///
/// Fails only when something was attempted, something failed and nothing
/// succeeded.
pub fn print_report(report: &Report, verb: &str) -> ExitCode {
  for outcome in &report.entries {
    match &outcome.state {
      EntryState::Done => print_success(&describe(outcome)),
      EntryState::Linked => print_info(&format!("{} (linked catalog)", outcome.path)),
      EntryState::Skipped(reason) => print_warning(&format!("{} skipped: {}", outcome.path, reason)),
      EntryState::Failed(e) => print_error(&format!("{}: {}", outcome.path, e)),
    }
  }

  println!();
  println!("{} of {} file(s) {}", report.succeeded(), report.attempted(), verb);
  if report.skipped() > 0 {
    print_stat("Skipped", &report.skipped().to_string());
  }

  if report.is_failure() {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
