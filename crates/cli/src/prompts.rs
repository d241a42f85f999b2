//! Terminal confirmations.

use std::io::{self, BufRead, Write};

use owo_colors::{OwoColorize, Stream};

use cstore_lib::prompt::{Prompt, Severity};

/// Asks on stderr and reads the answer from stdin.
///
/// With `--yes` every question is answered yes without asking. A closed
/// stdin counts as no.
pub struct TerminalPrompt {
  yes: bool,
}

impl TerminalPrompt {
  pub fn new(yes: bool) -> Self {
    Self { yes }
  }
}

impl Prompt for TerminalPrompt {
  fn confirm(&mut self, message: &str, severity: Severity) -> io::Result<bool> {
    if self.yes {
      return Ok(true);
    }

    let mut stderr = io::stderr();
    match severity {
      Severity::Warn => write!(stderr, "{}", message.if_supports_color(Stream::Stderr, |s| s.yellow()))?,
      Severity::Danger => write!(stderr, "{}", message.if_supports_color(Stream::Stderr, |s| s.red()))?,
    }
    write!(stderr, " [y/N] ")?;
    stderr.flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
      writeln!(stderr)?;
      return Ok(false);
    }
    Ok(is_yes(&input))
  }
}

fn is_yes(input: &str) -> bool {
  matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
