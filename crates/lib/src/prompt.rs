//! User confirmation seam.
//!
//! The library never reads the terminal itself. Every question goes through a
//! [`Prompt`], which the CLI backs with stdin and tests back with scripts.

use std::collections::VecDeque;
use std::io;

/// How dangerous the confirmed action is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  /// Overwrites remote data that changed since the last pull.
  Warn,
  /// Deletes remote data.
  Danger,
}

pub trait Prompt {
  /// Ask a yes/no question. Returns `Ok(false)` when the user declines.
  fn confirm(&mut self, message: &str, severity: Severity) -> io::Result<bool>;
}

/// Answers every question the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoAnswer(pub bool);

impl Prompt for AutoAnswer {
  fn confirm(&mut self, _message: &str, _severity: Severity) -> io::Result<bool> {
    Ok(self.0)
  }
}

/// Replays a fixed list of answers and remembers the questions asked.
///
/// Runs out to `false`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
  answers: VecDeque<bool>,
  pub asked: Vec<(String, Severity)>,
}

impl ScriptedPrompt {
  pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
    Self {
      answers: answers.into_iter().collect(),
      asked: Vec::new(),
    }
  }
}

impl Prompt for ScriptedPrompt {
  fn confirm(&mut self, message: &str, severity: Severity) -> io::Result<bool> {
    self.asked.push((message.to_string(), severity));
    Ok(self.answers.pop_front().unwrap_or(false))
  }
}
