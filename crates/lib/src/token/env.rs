//! Tokens in `NAME=VALUE` files.

use super::{Token, Tokens, parse, substitute};

/// Variable name of a `NAME=...` line, lower-cased.
fn line_var(line: &str) -> Option<String> {
  let end = line.find('=')?;
  let name = &line[..end];
  if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
    return None;
  }
  Some(name.to_lowercase())
}

pub(super) fn find(text: &str, with_values: bool) -> Tokens {
  let mut tokens = Tokens::new();
  for line in text.split('\n') {
    let Some(var) = line_var(line) else {
      continue;
    };
    for raw in parse::tokens(line) {
      if raw.default.is_some() != with_values {
        continue;
      }
      let token = Token::from_raw(&var, &raw, true);
      tokens.insert(token.key(), token);
    }
  }
  tokens
}

pub(super) fn replace(text: &str, tokens: &Tokens, formatted: bool) -> String {
  text
    .split('\n')
    .map(|line| match line_var(line) {
      Some(var) => substitute(line, tokens, formatted, |raw| Token::from_raw(&var, raw, true)),
      None => line.to_string(),
    })
    .collect::<Vec<_>>()
    .join("\n")
}
