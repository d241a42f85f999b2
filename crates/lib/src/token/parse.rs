//! Token scanning.
//!
//! Splits text into literal runs and tokens. Two token forms are recognized:
//!
//! - `{{group/prop}}` - a reference
//! - `{{group/prop::default}}` - a reference carrying a default value
//!
//! References are made of ASCII letters, digits, `_`, `-` and `/`. A default
//! runs up to the first `}}` on the same line. Anything else, including an
//! unterminated `{{`, is literal text.
//!
//! ```
//! use cstore_lib::token::parse::{parse, Segment};
//!
//! let segments = parse("DB={{dev/user::admin}}@host");
//! assert_eq!(segments.len(), 3);
//! assert!(matches!(segments[1], Segment::Token(t) if t.reference == "dev/user"));
//! ```

/// A token as written in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
  /// `group/prop` part.
  pub reference: &'a str,
  /// Text after `::`, when present.
  pub default: Option<&'a str>,
}

/// A segment of scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
  Literal(&'a str),
  Token(RawToken<'a>),
}

fn is_reference_byte(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'/'
}

/// Try to read a token starting at `start`, which points at `{{`.
///
/// Returns the token and the index just past its closing `}}`.
fn scan_token(input: &str, start: usize) -> Option<(RawToken<'_>, usize)> {
  let bytes = input.as_bytes();
  let ref_start = start + 2;
  let mut pos = ref_start;
  while pos < bytes.len() && is_reference_byte(bytes[pos]) {
    pos += 1;
  }
  if pos == ref_start {
    return None;
  }
  let reference = &input[ref_start..pos];
  let rest = &input[pos..];

  if rest.starts_with("}}") {
    return Some((
      RawToken {
        reference,
        default: None,
      },
      pos + 2,
    ));
  }

  if rest.starts_with("::") {
    let value_start = pos + 2;
    let close = input[value_start..].find("}}")?;
    let default = &input[value_start..value_start + close];
    if default.contains('\n') {
      return None;
    }
    return Some((
      RawToken {
        reference,
        default: Some(default),
      },
      value_start + close + 2,
    ));
  }

  None
}

/// Split `input` into literal runs and tokens.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
  let bytes = input.as_bytes();
  let mut segments = Vec::new();
  let mut literal_start = 0;
  let mut pos = 0;

  while pos < bytes.len() {
    if bytes[pos] == b'{'
      && bytes.get(pos + 1) == Some(&b'{')
      && let Some((token, end)) = scan_token(input, pos)
    {
      if literal_start < pos {
        segments.push(Segment::Literal(&input[literal_start..pos]));
      }
      segments.push(Segment::Token(token));
      pos = end;
      literal_start = end;
      continue;
    }
    pos += 1;
  }

  if literal_start < bytes.len() {
    segments.push(Segment::Literal(&input[literal_start..]));
  }

  segments
}

/// Tokens found in `input`, in order.
pub fn tokens(input: &str) -> impl Iterator<Item = RawToken<'_>> {
  parse(input).into_iter().filter_map(|segment| match segment {
    Segment::Token(token) => Some(token),
    Segment::Literal(_) => None,
  })
}
