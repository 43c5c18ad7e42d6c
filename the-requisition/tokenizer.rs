//! Splits command-bar input into [`Token`]s.
//!
//! Tokenization is lossless: rendering every token with [`Token::to_raw`] and
//! concatenating the results gives back the input exactly, including
//! whitespace, quotes and escapes. This is what lets the requisition rewrite
//! the span of a single argument without disturbing its neighbours.
//!
//! # Quoting Rules
//!
//! | Syntax | Behavior |
//! |--------|----------|
//! | `foo` | Unquoted, split on whitespace |
//! | `'foo bar'` | Single-quoted, one token |
//! | `"foo bar"` | Double-quoted, one token |
//! | `foo'bar` | A quote inside an unquoted token is plain text |
//! | `'foo` | Unterminated quotes run to the end of the input |
//!
//! Backslash escapes are recognized everywhere: `\b`, `\f`, `\n`, `\r`, `\t`,
//! `\v`, `\\`, `\ `, `\'` and `\"`. An escaped space or quote never acts as a
//! delimiter. Any other backslash is kept literally.

use crate::token::Token;

/// Escape sequences as `(escaped, unescaped)` pairs.
const ESCAPES: &[(char, char)] = &[
  ('\\', '\\'),
  ('b', '\u{8}'),
  ('f', '\u{c}'),
  ('n', '\n'),
  ('r', '\r'),
  ('t', '\t'),
  ('v', '\u{b}'),
  (' ', ' '),
  ('\'', '\''),
  ('"', '"'),
];

fn unescape_char(escaped: char) -> Option<char> {
  ESCAPES
    .iter()
    .find(|(from, _)| *from == escaped)
    .map(|(_, to)| *to)
}

/// Escapes `text` so that tokenizing it inside `quote` (or unquoted when
/// `None`) yields `text` again.
pub(crate) fn escape(text: &str, quote: Option<char>) -> String {
  let mut escaped = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '\\' => escaped.push_str("\\\\"),
      '\u{8}' => escaped.push_str("\\b"),
      '\u{c}' => escaped.push_str("\\f"),
      '\n' => escaped.push_str("\\n"),
      '\r' => escaped.push_str("\\r"),
      '\t' => escaped.push_str("\\t"),
      '\u{b}' => escaped.push_str("\\v"),
      '\'' | '"' if quote.is_none_or(|quote| quote == ch) => {
        escaped.push('\\');
        escaped.push(ch);
      },
      ' ' if quote.is_none() => escaped.push_str("\\ "),
      _ => escaped.push(ch),
    }
  }
  escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  /// Between tokens, skipping whitespace.
  Outside,
  /// Inside an unquoted token.
  Plain,
  /// Inside a token opened by the given quote character.
  Quoted(char),
}

#[derive(Debug)]
pub struct Tokenizer<'a> {
  input:  &'a str,
  /// The current byte index of the input being considered.
  pos:    usize,
  mode:   Mode,
  /// Start of the pending segment: whitespace while `Outside`, the token
  /// body otherwise.
  start:  usize,
  prefix: String,
  /// Unescaped body of the pending token.
  text:   String,
  tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      pos: 0,
      mode: Mode::Outside,
      start: 0,
      prefix: String::new(),
      text: String::new(),
      tokens: Vec::new(),
    }
  }

  fn peek(&self) -> Option<char> {
    self.input[self.pos..].chars().next()
  }

  /// Consumes one character of a token body, resolving escapes.
  fn consume_body_char(&mut self, ch: char) {
    self.pos += ch.len_utf8();
    if ch == '\\'
      && let Some(next) = self.peek()
      && let Some(unescaped) = unescape_char(next)
    {
      self.pos += next.len_utf8();
      self.text.push(unescaped);
      return;
    }
    self.text.push(ch);
  }

  fn emit(&mut self, body_end: usize, suffix: &str) {
    let source = &self.input[self.start..body_end];
    let text = std::mem::take(&mut self.text);
    let prefix = std::mem::take(&mut self.prefix);
    self
      .tokens
      .push(Token::with_source(prefix, text, source, suffix));
  }

  fn step(&mut self, ch: char) {
    match self.mode {
      Mode::Outside => {
        if matches!(ch, '\'' | '"') {
          self.pos += ch.len_utf8();
          self.prefix = self.input[self.start..self.pos].to_string();
          self.start = self.pos;
          self.mode = Mode::Quoted(ch);
        } else if ch.is_whitespace() {
          self.pos += ch.len_utf8();
        } else {
          self.prefix = self.input[self.start..self.pos].to_string();
          self.start = self.pos;
          self.mode = Mode::Plain;
        }
      },
      Mode::Plain => {
        if ch.is_whitespace() {
          self.emit(self.pos, "");
          self.start = self.pos;
          self.mode = Mode::Outside;
        } else {
          self.consume_body_char(ch);
        }
      },
      Mode::Quoted(quote) => {
        if ch == quote {
          let input = self.input;
          let body_end = self.pos;
          self.pos += ch.len_utf8();
          self.emit(body_end, &input[body_end..self.pos]);
          self.start = self.pos;
          self.mode = Mode::Outside;
        } else {
          self.consume_body_char(ch);
        }
      },
    }
  }

  fn finish(mut self) -> Vec<Token> {
    match self.mode {
      Mode::Outside => {
        if self.start < self.input.len() {
          let extra = &self.input[self.start..];
          match self.tokens.last_mut() {
            Some(last) => {
              let mut suffix = last.suffix().to_string();
              suffix.push_str(extra);
              *last = Token::with_source(last.prefix(), last.text(), last.source(), suffix);
            },
            None => self.tokens.push(Token::new(extra, "", "")),
          }
        }
      },
      Mode::Plain | Mode::Quoted(_) => self.emit(self.input.len(), ""),
    }

    if self.tokens.is_empty() {
      self.tokens.push(Token::blank());
    }
    self.tokens
  }

  pub fn run(mut self) -> Vec<Token> {
    while let Some(ch) = self.peek() {
      self.step(ch);
    }
    self.finish()
  }
}

/// Tokenizes `input`. Never fails: empty input gives a single blank token and
/// malformed quoting is tolerated.
pub fn tokenize(input: &str) -> Vec<Token> {
  let tokens = Tokenizer::new(input).run();
  tracing::trace!(input, count = tokens.len(), "tokenized");
  tokens
}

#[cfg(test)]
mod test {
  use super::*;

  #[track_caller]
  fn assert_tokens(input: &str, expected: &[(&str, &str, &str)]) {
    let actual: Vec<_> = tokenize(input)
      .iter()
      .map(|token| {
        (
          token.prefix().to_string(),
          token.text().to_string(),
          token.suffix().to_string(),
        )
      })
      .collect();
    let actual: Vec<_> = actual
      .iter()
      .map(|(p, t, s)| (p.as_str(), t.as_str(), s.as_str()))
      .collect();
    assert_eq!(actual.as_slice(), expected);
  }

  fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_raw).collect()
  }

  #[test]
  fn tokenize_blank() {
    assert_tokens("", &[("", "", "")]);
    assert!(tokenize("")[0].is_blank());
    assert_tokens("   ", &[("   ", "", "")]);
  }

  #[test]
  fn tokenize_unquoted() {
    assert_tokens("hello", &[("", "hello", "")]);
    assert_tokens("hello world", &[("", "hello", ""), (" ", "world", "")]);
    assert_tokens("  a\t\tb  ", &[("  ", "a", ""), ("\t\t", "b", "  ")]);
  }

  #[test]
  fn tokenize_quoting() {
    assert_tokens("'hello world'", &[("'", "hello world", "'")]);
    assert_tokens(
      "echo \"a b\" c",
      &[("", "echo", ""), (" \"", "a b", "\""), (" ", "c", "")],
    );
    assert_tokens("''", &[("'", "", "'")]);
    // Mismatched quotes do not close each other.
    assert_tokens("'a\"b'", &[("'", "a\"b", "'")]);
  }

  #[test]
  fn tokenize_unterminated_quote() {
    assert_tokens("echo 'hello wor", &[("", "echo", ""), (" '", "hello wor", "")]);
    assert_tokens("\"", &[("\"", "", "")]);
  }

  #[test]
  fn quote_inside_plain_token_is_text() {
    assert_tokens("xx'xx yy", &[("", "xx'xx", ""), (" ", "yy", "")]);
  }

  #[test]
  fn tokenize_escapes() {
    assert_tokens("a\\ b", &[("", "a b", "")]);
    assert_tokens("'it\\'s'", &[("'", "it's", "'")]);
    assert_tokens("\"say \\\"hi\\\"\"", &[("\"", "say \"hi\"", "\"")]);
    assert_tokens("a\\tb c\\nd", &[("", "a\tb", ""), (" ", "c\nd", "")]);
    assert_tokens("back\\\\slash", &[("", "back\\slash", "")]);
    // Unknown escapes and a trailing backslash stay literal.
    assert_tokens("a\\qb", &[("", "a\\qb", "")]);
    assert_tokens("end\\", &[("", "end\\", "")]);
  }

  #[test]
  fn escaped_tokens_render_losslessly() {
    for input in ["a\\ b", "'it\\'s'", "x\\\\ y", "\\\"q", "tab\\t 'open"] {
      assert_eq!(render(&tokenize(input)), input);
    }
  }

  quickcheck::quickcheck! {
    fn tokenize_is_lossless(input: String) -> bool {
      render(&tokenize(&input)) == input
    }

    fn tokenize_is_never_empty(input: String) -> bool {
      !tokenize(&input).is_empty()
    }
  }
}
