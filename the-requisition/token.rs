//! The raw-text unit produced by the tokenizer.

use std::fmt;

use crate::{
  assignment::Slot,
  tokenizer::escape,
};

/// A span of raw input split into its `prefix`, `text` and `suffix` parts.
///
/// The prefix holds the whitespace before the token and an opening quote, the
/// suffix holds a closing quote and (for the last token) trailing whitespace.
/// `text` is the unescaped content: the input `a\ b` has the text `"a b"`.
/// When the body was written with escapes the literal form is kept as well so
/// that [`Token::to_raw`] reproduces the input byte for byte.
///
/// Tokens are treated as immutable values. Editing a token means building a
/// new one with [`Token::rebase`].
#[derive(Debug, Clone, Default)]
pub struct Token {
  prefix: String,
  text:   String,
  suffix: String,
  /// The body as typed, when it differs from `text`.
  source: Option<String>,
  /// The assignment this token is bound to. Not part of equality.
  owner:  Option<Slot>,
}

impl Token {
  pub fn new(
    prefix: impl Into<String>,
    text: impl Into<String>,
    suffix: impl Into<String>,
  ) -> Self {
    Self {
      prefix: prefix.into(),
      text: text.into(),
      suffix: suffix.into(),
      source: None,
      owner: None,
    }
  }

  pub(crate) fn with_source(
    prefix: impl Into<String>,
    text: impl Into<String>,
    source: impl Into<String>,
    suffix: impl Into<String>,
  ) -> Self {
    let text = text.into();
    let source = source.into();
    Self {
      prefix: prefix.into(),
      source: (source != text).then_some(source),
      text,
      suffix: suffix.into(),
      owner: None,
    }
  }

  /// A token with no characters at all.
  pub fn blank() -> Self {
    Self::default()
  }

  /// An empty token preceded by a single space, used as the base for
  /// arguments that have no position in the input yet.
  pub(crate) fn spacer() -> Self {
    Self::new(" ", "", "")
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn suffix(&self) -> &str {
    &self.suffix
  }

  /// The body of the token as it appears in the input.
  pub fn source(&self) -> &str {
    self.source.as_deref().unwrap_or(&self.text)
  }

  pub fn owner(&self) -> Option<Slot> {
    self.owner
  }

  pub(crate) fn bind(&mut self, slot: Slot) {
    self.owner = Some(slot);
  }

  pub fn is_blank(&self) -> bool {
    self.prefix.is_empty() && self.text.is_empty() && self.suffix.is_empty()
  }

  /// The quote character that opened this token, if any.
  pub fn quote(&self) -> Option<char> {
    self
      .prefix
      .chars()
      .last()
      .filter(|ch| matches!(ch, '\'' | '"'))
  }

  pub fn to_raw(&self) -> String {
    let mut raw = String::with_capacity(self.prefix.len() + self.source().len() + self.suffix.len());
    raw.push_str(&self.prefix);
    raw.push_str(self.source());
    raw.push_str(&self.suffix);
    raw
  }

  /// Length of the raw rendering in characters.
  pub fn raw_len(&self) -> usize {
    self.prefix.chars().count() + self.source().chars().count() + self.suffix.chars().count()
  }

  /// Returns a copy of this token carrying `text`, keeping the surrounding
  /// prefix and suffix.
  ///
  /// Text that is empty or contains whitespace is wrapped in single quotes
  /// unless the token is already quoted, and an unterminated quote is closed.
  /// The body is escaped so that tokenizing the result yields `text` again.
  pub fn rebase(&self, text: &str) -> Token {
    let mut prefix = self.prefix.clone();
    let mut suffix = self.suffix.clone();

    let quote = match self.quote() {
      Some(quote) => Some(quote),
      None if text.is_empty() || text.chars().any(char::is_whitespace) => {
        prefix.push('\'');
        Some('\'')
      },
      None => None,
    };
    if let Some(quote) = quote
      && !suffix.starts_with(quote)
    {
      suffix.insert(0, quote);
    }

    let mut token = Token::with_source(prefix, text, escape(text, quote), suffix);
    token.owner = self.owner;
    token
  }

  /// Drops the leading whitespace of the prefix, keeping any opening quote.
  pub(crate) fn trim_leading_space(mut self) -> Self {
    let trimmed = self.prefix.trim_start();
    if trimmed.len() != self.prefix.len() {
      self.prefix = trimmed.to_string();
    }
    self
  }

  pub(crate) fn push_suffix(&mut self, extra: &str) {
    self.suffix.push_str(extra);
  }

  pub(crate) fn push_prefix_front(&mut self, extra: &str) {
    self.prefix.insert_str(0, extra);
  }

  /// Whether the raw rendering ends in whitespace.
  pub(crate) fn ends_with_space(&self) -> bool {
    self.to_raw().ends_with(char::is_whitespace)
  }

  /// Removes quote characters from prefix and suffix, leaving only spacing.
  pub(crate) fn spacing_only(&self) -> Token {
    let strip = |s: &str| s.chars().filter(|ch| ch.is_whitespace()).collect::<String>();
    Token::new(strip(&self.prefix), "", strip(&self.suffix))
  }
}

impl PartialEq for Token {
  fn eq(&self, other: &Self) -> bool {
    self.prefix == other.prefix
      && self.text == other.text
      && self.suffix == other.suffix
      && self.source() == other.source()
  }
}

impl Eq for Token {}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.prefix, self.source(), self.suffix)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::tokenizer::tokenize;

  #[test]
  fn raw_uses_source() {
    let token = Token::with_source("", "a b", "a\\ b", " ");
    assert_eq!(token.text(), "a b");
    assert_eq!(token.to_raw(), "a\\ b ");
    assert_eq!(token.raw_len(), 5);
  }

  #[test]
  fn rebase_keeps_surroundings() {
    let token = Token::new(" ", "ap", " ");
    let rebased = token.rebase("apple");
    assert_eq!(rebased.to_raw(), " apple ");
  }

  #[test]
  fn rebase_quotes_when_needed() {
    let token = Token::new(" ", "x", "");
    assert_eq!(token.rebase("hello world").to_raw(), " 'hello world'");
    assert_eq!(token.rebase("").to_raw(), " ''");

    // Already quoted tokens keep their quote and get it closed.
    let token = Token::new(" \"", "hel", "");
    assert_eq!(token.rebase("hello world").to_raw(), " \"hello world\"");
  }

  #[test]
  fn rebase_round_trips_through_tokenizer() {
    let base = Token::new(" ", "x", "");
    for text in ["it's", "a \"b\" c", "tab\there", "back\\slash", "'lead"] {
      let raw = base.rebase(text).to_raw();
      let tokens = tokenize(&raw);
      assert_eq!(tokens.len(), 1, "{raw:?}");
      assert_eq!(tokens[0].text(), text, "{raw:?}");
    }
  }

  #[test]
  fn equality_ignores_owner() {
    let mut a = Token::new("", "x", "");
    let b = a.clone();
    a.bind(Slot::Command);
    assert_eq!(a, b);
  }
}
