//! Composite views over tokens, as bound to a single parameter.

use std::fmt;

use crate::{
  assignment::Slot,
  token::Token,
};

/// One or more tokens as seen by a parameter type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Argument {
  /// Nothing was typed for this parameter.
  #[default]
  Blank,
  Single(Token),
  /// Several adjacent tokens read as one value, e.g. `git commit` or the
  /// greedy capture of `hello world`.
  Merged(Vec<Token>),
  /// A boolean flag written without a value, e.g. `--verbose`.
  TrueNamed(Token),
  /// A flag followed by its value. `value` is `None` when the flag was the
  /// last token.
  Named {
    name:  Token,
    value: Option<Token>,
  },
  /// Every occurrence bound to an array parameter, in encounter order.
  Array(Vec<Argument>),
}

impl Argument {
  /// Builds a single or merged argument from a run of adjacent tokens.
  pub fn from_tokens(tokens: &[Token]) -> Argument {
    match tokens {
      [] => Argument::Blank,
      [token] => Argument::Single(token.clone()),
      tokens => Argument::Merged(tokens.to_vec()),
    }
  }

  /// The text a parameter type parses.
  ///
  /// Merged tokens are joined with the whitespace that separated them, named
  /// arguments contribute their value only.
  pub fn text(&self) -> String {
    match self {
      Argument::Blank => String::new(),
      Argument::Single(token) => token.text().to_string(),
      Argument::Merged(tokens) => {
        let mut text = String::new();
        for (i, token) in tokens.iter().enumerate() {
          if i > 0 {
            let before = &tokens[i - 1];
            text.extend(
              before
                .suffix()
                .chars()
                .chain(token.prefix().chars())
                .filter(|ch| ch.is_whitespace()),
            );
          }
          text.push_str(token.text());
        }
        text
      },
      Argument::TrueNamed(_) => "true".to_string(),
      Argument::Named { value, .. } => {
        value
          .as_ref()
          .map(|value| value.text().to_string())
          .unwrap_or_default()
      },
      Argument::Array(members) => {
        members
          .iter()
          .map(Argument::text)
          .collect::<Vec<_>>()
          .join(" ")
      },
    }
  }

  /// All tokens covered by this argument, in input order.
  pub fn tokens(&self) -> Vec<&Token> {
    match self {
      Argument::Blank => Vec::new(),
      Argument::Single(token) | Argument::TrueNamed(token) => vec![token],
      Argument::Merged(tokens) => tokens.iter().collect(),
      Argument::Named { name, value } => std::iter::once(name).chain(value.as_ref()).collect(),
      Argument::Array(members) => members.iter().flat_map(Argument::tokens).collect(),
    }
  }

  pub(crate) fn tokens_mut(&mut self) -> Vec<&mut Token> {
    match self {
      Argument::Blank => Vec::new(),
      Argument::Single(token) | Argument::TrueNamed(token) => vec![token],
      Argument::Merged(tokens) => tokens.iter_mut().collect(),
      Argument::Named { name, value } => std::iter::once(name).chain(value.as_mut()).collect(),
      Argument::Array(members) => members.iter_mut().flat_map(Argument::tokens_mut).collect(),
    }
  }

  /// Tags every token with the slot it is bound to.
  pub(crate) fn bind(&mut self, slot: Slot) {
    for token in self.tokens_mut() {
      token.bind(slot);
    }
  }

  /// Whether this argument supplies no data at all.
  pub fn is_blank(&self) -> bool {
    match self {
      Argument::Blank => true,
      Argument::Single(token) => token.is_blank(),
      Argument::Array(members) => members.iter().all(Argument::is_blank),
      _ => false,
    }
  }

  pub fn is_named(&self) -> bool {
    matches!(self, Argument::Named { .. } | Argument::TrueNamed(_))
  }

  pub fn to_raw(&self) -> String {
    self.tokens().into_iter().map(Token::to_raw).collect()
  }

  /// Returns an argument carrying `text` that occupies the same position as
  /// this one, keeping its surrounding whitespace and quoting.
  pub fn rebase(&self, text: &str) -> Argument {
    match self {
      Argument::Blank => Argument::Single(Token::spacer().rebase(text)),
      Argument::Single(token) => Argument::Single(token.rebase(text)),
      Argument::Merged(tokens) => {
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
          return Argument::Single(Token::spacer().rebase(text));
        };
        let base = Token::new(first.spacing_only().prefix(), "", last.spacing_only().suffix());
        let mut rebased = base.rebase(text);
        if let Some(owner) = first.owner() {
          rebased.bind(owner);
        }
        Argument::Single(rebased)
      },
      Argument::TrueNamed(name) => {
        if text == "true" {
          Argument::TrueNamed(name.clone())
        } else {
          Argument::Blank
        }
      },
      Argument::Named { name, value } => {
        let value = match value {
          Some(value) => value.rebase(text),
          None => {
            let spacing = if name.ends_with_space() { "" } else { " " };
            let mut value = Token::new(spacing, "", "").rebase(text);
            if let Some(owner) = name.owner() {
              value.bind(owner);
            }
            value
          },
        };
        Argument::Named {
          name:  name.clone(),
          value: Some(value),
        }
      },
      Argument::Array(members) => {
        let base = members.first().cloned().unwrap_or_default();
        Argument::Array(vec![base.rebase(text)])
      },
    }
  }
}

impl fmt::Display for Argument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_raw())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::tokenizer::tokenize;

  #[test]
  fn merged_text_keeps_separators() {
    let tokens = tokenize("hello   world\tagain");
    let merged = Argument::from_tokens(&tokens);
    assert_eq!(merged.text(), "hello   world\tagain");
    assert_eq!(merged.to_raw(), "hello   world\tagain");
  }

  #[test]
  fn merged_text_drops_quotes() {
    let tokens = tokenize("'a b' c");
    assert_eq!(Argument::from_tokens(&tokens).text(), "a b c");
  }

  #[test]
  fn named_text_is_the_value() {
    let tokens = tokenize("--tag v1");
    let named = Argument::Named {
      name:  tokens[0].clone(),
      value: Some(tokens[1].clone()),
    };
    assert_eq!(named.text(), "v1");
    assert_eq!(named.to_raw(), "--tag v1");
    assert_eq!(named.tokens().len(), 2);
  }

  #[test]
  fn blank_detection() {
    assert!(Argument::Blank.is_blank());
    assert!(Argument::Single(Token::blank()).is_blank());
    assert!(Argument::Array(Vec::new()).is_blank());
    assert!(!Argument::Single(Token::new(" '", "", "'")).is_blank());
    let flag = Argument::Named {
      name:  Token::new(" ", "--message", ""),
      value: None,
    };
    assert!(!flag.is_blank());
  }

  #[test]
  fn rebase_merged_collapses_to_single() {
    let tokens = tokenize(" hello world ");
    let rebased = Argument::from_tokens(&tokens).rebase("bye");
    assert_eq!(rebased.to_raw(), " bye ");
  }

  #[test]
  fn rebase_named_without_value_adds_one() {
    let name = Token::new(" ", "--message", "");
    let named = Argument::Named { name, value: None };
    assert_eq!(named.rebase("fix it").to_raw(), " --message 'fix it'");

    let name = Token::new(" ", "-m", " ");
    let named = Argument::Named { name, value: None };
    assert_eq!(named.rebase("x").to_raw(), " -m x");
  }

  #[test]
  fn rebase_blank_gets_spacing() {
    assert_eq!(Argument::Blank.rebase("x").to_raw(), " x");
    assert_eq!(Argument::Blank.rebase("").to_raw(), " ''");
  }
}
