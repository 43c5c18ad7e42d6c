//! Finds the command named by the leading tokens of the input.

use crate::{
  argument::Argument,
  conversion::Conversion,
  status::Status,
  token::Token,
  types::ParamType,
  value::Value,
};

#[derive(Debug, Clone)]
pub struct Resolution {
  /// Number of leading tokens that make up the command path.
  pub consumed:   usize,
  pub conversion: Conversion,
}

/// Grows a window over the leading tokens while it names a namespace, so
/// `git commit -m x` resolves `git commit` and leaves `-m x` for binding.
///
/// A window that fails to resolve ends the search and the previous window
/// wins. When not even the first token resolves, nothing is consumed and the
/// returned conversion explains why.
pub fn resolve(command_type: &dyn ParamType, tokens: &[Token]) -> Resolution {
  let Some(first) = tokens.first() else {
    return Resolution {
      consumed:   0,
      conversion: command_type.default_conversion(),
    };
  };

  let mut best: Option<Resolution> = None;
  for end in 1..=tokens.len() {
    let conversion = command_type.parse(Argument::from_tokens(&tokens[..end]));
    if conversion.status == Status::Error {
      break;
    }

    let namespace = conversion
      .value
      .as_ref()
      .and_then(Value::as_command)
      .is_some_and(|command| command.is_namespace());
    best = Some(Resolution {
      consumed: end,
      conversion,
    });
    if !namespace {
      break;
    }
  }

  let resolution = best.unwrap_or_else(|| {
    let mut conversion = command_type.parse(Argument::Single(first.clone()));
    conversion.arg = Argument::Blank;
    Resolution {
      consumed: 0,
      conversion,
    }
  });
  tracing::trace!(
    consumed = resolution.consumed,
    status = %resolution.conversion.status,
    "resolved command"
  );
  resolution
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    fixtures,
    tokenizer::tokenize,
    types::CommandType,
  };

  #[track_caller]
  fn assert_resolves(input: &str, consumed: usize, command: Option<&str>, status: Status) {
    let ty = CommandType::new(fixtures::registry());
    let resolution = resolve(&ty, &tokenize(input));
    assert_eq!(resolution.consumed, consumed, "consumed for {input:?}");
    assert_eq!(
      resolution.conversion.value.as_ref().map(Value::to_string).as_deref(),
      command,
      "command for {input:?}"
    );
    assert_eq!(resolution.conversion.status, status, "status for {input:?}");
  }

  #[test]
  fn single_word_commands() {
    assert_resolves("echo hello", 1, Some("echo"), Status::Valid);
    assert_resolves("noop", 1, Some("noop"), Status::Valid);
  }

  #[test]
  fn namespaces_grow_the_window() {
    assert_resolves("git commit -m x", 2, Some("git commit"), Status::Valid);
    assert_resolves("git  push", 2, Some("git push"), Status::Valid);
  }

  #[test]
  fn failed_growth_keeps_the_namespace() {
    assert_resolves("git frob", 1, Some("git"), Status::Valid);
    assert_resolves("git", 1, Some("git"), Status::Valid);
  }

  #[test]
  fn partial_names_are_consumed_as_incomplete() {
    assert_resolves("ec", 1, None, Status::Incomplete);
    assert_resolves("git co", 2, None, Status::Incomplete);
    assert_resolves("", 1, None, Status::Incomplete);
  }

  #[test]
  fn unknown_consumes_nothing() {
    let ty = CommandType::new(fixtures::registry());
    let resolution = resolve(&ty, &tokenize("frob a b"));
    assert_eq!(resolution.consumed, 0);
    assert_eq!(resolution.conversion.status, Status::Error);
    assert_eq!(resolution.conversion.arg, Argument::Blank);
  }
}
