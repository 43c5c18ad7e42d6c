use crate::{
  argument::Argument,
  conversion::{
    Conversion,
    Prediction,
  },
  types::{
    ParamType,
    TypeKind,
    cannot_use,
  },
  value::Value,
};

/// A flag. Present means `true`, absent means `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl ParamType for BooleanType {
  fn name(&self) -> &str {
    "boolean"
  }

  fn kind(&self) -> TypeKind {
    TypeKind::Boolean
  }

  fn parse(&self, arg: Argument) -> Conversion {
    match &arg {
      Argument::TrueNamed(_) => return Conversion::valid(Value::Bool(true), arg),
      Argument::Blank => return Conversion::valid(Value::Bool(false), arg),
      _ => {},
    }

    let text = arg.text();
    match text.as_str() {
      "true" => Conversion::valid(Value::Bool(true), arg),
      "false" => Conversion::valid(Value::Bool(false), arg),
      _ => {
        let predictions: Vec<_> = [true, false]
          .into_iter()
          .filter(|b| b.to_string().starts_with(text.as_str()))
          .map(|b| Prediction::new(b.to_string(), Value::Bool(b)))
          .collect();
        if predictions.is_empty() {
          Conversion::error(arg, cannot_use(&text))
        } else {
          Conversion::incomplete(None, arg, "").with_predictions(predictions)
        }
      },
    }
  }

  fn increment(&self, value: Option<&Value>) -> Option<Value> {
    let current = value.and_then(Value::as_bool).unwrap_or(false);
    Some(Value::Bool(!current))
  }

  fn decrement(&self, value: Option<&Value>) -> Option<Value> {
    self.increment(value)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    status::Status,
    token::Token,
  };

  #[test]
  fn flag_presence() {
    let flag = Argument::TrueNamed(Token::new(" ", "--verbose", ""));
    assert_eq!(BooleanType.parse(flag).value, Some(Value::Bool(true)));
    assert_eq!(BooleanType.default_conversion().value, Some(Value::Bool(false)));
  }

  #[test]
  fn parse_text() {
    let parse = |text: &str| BooleanType.parse(Argument::Single(Token::new("", text, "")));
    assert_eq!(parse("false").value, Some(Value::Bool(false)));
    assert_eq!(parse("tr").status, Status::Incomplete);
    assert_eq!(parse("tr").predictions.len(), 1);
    assert_eq!(parse("maybe").status, Status::Error);
  }

  #[test]
  fn toggles() {
    assert_eq!(BooleanType.increment(None), Some(Value::Bool(true)));
    assert_eq!(
      BooleanType.decrement(Some(&Value::Bool(true))),
      Some(Value::Bool(false))
    );
  }
}
