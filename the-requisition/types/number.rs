use crate::{
  argument::Argument,
  conversion::Conversion,
  types::ParamType,
  value::Value,
};

/// Integers with optional bounds. Increment and decrement move by `step`
/// and stop at the bounds.
#[derive(Debug, Clone, Copy)]
pub struct NumberType {
  pub min:  Option<i64>,
  pub max:  Option<i64>,
  pub step: i64,
}

impl Default for NumberType {
  fn default() -> Self {
    Self {
      min:  None,
      max:  None,
      step: 1,
    }
  }
}

impl NumberType {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn min(mut self, min: i64) -> Self {
    self.min = Some(min);
    self
  }

  pub fn max(mut self, max: i64) -> Self {
    self.max = Some(max);
    self
  }

  pub fn step(mut self, step: i64) -> Self {
    self.step = step.max(1);
    self
  }

  fn clamp(&self, n: i64) -> i64 {
    let n = self.min.map_or(n, |min| n.max(min));
    self.max.map_or(n, |max| n.min(max))
  }
}

impl ParamType for NumberType {
  fn name(&self) -> &str {
    "number"
  }

  fn parse(&self, arg: Argument) -> Conversion {
    let text = arg.text();
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
      return Conversion::incomplete(None, arg, "");
    }

    let Ok(n) = trimmed.parse::<i64>() else {
      return Conversion::error(arg, format!("Can't convert \"{trimmed}\" to a number"));
    };

    if let Some(min) = self.min
      && n < min
    {
      return Conversion::error(arg, format!("{n} is smaller than minimum {min}"));
    }
    if let Some(max) = self.max
      && n > max
    {
      return Conversion::error(arg, format!("{n} is greater than maximum {max}"));
    }

    Conversion::valid(Value::Integer(n), arg)
  }

  fn increment(&self, value: Option<&Value>) -> Option<Value> {
    let Some(current) = value.and_then(Value::as_integer) else {
      return Some(Value::Integer(self.clamp(0)));
    };
    if self.max.is_some_and(|max| current >= max) {
      return None;
    }
    Some(Value::Integer(self.clamp(current.saturating_add(self.step))))
  }

  fn decrement(&self, value: Option<&Value>) -> Option<Value> {
    let Some(current) = value.and_then(Value::as_integer) else {
      return Some(Value::Integer(self.clamp(0)));
    };
    if self.min.is_some_and(|min| current <= min) {
      return None;
    }
    Some(Value::Integer(self.clamp(current.saturating_sub(self.step))))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    status::Status,
    token::Token,
  };

  fn parse(ty: &NumberType, text: &str) -> Conversion {
    ty.parse(Argument::Single(Token::new(" ", text, "")))
  }

  #[test]
  fn parse_numbers() {
    let ty = NumberType::new().min(0).max(10);
    assert_eq!(parse(&ty, "7").value, Some(Value::Integer(7)));
    assert_eq!(parse(&ty, "").status, Status::Incomplete);
    assert_eq!(parse(&ty, "-").status, Status::Incomplete);
    assert_eq!(parse(&ty, "x").status, Status::Error);
    assert_eq!(parse(&ty, "11").status, Status::Error);
    assert_eq!(parse(&ty, "-1").status, Status::Error);
  }

  #[test]
  fn increment_stops_at_bounds() {
    let ty = NumberType::new().min(0).max(10).step(4);
    assert_eq!(ty.increment(Some(&Value::Integer(4))), Some(Value::Integer(8)));
    assert_eq!(ty.increment(Some(&Value::Integer(8))), Some(Value::Integer(10)));
    assert_eq!(ty.increment(Some(&Value::Integer(10))), None);
    assert_eq!(ty.decrement(Some(&Value::Integer(2))), Some(Value::Integer(0)));
    assert_eq!(ty.decrement(Some(&Value::Integer(0))), None);
    assert_eq!(ty.increment(None), Some(Value::Integer(0)));
  }
}
