use crate::{
  argument::Argument,
  conversion::{
    Conversion,
    Prediction,
  },
  types::ParamType,
  value::Value,
};

/// Type of the bucket holding tokens that no parameter claimed.
///
/// Leftovers are an error, except for a single leftover that is the start of
/// one of the command's flags: that is someone still typing a flag name.
#[derive(Debug, Clone, Default)]
pub struct UnassignedType {
  flags: Vec<String>,
}

impl UnassignedType {
  pub fn new(flags: Vec<String>) -> Self {
    Self { flags }
  }
}

impl ParamType for UnassignedType {
  fn name(&self) -> &str {
    "unassigned"
  }

  fn parse(&self, arg: Argument) -> Conversion {
    let members = match &arg {
      Argument::Array(members) => members.clone(),
      Argument::Blank => Vec::new(),
      other => vec![other.clone()],
    };
    let texts: Vec<Value> = members.iter().map(|m| Value::String(m.text())).collect();

    if members.is_empty() {
      return Conversion::valid(Value::Array(texts), arg);
    }

    if let [member] = members.as_slice() {
      let text = member.text();
      let predictions: Vec<_> = self
        .flags
        .iter()
        .filter(|flag| text.starts_with('-') && flag.starts_with(text.as_str()) && **flag != text)
        .map(|flag| Prediction::new(flag.as_str(), Value::String(flag.clone())))
        .collect();
      if !predictions.is_empty() {
        return Conversion::incomplete(Some(Value::Array(texts)), arg, "").with_predictions(predictions);
      }
    }

    let message = if members.len() == 1 {
      "Unexpected argument".to_string()
    } else {
      format!("Unexpected arguments ({})", members.len())
    };
    let mut conversion = Conversion::error(arg, message);
    conversion.value = Some(Value::Array(texts));
    conversion
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    status::Status,
    token::Token,
  };

  fn leftovers(texts: &[&str]) -> Argument {
    Argument::Array(
      texts
        .iter()
        .map(|text| Argument::Single(Token::new(" ", *text, "")))
        .collect(),
    )
  }

  #[test]
  fn leftovers_are_errors() {
    let ty = UnassignedType::new(vec!["--verbose".into()]);
    let conversion = ty.parse(leftovers(&["extra", "stuff"]));
    assert_eq!(conversion.status, Status::Error);
    assert_eq!(conversion.message.as_deref(), Some("Unexpected arguments (2)"));
  }

  #[test]
  fn partial_flag_is_incomplete() {
    let ty = UnassignedType::new(vec!["--verbose".into(), "--version".into()]);
    let conversion = ty.parse(leftovers(&["--verb"]));
    assert_eq!(conversion.status, Status::Incomplete);
    assert_eq!(conversion.predictions.len(), 1);
  }

  #[test]
  fn nothing_left_is_valid() {
    let ty = UnassignedType::default();
    assert_eq!(ty.default_conversion().status, Status::Valid);
  }
}
