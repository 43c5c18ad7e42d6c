use crate::{
  argument::Argument,
  conversion::Conversion,
  types::{
    ParamType,
    TypeKind,
  },
  value::Value,
};

/// Free text. Anything typed is valid, including an explicitly quoted empty
/// string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl ParamType for StringType {
  fn name(&self) -> &str {
    "string"
  }

  fn kind(&self) -> TypeKind {
    TypeKind::Text
  }

  fn parse(&self, arg: Argument) -> Conversion {
    match &arg {
      Argument::Blank | Argument::Named { value: None, .. } => {
        Conversion::incomplete(None, arg, "")
      },
      _ if arg.is_blank() => Conversion::incomplete(None, arg, ""),
      _ => {
        let text = arg.text();
        Conversion::valid(Value::String(text), arg)
      },
    }
  }
}
