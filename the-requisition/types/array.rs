use crate::{
  argument::Argument,
  conversion::Conversion,
  status::Status,
  types::{
    ParamType,
    TypeKind,
    TypeRef,
  },
  value::Value,
};

/// A sequence of values of one item type.
#[derive(Debug, Clone)]
pub struct ArrayType {
  item: TypeRef,
}

impl ArrayType {
  pub fn new(item: TypeRef) -> Self {
    Self { item }
  }

  pub fn item(&self) -> &TypeRef {
    &self.item
  }
}

impl ParamType for ArrayType {
  fn name(&self) -> &str {
    "array"
  }

  fn kind(&self) -> TypeKind {
    TypeKind::Array
  }

  fn parse(&self, arg: Argument) -> Conversion {
    let members = match &arg {
      Argument::Array(members) => members.clone(),
      Argument::Blank => Vec::new(),
      other => vec![other.clone()],
    };

    let conversions: Vec<_> = members
      .into_iter()
      .map(|member| self.item.parse(member))
      .collect();
    let status = Status::combine(conversions.iter().map(|c| c.status));
    let message = conversions.iter().find_map(|c| c.message.clone());
    let values = conversions
      .iter()
      .filter_map(|c| c.value.clone())
      .collect();

    Conversion {
      value: Some(Value::Array(values)),
      arg,
      status,
      message,
      predictions: Vec::new(),
    }
  }

  fn stringify(&self, value: &Value) -> String {
    match value {
      Value::Array(items) => {
        items
          .iter()
          .map(|item| self.item.stringify(item))
          .collect::<Vec<_>>()
          .join(" ")
      },
      other => self.item.stringify(other),
    }
  }
}
