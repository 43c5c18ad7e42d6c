use std::{
  fmt,
  sync::Arc,
};

use serde::{
  Serialize,
  Serializer,
  ser::SerializeSeq,
};

use crate::command::Command;

/// A typed parameter value.
///
/// `Null` is a value that was explicitly supplied and means "nothing"; a
/// missing value is represented by `Option<Value>::None` on the conversion.
#[derive(Debug, Clone)]
pub enum Value {
  Null,
  Bool(bool),
  Integer(i64),
  String(String),
  Array(Vec<Value>),
  Command(Arc<Command>),
}

impl Value {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Value::Integer(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_array(&self) -> Option<&[Value]> {
    match self {
      Value::Array(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_command(&self) -> Option<&Arc<Command>> {
    match self {
      Value::Command(command) => Some(command),
      _ => None,
    }
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Integer(a), Value::Integer(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Array(a), Value::Array(b)) => a == b,
      (Value::Command(a), Value::Command(b)) => a.name() == b.name(),
      _ => false,
    }
  }
}

impl Eq for Value {}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Integer(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.to_string())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value)
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("null"),
      Value::Bool(b) => write!(f, "{b}"),
      Value::Integer(n) => write!(f, "{n}"),
      Value::String(s) => f.write_str(s),
      Value::Array(items) => {
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(" ")?;
          }
          write!(f, "{item}")?;
        }
        Ok(())
      },
      Value::Command(command) => f.write_str(command.name()),
    }
  }
}

impl Serialize for Value {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Value::Null => serializer.serialize_unit(),
      Value::Bool(b) => serializer.serialize_bool(*b),
      Value::Integer(n) => serializer.serialize_i64(*n),
      Value::String(s) => serializer.serialize_str(s),
      Value::Array(items) => {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
          seq.serialize_element(item)?;
        }
        seq.end()
      },
      Value::Command(command) => serializer.serialize_str(command.name()),
    }
  }
}
