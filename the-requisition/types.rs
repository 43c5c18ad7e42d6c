//! Parameter types: how raw arguments become typed values.
//!
//! The binder never inspects concrete types. It asks for a [`TypeKind`]
//! instead, so any [`ParamType`] implementation can take part in binding.

use std::{
  fmt,
  sync::Arc,
};

use crate::{
  argument::Argument,
  conversion::Conversion,
  value::Value,
};

mod array;
mod boolean;
mod command;
mod number;
mod selection;
mod string;
mod unassigned;

pub use array::ArrayType;
pub use boolean::BooleanType;
pub use command::CommandType;
pub use number::NumberType;
pub use selection::SelectionType;
pub use string::StringType;
pub use unassigned::UnassignedType;

/// Binding capabilities of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// A single token value.
  Plain,
  /// Free text. A lone text parameter captures the whole remainder.
  Text,
  /// A flag that never consumes a value token.
  Boolean,
  /// Aggregates every occurrence into one sequence.
  Array,
  /// A command path.
  Command,
}

pub type TypeRef = Arc<dyn ParamType>;

pub trait ParamType: fmt::Debug + Send + Sync {
  fn name(&self) -> &str;

  fn kind(&self) -> TypeKind {
    TypeKind::Plain
  }

  /// Parses `arg`. Must not fail: invalid input is reported by the status of
  /// the returned conversion.
  fn parse(&self, arg: Argument) -> Conversion;

  fn stringify(&self, value: &Value) -> String {
    value.to_string()
  }

  /// The conversion used when nothing was typed.
  fn default_conversion(&self) -> Conversion {
    self.parse(Argument::Blank)
  }

  /// The value after `value`, or `None` when there is none.
  fn increment(&self, _value: Option<&Value>) -> Option<Value> {
    None
  }

  /// The value before `value`, or `None` when there is none.
  fn decrement(&self, _value: Option<&Value>) -> Option<Value> {
    None
  }

  fn value_equals(&self, a: Option<&Value>, b: Option<&Value>) -> bool {
    a == b
  }
}

/// Error message for text a type cannot use.
pub(crate) fn cannot_use(text: &str) -> String {
  format!("Can't use '{text}'")
}
