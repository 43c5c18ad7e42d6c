use serde::Serialize;

use crate::{
  argument::Argument,
  assignment::Slot,
  status::Status,
  value::Value,
};

/// A completion candidate offered by a parameter type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
  pub name:        String,
  pub value:       Value,
  pub description: Option<String>,
}

impl Prediction {
  pub fn new(name: impl Into<String>, value: Value) -> Self {
    Self {
      name: name.into(),
      value,
      description: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}

/// The outcome of parsing an [`Argument`] with a parameter type.
///
/// `value` is `None` when no value could be produced. Parsing never fails:
/// problems are reported through `status` and `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
  pub value:       Option<Value>,
  pub arg:         Argument,
  pub status:      Status,
  pub message:     Option<String>,
  pub predictions: Vec<Prediction>,
}

impl Conversion {
  pub fn valid(value: Value, arg: Argument) -> Self {
    Self {
      value: Some(value),
      arg,
      status: Status::Valid,
      message: None,
      predictions: Vec::new(),
    }
  }

  pub fn incomplete(value: Option<Value>, arg: Argument, message: impl Into<String>) -> Self {
    Self {
      value,
      arg,
      status: Status::Incomplete,
      message: Some(message.into()).filter(|m: &String| !m.is_empty()),
      predictions: Vec::new(),
    }
  }

  pub fn error(arg: Argument, message: impl Into<String>) -> Self {
    Self {
      value: None,
      arg,
      status: Status::Error,
      message: Some(message.into()),
      predictions: Vec::new(),
    }
  }

  pub fn with_predictions(mut self, predictions: Vec<Prediction>) -> Self {
    self.predictions = predictions;
    self
  }

  /// Whether the user typed anything for this conversion.
  pub fn is_data_provided(&self) -> bool {
    !self.arg.is_blank()
  }

  pub(crate) fn bind(&mut self, slot: Slot) {
    self.arg.bind(slot);
  }
}
