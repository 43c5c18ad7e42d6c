use crate::{
  argument::Argument,
  conversion::{
    Conversion,
    Prediction,
  },
  types::{
    ParamType,
    cannot_use,
  },
  value::Value,
};

/// One of a fixed list of names.
#[derive(Debug, Clone)]
pub struct SelectionType {
  options: Vec<String>,
}

impl SelectionType {
  pub fn new<I, S>(options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      options: options.into_iter().map(Into::into).collect(),
    }
  }

  pub fn options(&self) -> &[String] {
    &self.options
  }

  fn position(&self, value: Option<&Value>) -> Option<usize> {
    let name = value.and_then(Value::as_str)?;
    self.options.iter().position(|option| option == name)
  }

  fn predict(&self, prefix: &str) -> Vec<Prediction> {
    self
      .options
      .iter()
      .filter(|option| option.starts_with(prefix))
      .map(|option| Prediction::new(option.as_str(), Value::String(option.clone())))
      .collect()
  }
}

impl ParamType for SelectionType {
  fn name(&self) -> &str {
    "selection"
  }

  fn parse(&self, arg: Argument) -> Conversion {
    let text = arg.text();
    if self.options.iter().any(|option| *option == text) {
      return Conversion::valid(Value::String(text.clone()), arg).with_predictions(self.predict(&text));
    }

    let predictions = self.predict(&text);
    if predictions.is_empty() {
      Conversion::error(arg, cannot_use(&text))
    } else {
      Conversion::incomplete(None, arg, "").with_predictions(predictions)
    }
  }

  fn increment(&self, value: Option<&Value>) -> Option<Value> {
    if self.options.is_empty() {
      return None;
    }
    let next = match self.position(value) {
      Some(i) => (i + 1) % self.options.len(),
      None => 0,
    };
    Some(Value::String(self.options[next].clone()))
  }

  fn decrement(&self, value: Option<&Value>) -> Option<Value> {
    if self.options.is_empty() {
      return None;
    }
    let len = self.options.len();
    let prev = match self.position(value) {
      Some(i) => (i + len - 1) % len,
      None => len - 1,
    };
    Some(Value::String(self.options[prev].clone()))
  }
}
