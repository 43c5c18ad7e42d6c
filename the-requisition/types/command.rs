use std::sync::Arc;

use crate::{
  argument::Argument,
  command::CommandRegistry,
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

/// Resolves command paths against a registry.
#[derive(Debug, Clone)]
pub struct CommandType {
  registry: Arc<CommandRegistry>,
}

impl CommandType {
  pub fn new(registry: Arc<CommandRegistry>) -> Self {
    Self { registry }
  }

  fn predict(&self, prefix: &str) -> Vec<Prediction> {
    self
      .registry
      .predictions(prefix)
      .into_iter()
      .map(|command| {
        Prediction::new(command.name(), Value::Command(command.clone()))
          .with_description(command.doc())
      })
      .collect()
  }
}

/// Collapses runs of whitespace so `git   commit` finds `git commit`.
fn normalize(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ParamType for CommandType {
  fn name(&self) -> &str {
    "command"
  }

  fn kind(&self) -> TypeKind {
    TypeKind::Command
  }

  fn parse(&self, arg: Argument) -> Conversion {
    let text = normalize(&arg.text());

    if let Some(command) = self.registry.get(&text) {
      let predictions = self.predict(&text);
      return Conversion::valid(Value::Command(command.clone()), arg).with_predictions(predictions);
    }

    let predictions = self.predict(&text);
    if predictions.is_empty() {
      Conversion::error(arg, cannot_use(&text))
    } else {
      Conversion::incomplete(None, arg, "").with_predictions(predictions)
    }
  }

  fn stringify(&self, value: &Value) -> String {
    match value {
      Value::Command(command) => command.name().to_string(),
      other => other.to_string(),
    }
  }
}
