//! A small command set to try the engine against.

use std::sync::Arc;

use the_requisition::{
  Command,
  CommandError,
  CommandEvent,
  CommandRegistry,
  Invocation,
  Parameter,
  Value,
  types::{
    ArrayType,
    BooleanType,
    NumberType,
    SelectionType,
    StringType,
  },
};

/// Handler output collected during a dispatch.
pub type Transcript = Vec<String>;

fn record(env: &mut dyn std::any::Any, line: String) {
  if let Some(transcript) = env.downcast_mut::<Transcript>() {
    transcript.push(line);
  }
}

fn describe(event: CommandEvent, invocation: &Invocation) -> String {
  format!("{event:?}: {}", invocation.typed)
}

pub fn registry() -> Arc<CommandRegistry> {
  let mut registry = CommandRegistry::new();

  registry.register(
    Command::new("echo", "Print a message")
      .param(Parameter::new("message", Arc::new(StringType)).doc("Text to print"))
      .handler(|env, event, invocation| {
        if event == CommandEvent::Validate
          && let Some(message) = invocation.get("message")
        {
          record(env, message.to_string());
        }
        Ok(())
      }),
  );

  registry.register(
    Command::new("open", "Open a file")
      .param(Parameter::new("path", Arc::new(StringType)).doc("File to open"))
      .param(
        Parameter::new("line", Arc::new(NumberType::new().min(1)))
          .doc("Line to jump to")
          .named_only()
          .alias('l'),
      )
      .param(
        Parameter::new("readonly", Arc::new(BooleanType))
          .doc("Open without write access")
          .alias('r'),
      )
      .handler(|env, event, invocation| {
        record(env, describe(event, invocation));
        Ok(())
      }),
  );

  registry.register(
    Command::new("set", "Change a setting")
      .param(
        Parameter::new(
          "option",
          Arc::new(SelectionType::new(["tab-width", "line-numbers", "theme"])),
        )
        .doc("Setting to change"),
      )
      .param(Parameter::new("value", Arc::new(StringType)).doc("New value"))
      .handler(|env, event, invocation| {
        record(env, describe(event, invocation));
        Ok(())
      }),
  );

  registry.register(
    Command::new("indent", "Indent the selection")
      .param(
        Parameter::new("width", Arc::new(NumberType::new().min(1).max(16)))
          .doc("Columns per level")
          .default_value(Value::Integer(4)),
      )
      .param(
        Parameter::new("tabs", Arc::new(BooleanType))
          .doc("Indent with tabs")
          .alias('t'),
      ),
  );

  registry.register(
    Command::new("tag", "Label the current buffer")
      .param(
        Parameter::new("labels", Arc::new(ArrayType::new(Arc::new(StringType))))
          .doc("Labels to add"),
      ),
  );

  registry.register(Command::namespace("git", "Version control"));
  registry.register(
    Command::new("git commit", "Record changes")
      .param(
        Parameter::new("message", Arc::new(StringType))
          .doc("Commit message")
          .alias('m'),
      )
      .param(Parameter::new("amend", Arc::new(BooleanType)).doc("Rewrite the last commit"))
      .handler(|env, event, invocation| {
        if invocation.get("message").is_some_and(|m| m.as_str() == Some("")) {
          return Err(CommandError::failed("empty commit message"));
        }
        record(env, describe(event, invocation));
        Ok(())
      }),
  );
  registry.register(
    Command::new("git push", "Send changes")
      .param(
        Parameter::new("remote", Arc::new(SelectionType::new(["origin", "upstream"])))
          .doc("Where to push")
          .default_value("origin"),
      )
      .param(
        Parameter::new("force", Arc::new(BooleanType))
          .doc("Overwrite remote history")
          .alias('f'),
      ),
  );

  registry.register(Command::new("quit", "Close the editor"));

  Arc::new(registry)
}

#[cfg(test)]
mod test {
  use the_requisition::{
    Requisition,
    Status,
  };

  use super::*;

  #[test]
  fn every_command_resolves() {
    let registry = registry();
    for name in registry.command_names() {
      let mut requisition = Requisition::new(registry.clone());
      requisition.update(name, name.chars().count());
      assert_eq!(
        requisition.command().map(|command| command.name()),
        Some(name),
        "resolving {name}"
      );
    }
  }

  #[test]
  fn named_line_number() {
    let mut requisition = Requisition::new(registry());
    requisition.update("open main.rs -l 12 -r", 21);
    assert_eq!(requisition.status(), Status::Valid);
    assert_eq!(
      requisition.assignment("line").and_then(|a| a.value()),
      Some(&Value::Integer(12))
    );
    assert_eq!(
      requisition.assignment("readonly").and_then(|a| a.value()),
      Some(&Value::Bool(true))
    );
  }

  #[test]
  fn handlers_write_the_transcript() {
    let mut requisition = Requisition::new(registry());
    requisition.update("echo hello there", 16);
    let invocation = requisition.invocation().unwrap();

    let mut transcript = Transcript::new();
    requisition
      .registry()
      .dispatch(&mut transcript, CommandEvent::Validate, &invocation)
      .unwrap();
    assert_eq!(transcript, ["hello there"]);
  }
}
