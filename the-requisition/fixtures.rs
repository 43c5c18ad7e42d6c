//! Commands shared by the unit tests.

use std::sync::Arc;

use crate::{
  command::{
    Command,
    CommandRegistry,
    Parameter,
  },
  types::{
    ArrayType,
    BooleanType,
    NumberType,
    SelectionType,
    StringType,
  },
  value::Value,
};

pub(crate) fn registry() -> Arc<CommandRegistry> {
  let mut registry = CommandRegistry::new();

  registry.register(
    Command::new("echo", "Print a message")
      .param(Parameter::new("message", Arc::new(StringType)))
      .handler(|env, _, invocation| {
        if let Some(log) = env.downcast_mut::<Vec<String>>()
          && let Some(message) = invocation.get("message")
        {
          log.push(message.to_string());
        }
        Ok(())
      }),
  );

  registry.register(
    Command::new("run", "Run a target")
      .param(Parameter::new("verbose", Arc::new(BooleanType)).alias('v'))
      .param(Parameter::new("target", Arc::new(StringType))),
  );

  registry.register(
    Command::new("build", "Build with tags").param(
      Parameter::new("tag", Arc::new(ArrayType::new(Arc::new(StringType)))).alias('t'),
    ),
  );

  registry.register(Command::new("noop", "Do nothing"));

  registry.register(Command::namespace("git", "Version control"));
  registry.register(
    Command::new("git commit", "Record changes")
      .param(Parameter::new("message", Arc::new(StringType)).alias('m'))
      .param(Parameter::new("amend", Arc::new(BooleanType))),
  );
  registry.register(
    Command::new("git push", "Send changes")
      .param(
        Parameter::new("remote", Arc::new(SelectionType::new(["origin", "upstream"])))
          .default_value("origin"),
      )
      .param(Parameter::new("force", Arc::new(BooleanType)).alias('f')),
  );

  registry.register(
    Command::new("set", "Change a setting")
      .param(Parameter::new("setting", Arc::new(SelectionType::new(["size", "speed"]))))
      .param(Parameter::new("value", Arc::new(NumberType::new().min(0).max(10)))),
  );

  registry.register(
    Command::new("greet", "Say hello")
      .param(Parameter::new("name", Arc::new(StringType)).default_value("world"))
      .param(
        Parameter::new("times", Arc::new(NumberType::new().min(1).max(5)))
          .default_value(Value::Integer(1)),
      ),
  );

  Arc::new(registry)
}
