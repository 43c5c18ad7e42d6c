//! Commands, their parameters, and the registry that resolves them.

use std::{
  any::Any,
  collections::HashMap,
  fmt,
  sync::Arc,
};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::{
  types::{
    TypeKind,
    TypeRef,
  },
  value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandEvent {
  Preview,
  Validate,
  Cancel,
}

pub type CommandResult = Result<(), CommandError>;

pub type CommandFn =
  Arc<dyn Fn(&mut dyn Any, CommandEvent, &Invocation) -> CommandResult + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
  #[error("command not found: {0}")]
  NotFound(String),
  #[error("'{0}' is a command group and cannot be run")]
  NotExecutable(String),
  #[error("{0}")]
  Failed(String),
}

impl CommandError {
  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed(message.into())
  }
}

#[derive(Debug, Clone)]
pub struct Parameter {
  pub name:       String,
  pub ty:         TypeRef,
  pub doc:        String,
  pub default:    Option<Value>,
  /// Whether the parameter can be filled without its flag.
  pub positional: bool,
  /// Single-character short flag, e.g. `m` for `-m`.
  pub alias:      Option<char>,
}

impl Parameter {
  /// Booleans start out named-only with a `false` default, arrays default to
  /// an empty array. Everything else is positional and required.
  pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
    let (positional, default) = match ty.kind() {
      TypeKind::Boolean => (false, Some(Value::Bool(false))),
      TypeKind::Array => (true, Some(Value::Array(Vec::new()))),
      _ => (true, None),
    };
    Self {
      name: name.into(),
      ty,
      doc: String::new(),
      default,
      positional,
      alias: None,
    }
  }

  pub fn doc(mut self, doc: impl Into<String>) -> Self {
    self.doc = doc.into();
    self
  }

  pub fn default_value(mut self, value: impl Into<Value>) -> Self {
    self.default = Some(value.into());
    self
  }

  pub fn named_only(mut self) -> Self {
    self.positional = false;
    self
  }

  pub fn alias(mut self, alias: char) -> Self {
    self.alias = Some(alias);
    self
  }

  pub fn kind(&self) -> TypeKind {
    self.ty.kind()
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }

  /// Whether `text` is one of this parameter's flag spellings.
  pub fn is_named_param(&self, text: &str) -> bool {
    if let Some(name) = text.strip_prefix("--") {
      return name == self.name;
    }
    match (text.strip_prefix('-'), self.alias) {
      (Some(short), Some(alias)) => {
        let mut chars = short.chars();
        chars.next() == Some(alias) && chars.next().is_none()
      },
      _ => false,
    }
  }

  /// Every flag spelling, long form first.
  pub fn flags(&self) -> Vec<String> {
    let mut flags = vec![format!("--{}", self.name)];
    if let Some(alias) = self.alias {
      flags.push(format!("-{alias}"));
    }
    flags
  }
}

#[derive(Clone)]
pub struct Command {
  name:      String,
  doc:       String,
  params:    Vec<Parameter>,
  namespace: bool,
  handler:   Option<CommandFn>,
}

impl Command {
  pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
    Self {
      name:      name.into(),
      doc:       doc.into(),
      params:    Vec::new(),
      namespace: false,
      handler:   None,
    }
  }

  /// A group of sub-commands. Naming one only partially names a command.
  pub fn namespace(name: impl Into<String>, doc: impl Into<String>) -> Self {
    Self {
      namespace: true,
      ..Self::new(name, doc)
    }
  }

  pub fn param(mut self, param: Parameter) -> Self {
    self.params.push(param);
    self
  }

  pub fn handler<F>(mut self, handler: F) -> Self
  where
    F: Fn(&mut dyn Any, CommandEvent, &Invocation) -> CommandResult + Send + Sync + 'static,
  {
    self.handler = Some(Arc::new(handler));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn doc(&self) -> &str {
    &self.doc
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub fn is_namespace(&self) -> bool {
    self.namespace
  }

  pub fn execute(&self, env: &mut dyn Any, event: CommandEvent, invocation: &Invocation) -> CommandResult {
    if self.namespace {
      return Err(CommandError::NotExecutable(self.name.clone()));
    }
    match &self.handler {
      Some(handler) => handler(env, event, invocation),
      None => Ok(()),
    }
  }
}

impl fmt::Debug for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Command")
      .field("name", &self.name)
      .field("doc", &self.doc)
      .field("params", &self.params)
      .field("namespace", &self.namespace)
      .finish()
  }
}

/// Everything a handler needs to run a fully bound command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
  pub command: String,
  /// Parameter values in declaration order. Missing values are `Null`.
  pub args:    IndexMap<String, Value>,
  /// The canonical form of the typed input.
  pub typed:   String,
}

impl Invocation {
  pub fn get(&self, name: &str) -> Option<&Value> {
    self.args.get(name)
  }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
  commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `command`, creating any missing parent namespaces so that
  /// `git commit` makes `git` resolvable too.
  pub fn register(&mut self, command: Command) {
    let parts: Vec<&str> = command.name.split_whitespace().collect();
    for end in 1..parts.len() {
      let parent = parts[..end].join(" ");
      self
        .commands
        .entry(parent.clone())
        .or_insert_with(|| Arc::new(Command::namespace(parent, "")));
    }

    let name = parts.join(" ");
    tracing::debug!(command = %name, "registering command");
    self.commands.insert(
      name.clone(),
      Arc::new(Command { name, ..command }),
    );
  }

  pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
    self.commands.get(name)
  }

  pub fn command_names(&self) -> Vec<&str> {
    let mut names: Vec<_> = self.commands.keys().map(String::as_str).collect();
    names.sort();
    names
  }

  /// Commands whose name starts with `prefix`, exact match first and then by
  /// name. A blank prefix lists top-level commands only.
  pub fn predictions(&self, prefix: &str) -> Vec<Arc<Command>> {
    let mut matches: Vec<_> = self
      .commands
      .values()
      .filter(|command| command.name.starts_with(prefix))
      .filter(|command| !prefix.is_empty() || !command.name.contains(' '))
      .cloned()
      .collect();
    matches.sort_by(|a, b| {
      (a.name != prefix)
        .cmp(&(b.name != prefix))
        .then_with(|| a.name.cmp(&b.name))
    });
    matches
  }

  pub fn dispatch(
    &self,
    env: &mut dyn Any,
    event: CommandEvent,
    invocation: &Invocation,
  ) -> CommandResult {
    let Some(command) = self.get(&invocation.command) else {
      return Err(CommandError::NotFound(invocation.command.clone()));
    };
    tracing::debug!(command = %invocation.command, ?event, "dispatching command");
    command.execute(env, event, invocation)
  }
}
