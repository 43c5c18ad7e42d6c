//! The live pairing of one parameter with its current conversion.

use std::fmt;

use crate::{
  argument::Argument,
  command::Parameter,
  conversion::{
    Conversion,
    Prediction,
  },
  event::{
    AssignmentChange,
    Followups,
    ListenerId,
    Listeners,
  },
  status::Status,
  token::Token,
  types::TypeKind,
  value::Value,
};

/// Which assignment of a requisition something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
  /// The command path itself.
  Command,
  /// A declared parameter, by declaration index.
  Param(usize),
  /// Tokens no parameter claimed.
  Unassigned,
}

impl Slot {
  pub const COMMAND_INDEX: isize = -1;
  pub const UNASSIGNED_INDEX: isize = -2;

  /// The conventional numeric index: `-1` for the command, `-2` for the
  /// unassigned bucket, the declaration index otherwise.
  pub fn index(self) -> isize {
    match self {
      Slot::Command => Self::COMMAND_INDEX,
      Slot::Unassigned => Self::UNASSIGNED_INDEX,
      Slot::Param(i) => i as isize,
    }
  }
}

impl fmt::Display for Slot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Slot::Command => f.write_str("command"),
      Slot::Param(i) => write!(f, "param {i}"),
      Slot::Unassigned => f.write_str("unassigned"),
    }
  }
}

/// One parameter and its current [`Conversion`].
///
/// The conversion is only ever replaced as a whole. Replacing it tags its
/// tokens with this assignment's slot and notifies listeners when the value
/// or the raw argument changed.
#[derive(Debug)]
pub struct Assignment {
  param:      Parameter,
  slot:       Slot,
  conversion: Conversion,
  listeners:  Listeners<AssignmentChange>,
}

impl Assignment {
  pub fn new(param: Parameter, slot: Slot) -> Self {
    let mut assignment = Self {
      param,
      slot,
      conversion: Conversion::valid(Value::Null, Argument::Blank),
      listeners: Listeners::default(),
    };
    assignment.conversion = assignment.default_conversion();
    assignment.conversion.bind(slot);
    assignment
  }

  pub fn param(&self) -> &Parameter {
    &self.param
  }

  pub fn name(&self) -> &str {
    &self.param.name
  }

  pub fn slot(&self) -> Slot {
    self.slot
  }

  pub fn conversion(&self) -> &Conversion {
    &self.conversion
  }

  pub fn arg(&self) -> &Argument {
    &self.conversion.arg
  }

  /// The converted value, falling back to the parameter default.
  pub fn value(&self) -> Option<&Value> {
    self
      .conversion
      .value
      .as_ref()
      .or(self.param.default.as_ref())
  }

  pub fn message(&self) -> Option<&str> {
    self.conversion.message.as_deref()
  }

  pub fn predictions(&self) -> &[Prediction] {
    &self.conversion.predictions
  }

  pub fn status(&self) -> Status {
    if self.param.is_required() && !self.conversion.is_data_provided() {
      return Status::Error;
    }
    if self.slot == Slot::Command
      && self
        .conversion
        .value
        .as_ref()
        .and_then(Value::as_command)
        .is_some_and(|command| command.is_namespace())
    {
      return Status::Incomplete;
    }
    self.conversion.status
  }

  /// Whether the current value is the parameter default.
  pub fn is_default(&self) -> bool {
    self
      .param
      .ty
      .value_equals(self.value(), self.param.default.as_ref())
  }

  pub fn add_listener(
    &mut self,
    listener: impl FnMut(&AssignmentChange, &mut Followups) + 'static,
  ) -> ListenerId {
    self.listeners.add(listener)
  }

  pub fn remove_listener(&mut self, id: ListenerId) -> bool {
    self.listeners.remove(id)
  }

  pub(crate) fn default_conversion(&self) -> Conversion {
    match &self.param.default {
      Some(value) => Conversion::valid(value.clone(), Argument::Blank),
      None => self.param.ty.default_conversion(),
    }
  }

  /// Replaces the conversion. Returns the change when the value (as judged
  /// by the type) or the raw argument differs.
  pub(crate) fn set_conversion(
    &mut self,
    mut conversion: Conversion,
    followups: &mut Followups,
  ) -> Option<AssignmentChange> {
    conversion.bind(self.slot);
    let same_value = self
      .param
      .ty
      .value_equals(self.conversion.value.as_ref(), conversion.value.as_ref());
    let same_arg = self.conversion.arg == conversion.arg;
    let old = std::mem::replace(&mut self.conversion, conversion);
    if same_value && same_arg {
      return None;
    }

    let change = AssignmentChange {
      slot:      self.slot,
      name:      self.param.name.clone(),
      old_value: old.value,
      new_value: self.conversion.value.clone(),
      old_arg:   old.arg,
      new_arg:   self.conversion.arg.clone(),
    };
    self.listeners.emit(&change, followups);
    Some(change)
  }

  fn flag_token(&self) -> Token {
    Token::new(" ", format!("--{}", self.param.name), "")
  }

  /// The argument that would represent `value` in place of the current one.
  fn argument_for(&self, value: &Value) -> Argument {
    match self.param.kind() {
      TypeKind::Boolean => {
        match (value.as_bool(), &self.conversion.arg) {
          (Some(true), Argument::TrueNamed(name)) => Argument::TrueNamed(name.clone()),
          (Some(true), _) => Argument::TrueNamed(self.flag_token()),
          _ => Argument::Blank,
        }
      },
      TypeKind::Command => self.command_argument(&self.param.ty.stringify(value)),
      TypeKind::Array => {
        let items = match value {
          Value::Array(items) => items.as_slice(),
          other => std::slice::from_ref(other),
        };
        // Members follow the spelling of an existing flagged member.
        let flag = match &self.conversion.arg {
          Argument::Array(members) => {
            members.iter().find_map(|member| {
              match member {
                Argument::Named { name, .. } => Some(name.clone()),
                _ => None,
              }
            })
          },
          _ => None,
        };
        let flag = flag.or_else(|| (!self.param.positional).then(|| self.flag_token()));
        let members = items
          .iter()
          .map(|item| {
            let value = Token::spacer().rebase(&self.param.ty.stringify(item));
            match &flag {
              Some(name) => {
                Argument::Named {
                  name:  name.clone(),
                  value: Some(value),
                }
              },
              None => Argument::Single(value),
            }
          })
          .collect();
        Argument::Array(members)
      },
      _ => {
        let text = self.param.ty.stringify(value);
        match &self.conversion.arg {
          Argument::Blank if !self.param.positional => {
            Argument::Named {
              name:  self.flag_token(),
              value: Some(Token::spacer().rebase(&text)),
            }
          },
          arg => arg.rebase(&text),
        }
      },
    }
  }

  /// A command path written as one bare token per word, in the place of the
  /// current path.
  fn command_argument(&self, path: &str) -> Argument {
    let current = self.conversion.arg.tokens();
    let prefix = current
      .first()
      .map(|token| token.spacing_only().prefix().to_string())
      .unwrap_or_default();
    let suffix = current
      .last()
      .map(|token| token.spacing_only().suffix().to_string())
      .unwrap_or_default();

    let words: Vec<&str> = path.split_whitespace().collect();
    let last = words.len().saturating_sub(1);
    let tokens: Vec<Token> = words
      .iter()
      .enumerate()
      .map(|(i, word)| {
        let prefix = if i == 0 { prefix.as_str() } else { " " };
        let suffix = if i == last { suffix.as_str() } else { "" };
        Token::new(prefix, *word, suffix)
      })
      .collect();
    Argument::from_tokens(&tokens)
  }

  /// A conversion carrying `value`, re-parsed from its new text.
  pub(crate) fn conversion_for(&self, value: &Value) -> Conversion {
    self.param.ty.parse(self.argument_for(value))
  }

  pub(crate) fn predicted_conversion(&self) -> Option<Conversion> {
    let prediction = self.conversion.predictions.first()?;
    Some(self.conversion_for(&prediction.value))
  }

  pub(crate) fn incremented_conversion(&self) -> Option<Conversion> {
    let value = self.param.ty.increment(self.value())?;
    Some(self.conversion_for(&value))
  }

  pub(crate) fn decremented_conversion(&self) -> Option<Conversion> {
    let value = self.param.ty.decrement(self.value())?;
    Some(self.conversion_for(&value))
  }

  /// An explicitly empty argument (`''`), used to keep positions stable when
  /// a later positional parameter gets a value.
  pub(crate) fn visible_blank_conversion(&self) -> Conversion {
    self
      .param
      .ty
      .parse(Argument::Single(Token::spacer().rebase("")))
  }
}
