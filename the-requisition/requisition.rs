//! The orchestrator keeping text, command and parameter values in sync.
//!
//! Text flows in through [`Requisition::update`]: the input is tokenized, the
//! command resolved and the rest bound to parameters. Values flow back out
//! through the mutators ([`Requisition::set_value`],
//! [`Requisition::accept_prediction`], ...) which rewrite only the tokens of
//! the affected argument.

use std::{
  collections::HashMap,
  sync::Arc,
};

use crate::{
  argument::Argument,
  assignment::{
    Assignment,
    Slot,
  },
  bind::bind,
  command::{
    Command,
    CommandRegistry,
    Invocation,
    Parameter,
  },
  config::RequisitionConfig,
  conversion::Conversion,
  cursor::{
    self,
    SlotLookup,
    StatusSpan,
    TraceEntry,
  },
  error::{
    RequisitionError,
    Result,
  },
  event::{
    AssignmentChange,
    CommandChange,
    Followups,
    ListenerId,
    Listeners,
    TextChange,
  },
  resolve::resolve,
  status::Status,
  token::Token,
  tokenizer::tokenize,
  types::{
    CommandType,
    TypeKind,
    TypeRef,
    UnassignedType,
  },
  value::Value,
};

/// Where a requisition is in processing input.
///
/// Anything other than `Idle` means a structural update is underway and
/// assignment changes are only forwarded, never spliced into the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
  #[default]
  Idle,
  Tokenizing,
  Resolving,
  Binding,
  Splicing,
}

#[derive(Debug)]
pub struct Requisition {
  registry:             Arc<CommandRegistry>,
  config:               RequisitionConfig,
  command_type:         TypeRef,
  command:              Assignment,
  params:               Vec<Assignment>,
  index:                HashMap<String, usize>,
  unassigned:           Assignment,
  tokens:               Option<Vec<Token>>,
  cursor:               usize,
  phase:                Phase,
  followups:            Followups,
  command_listeners:    Listeners<CommandChange>,
  assignment_listeners: Listeners<AssignmentChange>,
  text_listeners:       Listeners<TextChange>,
}

impl Requisition {
  pub fn new(registry: Arc<CommandRegistry>) -> Self {
    Self::with_config(registry, RequisitionConfig::default())
  }

  pub fn with_config(registry: Arc<CommandRegistry>, config: RequisitionConfig) -> Self {
    let command_type: TypeRef = Arc::new(CommandType::new(registry.clone()));
    let command = Assignment::new(
      Parameter::new("command", command_type.clone()).doc("The command to run"),
      Slot::Command,
    );
    Self {
      registry,
      followups: Followups::new(config.reentry),
      config,
      command_type,
      command,
      params: Vec::new(),
      index: HashMap::new(),
      unassigned: unassigned_assignment(None),
      tokens: None,
      cursor: 0,
      phase: Phase::Idle,
      command_listeners: Listeners::default(),
      assignment_listeners: Listeners::default(),
      text_listeners: Listeners::default(),
    }
  }

  pub fn registry(&self) -> &Arc<CommandRegistry> {
    &self.registry
  }

  pub fn config(&self) -> &RequisitionConfig {
    &self.config
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Cursor offset of the last update, in characters.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// The resolved command, if the input names one.
  pub fn command(&self) -> Option<&Arc<Command>> {
    self
      .command
      .conversion()
      .value
      .as_ref()
      .and_then(Value::as_command)
  }

  pub fn command_assignment(&self) -> &Assignment {
    &self.command
  }

  /// Parameter assignments in declaration order.
  pub fn assignments(&self) -> &[Assignment] {
    &self.params
  }

  pub fn assignment(&self, name: &str) -> Option<&Assignment> {
    self.index.get(name).map(|&i| &self.params[i])
  }

  pub fn slot(&self, name: &str) -> Option<Slot> {
    self.index.get(name).map(|&i| Slot::Param(i))
  }

  pub fn assignment_for(&self, slot: Slot) -> Option<&Assignment> {
    match slot {
      Slot::Command => Some(&self.command),
      Slot::Param(i) => self.params.get(i),
      Slot::Unassigned => Some(&self.unassigned),
    }
  }

  pub fn unassigned(&self) -> &Assignment {
    &self.unassigned
  }

  /// The most severe status over the parameter assignments.
  ///
  /// The command and the unassigned bucket are not included; see
  /// [`Requisition::overall_status`].
  pub fn status(&self) -> Status {
    Status::combine(self.params.iter().map(Assignment::status))
  }

  /// [`Requisition::status`] combined with the command and leftover status.
  pub fn overall_status(&self) -> Status {
    Status::combine([
      self.command.status(),
      self.unassigned.status(),
      self.status(),
    ])
  }

  pub fn tokens(&self) -> Result<&[Token]> {
    self.tokens.as_deref().ok_or(RequisitionError::NoInput)
  }

  /// The input as currently held, including edits made through values.
  pub fn text(&self) -> String {
    self
      .tokens
      .iter()
      .flatten()
      .map(Token::to_raw)
      .collect()
  }

  /// A normalized form of the input: the full command name followed by every
  /// parameter that differs from its default.
  pub fn canonical_string(&self) -> String {
    let mut line = match self.command() {
      Some(command) => command.name().to_string(),
      None => self.command.arg().text(),
    };

    let mut named = false;
    for assignment in &self.params {
      let param = assignment.param();
      if assignment.is_default() {
        // Later positionals would shift into this one's place.
        named |= param.positional;
        continue;
      }
      let Some(value) = assignment.value() else {
        named |= param.positional;
        continue;
      };

      let flag = format!(" --{}", param.name);
      let spell = |text: String| Token::spacer().rebase(&text).to_raw();
      match param.kind() {
        TypeKind::Boolean => {
          if value.as_bool() == Some(true) {
            line.push_str(&flag);
          }
        },
        TypeKind::Array => {
          for item in value.as_array().unwrap_or_default() {
            if named || !param.positional {
              line.push_str(&flag);
            }
            line.push_str(&spell(param.ty.stringify(item)));
          }
        },
        _ => {
          if named || !param.positional {
            line.push_str(&flag);
          }
          line.push_str(&spell(param.ty.stringify(value)));
        },
      }
    }
    line
  }

  /// The payload for running the resolved command.
  pub fn invocation(&self) -> Option<Invocation> {
    let command = self.command()?;
    let args = self
      .params
      .iter()
      .map(|assignment| {
        (
          assignment.name().to_string(),
          assignment.value().cloned().unwrap_or(Value::Null),
        )
      })
      .collect();
    Some(Invocation {
      command: command.name().to_string(),
      args,
      typed: self.canonical_string(),
    })
  }

  pub fn trace(&self) -> Result<Vec<TraceEntry<'_>>> {
    Ok(cursor::trace(self.tokens()?))
  }

  /// Status of every character for a cursor at `cursor`.
  pub fn status_markup(&self, cursor: usize) -> Result<Vec<Status>> {
    Ok(cursor::status_markup(self.tokens()?, cursor, self))
  }

  pub fn status_spans(&self, cursor: usize) -> Result<Vec<StatusSpan>> {
    Ok(cursor::status_spans(&self.status_markup(cursor)?))
  }

  /// The assignment a cursor at `offset` edits.
  pub fn assignment_at(&self, offset: usize) -> Result<Slot> {
    Ok(cursor::assignment_at(self.tokens()?, offset, self))
  }

  pub fn on_command_change(
    &mut self,
    listener: impl FnMut(&CommandChange, &mut Followups) + 'static,
  ) -> ListenerId {
    self.command_listeners.add(listener)
  }

  pub fn remove_command_listener(&mut self, id: ListenerId) -> bool {
    self.command_listeners.remove(id)
  }

  /// Listens to changes of any assignment, including ones rebuilt later.
  pub fn on_assignment_change(
    &mut self,
    listener: impl FnMut(&AssignmentChange, &mut Followups) + 'static,
  ) -> ListenerId {
    self.assignment_listeners.add(listener)
  }

  pub fn remove_assignment_listener(&mut self, id: ListenerId) -> bool {
    self.assignment_listeners.remove(id)
  }

  pub fn on_text_change(
    &mut self,
    listener: impl FnMut(&TextChange, &mut Followups) + 'static,
  ) -> ListenerId {
    self.text_listeners.add(listener)
  }

  pub fn remove_text_listener(&mut self, id: ListenerId) -> bool {
    self.text_listeners.remove(id)
  }

  /// Listens to one assignment only. The listener is dropped when the
  /// command changes and the assignments are rebuilt.
  pub fn add_slot_listener(
    &mut self,
    slot: Slot,
    listener: impl FnMut(&AssignmentChange, &mut Followups) + 'static,
  ) -> Result<ListenerId> {
    Ok(self.split_slot(slot)?.0.add_listener(listener))
  }

  /// Processes new input text with the cursor at `cursor`.
  pub fn update(&mut self, text: &str, cursor: usize) {
    self.run_update(text, cursor);
    self.drain_followups();
  }

  /// Replaces the value of `slot`, rewriting its span of the input. Returns
  /// whether anything changed.
  pub fn set_value(&mut self, slot: Slot, value: Value) -> Result<bool> {
    let conversion = self.get(slot)?.conversion_for(&value);
    self.commit(slot, conversion)
  }

  /// Accepts the top prediction of `slot`. A no-op without predictions.
  pub fn accept_prediction(&mut self, slot: Slot) -> Result<bool> {
    match self.get(slot)?.predicted_conversion() {
      Some(conversion) => self.commit(slot, conversion),
      None => Ok(false),
    }
  }

  pub fn increment(&mut self, slot: Slot) -> Result<bool> {
    match self.get(slot)?.incremented_conversion() {
      Some(conversion) => self.commit(slot, conversion),
      None => Ok(false),
    }
  }

  pub fn decrement(&mut self, slot: Slot) -> Result<bool> {
    match self.get(slot)?.decremented_conversion() {
      Some(conversion) => self.commit(slot, conversion),
      None => Ok(false),
    }
  }

  /// Puts `slot` back to its default, removing its text. A positional
  /// parameter with positional values behind it is left as `''` instead, so
  /// those values keep their parameters.
  pub fn reset(&mut self, slot: Slot) -> Result<bool> {
    let assignment = self.get(slot)?;
    let conversion = if self.holds_later_positionals(slot) {
      assignment.visible_blank_conversion()
    } else {
      assignment.default_conversion()
    };
    self.commit(slot, conversion)
  }

  fn holds_later_positionals(&self, slot: Slot) -> bool {
    let Slot::Param(p) = slot else {
      return false;
    };
    let param = self.params[p].param();
    param.positional
      && param.kind() != TypeKind::Array
      && self.params[p + 1..].iter().any(|assignment| {
        assignment.param().positional
          && !assignment.arg().is_blank()
          && !assignment.arg().is_named()
      })
  }

  fn get(&self, slot: Slot) -> Result<&Assignment> {
    self
      .assignment_for(slot)
      .ok_or(RequisitionError::UnknownSlot(slot))
  }

  fn split_slot(&mut self, slot: Slot) -> Result<(&mut Assignment, &mut Followups)> {
    let assignment = match slot {
      Slot::Command => &mut self.command,
      Slot::Param(i) => {
        self
          .params
          .get_mut(i)
          .ok_or(RequisitionError::UnknownSlot(slot))?
      },
      Slot::Unassigned => &mut self.unassigned,
    };
    Ok((assignment, &mut self.followups))
  }

  fn commit(&mut self, slot: Slot, conversion: Conversion) -> Result<bool> {
    let (assignment, followups) = self.split_slot(slot)?;
    let Some(change) = assignment.set_conversion(conversion, followups) else {
      return Ok(false);
    };
    match slot {
      Slot::Command => self.command_edited(change),
      _ => self.assignment_changed(change),
    }
    self.drain_followups();
    Ok(true)
  }

  fn run_update(&mut self, text: &str, cursor: usize) {
    self.phase = Phase::Tokenizing;
    let mut tokens = tokenize(text);

    self.phase = Phase::Resolving;
    let resolution = resolve(self.command_type.as_ref(), &tokens);
    let consumed = resolution.consumed;
    if let Some(change) = self
      .command
      .set_conversion(resolution.conversion, &mut self.followups)
    {
      self.command_changed(&change);
    }

    self.phase = Phase::Binding;
    let rest = &tokens[consumed..];
    let command = self.command().cloned();
    let binding = bind(command.as_deref().map(Command::params), rest, &self.config);
    let leftover = binding.leftover_argument(rest);

    for (p, arg) in binding.args.into_iter().enumerate() {
      let conversion = match arg {
        Some(arg) => self.params[p].param().ty.parse(arg),
        None => self.params[p].default_conversion(),
      };
      if let Some(change) = self.params[p].set_conversion(conversion, &mut self.followups) {
        self.assignment_changed(change);
      }
    }
    let conversion = self.unassigned.param().ty.parse(leftover);
    if let Some(change) = self
      .unassigned
      .set_conversion(conversion, &mut self.followups)
    {
      self.assignment_changed(change);
    }

    for (i, token) in tokens.iter_mut().enumerate() {
      let owner = match i.checked_sub(consumed) {
        None => Slot::Command,
        Some(j) => binding.owners[j],
      };
      token.bind(owner);
    }
    self.tokens = Some(tokens);
    self.cursor = cursor;
    self.phase = Phase::Idle;

    tracing::trace!(
      text,
      cursor,
      command = self.command().map(|c| c.name()),
      status = %self.status(),
      "updated requisition"
    );
    self.emit_text_change();
  }

  /// Reacts to the command resolving to something new during an update.
  fn command_changed(&mut self, change: &AssignmentChange) {
    if self
      .command_type
      .value_equals(change.old_value.as_ref(), change.new_value.as_ref())
    {
      return;
    }

    let old = change
      .old_value
      .as_ref()
      .and_then(Value::as_command)
      .cloned();
    let new = self.command().cloned();
    self.rebuild_params(new.as_deref());
    tracing::debug!(
      old = old.as_ref().map(|c| c.name()),
      new = new.as_ref().map(|c| c.name()),
      params = self.params.len(),
      "command changed"
    );
    self
      .command_listeners
      .emit(&CommandChange { old, new }, &mut self.followups);
  }

  fn rebuild_params(&mut self, command: Option<&Command>) {
    let params = command.map(Command::params).unwrap_or_default();
    self.params = params
      .iter()
      .enumerate()
      .map(|(i, param)| Assignment::new(param.clone(), Slot::Param(i)))
      .collect();
    self.index = params
      .iter()
      .enumerate()
      .map(|(i, param)| (param.name.clone(), i))
      .collect();
    self.unassigned = unassigned_assignment(command);
  }

  /// Reacts to the command being replaced through a value.
  fn command_edited(&mut self, change: AssignmentChange) {
    self.command_changed(&change);
    if !change.arg_changed() {
      return;
    }

    self.phase = Phase::Splicing;
    self.splice(Slot::Command);
    let takes_params = self.command().is_some_and(|c| !c.params().is_empty());
    if self.config.space_after_command
      && takes_params
      && let Some(last) = self.tokens.as_mut().and_then(|tokens| tokens.last_mut())
      && last.owner() == Some(Slot::Command)
      && !last.ends_with_space()
    {
      last.push_suffix(" ");
    }
    self.phase = Phase::Idle;

    let text = self.text();
    let cursor = text.chars().count();
    self.run_update(&text, cursor);
  }

  fn assignment_changed(&mut self, change: AssignmentChange) {
    self
      .assignment_listeners
      .emit(&change, &mut self.followups);
    if self.phase != Phase::Idle || !change.arg_changed() {
      return;
    }

    self.phase = Phase::Splicing;
    if let Slot::Param(p) = change.slot
      && !change.new_arg.is_named()
      && !change.new_arg.is_blank()
    {
      self.backfill(p);
    }
    self.splice(change.slot);
    self.phase = Phase::Idle;

    if change.slot == Slot::Unassigned {
      // Edited leftovers may now bind to a parameter.
      let text = self.text();
      let cursor = text.chars().count();
      self.run_update(&text, cursor);
    } else {
      self.emit_text_change();
    }
  }

  /// Gives blank positional parameters before `p` an explicit empty value,
  /// so a value for `p` is not read as theirs.
  fn backfill(&mut self, p: usize) {
    for q in 0..p {
      let assignment = &self.params[q];
      let param = assignment.param();
      if !param.positional || param.kind() == TypeKind::Array || !assignment.arg().is_blank() {
        continue;
      }
      let conversion = assignment.visible_blank_conversion();
      if let Some(change) = self.params[q].set_conversion(conversion, &mut self.followups) {
        self
          .assignment_listeners
          .emit(&change, &mut self.followups);
        self.splice(Slot::Param(q));
      }
    }
  }

  /// Replaces the tokens owned by `slot` with the tokens of its current
  /// argument, leaving every other token untouched.
  fn splice(&mut self, slot: Slot) {
    let Some(assignment) = self.assignment_for(slot) else {
      return;
    };
    let mut replacement: Vec<Token> = assignment.arg().tokens().into_iter().cloned().collect();
    let tokens = self.tokens.get_or_insert_with(Vec::new);

    let first_owned = tokens.iter().position(|token| token.owner() == Some(slot));
    tokens.retain(|token| token.owner() != Some(slot));
    let at = first_owned.unwrap_or_else(|| insertion_point(tokens, slot));

    if let Some(first) = replacement.first_mut()
      && (at == 0 || tokens[at - 1].ends_with_space())
    {
      *first = std::mem::take(first).trim_leading_space();
    }
    if let Some(last) = replacement.last()
      && !last.ends_with_space()
      && let Some(next) = tokens.get_mut(at)
      && !next.prefix().starts_with(char::is_whitespace)
    {
      next.push_prefix_front(" ");
    }

    tracing::debug!(%slot, at, count = replacement.len(), "splicing argument");
    tokens.splice(at..at, replacement);
  }

  fn emit_text_change(&mut self) {
    let event = TextChange { text: self.text() };
    self.text_listeners.emit(&event, &mut self.followups);
  }

  /// Runs re-runs queued by listeners, up to the configured bound.
  fn drain_followups(&mut self) {
    let mut reruns = 0;
    while let Some(pending) = self.followups.take() {
      if reruns >= self.config.max_reruns {
        tracing::warn!(
          max_reruns = self.config.max_reruns,
          "dropping re-run requested by a listener"
        );
        self.followups.clear();
        break;
      }
      reruns += 1;
      self.run_update(&pending.text, pending.cursor);
    }
  }
}

/// Where the tokens of `slot` go when it has none yet: after the command and
/// every earlier parameter.
fn insertion_point(tokens: &[Token], slot: Slot) -> usize {
  match slot {
    Slot::Command => 0,
    Slot::Unassigned => tokens.len(),
    Slot::Param(p) => {
      tokens
        .iter()
        .rposition(|token| {
          match token.owner() {
            Some(Slot::Command) => true,
            Some(Slot::Param(q)) => q < p,
            _ => false,
          }
        })
        .map_or(0, |i| i + 1)
    },
  }
}

fn unassigned_assignment(command: Option<&Command>) -> Assignment {
  let flags = command
    .map(|command| command.params().iter().flat_map(Parameter::flags).collect())
    .unwrap_or_default();
  let param = Parameter::new("unassigned", Arc::new(UnassignedType::new(flags)))
    .default_value(Value::Array(Vec::new()));
  Assignment::new(param, Slot::Unassigned)
}

impl SlotLookup for Requisition {
  fn slot_status(&self, slot: Slot) -> Status {
    self
      .assignment_for(slot)
      .map_or(Status::Valid, Assignment::status)
  }

  fn slot_is_named(&self, slot: Slot) -> bool {
    self
      .assignment_for(slot)
      .is_some_and(|assignment| matches!(assignment.arg(), Argument::Named { .. }))
  }

  fn first_blank_positional(&self) -> Option<Slot> {
    self
      .params
      .iter()
      .find(|assignment| assignment.param().positional && assignment.arg().is_blank())
      .map(Assignment::slot)
  }
}
