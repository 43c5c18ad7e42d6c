//! Change notifications.
//!
//! Each notifying entity owns its own [`Listeners`] set. Listeners run
//! synchronously and cannot touch the requisition directly; they get a
//! [`Followups`] handle through which they may ask for a re-run with new
//! text.

use std::{
  fmt,
  sync::Arc,
};

use crate::{
  argument::Argument,
  assignment::Slot,
  command::Command,
  config::ReentryPolicy,
  error::{
    RequisitionError,
    Result,
  },
  value::Value,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChange {
  pub slot:      Slot,
  pub name:      String,
  pub old_value: Option<Value>,
  pub new_value: Option<Value>,
  pub old_arg:   Argument,
  pub new_arg:   Argument,
}

impl AssignmentChange {
  pub fn arg_changed(&self) -> bool {
    self.old_arg != self.new_arg
  }
}

#[derive(Debug, Clone)]
pub struct CommandChange {
  pub old: Option<Arc<Command>>,
  pub new: Option<Arc<Command>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
  pub text:   String,
  pub cursor: usize,
}

/// Work requested by listeners, run after the current call settles.
#[derive(Debug, Default)]
pub struct Followups {
  policy:  ReentryPolicy,
  pending: Option<PendingUpdate>,
}

impl Followups {
  pub(crate) fn new(policy: ReentryPolicy) -> Self {
    Self {
      policy,
      pending: None,
    }
  }

  /// Asks for the input to be replaced with `text`. Under the queue policy
  /// only the latest request is kept.
  pub fn request_update(&mut self, text: impl Into<String>, cursor: usize) -> Result<()> {
    match self.policy {
      ReentryPolicy::Reject => {
        tracing::warn!("rejected re-run requested from a listener");
        Err(RequisitionError::Busy)
      },
      ReentryPolicy::Queue => {
        self.pending = Some(PendingUpdate {
          text: text.into(),
          cursor,
        });
        Ok(())
      },
    }
  }

  pub(crate) fn take(&mut self) -> Option<PendingUpdate> {
    self.pending.take()
  }

  pub(crate) fn clear(&mut self) {
    self.pending = None;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E, &mut Followups)>;

pub struct Listeners<E> {
  next:    u64,
  entries: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Default for Listeners<E> {
  fn default() -> Self {
    Self {
      next:    0,
      entries: Vec::new(),
    }
  }
}

impl<E> Listeners<E> {
  pub fn add(&mut self, listener: impl FnMut(&E, &mut Followups) + 'static) -> ListenerId {
    let id = ListenerId(self.next);
    self.next += 1;
    self.entries.push((id, Box::new(listener)));
    id
  }

  /// Returns whether a listener was removed.
  pub fn remove(&mut self, id: ListenerId) -> bool {
    let before = self.entries.len();
    self.entries.retain(|(entry, _)| *entry != id);
    self.entries.len() != before
  }

  pub(crate) fn emit(&mut self, event: &E, followups: &mut Followups) {
    for (_, listener) in &mut self.entries {
      listener(event, followups);
    }
  }
}

impl<E> fmt::Debug for Listeners<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Listeners")
      .field("len", &self.entries.len())
      .finish()
  }
}
