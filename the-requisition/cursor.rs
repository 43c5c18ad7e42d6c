//! Projects requisition state onto character positions of the input.
//!
//! All offsets count characters, not bytes.

use serde::Serialize;

use crate::{
  assignment::Slot,
  status::Status,
  token::Token,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
  Prefix,
  Text,
  Suffix,
}

/// One character of the input and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry<'a> {
  pub token: &'a Token,
  /// Index of `token` in the token list.
  pub index: usize,
  pub zone:  Zone,
  pub ch:    char,
}

/// What the projector needs to know about the assignments.
pub trait SlotLookup {
  fn slot_status(&self, slot: Slot) -> Status;

  /// Whether the slot is currently bound through a flag with a value.
  fn slot_is_named(&self, slot: Slot) -> bool;

  /// The first positional parameter that has nothing typed for it.
  fn first_blank_positional(&self) -> Option<Slot>;
}

pub fn trace(tokens: &[Token]) -> Vec<TraceEntry<'_>> {
  let mut entries = Vec::new();
  for (index, token) in tokens.iter().enumerate() {
    let zones = [
      (Zone::Prefix, token.prefix()),
      (Zone::Text, token.source()),
      (Zone::Suffix, token.suffix()),
    ];
    for (zone, part) in zones {
      entries.extend(part.chars().map(|ch| {
        TraceEntry {
          token,
          index,
          zone,
          ch,
        }
      }));
    }
  }
  entries
}

/// The character deciding which token the cursor is in: the one before the
/// cursor, or the first one when the cursor is at the start.
fn active_entry<'a, 'b>(trace: &'b [TraceEntry<'a>], cursor: usize) -> Option<&'b TraceEntry<'a>> {
  let last = trace.len().checked_sub(1)?;
  trace.get(cursor.saturating_sub(1).min(last))
}

/// Status of every character of the input.
///
/// Only text carries a status. An incomplete value reads as an error
/// everywhere except where the cursor is, since that is the only place the
/// user can still be typing it. The command path is never escalated.
pub fn status_markup(tokens: &[Token], cursor: usize, lookup: &impl SlotLookup) -> Vec<Status> {
  let trace = trace(tokens);
  let Some(active) = active_entry(&trace, cursor) else {
    return Vec::new();
  };
  let active_owner = active.token.owner();
  let cursor_in_text = active.zone == Zone::Text
    || (active.zone == Zone::Suffix && active_owner.is_some_and(|slot| lookup.slot_is_named(slot)));

  trace
    .iter()
    .map(|entry| {
      let Some(owner) = entry.token.owner() else {
        return Status::Valid;
      };
      if entry.zone != Zone::Text {
        return Status::Valid;
      }
      let status = lookup.slot_status(owner);
      let escalate = status == Status::Incomplete
        && owner != Slot::Command
        && (Some(owner) != active_owner || !cursor_in_text);
      if escalate { Status::Error } else { status }
    })
    .collect()
}

/// A run of characters sharing one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSpan {
  pub start:  usize,
  pub end:    usize,
  pub status: Status,
}

/// Merges per-character markup into runs.
pub fn status_spans(markup: &[Status]) -> Vec<StatusSpan> {
  let mut spans: Vec<StatusSpan> = Vec::new();
  for (i, &status) in markup.iter().enumerate() {
    match spans.last_mut() {
      Some(span) if span.status == status => span.end = i + 1,
      _ => {
        spans.push(StatusSpan {
          start: i,
          end: i + 1,
          status,
        })
      },
    }
  }
  spans
}

/// The assignment a cursor at `offset` edits.
///
/// Prefix and text belong to their token. A suffix looks forward: to the
/// next token, or after the last token to the first blank positional
/// parameter. Named arguments keep their suffix, since the value is still
/// to come.
pub fn assignment_at(tokens: &[Token], offset: usize, lookup: &impl SlotLookup) -> Slot {
  let mut slots = Vec::new();
  for (i, token) in tokens.iter().enumerate() {
    let owner = token.owner().unwrap_or(Slot::Unassigned);
    let body = token.prefix().chars().count() + token.source().chars().count();
    slots.extend(std::iter::repeat_n(owner, body));

    let suffix_owner = if lookup.slot_is_named(owner) {
      owner
    } else if let Some(next) = tokens.get(i + 1) {
      next.owner().unwrap_or(Slot::Unassigned)
    } else {
      lookup.first_blank_positional().unwrap_or(owner)
    };
    slots.extend(std::iter::repeat_n(suffix_owner, token.suffix().chars().count()));
  }

  let Some(last) = slots.len().checked_sub(1) else {
    return lookup.first_blank_positional().unwrap_or(Slot::Command);
  };
  slots[offset.saturating_sub(1).min(last)]
}

#[cfg(test)]
mod test {
  use std::collections::HashMap;

  use super::*;
  use crate::tokenizer::tokenize;

  #[derive(Default)]
  struct Lookup {
    statuses: HashMap<Slot, Status>,
    named:    Vec<Slot>,
    blank:    Option<Slot>,
  }

  impl SlotLookup for Lookup {
    fn slot_status(&self, slot: Slot) -> Status {
      self.statuses.get(&slot).copied().unwrap_or_default()
    }

    fn slot_is_named(&self, slot: Slot) -> bool {
      self.named.contains(&slot)
    }

    fn first_blank_positional(&self) -> Option<Slot> {
      self.blank
    }
  }

  fn owned(input: &str, owners: &[Slot]) -> Vec<Token> {
    let mut tokens = tokenize(input);
    for (token, owner) in tokens.iter_mut().zip(owners) {
      token.bind(*owner);
    }
    tokens
  }

  fn render(markup: &[Status]) -> String {
    markup
      .iter()
      .map(|status| {
        match status {
          Status::Valid => 'V',
          Status::Incomplete => 'I',
          Status::Error => 'E',
        }
      })
      .collect()
  }

  #[test]
  fn trace_covers_every_character() {
    let tokens = tokenize("a 'b c' \\ d ");
    let trace = trace(&tokens);
    let raw: String = trace.iter().map(|entry| entry.ch).collect();
    assert_eq!(raw, "a 'b c' \\ d ");
    assert_eq!(trace[2].zone, Zone::Prefix);
    assert_eq!(trace[3].zone, Zone::Text);
    assert_eq!(trace[6].zone, Zone::Suffix);
  }

  #[test]
  fn incomplete_only_at_cursor() {
    let tokens = owned("set up 4", &[Slot::Command, Slot::Param(0), Slot::Param(1)]);
    let lookup = Lookup {
      statuses: HashMap::from([(Slot::Param(0), Status::Incomplete)]),
      ..Default::default()
    };

    // Cursor right after "up".
    assert_eq!(render(&status_markup(&tokens, 6, &lookup)), "VVVVIIVV");
    // Cursor at the end, in another token.
    assert_eq!(render(&status_markup(&tokens, 8, &lookup)), "VVVVEEVV");
    // Cursor in the whitespace before "up".
    assert_eq!(render(&status_markup(&tokens, 4, &lookup)), "VVVVEEVV");
  }

  #[test]
  fn command_is_never_escalated() {
    let tokens = owned("gi x", &[Slot::Command, Slot::Unassigned]);
    let lookup = Lookup {
      statuses: HashMap::from([(Slot::Command, Status::Incomplete)]),
      ..Default::default()
    };
    assert_eq!(render(&status_markup(&tokens, 4, &lookup)), "IIVV");
  }

  #[test]
  fn named_suffix_counts_as_inside() {
    let tokens = owned("c -m ", &[Slot::Command, Slot::Param(0)]);
    let lookup = Lookup {
      statuses: HashMap::from([(Slot::Param(0), Status::Incomplete)]),
      named: vec![Slot::Param(0)],
      ..Default::default()
    };
    assert_eq!(render(&status_markup(&tokens, 5, &lookup)), "VVIIV");
  }

  #[test]
  fn spans_merge_runs() {
    let markup = [Status::Valid, Status::Valid, Status::Error, Status::Valid];
    assert_eq!(
      status_spans(&markup),
      [
        StatusSpan {
          start:  0,
          end:    2,
          status: Status::Valid,
        },
        StatusSpan {
          start:  2,
          end:    3,
          status: Status::Error,
        },
        StatusSpan {
          start:  3,
          end:    4,
          status: Status::Valid,
        },
      ]
    );
  }

  #[test]
  fn assignment_at_looks_forward_from_suffixes() {
    let tokens = owned("run 'x' y", &[Slot::Command, Slot::Param(1), Slot::Param(2)]);
    let lookup = Lookup::default();
    assert_eq!(assignment_at(&tokens, 0, &lookup), Slot::Command);
    assert_eq!(assignment_at(&tokens, 3, &lookup), Slot::Command);
    assert_eq!(assignment_at(&tokens, 4, &lookup), Slot::Param(1));
    assert_eq!(assignment_at(&tokens, 6, &lookup), Slot::Param(1));
    // The closing quote is a suffix, so it points at the next token.
    assert_eq!(assignment_at(&tokens, 7, &lookup), Slot::Param(2));
    assert_eq!(assignment_at(&tokens, 9, &lookup), Slot::Param(2));
  }

  #[test]
  fn assignment_at_end_finds_blank_positional() {
    let tokens = owned("run ", &[Slot::Command]);
    let lookup = Lookup {
      blank: Some(Slot::Param(1)),
      ..Default::default()
    };
    assert_eq!(assignment_at(&tokens, 3, &lookup), Slot::Command);
    assert_eq!(assignment_at(&tokens, 4, &lookup), Slot::Param(1));

    let tokens = owned("c -m ", &[Slot::Command, Slot::Param(0)]);
    let lookup = Lookup {
      named: vec![Slot::Param(0)],
      blank: Some(Slot::Param(1)),
      ..Default::default()
    };
    assert_eq!(assignment_at(&tokens, 5, &lookup), Slot::Param(0));
  }
}
