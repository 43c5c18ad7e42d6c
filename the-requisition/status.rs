use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

/// Validity of a piece of input, ordered from least to most severe.
///
/// The ordering matters: combining statuses always keeps the most severe one,
/// so `Status::Valid < Status::Incomplete < Status::Error`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  #[default]
  Valid,
  /// The input could become valid with more typing.
  Incomplete,
  Error,
}

impl Status {
  /// Returns the most severe status, or `Valid` for an empty iterator.
  pub fn combine(statuses: impl IntoIterator<Item = Status>) -> Status {
    statuses.into_iter().max().unwrap_or_default()
  }

  pub fn is_valid(self) -> bool {
    self == Status::Valid
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(match self {
      Status::Valid => "valid",
      Status::Incomplete => "incomplete",
      Status::Error => "error",
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn combine_keeps_most_severe() {
    assert_eq!(Status::combine([]), Status::Valid);
    assert_eq!(
      Status::combine([Status::Valid, Status::Incomplete, Status::Valid]),
      Status::Incomplete
    );
    assert_eq!(
      Status::combine([Status::Error, Status::Incomplete]),
      Status::Error
    );
  }
}
