use thiserror::Error;

use crate::assignment::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequisitionError {
  /// Cursor and trace queries need at least one processed update.
  #[error("no input processed yet")]
  NoInput,
  /// A re-run was requested while one is in progress and the re-entry policy
  /// rejects nested work.
  #[error("requisition is busy")]
  Busy,
  #[error("no assignment for slot {0}")]
  UnknownSlot(Slot),
}

pub type Result<T, E = RequisitionError> = std::result::Result<T, E>;
