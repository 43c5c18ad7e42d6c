//! Live requisition engine for typed command bars.
//!
//! A [`Requisition`] turns raw command-bar text into a resolved command and a
//! set of per-parameter [`Assignment`]s that are kept in sync with the text
//! as the user types:
//!
//! 1. **Tokenization** ([`tokenizer`]): lossless split into [`Token`]s with
//!    quote and escape handling.
//! 2. **Command resolution** ([`resolve`]): the longest leading run of tokens
//!    naming a command in the [`CommandRegistry`].
//! 3. **Binding** ([`bind`]): remaining tokens are distributed over named,
//!    positional, boolean and array parameters; leftovers go to the
//!    unassigned bucket.
//! 4. **Projection** ([`cursor`]): per-character status markup and
//!    cursor-to-assignment lookup for the UI.
//!
//! Values can also flow the other way: accepting a prediction or nudging a
//! value rewrites only the span of the affected argument.
//!
//! ```
//! use std::sync::Arc;
//!
//! use the_requisition::{
//!   Command,
//!   CommandRegistry,
//!   Parameter,
//!   Requisition,
//!   Status,
//!   types::StringType,
//! };
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(
//!   Command::new("echo", "Print a message")
//!     .param(Parameter::new("message", Arc::new(StringType))),
//! );
//!
//! let mut requisition = Requisition::new(Arc::new(registry));
//! requisition.update("echo hello world", 16);
//!
//! let message = requisition.assignment("message").unwrap();
//! assert_eq!(message.value().unwrap().to_string(), "hello world");
//! assert_eq!(requisition.status(), Status::Valid);
//! ```

pub mod argument;
pub mod assignment;
pub mod bind;
pub mod command;
pub mod config;
pub mod conversion;
pub mod cursor;
pub mod error;
pub mod event;
pub mod requisition;
pub mod resolve;
pub mod status;
pub mod token;
pub mod tokenizer;
pub mod types;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use argument::Argument;
pub use assignment::{
  Assignment,
  Slot,
};
pub use command::{
  Command,
  CommandError,
  CommandEvent,
  CommandRegistry,
  Invocation,
  Parameter,
};
pub use config::{
  ReentryPolicy,
  RequisitionConfig,
};
pub use conversion::{
  Conversion,
  Prediction,
};
pub use error::RequisitionError;
pub use requisition::Requisition;
pub use status::Status;
pub use token::Token;
pub use tokenizer::tokenize;
pub use value::Value;
