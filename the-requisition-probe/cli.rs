use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
  ValueEnum,
};
use the_requisition::CommandEvent;

#[derive(Parser, Debug)]
#[command(name = "the-requisition-probe", about, long_about = None)]
pub struct Args {
  /// Lines to process in order. Read from stdin when none are given
  #[arg(value_name = "LINE")]
  pub lines: Vec<String>,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,

  /// Load requisition settings from a TOML file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  pub config_file: Option<PathBuf>,

  /// Cursor offset in characters (defaults to the end of each line)
  #[arg(long = "cursor", value_name = "N")]
  pub cursor: Option<usize>,

  /// Print one JSON object per line instead of a text report
  #[arg(long = "json")]
  pub json: bool,

  /// Send an event to the resolved command's handler
  #[arg(long = "dispatch", value_enum, value_name = "EVENT")]
  pub dispatch: Option<DispatchEvent>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DispatchEvent {
  Preview,
  Validate,
  Cancel,
}

impl From<DispatchEvent> for CommandEvent {
  fn from(event: DispatchEvent) -> Self {
    match event {
      DispatchEvent::Preview => CommandEvent::Preview,
      DispatchEvent::Validate => CommandEvent::Validate,
      DispatchEvent::Cancel => CommandEvent::Cancel,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parses_flags() {
    let args = Args::parse_from([
      "the-requisition-probe",
      "-vv",
      "--cursor",
      "3",
      "--json",
      "--dispatch",
      "validate",
      "echo hi",
    ]);
    assert_eq!(args.verbosity, 2);
    assert_eq!(args.cursor, Some(3));
    assert!(args.json);
    assert!(matches!(args.dispatch, Some(DispatchEvent::Validate)));
    assert_eq!(args.lines, ["echo hi"]);
  }
}
