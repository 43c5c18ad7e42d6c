mod cli;
mod demo;
mod report;

use std::io::{
  self,
  BufRead,
};

use anyhow::{
  Context,
  Result,
};
use clap::Parser;
use the_requisition::{
  Requisition,
  RequisitionConfig,
};

use crate::{
  cli::Args,
  report::{
    DispatchReport,
    Report,
  },
};

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "[{} {}] {}",
        record.level(),
        record.target(),
        message
      ))
    })
    .level(level)
    .chain(io::stderr())
    .apply()
    .context("failed to install logger")
}

fn main() -> Result<()> {
  let args = Args::parse();
  setup_logging(args.verbosity)?;

  let config = match &args.config_file {
    Some(path) => {
      RequisitionConfig::load(path)
        .with_context(|| format!("loading {}", path.display()))?
    },
    None => RequisitionConfig::default(),
  };
  log::debug!("using {config:?}");

  let lines = if args.lines.is_empty() {
    io::stdin()
      .lock()
      .lines()
      .collect::<io::Result<Vec<_>>>()
      .context("failed to read stdin")?
  } else {
    args.lines.clone()
  };

  let mut requisition = Requisition::with_config(demo::registry(), config);
  for line in &lines {
    let cursor = args.cursor.unwrap_or_else(|| line.chars().count());
    requisition.update(line, cursor);
    let mut report = Report::capture(&requisition, cursor)?;

    if let Some(event) = args.dispatch
      && let Some(invocation) = &report.invocation
    {
      let mut transcript = demo::Transcript::new();
      let result = requisition
        .registry()
        .dispatch(&mut transcript, event.into(), invocation);
      report.dispatch = Some(DispatchReport {
        transcript,
        error: result.err().map(|error| error.to_string()),
      });
    }

    if args.json {
      println!("{}", serde_json::to_string(&report)?);
    } else {
      println!("{report}");
    }
  }
  Ok(())
}
