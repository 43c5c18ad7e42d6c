use std::fmt;

use serde::Serialize;
use the_requisition::{
  Assignment,
  Invocation,
  Requisition,
  Status,
  Value,
  cursor::StatusSpan,
};

/// A snapshot of a requisition after one line.
#[derive(Debug, Serialize)]
pub struct Report {
  pub input:          String,
  pub cursor:         usize,
  pub command:        Option<String>,
  pub command_status: Status,
  pub status:         Status,
  pub assignments:    Vec<AssignmentReport>,
  pub leftovers:      AssignmentReport,
  pub markup:         Vec<StatusSpan>,
  /// Name of the assignment the cursor edits.
  pub editing:        String,
  pub invocation:     Option<Invocation>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dispatch:       Option<DispatchReport>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentReport {
  pub name:        String,
  pub value:       Option<Value>,
  pub status:      Status,
  pub message:     Option<String>,
  pub predictions: Vec<String>,
}

impl From<&Assignment> for AssignmentReport {
  fn from(assignment: &Assignment) -> Self {
    Self {
      name:        assignment.name().to_string(),
      value:       assignment.value().cloned(),
      status:      assignment.status(),
      message:     assignment.message().map(str::to_string),
      predictions: assignment
        .predictions()
        .iter()
        .map(|prediction| prediction.name.clone())
        .collect(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DispatchReport {
  pub transcript: Vec<String>,
  pub error:      Option<String>,
}

impl Report {
  pub fn capture(requisition: &Requisition, cursor: usize) -> anyhow::Result<Self> {
    let slot = requisition.assignment_at(cursor)?;
    let editing = requisition
      .assignment_for(slot)
      .map(|assignment| assignment.name().to_string())
      .unwrap_or_default();

    Ok(Self {
      input: requisition.text(),
      cursor,
      command: requisition.command().map(|command| command.name().to_string()),
      command_status: requisition.command_assignment().status(),
      status: requisition.overall_status(),
      assignments: requisition
        .assignments()
        .iter()
        .map(AssignmentReport::from)
        .collect(),
      leftovers: requisition.unassigned().into(),
      markup: requisition.status_spans(cursor)?,
      editing,
      invocation: requisition.invocation(),
      dispatch: None,
    })
  }
}

fn status_char(status: Status) -> char {
  match status {
    Status::Valid => '.',
    Status::Incomplete => '~',
    Status::Error => '!',
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "input:    {}", self.input)?;
    let underline: String = self
      .markup
      .iter()
      .flat_map(|span| std::iter::repeat_n(status_char(span.status), span.end - span.start))
      .collect();
    writeln!(f, "markup:   {underline}")?;
    writeln!(
      f,
      "command:  {} ({})",
      self.command.as_deref().unwrap_or("-"),
      self.command_status
    )?;
    for assignment in &self.assignments {
      write!(
        f,
        "  {:<12} {:<10} {}",
        assignment.name,
        assignment.status,
        assignment
          .value
          .as_ref()
          .map_or_else(|| "-".to_string(), Value::to_string)
      )?;
      if let Some(message) = &assignment.message {
        write!(f, "  # {message}")?;
      }
      if !assignment.predictions.is_empty() {
        write!(f, "  [{}]", assignment.predictions.join(", "))?;
      }
      writeln!(f)?;
    }
    if self.leftovers.status != Status::Valid {
      write!(f, "leftover: {}", self.leftovers.status)?;
      if let Some(message) = &self.leftovers.message {
        write!(f, "  # {message}")?;
      }
      writeln!(f)?;
    }
    writeln!(f, "editing:  {} @ {}", self.editing, self.cursor)?;
    writeln!(f, "status:   {}", self.status)?;
    if let Some(invocation) = &self.invocation {
      writeln!(f, "typed:    {}", invocation.typed)?;
    }
    if let Some(dispatch) = &self.dispatch {
      for line in &dispatch.transcript {
        writeln!(f, "  > {line}")?;
      }
      if let Some(error) = &dispatch.error {
        writeln!(f, "  error: {error}")?;
      }
    }
    Ok(())
  }
}
