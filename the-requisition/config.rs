use std::{
  fs,
  io,
  path::Path,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

/// What happens when a listener asks for a re-run while one is underway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReentryPolicy {
  /// Keep the latest request and run it once the current call is done.
  #[default]
  Queue,
  /// Refuse the request with [`RequisitionError::Busy`](crate::RequisitionError::Busy).
  Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RequisitionConfig {
  /// A command whose only parameter is free text captures the whole
  /// remainder of the line.
  pub greedy_text:         bool,
  /// Append a space after a programmatically chosen command that takes
  /// parameters.
  pub space_after_command: bool,
  pub reentry:             ReentryPolicy,
  /// Upper bound on queued re-runs per public call.
  pub max_reruns:          usize,
}

impl Default for RequisitionConfig {
  fn default() -> Self {
    Self {
      greedy_text:         true,
      space_after_command: true,
      reentry:             ReentryPolicy::Queue,
      max_reruns:          8,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config: {0}")]
  Io(#[from] io::Error),
  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
}

impl RequisitionConfig {
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let source = fs::read_to_string(path)?;
    Self::from_toml(&source)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn missing_keys_use_defaults() {
    let config = RequisitionConfig::from_toml("reentry = \"reject\"").unwrap();
    assert_eq!(config.reentry, ReentryPolicy::Reject);
    assert!(config.greedy_text);
    assert_eq!(config.max_reruns, 8);

    assert_eq!(RequisitionConfig::from_toml("").unwrap(), RequisitionConfig::default());
  }

  #[test]
  fn kebab_case_keys() {
    let config =
      RequisitionConfig::from_toml("greedy-text = false\nspace-after-command = false\nmax-reruns = 2")
        .unwrap();
    assert!(!config.greedy_text);
    assert!(!config.space_after_command);
    assert_eq!(config.max_reruns, 2);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(matches!(
      RequisitionConfig::from_toml("greedy = true"),
      Err(ConfigError::Parse(_))
    ));
  }
}
