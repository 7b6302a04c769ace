//! Crate error type shared across the hook modules.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SrHookError>;

#[derive(Debug, Error)]
pub enum SrHookError {
  /// Required configuration is missing or unusable, e.g. no system
  /// identifier in the environment. Fatal for the invocation.
  #[error("invalid hook configuration: {0}")]
  Configuration(String),

  /// The host handed us a parameter dictionary we cannot interpret.
  #[error("malformed replication event: {0}")]
  MalformedEvent(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}
