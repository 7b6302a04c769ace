//! Replication event model and status classification.

use crate::error::SrHookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// `system_status` value the database reports once primary and secondary
/// are fully synchronized.
pub const SYSTEM_STATUS_IN_SYNC: i64 = 15;

/// Connection-state notification delivered by the host monitoring
/// framework on every system-replication transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationEvent {
  pub system_status: i64,
  pub is_in_sync: bool,
  /// Free-text diagnostic from the database, logged only.
  #[serde(default)]
  pub reason: String,
  /// Name of the secondary site the event refers to. May be empty, but
  /// the key itself must be present in the host dictionary.
  #[serde(rename = "siteName")]
  pub site_name: String,
}

/// Publishable replication status as seen by the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SrStatus {
  Sok,
  Sfail,
}

impl fmt::Display for SrStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let value = match self {
      SrStatus::Sok => "SOK",
      SrStatus::Sfail => "SFAIL",
    };
    write!(f, "{value}")
  }
}

impl FromStr for SrStatus {
  type Err = SrHookError;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    match raw {
      "SOK" => Ok(Self::Sok),
      "SFAIL" => Ok(Self::Sfail),
      _ => Err(SrHookError::MalformedEvent(format!(
        "invalid replication status: {raw}"
      ))),
    }
  }
}

/// Outcome of classifying one event: either a status worth telling the
/// cluster about, or a transition to suppress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDecision {
  Publish(SrStatus),
  Suppressed,
}

/// Reduce a raw replication event to a coarse status decision.
///
/// Status 15 is the authoritative "in sync" signal and always wins. Any
/// other status while the data is still in sync is a transient condition;
/// publishing it would flap the cluster attribute, so it is suppressed.
/// Only a genuine desync becomes `SFAIL`.
pub fn classify(event: &ReplicationEvent) -> StatusDecision {
  if event.system_status == SYSTEM_STATUS_IN_SYNC {
    return StatusDecision::Publish(SrStatus::Sok);
  }

  if event.is_in_sync {
    info!(
      system_status = event.system_status,
      reason = %event.reason,
      "ignoring bad SR status because is_in_sync is set"
    );
    return StatusDecision::Suppressed;
  }

  StatusDecision::Publish(SrStatus::Sfail)
}
