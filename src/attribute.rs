//! Cluster attribute naming and the crm_attribute call seam.

use std::process::Command;
use tracing::{info, warn};

/// Key under which a site's replication status is stored in the cluster
/// configuration: `hana_<sid>_site_srHook_<site>`, sid lowercased.
pub fn attribute_key(sid: &str, site: &str) -> String {
  format!("hana_{}_site_srHook_{}", sid.to_lowercase(), site)
}

/// Result of one attribute-setting attempt against the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
  pub success: bool,
  pub diagnostic: String,
}

impl CallOutcome {
  pub fn ok(diagnostic: impl Into<String>) -> Self {
    Self {
      success: true,
      diagnostic: diagnostic.into(),
    }
  }

  pub fn failed(diagnostic: impl Into<String>) -> Self {
    Self {
      success: false,
      diagnostic: diagnostic.into(),
    }
  }
}

/// Writable view of the cluster attribute store. The production
/// implementation shells out to crm_attribute; tests substitute a mock.
pub trait ClusterAttributeStore: Send + Sync {
  fn set_attribute(&self, key: &str, value: &str) -> CallOutcome;
}

pub const DEFAULT_CRM_ATTRIBUTE_BIN: &str = "/usr/sbin/crm_attribute";

/// Sets attributes by invoking `sudo crm_attribute -n <key> -v <value>
/// -t crm_config -s <provider>`.
///
/// The call is synchronous with exactly one attempt and no timeout; a
/// hanging crm_attribute blocks the calling event thread. Callers that
/// need liveness must bound the call externally.
#[derive(Debug, Clone)]
pub struct CrmAttributeStore {
  binary: String,
  provider: String,
}

impl CrmAttributeStore {
  pub fn new(provider: impl Into<String>) -> Self {
    Self {
      binary: DEFAULT_CRM_ATTRIBUTE_BIN.to_string(),
      provider: provider.into(),
    }
  }

  pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
    self.binary = binary.into();
    self
  }
}

impl ClusterAttributeStore for CrmAttributeStore {
  fn set_attribute(&self, key: &str, value: &str) -> CallOutcome {
    // The hook runs as the database administration user, so the call goes
    // through sudo; /etc/sudoers must permit it without a password.
    let rendered = format!(
      "sudo {} -n {} -v {} -t crm_config -s {}",
      self.binary, key, value, self.provider
    );

    let status = Command::new("sudo")
      .arg(&self.binary)
      .args(["-n", key, "-v", value, "-t", "crm_config", "-s", &self.provider])
      .status();

    match status {
      Ok(status) if status.success() => {
        info!(command = %rendered, "cluster attribute set");
        CallOutcome::ok(rendered)
      }
      Ok(status) => {
        warn!(command = %rendered, %status, "cluster attribute call failed");
        CallOutcome::failed(format!("<{rendered}> rc={status}"))
      }
      Err(error) => {
        warn!(command = %rendered, %error, "cluster attribute call could not be spawned");
        CallOutcome::failed(format!("<{rendered}> failed to spawn: {error}"))
      }
    }
  }
}
