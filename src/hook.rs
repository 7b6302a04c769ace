//! Host-facing adapter: configuration, callback glue, provider metadata.

use crate::attribute::{ClusterAttributeStore, CrmAttributeStore};
use crate::error::{Result, SrHookError};
use crate::event::{classify, ReplicationEvent};
use crate::fallback::FallbackStore;
use crate::publisher::StatusPublisher;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub const HOOK_VERSION: &str = "0.162.0";

const SID_ENV_VAR: &str = "SAPSYSTEMNAME";
const DEFAULT_PROVIDER: &str = "SAPHanaSR";

/// Callback return codes handed back to the host framework. The host only
/// logs them; nothing above us branches on the value.
pub const RC_HANDLED: i32 = 0;
pub const RC_BAD_EVENT: i32 = 1;

#[derive(Debug, Clone)]
pub struct HookConfig {
  pub sid: String,
  pub provider: String,
  /// Directory holding the per-site fallback files. The database's
  /// working directory is instance-local, so the default goes one level
  /// up to a directory every node of the system shares.
  pub fallback_dir: PathBuf,
}

impl HookConfig {
  pub fn new(sid: impl Into<String>) -> Result<Self> {
    let sid = sid.into();
    if sid.is_empty() {
      return Err(SrHookError::Configuration(
        "system identifier must not be empty".to_string(),
      ));
    }
    Ok(Self {
      sid,
      provider: DEFAULT_PROVIDER.to_string(),
      fallback_dir: PathBuf::from(".."),
    })
  }

  /// Read the system identifier from the environment, the way the
  /// database instance exports it to its child processes.
  pub fn from_env() -> Result<Self> {
    match std::env::var(SID_ENV_VAR) {
      Ok(sid) => Self::new(sid),
      Err(_) => Err(SrHookError::Configuration(format!(
        "{SID_ENV_VAR} is not set in the environment"
      ))),
    }
  }

  pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
    self.provider = provider.into();
    self
  }

  pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.fallback_dir = dir.into();
    self
  }
}

/// Provider metadata reported to the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
  pub provider_company: String,
  pub provider_name: String,
  pub provider_description: String,
  pub provider_version: String,
}

/// The HA/DR hook itself. The host instantiates it once and invokes
/// [`SrHook::sr_connection_changed`] on every replication transition.
pub struct SrHook {
  provider: String,
  publisher: StatusPublisher,
}

impl SrHook {
  pub fn new(config: HookConfig) -> Self {
    let store = Arc::new(CrmAttributeStore::new(config.provider.clone()));
    Self::with_store(config, store)
  }

  /// Construction seam for tests and non-crm deployments.
  pub fn with_store(config: HookConfig, store: Arc<dyn ClusterAttributeStore>) -> Self {
    info!(version = HOOK_VERSION, sid = %config.sid, "srnotify hook init");
    let fallback = FallbackStore::new(&config.fallback_dir);
    Self {
      provider: config.provider,
      publisher: StatusPublisher::new(config.sid, store, fallback),
    }
  }

  pub fn about(&self) -> ProviderInfo {
    ProviderInfo {
      provider_company: "SUSE".to_string(),
      provider_name: self.provider.clone(),
      provider_description: "Inform Cluster about SR state".to_string(),
      provider_version: "1.0".to_string(),
    }
  }

  pub fn publisher(&self) -> &StatusPublisher {
    &self.publisher
  }

  /// Inbound callback: classify the host's parameter dictionary and
  /// publish the result. Returns [`RC_HANDLED`] for every interpretable
  /// event regardless of how publication went, so a failing cluster
  /// cannot destabilize the host's event processing.
  pub fn sr_connection_changed(&self, params: &Value) -> i32 {
    let event: ReplicationEvent = match serde_json::from_value(params.clone()) {
      Ok(event) => event,
      Err(parse_error) => {
        error!(%parse_error, %params, "discarding uninterpretable replication event");
        return RC_BAD_EVENT;
      }
    };

    info!(
      version = HOOK_VERSION,
      system_status = event.system_status,
      is_in_sync = event.is_in_sync,
      reason = %event.reason,
      site = %event.site_name,
      "srConnectionChanged"
    );

    let decision = classify(&event);
    let outcome = self.publisher.publish(decision, &event.site_name);
    info!(?outcome, site = %event.site_name, "replication event handled");
    RC_HANDLED
  }
}

#[cfg(test)]
mod tests {
  use super::{HookConfig, SrHook, RC_BAD_EVENT, RC_HANDLED};
  use crate::attribute::{CallOutcome, ClusterAttributeStore};
  use std::sync::Arc;

  struct AlwaysOk;

  impl ClusterAttributeStore for AlwaysOk {
    fn set_attribute(&self, _key: &str, _value: &str) -> CallOutcome {
      CallOutcome::ok("ok")
    }
  }

  fn hook(dir: &std::path::Path) -> SrHook {
    let config = HookConfig::new("HA1")
      .expect("config")
      .with_fallback_dir(dir);
    SrHook::with_store(config, Arc::new(AlwaysOk))
  }

  #[test]
  fn empty_sid_is_a_configuration_error() {
    assert!(HookConfig::new("").is_err());
  }

  #[test]
  fn malformed_parameter_dictionary_returns_bad_event() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hook = hook(dir.path());
    let params = serde_json::json!({ "siteName": "WDF" });
    assert_eq!(hook.sr_connection_changed(&params), RC_BAD_EVENT);
  }

  #[test]
  fn absent_site_name_key_returns_bad_event_not_a_silent_skip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hook = hook(dir.path());
    let params = serde_json::json!({
      "system_status": 10,
      "is_in_sync": false,
      "reason": "secondary gone",
    });
    assert_eq!(hook.sr_connection_changed(&params), RC_BAD_EVENT);
    // an explicitly empty site stays a normal skip
    let params = serde_json::json!({
      "system_status": 10,
      "is_in_sync": false,
      "reason": "secondary gone",
      "siteName": "",
    });
    assert_eq!(hook.sr_connection_changed(&params), RC_HANDLED);
  }

  #[test]
  fn interpretable_event_is_always_handled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hook = hook(dir.path());
    let params = serde_json::json!({
      "system_status": 15,
      "is_in_sync": true,
      "reason": "",
      "siteName": "WDF",
    });
    assert_eq!(hook.sr_connection_changed(&params), RC_HANDLED);
  }

  #[test]
  fn about_reports_provider_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    let info = hook(dir.path()).about();
    assert_eq!(info.provider_name, "SAPHanaSR");
    assert_eq!(info.provider_version, "1.0");
  }
}
