//! Status publication: one cluster call, fallback file on failure.

use crate::attribute::{attribute_key, ClusterAttributeStore};
use crate::event::StatusDecision;
use crate::fallback::FallbackStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// How one publication attempt ended. All variants are normal completions
/// as far as the host callback is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationOutcome {
  /// Suppressed decision or empty site name; nothing was attempted.
  Skipped,
  /// The cluster accepted the attribute; any stale fallback file is gone.
  Published,
  /// The cluster call failed; the value now lives in the fallback file.
  FallbackRecorded,
  /// Both the cluster call and the fallback write failed. The status is
  /// unrepresented until the next event.
  FallbackFailed,
}

/// Publishes classified replication statuses for one database system.
///
/// The system identifier is injected at construction; the core never
/// consults the process environment itself.
pub struct StatusPublisher {
  sid: String,
  store: Arc<dyn ClusterAttributeStore>,
  fallback: FallbackStore,
}

impl StatusPublisher {
  pub fn new(
    sid: impl Into<String>,
    store: Arc<dyn ClusterAttributeStore>,
    fallback: FallbackStore,
  ) -> Self {
    Self {
      sid: sid.into(),
      store,
      fallback,
    }
  }

  pub fn sid(&self) -> &str {
    &self.sid
  }

  pub fn fallback(&self) -> &FallbackStore {
    &self.fallback
  }

  /// Push one status decision to the cluster attribute store, falling
  /// back to the local record when the cluster call fails and clearing
  /// the record once the cluster path works again.
  ///
  /// Every failure below a missing configuration is absorbed here: the
  /// routine logs and returns an outcome, it never propagates an error
  /// into the host's event loop.
  pub fn publish(&self, decision: StatusDecision, site_name: &str) -> PublicationOutcome {
    let status = match decision {
      StatusDecision::Publish(status) => status,
      StatusDecision::Suppressed => {
        info!("skipping publication of a suppressed SR status");
        return PublicationOutcome::Skipped;
      }
    };

    if site_name.is_empty() {
      info!(%status, "skipping publication, empty site name in event parameters");
      return PublicationOutcome::Skipped;
    }

    let key = attribute_key(&self.sid, site_name);
    let value = status.to_string();

    let outcome = self.store.set_attribute(&key, &value);
    if outcome.success {
      match self.fallback.clear(site_name) {
        Ok(true) => info!(site = site_name, "pending fallback file deleted"),
        Ok(false) => {}
        Err(fallback_error) => {
          // Stale record persists until the next successful cycle.
          warn!(site = site_name, %fallback_error, "could not delete pending fallback file");
        }
      }
      return PublicationOutcome::Published;
    }

    warn!(
      site = site_name,
      diagnostic = %outcome.diagnostic,
      "sending attribute to the cluster failed, using local file as fallback"
    );

    match self.fallback.record(site_name, &key, &value) {
      Ok(()) => PublicationOutcome::FallbackRecorded,
      Err(fallback_error) => {
        error!(site = site_name, %fallback_error, "fallback file write failed");
        PublicationOutcome::FallbackFailed
      }
    }
  }
}
