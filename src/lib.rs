//! HA/DR hook that reports database system-replication health to a
//! Pacemaker cluster.
//!
//! The host monitoring framework calls [`SrHook::sr_connection_changed`]
//! on every replication-state transition. The event is reduced to a
//! coarse status (`SOK`, `SFAIL`, or suppressed) and published as a
//! cluster configuration attribute via crm_attribute. When the cluster
//! call fails, the latest status is kept in a per-site fallback file,
//! written with an atomic rename so the resource agent polling it never
//! sees a torn value, and deleted again once the cluster path recovers.

pub mod attribute;
pub mod error;
pub mod event;
pub mod fallback;
pub mod hook;
pub mod publisher;

pub use attribute::{attribute_key, CallOutcome, ClusterAttributeStore, CrmAttributeStore};
pub use error::{Result, SrHookError};
pub use event::{classify, ReplicationEvent, SrStatus, StatusDecision, SYSTEM_STATUS_IN_SYNC};
pub use fallback::FallbackStore;
pub use hook::{HookConfig, ProviderInfo, SrHook, HOOK_VERSION};
pub use publisher::{PublicationOutcome, StatusPublisher};
