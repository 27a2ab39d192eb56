//! Registration port — delivery of discovery announcements.

use std::future::Future;

use heliohub_domain::error::HubError;
use heliohub_domain::registration::RegistrationEvent;

/// Host-side registration mechanism for discovered entities.
///
/// This is a **port** — the in-process `EntityRegistry` in
/// `crate::registry` is the default implementation. The poller calls
/// it after the snapshot swap completes, never inside the publish
/// critical section, so slow consumer setup cannot block subsequent
/// polls.
pub trait EntityRegistrar: Send + Sync {
    /// Deliver one registration event.
    fn register(
        &self,
        event: RegistrationEvent,
    ) -> impl Future<Output = Result<(), HubError>> + Send;
}
