//! Discovery tracking — announces newly-seen keys exactly once.

use std::collections::HashSet;

use heliohub_domain::key::EntityKey;
use heliohub_domain::registration::{RegistrationEvent, RegistrationKind};
use heliohub_domain::snapshot::TelemetrySnapshot;

/// Tracks which entity keys have already been announced.
///
/// The registry grows monotonically for the lifetime of the process: a
/// key that disappears from a later snapshot stays known and is never
/// re-announced when it comes back. Deduplication uses the same
/// [`EntityKey`] the cache is keyed by, so a rename on the controller
/// never produces a duplicate entity.
#[derive(Debug, Default)]
pub struct DiscoveryTracker {
    seen: HashSet<EntityKey>,
}

impl DiscoveryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys announced so far.
    #[must_use]
    pub fn known(&self) -> usize {
        self.seen.len()
    }

    /// Collect registration events for keys not seen before.
    ///
    /// Traverses the snapshot in canonical domain order. A digital key
    /// fans out into two switch registrations (direct + automation) from
    /// its single discovery; every other domain yields one sensor
    /// registration. Calling this twice on an unchanged snapshot yields
    /// nothing the second time.
    pub fn discover(&mut self, snapshot: &TelemetrySnapshot) -> Vec<RegistrationEvent> {
        let mut events = Vec::new();
        for (key, record) in snapshot.iter() {
            if !self.seen.insert(key.clone()) {
                continue;
            }
            tracing::info!(key = %key, "discovered new data point");

            let display_name = record.display_name.clone();
            if key.domain.is_digital() {
                events.push(RegistrationEvent {
                    kind: RegistrationKind::PowerSwitch,
                    key: key.clone(),
                    display_name: display_name.clone(),
                });
                events.push(RegistrationEvent {
                    kind: RegistrationKind::AutomationSwitch,
                    key: key.clone(),
                    display_name,
                });
            } else {
                events.push(RegistrationEvent {
                    kind: RegistrationKind::Sensor,
                    key: key.clone(),
                    display_name,
                });
            }
        }
        events
    }
}
