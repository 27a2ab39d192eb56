//! Entity consumers — pull-model views over the telemetry cache.
//!
//! Each consumer holds only its key and a last-seen change token, never
//! a reference into live mutable state. On every read it compares the
//! token against the cache and recomputes its view only when a new
//! snapshot has been published since.

pub mod sensor;
pub mod switch;

pub use sensor::SensorEntity;
pub use switch::{AutomationSwitch, PowerSwitch, SyncState};

use std::collections::BTreeMap;

use serde::Serialize;

use heliohub_domain::time::Timestamp;

/// Uniform read DTO for the per-entity read boundary.
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    /// Composite key the entity is registered under.
    pub composite_key: String,
    /// `sensor` or `switch`.
    pub kind: &'static str,
    /// Current state: a number or token for sensors, `on`/`off` for
    /// switches, `null` before the first snapshot.
    pub state: serde_json::Value,
    pub unit: Option<String>,
    pub icon: Option<String>,
    /// `true` while the state is a local prediction or stale, not a
    /// value confirmed by the latest snapshot.
    pub assumed_state: bool,
    /// Capture time of the snapshot the state came from.
    pub last_updated: Option<Timestamp>,
    /// Display attributes: `friendly_name` always, plus `mode` and
    /// `full_mode` for digital outputs.
    pub attributes: BTreeMap<&'static str, serde_json::Value>,
}
