//! Stable entity keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryDomain;

/// Stable identifier of one physical data point: `(domain, raw id)`.
///
/// Derived deterministically from the raw snapshot, so repeated polls of
/// the same point always produce the same key. Used both as the cache
/// key and the discovery-dedup key.
///
/// Ordering follows the canonical domain order first, then the raw id,
/// so ordered maps traverse a snapshot in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub domain: TelemetryDomain,
    pub raw_id: String,
}

impl EntityKey {
    /// Create a key for the given domain and raw device id.
    #[must_use]
    pub fn new(domain: TelemetryDomain, raw_id: impl Into<String>) -> Self {
        Self {
            domain,
            raw_id: raw_id.into(),
        }
    }

    /// Lowercase `domain_rawid` slug used in composite entity keys.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}_{}", self.domain.as_str(), self.raw_id.to_lowercase())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.raw_id)
    }
}
