//! Telemetry cache — single-writer, many-reader snapshot publication.

use std::sync::{Arc, PoisonError, RwLock};

use heliohub_domain::key::EntityKey;
use heliohub_domain::record::SensorRecord;
use heliohub_domain::snapshot::TelemetrySnapshot;
use heliohub_domain::time::Timestamp;

/// Monotonic change-detection token, bumped once per successful cycle.
///
/// Consumers compare their last-seen token against the cache's current
/// one and skip recomputation when unchanged. The token never gates
/// correctness — a consumer that misses a bump simply recomputes on its
/// next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    /// Token value before the first successful cycle.
    pub const ZERO: Self = Self(0);

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Default)]
struct Published {
    snapshot: Option<Arc<TelemetrySnapshot>>,
    generation: Generation,
}

/// Owner of the current snapshot.
///
/// Publication is an atomic swap of an immutable [`Arc`]: readers take
/// the `Arc` and the generation token in one short read-locked step and
/// can never observe a half-written snapshot — they hold either the
/// previous complete snapshot or the new one. The poller is the only
/// writer.
#[derive(Debug, Default)]
pub struct TelemetryCache {
    published: RwLock<Published>,
}

impl TelemetryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot and change token, taken atomically.
    ///
    /// The snapshot is absent before the first successful cycle.
    #[must_use]
    pub fn current(&self) -> (Option<Arc<TelemetrySnapshot>>, Generation) {
        let guard = self
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        (guard.snapshot.clone(), guard.generation)
    }

    /// Current change token.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.current().1
    }

    /// Look up a single record in the current snapshot.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<SensorRecord> {
        let (snapshot, _) = self.current();
        snapshot.and_then(|snap| snap.get(key).cloned())
    }

    /// Capture time of the current snapshot, absent before the first
    /// successful cycle.
    #[must_use]
    pub fn last_updated(&self) -> Option<Timestamp> {
        let (snapshot, _) = self.current();
        snapshot.map(|snap| snap.captured_at())
    }

    /// Replace the snapshot wholesale and bump the generation.
    ///
    /// Poller-only writer; called at most once per cycle.
    pub fn replace(&self, snapshot: Arc<TelemetrySnapshot>) -> Generation {
        let mut guard = self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.snapshot = Some(snapshot);
        guard.generation = guard.generation.next();
        guard.generation
    }
}
