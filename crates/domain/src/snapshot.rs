//! Poll snapshots — the raw wire shape and the flattened cache shape.

use std::collections::BTreeMap;

use crate::key::EntityKey;
use crate::record::SensorRecord;
use crate::telemetry::TelemetryDomain;
use crate::time::Timestamp;

/// Snapshot as returned by the device client: `domain -> raw id -> record`.
#[derive(Debug, Clone, Default)]
pub struct RawSnapshot {
    domains: BTreeMap<TelemetryDomain, BTreeMap<String, SensorRecord>>,
}

impl RawSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record under its domain and raw id.
    pub fn insert(
        &mut self,
        domain: TelemetryDomain,
        raw_id: impl Into<String>,
        record: SensorRecord,
    ) {
        self.domains
            .entry(domain)
            .or_default()
            .insert(raw_id.into(), record);
    }

    /// All records of one domain.
    #[must_use]
    pub fn domain(&self, domain: TelemetryDomain) -> Option<&BTreeMap<String, SensorRecord>> {
        self.domains.get(&domain)
    }

    /// Total number of records across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One complete, internally consistent poll result.
///
/// Keyed by [`EntityKey`], replaced wholesale on every successful cycle
/// and never mutated in place — consumers only ever hold read-only views
/// of a finished snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    records: BTreeMap<EntityKey, SensorRecord>,
    captured_at: Timestamp,
}

impl TelemetrySnapshot {
    /// Flatten a raw device snapshot, stamping it with `captured_at`.
    #[must_use]
    pub fn from_raw(raw: RawSnapshot, captured_at: Timestamp) -> Self {
        let mut records = BTreeMap::new();
        for (domain, points) in raw.domains {
            for (raw_id, record) in points {
                records.insert(EntityKey::new(domain, raw_id), record);
            }
        }
        Self {
            records,
            captured_at,
        }
    }

    /// Look up one record.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&SensorRecord> {
        self.records.get(key)
    }

    /// All records, in canonical domain order then raw-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &SensorRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When this snapshot was captured.
    #[must_use]
    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }
}
