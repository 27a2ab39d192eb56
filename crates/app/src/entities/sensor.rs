//! Read-only sensor consumer.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use heliohub_domain::key::EntityKey;
use heliohub_domain::time::Timestamp;
use heliohub_domain::value::SensorValue;

use crate::cache::{Generation, TelemetryCache};
use crate::entities::EntityView;

/// A read-only sensor over one cached data point.
///
/// Never polls the device itself — it pulls from the shared cache and
/// holds the last-known reading when the point temporarily vanishes
/// from a snapshot. Transport problems never surface here; the view
/// just keeps its staleness timestamp.
pub struct SensorEntity {
    key: EntityKey,
    composite_key: String,
    cache: Arc<TelemetryCache>,
    state: Mutex<SensorState>,
}

#[derive(Debug, Default)]
struct SensorState {
    last_seen: Generation,
    value: Option<SensorValue>,
    unit: Option<String>,
    friendly_name: Option<String>,
    last_updated: Option<Timestamp>,
}

impl SensorEntity {
    #[must_use]
    pub fn new(
        key: EntityKey,
        composite_key: String,
        display_name: Option<String>,
        cache: Arc<TelemetryCache>,
    ) -> Self {
        Self {
            key,
            composite_key,
            cache,
            state: Mutex::new(SensorState {
                friendly_name: display_name,
                ..SensorState::default()
            }),
        }
    }

    #[must_use]
    pub fn composite_key(&self) -> &str {
        &self.composite_key
    }

    /// Current view, refreshed from the cache when a new snapshot has
    /// been published since the last read.
    #[must_use]
    pub fn current(&self) -> EntityView {
        let state = self.refresh();

        let mut attributes = BTreeMap::new();
        if let Some(name) = &state.friendly_name {
            attributes.insert("friendly_name", serde_json::Value::from(name.clone()));
        }

        EntityView {
            composite_key: self.composite_key.clone(),
            kind: "sensor",
            state: match &state.value {
                Some(SensorValue::Numeric(value)) => serde_json::Value::from(*value),
                Some(SensorValue::Signal(signal)) => {
                    serde_json::Value::from(signal.as_str().to_string())
                }
                None => serde_json::Value::Null,
            },
            unit: state.unit.clone(),
            icon: self.key.domain.icon().map(str::to_string),
            assumed_state: false,
            last_updated: state.last_updated,
            attributes,
        }
    }

    fn refresh(&self) -> MutexGuard<'_, SensorState> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (snapshot, generation) = self.cache.current();
        if generation == state.last_seen {
            return state;
        }
        if let Some(snapshot) = snapshot {
            if let Some(record) = snapshot.get(&self.key) {
                state.value = Some(record.value.clone());
                state.unit = record.unit_for(self.key.domain).map(str::to_string);
                if record.display_name.is_some() {
                    state.friendly_name = record.display_name.clone();
                }
                state.last_updated = Some(snapshot.captured_at());
            }
        }
        state.last_seen = generation;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use heliohub_domain::record::SensorRecord;
    use heliohub_domain::snapshot::{RawSnapshot, TelemetrySnapshot};
    use heliohub_domain::telemetry::TelemetryDomain;
    use heliohub_domain::time::now;

    fn publish(cache: &TelemetryCache, value: f64) {
        let mut raw = RawSnapshot::new();
        raw.insert(
            TelemetryDomain::Analog,
            "1",
            SensorRecord::numeric(value).with_name("T.Kollektor"),
        );
        cache.replace(Arc::new(TelemetrySnapshot::from_raw(raw, now())));
    }

    fn sensor(cache: &Arc<TelemetryCache>) -> SensorEntity {
        SensorEntity::new(
            EntityKey::new(TelemetryDomain::Analog, "1"),
            "sensor.analog_1".to_string(),
            Some("T.Kollektor".to_string()),
            Arc::clone(cache),
        )
    }

    #[test]
    fn should_show_null_state_before_first_snapshot() {
        let cache = Arc::new(TelemetryCache::new());
        let view = sensor(&cache).current();
        assert!(view.state.is_null());
        assert_eq!(view.last_updated, None);
    }

    #[test]
    fn should_pull_value_unit_and_icon_from_cache() {
        let cache = Arc::new(TelemetryCache::new());
        publish(&cache, 45.7);

        let view = sensor(&cache).current();
        assert_eq!(view.state, serde_json::json!(45.7));
        assert_eq!(view.unit.as_deref(), Some("°C"));
        assert_eq!(view.icon.as_deref(), Some("mdi:thermometer"));
        assert_eq!(
            view.attributes.get("friendly_name"),
            Some(&serde_json::json!("T.Kollektor"))
        );
        assert!(view.last_updated.is_some());
    }

    #[test]
    fn should_follow_new_snapshots() {
        let cache = Arc::new(TelemetryCache::new());
        let entity = sensor(&cache);

        publish(&cache, 45.7);
        assert_eq!(entity.current().state, serde_json::json!(45.7));

        publish(&cache, 46.1);
        assert_eq!(entity.current().state, serde_json::json!(46.1));
    }

    #[test]
    fn should_hold_last_known_value_when_point_vanishes() {
        let cache = Arc::new(TelemetryCache::new());
        let entity = sensor(&cache);
        publish(&cache, 45.7);
        entity.current();

        // New snapshot without the point.
        cache.replace(Arc::new(TelemetrySnapshot::from_raw(
            RawSnapshot::new(),
            now(),
        )));

        let view = entity.current();
        assert_eq!(view.state, serde_json::json!(45.7));
    }

    #[test]
    fn should_never_report_assumed_state() {
        let cache = Arc::new(TelemetryCache::new());
        publish(&cache, 45.7);
        assert!(!sensor(&cache).current().assumed_state);
    }
}
