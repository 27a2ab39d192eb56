//! In-process entity registry — the host registration mechanism.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use heliohub_domain::error::{HubError, NotFoundError, UnsupportedServiceError};
use heliohub_domain::registration::{RegistrationEvent, RegistrationKind};

use crate::cache::TelemetryCache;
use crate::controller::OutputController;
use crate::entities::{AutomationSwitch, EntityView, PowerSwitch, SensorEntity};
use crate::ports::{DeviceClient, EntityRegistrar};

/// One registered consumer, addressable by its composite key.
pub enum RegisteredEntity<C> {
    Sensor(SensorEntity),
    Power(PowerSwitch<C>),
    Automation(AutomationSwitch<C>),
}

impl<C: DeviceClient> RegisteredEntity<C> {
    /// Current view for the read boundary.
    #[must_use]
    pub fn current(&self) -> EntityView {
        match self {
            Self::Sensor(entity) => entity.current(),
            Self::Power(entity) => entity.current(),
            Self::Automation(entity) => entity.current(),
        }
    }

    #[must_use]
    pub fn composite_key(&self) -> &str {
        match self {
            Self::Sensor(entity) => entity.composite_key(),
            Self::Power(entity) => entity.composite_key(),
            Self::Automation(entity) => entity.composite_key(),
        }
    }

    /// Handle `activate` — turn the output on, or enable automation.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Unsupported`] for sensors and
    /// [`HubError::Command`] on transport failure.
    pub async fn activate(&self) -> Result<(), HubError> {
        match self {
            Self::Sensor(entity) => Err(UnsupportedServiceError {
                service: "activate",
                key: entity.composite_key().to_string(),
            }
            .into()),
            Self::Power(entity) => entity.turn_on().await,
            Self::Automation(entity) => entity.turn_on().await,
        }
    }

    /// Handle `deactivate` — turn the output off, or disable automation
    /// while preserving the output's value.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Unsupported`] for sensors and
    /// [`HubError::Command`] on transport failure.
    pub async fn deactivate(&self) -> Result<(), HubError> {
        match self {
            Self::Sensor(entity) => Err(UnsupportedServiceError {
                service: "deactivate",
                key: entity.composite_key().to_string(),
            }
            .into()),
            Self::Power(entity) => entity.turn_off().await,
            Self::Automation(entity) => entity.turn_off().await,
        }
    }
}

struct RegistryInner<C> {
    cache: Arc<TelemetryCache>,
    controller: OutputController<C>,
    entities: RwLock<BTreeMap<String, Arc<RegisteredEntity<C>>>>,
}

/// Holds every registered consumer for the lifetime of the process.
///
/// Implements the [`EntityRegistrar`] port, turning registration events
/// into live consumers, and resolves composite keys for the HTTP
/// boundary. Cheap to clone.
pub struct EntityRegistry<C> {
    inner: Arc<RegistryInner<C>>,
}

impl<C> Clone for EntityRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: DeviceClient> EntityRegistry<C> {
    #[must_use]
    pub fn new(cache: Arc<TelemetryCache>, controller: OutputController<C>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                cache,
                controller,
                entities: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Look up a consumer by composite key.
    #[must_use]
    pub fn get(&self, composite_key: &str) -> Option<Arc<RegisteredEntity<C>>> {
        self.inner
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(composite_key)
            .cloned()
    }

    /// Look up a consumer by composite key, failing loudly.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for unknown keys.
    pub fn lookup(&self, composite_key: &str) -> Result<Arc<RegisteredEntity<C>>, HubError> {
        self.get(composite_key).ok_or_else(|| {
            NotFoundError {
                entity: "Entity",
                id: composite_key.to_string(),
            }
            .into()
        })
    }

    /// Current views of every registered consumer, ordered by composite
    /// key.
    #[must_use]
    pub fn views(&self) -> Vec<EntityView> {
        self.inner
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entity| entity.current())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(&self, event: RegistrationEvent) -> RegisteredEntity<C> {
        let composite_key = event.composite_key();
        match event.kind {
            RegistrationKind::Sensor => RegisteredEntity::Sensor(SensorEntity::new(
                event.key,
                composite_key,
                event.display_name,
                Arc::clone(&self.inner.cache),
            )),
            RegistrationKind::PowerSwitch => RegisteredEntity::Power(PowerSwitch::new(
                event.key,
                composite_key,
                event.display_name,
                Arc::clone(&self.inner.cache),
                self.inner.controller.clone(),
            )),
            RegistrationKind::AutomationSwitch => {
                RegisteredEntity::Automation(AutomationSwitch::new(
                    event.key,
                    composite_key,
                    event.display_name,
                    Arc::clone(&self.inner.cache),
                    self.inner.controller.clone(),
                ))
            }
        }
    }
}

impl<C: DeviceClient + 'static> EntityRegistrar for EntityRegistry<C> {
    async fn register(&self, event: RegistrationEvent) -> Result<(), HubError> {
        let composite_key = event.composite_key();
        let kind = event.kind.as_str();
        let entity = self.build(event);

        let mut entities = self
            .inner
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entities
            .entry(composite_key.clone())
            .or_insert_with(|| Arc::new(entity));
        drop(entities);

        tracing::info!(key = %composite_key, kind, "entity registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use heliohub_domain::command::OutputCommand;
    use heliohub_domain::key::EntityKey;
    use heliohub_domain::snapshot::RawSnapshot;
    use heliohub_domain::telemetry::TelemetryDomain;

    struct NoopClient;

    impl DeviceClient for NoopClient {
        async fn fetch(&self, _node: Option<u8>) -> Result<RawSnapshot, HubError> {
            Ok(RawSnapshot::new())
        }

        async fn set_output(
            &self,
            _raw_id: &str,
            _node: Option<u8>,
            _command: OutputCommand,
        ) -> Result<(), HubError> {
            Ok(())
        }
    }

    fn registry() -> EntityRegistry<NoopClient> {
        let cache = Arc::new(TelemetryCache::new());
        let controller = OutputController::new(Arc::new(NoopClient), None);
        EntityRegistry::new(cache, controller)
    }

    fn digital_event(kind: RegistrationKind) -> RegistrationEvent {
        RegistrationEvent {
            kind,
            key: EntityKey::new(TelemetryDomain::Digital, "1"),
            display_name: Some("Pumpe".to_string()),
        }
    }

    #[tokio::test]
    async fn should_register_and_resolve_by_composite_key() {
        let registry = registry();
        registry
            .register(digital_event(RegistrationKind::PowerSwitch))
            .await
            .unwrap();

        let entity = registry.lookup("switch.digital_1").unwrap();
        assert_eq!(entity.composite_key(), "switch.digital_1");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn should_keep_the_first_registration_on_duplicates() {
        let registry = registry();
        registry
            .register(digital_event(RegistrationKind::PowerSwitch))
            .await
            .unwrap();
        registry
            .register(digital_event(RegistrationKind::PowerSwitch))
            .await
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_keys() {
        let registry = registry();
        let result = registry.lookup("switch.digital_9");
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_reject_service_calls_on_sensors() {
        let registry = registry();
        registry
            .register(RegistrationEvent {
                kind: RegistrationKind::Sensor,
                key: EntityKey::new(TelemetryDomain::Analog, "1"),
                display_name: None,
            })
            .await
            .unwrap();

        let entity = registry.lookup("sensor.analog_1").unwrap();
        assert!(matches!(
            entity.activate().await,
            Err(HubError::Unsupported(_))
        ));
        assert!(matches!(
            entity.deactivate().await,
            Err(HubError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn should_list_views_ordered_by_composite_key() {
        let registry = registry();
        registry
            .register(digital_event(RegistrationKind::AutomationSwitch))
            .await
            .unwrap();
        registry
            .register(digital_event(RegistrationKind::PowerSwitch))
            .await
            .unwrap();

        let keys: Vec<String> = registry
            .views()
            .into_iter()
            .map(|view| view.composite_key)
            .collect();
        assert_eq!(keys, ["switch.digital_1", "switch.digital_1_automated"]);
    }
}
