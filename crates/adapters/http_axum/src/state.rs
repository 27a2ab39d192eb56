//! Shared application state for axum handlers.

use heliohub_app::ports::DeviceClient;
use heliohub_app::registry::EntityRegistry;

/// Application state shared across all axum handlers.
///
/// Generic over the device client to avoid dynamic dispatch. `Clone` is
/// implemented manually so the client itself does not need to be
/// `Clone` — the registry is a cheap handle already.
pub struct AppState<C> {
    /// Registered entity consumers.
    pub registry: EntityRegistry<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<C: DeviceClient> AppState<C> {
    /// Create a new application state around the registry.
    pub fn new(registry: EntityRegistry<C>) -> Self {
        Self { registry }
    }
}
