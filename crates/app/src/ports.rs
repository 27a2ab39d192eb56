//! Port definitions (traits) implemented by adapters.

pub mod device_client;
pub mod registrar;

pub use device_client::DeviceClient;
pub use registrar::EntityRegistrar;
