//! Common error types used across the workspace.
//!
//! Three transport-facing classes with distinct lifecycles: `Connect`
//! failures are fatal to startup, `Transport` failures cost one poll
//! cycle and keep the previous snapshot, `Command` failures surface to
//! the caller and self-correct on the next successful poll.

/// Boxed source carried by the transport-facing variants.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Cross-layer error for the heliohub workspace.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Device unreachable or authentication rejected at construction.
    #[error("failed to connect to the BL-NET gateway")]
    Connect(#[source] BoxedError),

    /// A single poll cycle failed; the previous snapshot stays in place.
    #[error("poll transport failure")]
    Transport(#[source] BoxedError),

    /// An output command failed.
    #[error("output command failed")]
    Command(#[source] BoxedError),

    /// Lookup of an unknown entity.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A service call the entity cannot handle.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedServiceError),
}

/// A lookup failed because no entity with the given id exists.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A service call was directed at an entity that cannot handle it.
#[derive(Debug, thiserror::Error)]
#[error("{key} does not support {service}")]
pub struct UnsupportedServiceError {
    pub service: &'static str,
    pub key: String,
}
