//! BL-NET adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for one BL-NET gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlnetConfig {
    /// Hostname, IP address, or `http://` URL of the gateway. Required.
    pub resource: String,
    /// Web interface password, if one is set on the gateway.
    pub password: Option<String>,
    /// CAN node to scope fetches and commands to. When absent the
    /// gateway's currently active node is used.
    pub can_node: Option<u8>,
    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,
    /// Port of the web interface.
    pub web_port: u16,
    /// Port of the TA control channel. Accepted for compatibility; no
    /// transport rides it (see [`validate`](Self::validate)).
    pub ta_port: u16,
    /// Use the web interface for readout and output control.
    pub use_web: bool,
    /// Use the TA control channel.
    pub use_ta: bool,
}

impl Default for BlnetConfig {
    fn default() -> Self {
        Self {
            resource: String::new(),
            password: None,
            can_node: None,
            poll_interval_secs: 360,
            web_port: 80,
            ta_port: 40_000,
            use_web: true,
            use_ta: false,
        }
    }
}

impl BlnetConfig {
    /// Poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Validate semantic constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the offending field. Disabling
    /// the web interface is rejected: readout and output control both
    /// ride it, and the TA channel carries no implemented transport.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource.is_empty() {
            return Err(ConfigError::MissingResource);
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.use_web {
            return Err(ConfigError::WebDisabled);
        }
        Ok(())
    }
}

/// Configuration errors for the BL-NET adapter.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No gateway address was configured.
    #[error("device resource must be set")]
    MissingResource,
    /// A zero interval would poll in a hot loop.
    #[error("poll interval must be non-zero")]
    ZeroInterval,
    /// The web interface is the only implemented transport.
    #[error("the web interface must stay enabled; the TA channel has no transport")]
    WebDisabled,
}
