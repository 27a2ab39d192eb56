//! Device client port — the transport boundary to the gateway.

use std::future::Future;

use heliohub_domain::command::OutputCommand;
use heliohub_domain::error::HubError;
use heliohub_domain::snapshot::RawSnapshot;

/// Transport boundary to the BL-NET gateway.
///
/// This is a **port** — the BL-NET adapter provides the production
/// implementation; tests substitute fakes. Authentication and transport
/// retries live behind this trait, not in front of it.
pub trait DeviceClient: Send + Sync {
    /// Fetch a full snapshot, scoped to the given CAN node when one is
    /// configured.
    ///
    /// Fails with [`HubError::Transport`] when the gateway cannot be
    /// reached mid-flight.
    fn fetch(
        &self,
        node: Option<u8>,
    ) -> impl Future<Output = Result<RawSnapshot, HubError>> + Send;

    /// Issue one command to a digital output on the given CAN node.
    ///
    /// Fails with [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    fn set_output(
        &self,
        raw_id: &str,
        node: Option<u8>,
        command: OutputCommand,
    ) -> impl Future<Output = Result<(), HubError>> + Send;
}
