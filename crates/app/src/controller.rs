//! Output controller — node-scoped command passthrough.

use std::sync::Arc;

use heliohub_domain::command::OutputCommand;
use heliohub_domain::error::HubError;

use crate::ports::DeviceClient;

/// Issues digital-output commands on behalf of switch consumers.
///
/// Every command is scoped to the configured CAN node; the controller is
/// stateless beyond that configuration and cheap to clone, so each
/// switch holds its own copy.
pub struct OutputController<C> {
    client: Arc<C>,
    node: Option<u8>,
}

impl<C> Clone for OutputController<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            node: self.node,
        }
    }
}

impl<C: DeviceClient> OutputController<C> {
    #[must_use]
    pub fn new(client: Arc<C>, node: Option<u8>) -> Self {
        Self { client, node }
    }

    /// Send one command to the given output.
    ///
    /// Fire-and-forget relative to the poll loop: a command may
    /// interleave with an in-flight cycle, and switches reconcile to
    /// ground truth on the next poll.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    pub async fn set_output(&self, raw_id: &str, command: OutputCommand) -> Result<(), HubError> {
        tracing::debug!(output = raw_id, %command, node = ?self.node, "issuing output command");
        self.client.set_output(raw_id, self.node, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use heliohub_domain::snapshot::RawSnapshot;

    #[derive(Default)]
    struct RecordingClient {
        commands: Mutex<Vec<(String, Option<u8>, OutputCommand)>>,
    }

    impl DeviceClient for RecordingClient {
        async fn fetch(&self, _node: Option<u8>) -> Result<RawSnapshot, HubError> {
            Ok(RawSnapshot::new())
        }

        async fn set_output(
            &self,
            raw_id: &str,
            node: Option<u8>,
            command: OutputCommand,
        ) -> Result<(), HubError> {
            self.commands
                .lock()
                .unwrap()
                .push((raw_id.to_string(), node, command));
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_scope_commands_to_the_configured_node() {
        let client = Arc::new(RecordingClient::default());
        let controller = OutputController::new(Arc::clone(&client), Some(2));

        controller.set_output("1", OutputCommand::Auto).await.unwrap();

        let commands = client.commands.lock().unwrap();
        assert_eq!(commands.as_slice(), [(
            "1".to_string(),
            Some(2),
            OutputCommand::Auto
        )]);
    }

    #[tokio::test]
    async fn should_pass_through_without_node_when_unconfigured() {
        let client = Arc::new(RecordingClient::default());
        let controller = OutputController::new(Arc::clone(&client), None);

        controller.set_output("4", OutputCommand::Aus).await.unwrap();

        let commands = client.commands.lock().unwrap();
        assert_eq!(commands[0].1, None);
    }
}
