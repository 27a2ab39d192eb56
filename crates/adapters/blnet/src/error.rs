//! BL-NET adapter error types.

use heliohub_domain::error::HubError;

/// Errors specific to the BL-NET adapter.
///
/// The same underlying failure maps to a different [`HubError`] class
/// depending on when it happens — construction, poll, or command — so
/// conversion is explicit rather than a blanket `From`.
#[derive(Debug, thiserror::Error)]
pub enum BlnetError {
    /// The gateway rejected the configured password.
    #[error("BL-NET rejected the password")]
    AuthRejected,

    /// The gateway URL could not be built from the configuration.
    #[error("invalid gateway address {resource:?}")]
    Address { resource: String },

    /// HTTP request failed.
    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    /// A page did not parse as expected.
    #[error("failed to parse gateway response")]
    Parse(#[from] ParseError),

    /// The gateway refused an output command.
    #[error("BL-NET refused the command for output {output}")]
    CommandRejected { output: String },
}

/// Details about why a gateway page could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The gateway served the login form instead of a data page.
    #[error("gateway served the login page; session not authenticated")]
    NotAuthenticated,
}

impl BlnetError {
    /// Construction-time failure: fatal to startup.
    #[must_use]
    pub fn into_connect(self) -> HubError {
        HubError::Connect(Box::new(self))
    }

    /// Per-cycle failure: previous snapshot stays published.
    #[must_use]
    pub fn into_transport(self) -> HubError {
        HubError::Transport(Box::new(self))
    }

    /// Command failure: surfaced to the switch caller.
    #[must_use]
    pub fn into_command(self) -> HubError {
        HubError::Command(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_auth_rejection() {
        assert_eq!(
            BlnetError::AuthRejected.to_string(),
            "BL-NET rejected the password"
        );
    }

    #[test]
    fn should_display_bad_address_with_resource() {
        let err = BlnetError::Address {
            resource: "not a host".to_string(),
        };
        assert_eq!(err.to_string(), "invalid gateway address \"not a host\"");
    }

    #[test]
    fn should_display_rejected_command_with_output() {
        let err = BlnetError::CommandRejected {
            output: "4".to_string(),
        };
        assert_eq!(err.to_string(), "BL-NET refused the command for output 4");
    }

    #[test]
    fn should_convert_into_each_error_class() {
        assert!(matches!(
            BlnetError::AuthRejected.into_connect(),
            HubError::Connect(_)
        ));
        assert!(matches!(
            BlnetError::AuthRejected.into_transport(),
            HubError::Transport(_)
        ));
        assert!(matches!(
            BlnetError::AuthRejected.into_command(),
            HubError::Command(_)
        ));
    }

    #[test]
    fn should_wrap_parse_errors() {
        let err: BlnetError = ParseError::NotAuthenticated.into();
        assert_eq!(err.to_string(), "failed to parse gateway response");
    }
}
