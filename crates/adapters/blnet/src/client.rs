//! HTTP client for the BL-NET web interface.

use std::time::Duration;

use reqwest::Url;

use heliohub_app::ports::DeviceClient;
use heliohub_domain::command::OutputCommand;
use heliohub_domain::error::HubError;
use heliohub_domain::snapshot::RawSnapshot;
use heliohub_domain::telemetry::TelemetryDomain;

use crate::config::BlnetConfig;
use crate::error::BlnetError;
use crate::parser;

/// Telemetry pages served by the gateway, in canonical domain order.
const PAGES: [(TelemetryDomain, &str); 5] = [
    (TelemetryDomain::Analog, "580600.htm"),
    (TelemetryDomain::Speed, "580700.htm"),
    (TelemetryDomain::Power, "580800.htm"),
    (TelemetryDomain::Energy, "580900.htm"),
    (TelemetryDomain::Digital, "580500.htm"),
];

/// Page carrying the digital-output form.
const DIGITAL_PAGE: &str = "580500.htm";

/// Page selecting the active CAN node.
const NODE_PAGE: &str = "can.htm";

/// Per-request timeout; a poll cycle that outlives the interval is
/// skipped by the scheduler, not cancelled.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Command codes understood by the gateway's output form.
fn command_code(command: OutputCommand) -> &'static str {
    match command {
        OutputCommand::Auto => "1",
        OutputCommand::Aus => "2",
        OutputCommand::Ein => "3",
    }
}

/// `DeviceClient` implementation for the BL-NET web interface.
///
/// The gateway authenticates per request via the `blP` query parameter,
/// so the password is re-sent with every page access and there is no
/// session state to keep. Construction verifies reachability and
/// credentials once; later failures are per-cycle transport errors.
pub struct BlnetClient {
    http: reqwest::Client,
    base: Url,
    password: Option<String>,
}

impl BlnetClient {
    /// Connect to the gateway and verify reachability and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Connect`] when the configuration is invalid,
    /// the gateway is unreachable, or the password is rejected. Fatal
    /// to startup per the error-handling policy.
    pub async fn connect(config: &BlnetConfig) -> Result<Self, HubError> {
        config
            .validate()
            .map_err(|err| HubError::Connect(Box::new(err)))?;

        let base = base_url(&config.resource, config.web_port)
            .map_err(BlnetError::into_connect)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| BlnetError::Http(err).into_connect())?;

        let client = Self {
            http,
            base,
            password: config.password.clone(),
        };
        client.probe().await.map_err(BlnetError::into_connect)?;

        tracing::debug!(base = %client.base, "BL-NET gateway reachable");
        Ok(client)
    }

    /// Fetch the digital page once to prove the gateway answers and the
    /// password is accepted.
    async fn probe(&self) -> Result<(), BlnetError> {
        let html = self.page(DIGITAL_PAGE).await?;
        if parser::is_login_page(&html) {
            return Err(BlnetError::AuthRejected);
        }
        Ok(())
    }

    fn page_url(&self, page: &str) -> Result<Url, BlnetError> {
        let mut url = self.base.join(page).map_err(|_| BlnetError::Address {
            resource: self.base.to_string(),
        })?;
        if let Some(password) = &self.password {
            url.query_pairs_mut().append_pair("blP", password);
        }
        Ok(url)
    }

    async fn page(&self, page: &str) -> Result<String, BlnetError> {
        let url = self.page_url(page)?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Select the active CAN node before a fetch or command.
    async fn select_node(&self, node: u8) -> Result<(), BlnetError> {
        let mut url = self.page_url(NODE_PAGE)?;
        url.query_pairs_mut()
            .append_pair("blaA", &node.to_string());
        self.http.get(url).send().await?.error_for_status()?;
        tracing::trace!(node, "CAN node selected");
        Ok(())
    }

    async fn fetch_inner(&self, node: Option<u8>) -> Result<RawSnapshot, BlnetError> {
        if let Some(node) = node {
            self.select_node(node).await?;
        }

        let mut snapshot = RawSnapshot::new();
        for (domain, page) in PAGES {
            let html = self.page(page).await?;
            let rows = parser::parse_page(domain, &html)?;
            tracing::trace!(%domain, rows = rows.len(), "page parsed");
            for (raw_id, record) in rows {
                snapshot.insert(domain, raw_id, record);
            }
        }
        Ok(snapshot)
    }

    async fn set_output_inner(
        &self,
        raw_id: &str,
        node: Option<u8>,
        command: OutputCommand,
    ) -> Result<(), BlnetError> {
        if let Some(node) = node {
            self.select_node(node).await?;
        }

        let url = self.page_url(DIGITAL_PAGE)?;
        let form = [(format!("blw5{raw_id}"), command_code(command))];
        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        // The form answers with the refreshed digital page; an output
        // the gateway refused to touch is missing from it.
        let rows = parser::parse_page(TelemetryDomain::Digital, &body)?;
        if rows.iter().all(|(id, _)| id != raw_id) {
            return Err(BlnetError::CommandRejected {
                output: raw_id.to_string(),
            });
        }
        Ok(())
    }
}

impl DeviceClient for BlnetClient {
    async fn fetch(&self, node: Option<u8>) -> Result<RawSnapshot, HubError> {
        self.fetch_inner(node)
            .await
            .map_err(BlnetError::into_transport)
    }

    async fn set_output(
        &self,
        raw_id: &str,
        node: Option<u8>,
        command: OutputCommand,
    ) -> Result<(), HubError> {
        self.set_output_inner(raw_id, node, command)
            .await
            .map_err(BlnetError::into_command)
    }
}

/// Build the gateway base URL from the configured resource and port.
///
/// Accepts a bare host (`192.168.1.40`) or a full URL; the configured
/// web port applies only when the resource does not carry its own.
fn base_url(resource: &str, port: u16) -> Result<Url, BlnetError> {
    let address = |resource: &str| BlnetError::Address {
        resource: resource.to_string(),
    };

    let text = if resource.contains("://") {
        resource.to_string()
    } else {
        format!("http://{resource}")
    };
    let mut url = Url::parse(&text).map_err(|_| address(resource))?;
    if url.port().is_none() && port != 80 {
        url.set_port(Some(port)).map_err(|()| address(resource))?;
    }
    Ok(url)
}
