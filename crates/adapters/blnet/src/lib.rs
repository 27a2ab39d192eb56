//! # heliohub-adapter-blnet
//!
//! Device adapter for the BL-NET gateway in front of a UVR1611
//! controller. Implements the `DeviceClient` port against the gateway's
//! web interface: per-domain telemetry pages for readout and the
//! digital-output form for commands.
//!
//! ## How it works
//!
//! The gateway renders one HTML page per telemetry domain. The client
//! fetches each page (optionally selecting a CAN node first), strips
//! the markup, and parses the remaining data rows into sensor records.
//! Output commands are posted to the digital-output form, scoped to the
//! same node.
//!
//! ## Dependency rule
//!
//! Depends on `heliohub-app` (port traits) and `heliohub-domain` only.

pub mod client;
pub mod config;
pub mod error;
pub mod parser;

pub use client::BlnetClient;
pub use config::BlnetConfig;
pub use error::BlnetError;
