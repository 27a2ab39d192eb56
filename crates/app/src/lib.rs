//! # heliohub-app
//!
//! Application layer — the polling/cache/discovery engine and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement
//!   (driven/outbound ports):
//!   - `DeviceClient` — snapshot fetch and output commands
//!   - `EntityRegistrar` — delivery of discovery announcements
//! - Own the **telemetry cache** (single-writer snapshot publication
//!   with a change-detection token)
//! - Run the **poller** (one eager cycle + fixed interval, no overlap)
//! - Track **discovery** (announce every key exactly once per process)
//! - Provide the **entity consumers** (sensors, direct switches,
//!   automation switches) and the in-process registry that holds them
//!
//! ## Dependency rule
//! Depends on `heliohub-domain` only (plus `tokio` for time/tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not
//! the reverse.

pub mod cache;
pub mod controller;
pub mod discovery;
pub mod entities;
pub mod poller;
pub mod ports;
pub mod registry;
