//! # heliohub-domain
//!
//! Pure domain model for the heliohub UVR1611/BL-NET bridge.
//!
//! ## Responsibilities
//! - Foundational types: telemetry domains, timestamps, error conventions
//! - Define **`SensorRecord`** and the two snapshot shapes (raw wire
//!   layout, flattened cache layout)
//! - Define **`EntityKey`** — the stable `(domain, raw id)` key used for
//!   caching and discovery deduplication
//! - Define the **switch state machine** mapping a digital-output record
//!   to its direct and automation switch views
//! - Define **`RegistrationEvent`** — discovery announcements
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO
//! crates. All IO boundaries are expressed as traits in the `app` crate
//! (ports).

pub mod command;
pub mod error;
pub mod key;
pub mod mode;
pub mod record;
pub mod registration;
pub mod snapshot;
pub mod switch;
pub mod telemetry;
pub mod time;
pub mod value;
