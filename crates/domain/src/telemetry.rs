//! Telemetry domains — the five fixed categories reported by the gateway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five fixed telemetry categories of the controller.
///
/// The declaration order is the canonical iteration order used for
/// discovery and snapshot traversal: analog, speed, power, energy,
/// digital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryDomain {
    Analog,
    Speed,
    Power,
    Energy,
    Digital,
}

impl TelemetryDomain {
    /// All domains in canonical iteration order.
    pub const ALL: [Self; 5] = [
        Self::Analog,
        Self::Speed,
        Self::Power,
        Self::Energy,
        Self::Digital,
    ];

    /// Stable lowercase name, used in composite keys and log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analog => "analog",
            Self::Speed => "speed",
            Self::Power => "power",
            Self::Energy => "energy",
            Self::Digital => "digital",
        }
    }

    /// Default unit of measurement for records that do not carry one.
    ///
    /// Digital outputs have no unit.
    #[must_use]
    pub fn default_unit(self) -> Option<&'static str> {
        match self {
            Self::Analog => Some("°C"),
            Self::Speed => Some("rpm"),
            Self::Power => Some("kW"),
            Self::Energy => Some("kWh"),
            Self::Digital => None,
        }
    }

    /// Default display icon for sensors in this domain.
    #[must_use]
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Analog => Some("mdi:thermometer"),
            Self::Speed => Some("mdi:speedometer"),
            Self::Power | Self::Energy => Some("mdi:power-plug"),
            Self::Digital => None,
        }
    }

    /// Whether records in this domain carry an enumerated switch signal
    /// rather than a numeric reading.
    #[must_use]
    pub fn is_digital(self) -> bool {
        matches!(self, Self::Digital)
    }
}

impl fmt::Display for TelemetryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The given string names no telemetry domain.
#[derive(Debug, thiserror::Error)]
#[error("unknown telemetry domain {0:?}")]
pub struct UnknownDomainError(pub String);

impl FromStr for TelemetryDomain {
    type Err = UnknownDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analog" => Ok(Self::Analog),
            "speed" => Ok(Self::Speed),
            "power" => Ok(Self::Power),
            "energy" => Ok(Self::Energy),
            "digital" => Ok(Self::Digital),
            other => Err(UnknownDomainError(other.to_string())),
        }
    }
}
