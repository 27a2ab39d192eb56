//! Reading values — numeric measurements and digital switch signals.

use std::fmt;

/// Enumerated value of a digital output as reported by the device.
///
/// The gateway speaks German on the wire: `EIN` (on) and `AUS` (off).
/// Any other token is preserved verbatim so diagnostics can surface it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalLevel {
    Ein,
    Aus,
    Other(String),
}

impl SignalLevel {
    /// Parse a device token, keeping unknown tokens verbatim.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "EIN" => Self::Ein,
            "AUS" => Self::Aus,
            other => Self::Other(other.to_string()),
        }
    }

    /// The token as the device spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ein => "EIN",
            Self::Aus => "AUS",
            Self::Other(token) => token,
        }
    }

    /// Whether the output is switched on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::Ein)
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reading value — numeric for the measuring domains, an
/// enumerated signal for digital outputs.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    Numeric(f64),
    Signal(SignalLevel),
}

impl SensorValue {
    /// The signal level, if this is a digital reading.
    #[must_use]
    pub fn as_signal(&self) -> Option<&SignalLevel> {
        match self {
            Self::Signal(signal) => Some(signal),
            Self::Numeric(_) => None,
        }
    }

    /// The numeric reading, if this is a measurement.
    #[must_use]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Signal(_) => None,
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => value.fmt(f),
            Self::Signal(signal) => signal.fmt(f),
        }
    }
}
