//! Sensor records — one reading per data point per snapshot.

use crate::mode::OutputMode;
use crate::telemetry::TelemetryDomain;
use crate::value::{SensorValue, SignalLevel};

/// One reading from the device.
///
/// Value semantics differ by domain: numeric for the measuring domains,
/// an enumerated signal plus a control mode for digital outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    /// The reading itself.
    pub value: SensorValue,
    /// Unit transmitted by the device; falls back to the domain default
    /// when absent.
    pub unit: Option<String>,
    /// Human-readable name configured on the controller.
    pub display_name: Option<String>,
    /// Control mode, digital domain only.
    pub mode: Option<OutputMode>,
}

impl SensorRecord {
    /// A numeric reading without unit or name.
    #[must_use]
    pub fn numeric(value: f64) -> Self {
        Self {
            value: SensorValue::Numeric(value),
            unit: None,
            display_name: None,
            mode: None,
        }
    }

    /// A digital-output reading.
    #[must_use]
    pub fn digital(signal: SignalLevel, mode: OutputMode) -> Self {
        Self {
            value: SensorValue::Signal(signal),
            unit: None,
            display_name: None,
            mode: Some(mode),
        }
    }

    /// Attach the name configured on the controller.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Attach the unit transmitted by the device.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Unit to display: the transmitted one, else the domain default.
    #[must_use]
    pub fn unit_for(&self, domain: TelemetryDomain) -> Option<&str> {
        self.unit.as_deref().or(domain.default_unit())
    }

    /// The switch signal, if this record describes a digital output.
    #[must_use]
    pub fn signal(&self) -> Option<&SignalLevel> {
        self.value.as_signal()
    }
}
