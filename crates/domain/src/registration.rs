//! Discovery registration events.

use crate::key::EntityKey;

/// What kind of consumer a discovery event asks the host to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    /// Read-only sensor.
    Sensor,
    /// Direct on/off switch for a digital output.
    PowerSwitch,
    /// Derived "automated mode" switch for a digital output.
    AutomationSwitch,
}

impl RegistrationKind {
    /// Outward-facing kind label: `sensor` or `switch`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::PowerSwitch | Self::AutomationSwitch => "switch",
        }
    }
}

/// Announcement of a newly-seen data point.
///
/// Emitted at most once per key and kind for the lifetime of the
/// process; a digital output produces two of these (direct switch +
/// automation switch) sharing one raw id.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationEvent {
    pub kind: RegistrationKind,
    pub key: EntityKey,
    pub display_name: Option<String>,
}

impl RegistrationEvent {
    /// Composite key the consumer is registered under.
    ///
    /// `sensor.analog_1`, `switch.digital_1`,
    /// `switch.digital_1_automated`.
    #[must_use]
    pub fn composite_key(&self) -> String {
        match self.kind {
            RegistrationKind::Sensor => format!("sensor.{}", self.key.slug()),
            RegistrationKind::PowerSwitch => format!("switch.{}", self.key.slug()),
            RegistrationKind::AutomationSwitch => {
                format!("switch.{}_automated", self.key.slug())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryDomain;

    #[test]
    fn should_label_switch_kinds_as_switch() {
        assert_eq!(RegistrationKind::Sensor.as_str(), "sensor");
        assert_eq!(RegistrationKind::PowerSwitch.as_str(), "switch");
        assert_eq!(RegistrationKind::AutomationSwitch.as_str(), "switch");
    }

    #[test]
    fn should_derive_distinct_composite_keys_per_kind() {
        let key = EntityKey::new(TelemetryDomain::Digital, "1");
        let event = |kind| RegistrationEvent {
            kind,
            key: key.clone(),
            display_name: None,
        };

        assert_eq!(
            event(RegistrationKind::PowerSwitch).composite_key(),
            "switch.digital_1"
        );
        assert_eq!(
            event(RegistrationKind::AutomationSwitch).composite_key(),
            "switch.digital_1_automated"
        );
    }

    #[test]
    fn should_derive_sensor_composite_key_from_slug() {
        let event = RegistrationEvent {
            kind: RegistrationKind::Sensor,
            key: EntityKey::new(TelemetryDomain::Analog, "7"),
            display_name: Some("T.Kollektor".to_string()),
        };
        assert_eq!(event.composite_key(), "sensor.analog_7");
    }
}
