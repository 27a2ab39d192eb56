//! Digital-output switch state machine.
//!
//! Each digital output is exposed as two switches: a direct on/off
//! switch and an "automated" switch that toggles between the
//! controller's own program and manual override. Both views are pure
//! functions of the record the device reported, recomputed on every
//! read and never stored.
//!
//! The command mappings live here too, so the asymmetric
//! automation-disable rule is testable without any IO.

use crate::command::OutputCommand;
use crate::mode::OutputMode;
use crate::record::SensorRecord;
use crate::value::SignalLevel;

/// Derived state of the direct on/off switch.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSwitchView {
    /// Whether the output is on (`value == EIN`).
    pub is_on: bool,
    pub icon: &'static str,
    /// The raw mode token.
    pub mode: String,
    /// Combined `MODE/VALUE` field, exposed verbatim for diagnostics.
    pub full_mode: String,
    pub friendly_name: String,
}

/// Derived state of the automation switch.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationSwitchView {
    /// Whether the output follows the controller's program
    /// (`mode != HAND`).
    pub is_automated: bool,
    pub icon: &'static str,
    /// The raw mode token.
    pub mode: String,
    /// Combined `MODE/VALUE` field, exposed verbatim for diagnostics.
    pub full_mode: String,
    pub friendly_name: String,
}

/// Both derived switch states for one digital output.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchView {
    pub power: PowerSwitchView,
    pub automation: AutomationSwitchView,
}

/// Derive both switch views from a digital-output record.
///
/// `fallback_name` fills in when the record carries no display name
/// (typically the entity key rendered as text). Returns `None` when the
/// record does not describe a digital output, i.e. has no signal value
/// or no mode.
#[must_use]
pub fn derive_switch_view(record: &SensorRecord, fallback_name: &str) -> Option<SwitchView> {
    let signal = record.value.as_signal()?;
    let mode = record.mode.as_ref()?;
    let name = record.display_name.as_deref().unwrap_or(fallback_name);
    let full_mode = format!("{}/{}", mode.as_str(), signal.as_str());

    let power = PowerSwitchView {
        is_on: signal.is_on(),
        icon: power_icon(mode, signal),
        mode: mode.as_str().to_string(),
        full_mode: full_mode.clone(),
        friendly_name: name.to_string(),
    };
    let automation = AutomationSwitchView {
        is_automated: !mode.is_manual(),
        icon: automation_icon(mode, signal),
        mode: mode.as_str().to_string(),
        full_mode,
        friendly_name: format!("{name} automated"),
    };

    Some(SwitchView { power, automation })
}

/// Four-way icon table for the direct switch: mode × on/off.
fn power_icon(mode: &OutputMode, signal: &SignalLevel) -> &'static str {
    match (mode.is_manual(), signal.is_on()) {
        (true, true) => "mdi:toggle-switch",
        (true, false) => "mdi:toggle-switch-off",
        (false, true) => "mdi:flash",
        (false, false) => "mdi:flash-off",
    }
}

/// Icon table for the automation switch: two manual states, three
/// automated states (EIN, AUS, unknown token).
fn automation_icon(mode: &OutputMode, signal: &SignalLevel) -> &'static str {
    if mode.is_manual() {
        match signal {
            SignalLevel::Ein => "mdi:gesture-tap",
            SignalLevel::Aus | SignalLevel::Other(_) => "mdi:gesture-tap-hold",
        }
    } else {
        match signal {
            SignalLevel::Ein => "mdi:cog",
            SignalLevel::Aus => "mdi:cog-outline",
            SignalLevel::Other(_) => "mdi:help-circle",
        }
    }
}

/// Command issued by the direct switch.
#[must_use]
pub fn power_command(turn_on: bool) -> OutputCommand {
    if turn_on {
        OutputCommand::Ein
    } else {
        OutputCommand::Aus
    }
}

/// Command issued by the automation switch when enabling automation.
#[must_use]
pub fn automation_enable_command() -> OutputCommand {
    OutputCommand::Auto
}

/// Command issued by the automation switch when disabling automation.
///
/// Asymmetric on purpose: the command must preserve the output's
/// last-known value, so disabling automation on a running output pins it
/// to `EIN` and on a stopped (or unknown) output pins it to `AUS`. The
/// caller supplies the value it last read from the cache *before* the
/// command, never one racing with a poll.
#[must_use]
pub fn automation_disable_command(last_signal: Option<&SignalLevel>) -> OutputCommand {
    match last_signal {
        Some(SignalLevel::Ein) => OutputCommand::Ein,
        _ => OutputCommand::Aus,
    }
}
