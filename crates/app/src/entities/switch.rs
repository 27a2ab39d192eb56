//! Switch consumers for digital outputs.
//!
//! Every digital output is represented twice: a [`PowerSwitch`] that
//! forces the output on/off and an [`AutomationSwitch`] that hands
//! control back to the controller's program or takes it away. Both are
//! pull-model consumers over the shared cache; commands update the
//! local view optimistically and reconcile against ground truth on the
//! next poll cycle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use heliohub_domain::error::HubError;
use heliohub_domain::key::EntityKey;
use heliohub_domain::switch::{
    self, AutomationSwitchView, PowerSwitchView, derive_switch_view,
};
use heliohub_domain::time::Timestamp;
use heliohub_domain::value::SignalLevel;

use crate::cache::{Generation, TelemetryCache};
use crate::controller::OutputController;
use crate::entities::EntityView;
use crate::ports::DeviceClient;

/// Synchronisation of a switch view with device ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// View matches the record from the latest snapshot.
    Confirmed,
    /// A command was issued; the view is a local prediction until the
    /// next successful poll confirms or corrects it.
    OptimisticPending,
    /// The record is missing from the latest snapshot (or none was ever
    /// seen); the view is the last known state.
    #[default]
    Stale,
}

impl SyncState {
    /// Whether the view should be flagged as assumed rather than
    /// confirmed.
    #[must_use]
    pub fn is_assumed(self) -> bool {
        !matches!(self, Self::Confirmed)
    }
}

fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn switch_state_json(on: Option<bool>) -> serde_json::Value {
    match on {
        Some(true) => serde_json::Value::from("on"),
        Some(false) => serde_json::Value::from("off"),
        None => serde_json::Value::Null,
    }
}

/// Direct on/off switch for one digital output.
///
/// Commands only take effect on the device while the output is not in
/// `AUTO` mode; they are sent regardless and the optimistic view is
/// corrected by the next poll if the device ignored them.
pub struct PowerSwitch<C> {
    key: EntityKey,
    composite_key: String,
    fallback_name: String,
    cache: Arc<TelemetryCache>,
    controller: OutputController<C>,
    state: Mutex<PowerState>,
}

#[derive(Debug, Default)]
struct PowerState {
    last_seen: Generation,
    view: Option<PowerSwitchView>,
    sync: SyncState,
    last_updated: Option<Timestamp>,
}

impl<C: DeviceClient> PowerSwitch<C> {
    #[must_use]
    pub fn new(
        key: EntityKey,
        composite_key: String,
        display_name: Option<String>,
        cache: Arc<TelemetryCache>,
        controller: OutputController<C>,
    ) -> Self {
        let fallback_name = display_name.unwrap_or_else(|| key.to_string());
        Self {
            key,
            composite_key,
            fallback_name,
            cache,
            controller,
            state: Mutex::new(PowerState::default()),
        }
    }

    #[must_use]
    pub fn composite_key(&self) -> &str {
        &self.composite_key
    }

    /// Whether the output is on; `None` before the first snapshot.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.refresh().view.as_ref().map(|view| view.is_on)
    }

    #[must_use]
    pub fn sync_state(&self) -> SyncState {
        self.refresh().sync
    }

    /// Current view for the read boundary.
    #[must_use]
    pub fn current(&self) -> EntityView {
        let state = self.refresh();

        let mut attributes = BTreeMap::new();
        let friendly_name = state
            .view
            .as_ref()
            .map_or(self.fallback_name.as_str(), |view| {
                view.friendly_name.as_str()
            });
        attributes.insert("friendly_name", serde_json::Value::from(friendly_name));
        if let Some(view) = &state.view {
            attributes.insert("mode", serde_json::Value::from(view.mode.clone()));
            attributes.insert("full_mode", serde_json::Value::from(view.full_mode.clone()));
        }

        EntityView {
            composite_key: self.composite_key.clone(),
            kind: "switch",
            state: switch_state_json(state.view.as_ref().map(|view| view.is_on)),
            unit: None,
            icon: state.view.as_ref().map(|view| view.icon.to_string()),
            assumed_state: state.sync.is_assumed(),
            last_updated: state.last_updated,
            attributes,
        }
    }

    /// Turn the output on.
    ///
    /// The view flips optimistically before the command goes out; a
    /// command failure is surfaced to the caller and the optimistic
    /// state stands until the next poll corrects it.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    pub async fn turn_on(&self) -> Result<(), HubError> {
        self.set(true).await
    }

    /// Turn the output off. Same optimistic semantics as
    /// [`turn_on`](Self::turn_on).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    pub async fn turn_off(&self) -> Result<(), HubError> {
        self.set(false).await
    }

    async fn set(&self, on: bool) -> Result<(), HubError> {
        {
            let mut state = self.refresh();
            if let Some(view) = state.view.as_mut() {
                view.is_on = on;
            }
            state.sync = SyncState::OptimisticPending;
        }
        self.controller
            .set_output(&self.key.raw_id, switch::power_command(on))
            .await
    }

    fn refresh(&self) -> MutexGuard<'_, PowerState> {
        let mut state = lock_state(&self.state);
        let (snapshot, generation) = self.cache.current();
        if generation == state.last_seen {
            return state;
        }
        match snapshot.as_deref().and_then(|snap| snap.get(&self.key)) {
            Some(record) => {
                if let Some(view) = derive_switch_view(record, &self.fallback_name) {
                    state.view = Some(view.power);
                    state.sync = SyncState::Confirmed;
                }
                state.last_updated = snapshot.as_deref().map(|snap| snap.captured_at());
            }
            None => state.sync = SyncState::Stale,
        }
        state.last_seen = generation;
        state
    }
}

/// Automation switch for one digital output. On means the output
/// follows the controller's program.
pub struct AutomationSwitch<C> {
    key: EntityKey,
    composite_key: String,
    fallback_name: String,
    cache: Arc<TelemetryCache>,
    controller: OutputController<C>,
    state: Mutex<AutomationState>,
}

#[derive(Debug, Default)]
struct AutomationState {
    last_seen: Generation,
    view: Option<AutomationSwitchView>,
    /// Output value from the latest confirmed snapshot. Read *before*
    /// a disable command is issued, never after it races with a poll.
    last_signal: Option<SignalLevel>,
    sync: SyncState,
    last_updated: Option<Timestamp>,
}

impl<C: DeviceClient> AutomationSwitch<C> {
    #[must_use]
    pub fn new(
        key: EntityKey,
        composite_key: String,
        display_name: Option<String>,
        cache: Arc<TelemetryCache>,
        controller: OutputController<C>,
    ) -> Self {
        let fallback_name = display_name.unwrap_or_else(|| key.to_string());
        Self {
            key,
            composite_key,
            fallback_name,
            cache,
            controller,
            state: Mutex::new(AutomationState::default()),
        }
    }

    #[must_use]
    pub fn composite_key(&self) -> &str {
        &self.composite_key
    }

    /// Whether the output is automated; `None` before the first
    /// snapshot.
    #[must_use]
    pub fn is_automated(&self) -> Option<bool> {
        self.refresh().view.as_ref().map(|view| view.is_automated)
    }

    #[must_use]
    pub fn sync_state(&self) -> SyncState {
        self.refresh().sync
    }

    /// Current view for the read boundary.
    #[must_use]
    pub fn current(&self) -> EntityView {
        let state = self.refresh();

        let mut attributes = BTreeMap::new();
        let friendly_name = state.view.as_ref().map_or_else(
            || format!("{} automated", self.fallback_name),
            |view| view.friendly_name.clone(),
        );
        attributes.insert("friendly_name", serde_json::Value::from(friendly_name));
        if let Some(view) = &state.view {
            attributes.insert("mode", serde_json::Value::from(view.mode.clone()));
            attributes.insert("full_mode", serde_json::Value::from(view.full_mode.clone()));
        }

        EntityView {
            composite_key: self.composite_key.clone(),
            kind: "switch",
            state: switch_state_json(state.view.as_ref().map(|view| view.is_automated)),
            unit: None,
            icon: state.view.as_ref().map(|view| view.icon.to_string()),
            assumed_state: state.sync.is_assumed(),
            last_updated: state.last_updated,
            attributes,
        }
    }

    /// Hand the output back to the controller's program.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    pub async fn turn_on(&self) -> Result<(), HubError> {
        {
            let mut state = self.refresh();
            if let Some(view) = state.view.as_mut() {
                view.is_automated = true;
            }
            state.sync = SyncState::OptimisticPending;
        }
        self.controller
            .set_output(&self.key.raw_id, switch::automation_enable_command())
            .await
    }

    /// Take the output out of automation, pinning it to its last-known
    /// value: `EIN` stays `EIN`, everything else becomes `AUS`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Command`] when the gateway rejects the
    /// command or cannot be reached.
    pub async fn turn_off(&self) -> Result<(), HubError> {
        let command = {
            let mut state = self.refresh();
            let command = switch::automation_disable_command(state.last_signal.as_ref());
            if let Some(view) = state.view.as_mut() {
                view.is_automated = false;
            }
            state.sync = SyncState::OptimisticPending;
            command
        };
        self.controller.set_output(&self.key.raw_id, command).await
    }

    fn refresh(&self) -> MutexGuard<'_, AutomationState> {
        let mut state = lock_state(&self.state);
        let (snapshot, generation) = self.cache.current();
        if generation == state.last_seen {
            return state;
        }
        match snapshot.as_deref().and_then(|snap| snap.get(&self.key)) {
            Some(record) => {
                if let Some(view) = derive_switch_view(record, &self.fallback_name) {
                    state.view = Some(view.automation);
                    state.sync = SyncState::Confirmed;
                }
                state.last_signal = record.signal().cloned();
                state.last_updated = snapshot.as_deref().map(|snap| snap.captured_at());
            }
            None => state.sync = SyncState::Stale,
        }
        state.last_seen = generation;
        state
    }
}
