//! Poll loop — fetch, publish, discover, announce.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use heliohub_domain::error::HubError;
use heliohub_domain::snapshot::TelemetrySnapshot;
use heliohub_domain::time::now;

use crate::cache::{Generation, TelemetryCache};
use crate::discovery::DiscoveryTracker;
use crate::ports::{DeviceClient, EntityRegistrar};

/// Result of one poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A full cycle ran: snapshot published, discoveries announced.
    Completed {
        generation: Generation,
        records: usize,
        discovered: usize,
    },
    /// Another cycle was still in flight; nothing happened.
    Skipped,
}

/// The single shared poller.
///
/// One instance drives the whole integration: it fetches a snapshot,
/// publishes it to the cache, and announces newly-seen keys. Cycles
/// never overlap — an attempt while one is in flight is skipped, not
/// queued, and an in-flight cycle is never cancelled.
pub struct Poller<C, R> {
    client: Arc<C>,
    registrar: R,
    cache: Arc<TelemetryCache>,
    tracker: Mutex<DiscoveryTracker>,
    node: Option<u8>,
    in_flight: AtomicBool,
}

impl<C, R> Poller<C, R>
where
    C: DeviceClient + 'static,
    R: EntityRegistrar + 'static,
{
    #[must_use]
    pub fn new(
        client: Arc<C>,
        registrar: R,
        cache: Arc<TelemetryCache>,
        node: Option<u8>,
    ) -> Self {
        Self {
            client,
            registrar,
            cache,
            tracker: Mutex::new(DiscoveryTracker::new()),
            node,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one poll cycle unless one is already in flight.
    ///
    /// On transport failure the previously published snapshot stays in
    /// place and the error propagates to the scheduling caller; a
    /// partial snapshot is never visible.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Transport`] when the device cannot be
    /// reached.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, HubError> {
        if self.in_flight.swap(true, Ordering::Acquire) {
            return Ok(CycleOutcome::Skipped);
        }
        let result = self.cycle().await;
        self.in_flight.store(false, Ordering::Release);
        result
    }

    async fn cycle(&self) -> Result<CycleOutcome, HubError> {
        let raw = self.client.fetch(self.node).await?;
        let snapshot = Arc::new(TelemetrySnapshot::from_raw(raw, now()));
        let records = snapshot.len();

        let generation = self.cache.replace(Arc::clone(&snapshot));

        let events = self
            .tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .discover(&snapshot);
        let discovered = events.len();

        // Registration happens outside the publish critical section —
        // `replace` released the write lock above, so slow consumer
        // setup cannot block readers or the next swap.
        for event in events {
            self.registrar.register(event).await?;
        }

        Ok(CycleOutcome::Completed {
            generation,
            records,
            discovered,
        })
    }

    /// Spawn the periodic loop.
    ///
    /// The caller is expected to have run one eager cycle already; the
    /// loop waits a full interval before its first attempt. Failed
    /// cycles are logged and retried on the next tick; ticks that come
    /// due while a cycle is still running are skipped.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately; the
            // eager startup cycle already covered that slot.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.run_cycle().await {
                    Ok(CycleOutcome::Completed {
                        records,
                        discovered,
                        ..
                    }) => {
                        tracing::info!(records, discovered, "poll cycle complete");
                    }
                    Ok(CycleOutcome::Skipped) => {
                        tracing::debug!("previous poll cycle still running, tick skipped");
                    }
                    Err(err) => {
                        tracing::warn!(%err, "poll cycle failed, keeping previous snapshot");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicBool;

    use heliohub_domain::command::OutputCommand;
    use heliohub_domain::error::BoxedError;
    use heliohub_domain::key::EntityKey;
    use heliohub_domain::mode::OutputMode;
    use heliohub_domain::record::SensorRecord;
    use heliohub_domain::registration::RegistrationEvent;
    use heliohub_domain::snapshot::RawSnapshot;
    use heliohub_domain::telemetry::TelemetryDomain;
    use heliohub_domain::value::SignalLevel;

    #[derive(Debug)]
    struct FakeTransportError;

    impl std::fmt::Display for FakeTransportError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("gateway unreachable")
        }
    }

    impl std::error::Error for FakeTransportError {}

    struct FakeClient {
        snapshot: StdMutex<RawSnapshot>,
        fail: AtomicBool,
        delay: Option<Duration>,
        fetches: StdMutex<u32>,
    }

    impl FakeClient {
        fn with(raw: RawSnapshot) -> Self {
            Self {
                snapshot: StdMutex::new(raw),
                fail: AtomicBool::new(false),
                delay: None,
                fetches: StdMutex::new(0),
            }
        }

        fn slow(raw: RawSnapshot, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::with(raw)
            }
        }
    }

    impl DeviceClient for FakeClient {
        async fn fetch(&self, _node: Option<u8>) -> Result<RawSnapshot, HubError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::Relaxed) {
                return Err(HubError::Transport(
                    Box::new(FakeTransportError) as BoxedError
                ));
            }
            *self.fetches.lock().unwrap() += 1;
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn set_output(
            &self,
            _raw_id: &str,
            _node: Option<u8>,
            _command: OutputCommand,
        ) -> Result<(), HubError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingRegistrar {
        events: Arc<StdMutex<Vec<RegistrationEvent>>>,
    }

    impl EntityRegistrar for RecordingRegistrar {
        async fn register(&self, event: RegistrationEvent) -> Result<(), HubError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn raw_with_digital() -> RawSnapshot {
        let mut raw = RawSnapshot::new();
        raw.insert(TelemetryDomain::Analog, "1", SensorRecord::numeric(45.7));
        raw.insert(
            TelemetryDomain::Digital,
            "1",
            SensorRecord::digital(SignalLevel::Ein, OutputMode::Auto).with_name("Pumpe"),
        );
        raw
    }

    fn poller(
        client: Arc<FakeClient>,
        registrar: RecordingRegistrar,
        cache: Arc<TelemetryCache>,
    ) -> Poller<FakeClient, RecordingRegistrar> {
        Poller::new(client, registrar, cache, Some(1))
    }

    #[tokio::test]
    async fn should_publish_and_announce_on_first_cycle() {
        let client = Arc::new(FakeClient::with(raw_with_digital()));
        let registrar = RecordingRegistrar::default();
        let cache = Arc::new(TelemetryCache::new());
        let poller = poller(client, registrar.clone(), Arc::clone(&cache));

        let outcome = poller.run_cycle().await.unwrap();

        assert!(matches!(
            outcome,
            CycleOutcome::Completed {
                records: 2,
                discovered: 3,
                ..
            }
        ));
        let key = EntityKey::new(TelemetryDomain::Digital, "1");
        assert!(cache.get(&key).is_some());
        assert_eq!(registrar.events.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_not_reannounce_on_second_cycle() {
        let client = Arc::new(FakeClient::with(raw_with_digital()));
        let registrar = RecordingRegistrar::default();
        let cache = Arc::new(TelemetryCache::new());
        let poller = poller(client, registrar.clone(), cache);

        poller.run_cycle().await.unwrap();
        let outcome = poller.run_cycle().await.unwrap();

        assert!(matches!(
            outcome,
            CycleOutcome::Completed { discovered: 0, .. }
        ));
        assert_eq!(registrar.events.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_keep_previous_snapshot_when_fetch_fails() {
        let client = Arc::new(FakeClient::with(raw_with_digital()));
        let registrar = RecordingRegistrar::default();
        let cache = Arc::new(TelemetryCache::new());
        let poller = poller(Arc::clone(&client), registrar, Arc::clone(&cache));

        poller.run_cycle().await.unwrap();
        let generation = cache.generation();

        client.fail.store(true, Ordering::Relaxed);
        let result = poller.run_cycle().await;

        assert!(matches!(result, Err(HubError::Transport(_))));
        assert_eq!(cache.generation(), generation);
        let key = EntityKey::new(TelemetryDomain::Analog, "1");
        assert!(cache.get(&key).is_some());
    }

    #[tokio::test]
    async fn should_skip_when_a_cycle_is_in_flight() {
        let client = Arc::new(FakeClient::slow(
            raw_with_digital(),
            Duration::from_millis(50),
        ));
        let registrar = RecordingRegistrar::default();
        let cache = Arc::new(TelemetryCache::new());
        let poller = Arc::new(poller(Arc::clone(&client), registrar, Arc::clone(&cache)));

        let first = {
            let poller = Arc::clone(&poller);
            tokio::spawn(async move { poller.run_cycle().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = poller.run_cycle().await.unwrap();

        assert_eq!(second, CycleOutcome::Skipped);
        assert!(matches!(
            first.await.unwrap().unwrap(),
            CycleOutcome::Completed { .. }
        ));
        // Exactly one cycle's worth of cache mutation.
        assert_eq!(*client.fetches.lock().unwrap(), 1);
        assert!(cache.generation() > Generation::ZERO);
    }
}
