//! Background generator of real-time events for simulated mode.
//!
//! Every `interval` the simulator rolls against `probability` and, on a hit,
//! publishes one synthesized [`PortalEvent`] on the bus. Ticks are no-ops
//! while the session manager is in live mode.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use portal_core::{AlertId, Clock, DigitalId, IncidentId, ZoneId};
use portal_events::{EventBus, EventKind, EventPayload, InMemoryEventBus, PortalEvent};
use portal_operations::{AlertKind, Priority, RiskLevel};

use crate::session::SessionManager;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_PROBABILITY: f64 = 0.2;

const LOCATIONS: [&str; 4] = ["Red Fort", "India Gate", "Connaught Place", "Chandni Chowk"];
const PRIORITIES: [Priority; 2] = [Priority::High, Priority::Medium];
const INCIDENT_TITLES: [&str; 4] = [
    "New Incident Reported",
    "Tourist Harassment Reported",
    "Theft Reported",
    "Medical Assistance Requested",
];
const ALERT_TITLES: [(&str, AlertKind); 3] = [
    ("Security Alert", AlertKind::Warning),
    ("Crowd Density Warning", AlertKind::Warning),
    ("Tourist Advisory", AlertKind::Info),
];
const ZONES: [&str; 3] = ["zone-1", "zone-2", "zone-3"];
const RISK_LEVELS: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub interval: Duration,
    /// Chance in `[0, 1]` that a tick emits an event.
    pub probability: f64,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Emit on every tick.
    pub fn always() -> Self {
        Self {
            probability: 1.0,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub struct EventSimulator {
    session: Arc<SessionManager>,
    bus: Arc<InMemoryEventBus<PortalEvent>>,
    clock: Arc<dyn Clock>,
    config: SimulatorConfig,
    rng: Mutex<StdRng>,
}

impl EventSimulator {
    pub fn new(
        session: Arc<SessionManager>,
        bus: Arc<InMemoryEventBus<PortalEvent>>,
        clock: Arc<dyn Clock>,
        config: SimulatorConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            session,
            bus,
            clock,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// One scheduling step. Returns the event that was published, if any.
    pub fn tick(&self) -> Option<PortalEvent> {
        if !self.session.current_mode().is_simulated() {
            tracing::trace!("simulator tick skipped in live mode");
            return None;
        }

        let event = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let probability = self.config.probability;
            let probability = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
            if !rng.gen_bool(probability) {
                return None;
            }
            synthesize(&mut *rng, self.clock.now())
        };

        if let Err(e) = self.bus.publish(event.clone()) {
            tracing::warn!(error = ?e, kind = %event.kind(), "failed to publish simulated event");
            return None;
        }
        tracing::debug!(kind = %event.kind(), id = %event.id, "simulated event published");
        Some(event)
    }

    /// Run [`EventSimulator::tick`] every `interval` until the handle is
    /// stopped. The first tick happens one interval after start.
    pub fn start(self: Arc<Self>) -> SimulatorHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = Arc::clone(&shutdown);
        let interval = self.config.interval;

        let join = tokio::spawn(async move {
            tracing::info!(interval_ms = interval.as_millis() as u64, "event simulator started");

            let start = tokio::time::Instant::now() + interval;
            let mut ticks = tokio::time::interval_at(start, interval);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        tracing::info!("event simulator received shutdown signal");
                        break;
                    }
                    _ = ticks.tick() => {
                        self.tick();
                    }
                }
            }

            tracing::info!("event simulator stopped");
        });

        SimulatorHandle {
            shutdown,
            join: Some(join),
        }
    }
}

/// Owner of a running simulator task.
///
/// Dropping the handle without [`SimulatorHandle::stop`] aborts the task.
#[derive(Debug)]
pub struct SimulatorHandle {
    shutdown: Arc<Notify>,
    join: Option<JoinHandle<()>>,
}

impl SimulatorHandle {
    /// Signal the task and wait for it to finish. No tick runs after this
    /// returns.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::warn!(error = %e, "event simulator task ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

/// Build one random event with a fresh key.
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> PortalEvent {
    let kind = EventKind::ALL.choose(rng).copied().unwrap_or(EventKind::IncidentCreated);
    let location = pick(rng, &LOCATIONS).to_string();
    let suffix: u16 = rng.gen_range(0..10_000);
    let stamp = now.timestamp_millis();

    let payload = match kind {
        EventKind::IncidentCreated => EventPayload::IncidentCreated {
            incident_id: IncidentId::new(format!("INC-{stamp}-{suffix:04}")),
            title: pick(rng, &INCIDENT_TITLES).to_string(),
            priority: *pick(rng, &PRIORITIES),
            location,
        },
        EventKind::AlertCreated => {
            let (title, kind) = *pick(rng, &ALERT_TITLES);
            EventPayload::AlertCreated {
                alert_id: AlertId::new(format!("ALERT-{stamp}-{suffix:04}")),
                title: title.to_string(),
                kind,
                location,
            }
        }
        EventKind::RiskUpdated => EventPayload::RiskUpdated {
            zone_id: ZoneId::new(*pick(rng, &ZONES)),
            new_risk_level: *pick(rng, &RISK_LEVELS),
        },
        EventKind::SosTriggered => EventPayload::SosTriggered {
            digital_id: DigitalId::new(format!("DID-{suffix:05}")),
            location,
            priority: Priority::Emergency,
        },
    };

    PortalEvent::new(payload, now)
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
