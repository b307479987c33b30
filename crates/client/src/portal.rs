//! Wiring: one [`Portal`] holds the session manager, the data façade, the
//! event bus and the simulator for a running client.

use std::sync::Arc;

use portal_auth::CredentialStore;
use portal_core::{Clock, SystemClock};
use portal_events::{EventBus, InMemoryEventBus, PortalEvent, Subscription};

use crate::backend::{Authenticator, Backend, LiveBackend, SimulatedBackend};
use crate::config::ClientConfig;
use crate::facade::DataFacade;
use crate::session::SessionManager;
use crate::simulator::{EventSimulator, SimulatorHandle};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore, default_store_path};

pub struct Portal {
    config: ClientConfig,
    session: Arc<SessionManager>,
    data: DataFacade,
    events: Arc<InMemoryEventBus<PortalEvent>>,
    simulator: Arc<EventSimulator>,
}

impl Portal {
    /// Production wiring: SQLite storage at the configured (or default) path,
    /// wall-clock time, HTTP live backend. Persisted state is restored.
    pub async fn open(config: ClientConfig) -> anyhow::Result<Self> {
        let path = match &config.storage_path {
            Some(path) => path.clone(),
            None => default_store_path()?,
        };
        tracing::info!(path = %path.display(), api_url = %config.api_url, "opening portal client");

        let portal = PortalBuilder::new(config).store(Arc::new(SqliteStore::open(path))).build();
        portal.session.restore().await;
        Ok(portal)
    }

    pub fn builder(config: ClientConfig) -> PortalBuilder {
        PortalBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn data(&self) -> &DataFacade {
        &self.data
    }

    pub fn events(&self) -> &Arc<InMemoryEventBus<PortalEvent>> {
        &self.events
    }

    pub fn subscribe(&self) -> Subscription<PortalEvent> {
        self.events.subscribe()
    }

    pub fn simulator(&self) -> &Arc<EventSimulator> {
        &self.simulator
    }

    pub fn start_simulator(&self) -> SimulatorHandle {
        Arc::clone(&self.simulator).start()
    }
}

/// Swaps individual collaborators; anything not set gets the production
/// default (memory storage excepted, see [`PortalBuilder::build`]).
pub struct PortalBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    credentials: Option<CredentialStore>,
    simulated: Option<Arc<dyn Backend>>,
    live: Option<(Arc<dyn Backend>, Arc<dyn Authenticator>)>,
}

impl PortalBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            store: None,
            clock: None,
            credentials: None,
            simulated: None,
            live: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn simulated_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.simulated = Some(backend);
        self
    }

    /// Live data backend and the authenticator used for live logins.
    pub fn live_backend(mut self, backend: Arc<dyn Backend>, authenticator: Arc<dyn Authenticator>) -> Self {
        self.live = Some((backend, authenticator));
        self
    }

    /// Without an explicit store the portal keeps its state in memory only.
    /// Does not restore; call [`SessionManager::restore`] when wanted.
    pub fn build(self) -> Portal {
        let config = self.config;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let credentials = self.credentials.unwrap_or_else(CredentialStore::demo);

        let (live, authenticator) = self.live.unwrap_or_else(|| {
            let http = Arc::new(LiveBackend::new(config.api_url.clone()));
            (http.clone() as Arc<dyn Backend>, http as Arc<dyn Authenticator>)
        });
        let simulated = self.simulated.unwrap_or_else(|| {
            Arc::new(SimulatedBackend::demo(Arc::clone(&clock)).with_delay(config.simulated_delay))
        });

        let session = Arc::new(SessionManager::new(store, credentials, authenticator, Arc::clone(&clock)));
        let data = DataFacade::new(Arc::clone(&session), simulated, live);
        let events = Arc::new(InMemoryEventBus::new());
        let simulator = Arc::new(EventSimulator::new(
            Arc::clone(&session),
            Arc::clone(&events),
            clock,
            config.simulator.clone(),
        ));

        Portal {
            config,
            session,
            data,
            events,
            simulator,
        }
    }
}
