//! The session manager: the single owner of "who is signed in" and "which
//! backend is active".
//!
//! State lives behind a `std::sync::RwLock` that is never held across an
//! `.await`; persistence goes through a [`KeyValueStore`] and is best-effort.
//! A failed write is logged and the in-memory state stays authoritative for
//! the rest of the process.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use portal_auth::{CredentialStore, Identity, NavItem, Permission, Role, Session, explain, visible_navigation};
use portal_core::{Clock, PortalError, PortalResult};

use crate::backend::Authenticator;
use crate::mode::BackendMode;
use crate::storage::{KeyValueStore, MODE_KEY, SESSION_KEY};

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    mode: BackendMode,
}

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    credentials: CredentialStore,
    authenticator: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Starts signed out in simulated mode; call [`SessionManager::restore`]
    /// to pick up persisted state.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        credentials: CredentialStore,
        authenticator: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            credentials,
            authenticator,
            clock,
            state: RwLock::new(SessionState::default()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Load the persisted mode and session.
    ///
    /// Never fails: unreadable, malformed or expired records are treated as
    /// absent, and malformed or expired ones are removed from storage.
    pub async fn restore(&self) {
        let mode = self.restore_mode().await;
        let session = self.restore_session().await;

        {
            let mut state = self.write_state();
            state.mode = mode;
            state.session = session.clone();
        }

        match session {
            Some(session) => tracing::info!(
                identity = %session.identity().id(),
                role = %session.identity().role(),
                mode = %mode,
                expires_at = %session.expires_at(),
                "session restored"
            ),
            None => tracing::info!(mode = %mode, "no session to restore"),
        }
    }

    async fn restore_mode(&self) -> BackendMode {
        let raw = match self.store.get(MODE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted mode, using default");
                return BackendMode::default();
            }
        };

        match raw {
            None => BackendMode::default(),
            Some(raw) => match BackendMode::decode(&raw) {
                Some(mode) => mode,
                None => {
                    tracing::warn!(value = %raw, "discarding malformed mode record");
                    self.discard(MODE_KEY).await;
                    BackendMode::default()
                }
            },
        }
    }

    async fn restore_session(&self) -> Option<Session> {
        let raw = match self.store.get(SESSION_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted session");
                return None;
            }
        };

        let session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed session record");
                self.discard(SESSION_KEY).await;
                return None;
            }
        };

        if let Err(e) = session.validate(self.now()) {
            tracing::info!(reason = %e, identity = %session.identity().id(), "discarding persisted session");
            self.discard(SESSION_KEY).await;
            return None;
        }

        Some(session)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            tracing::warn!(key, error = %e, "could not remove persisted record");
        }
    }

    async fn persist_session(&self, session: &Session) {
        let encoded = match serde_json::to_string(session) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode session");
                return;
            }
        };
        if let Err(e) = self.store.set(SESSION_KEY, &encoded).await {
            tracing::warn!(error = %e, "could not persist session, keeping it in memory only");
        }
    }

    /// Make `session` current: persist (best-effort), then publish in memory.
    async fn install(&self, session: Session) -> Identity {
        self.persist_session(&session).await;
        let identity = session.identity().clone();
        self.write_state().session = Some(session);
        identity
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Authenticate and install a fresh session.
    ///
    /// Simulated mode checks the local credential store; live mode asks the
    /// authenticator. A failed login leaves the current session untouched.
    pub async fn login(&self, identifier: &str, secret: &str) -> PortalResult<Identity> {
        let mode = self.current_mode();
        let now = self.now();

        let session = match mode {
            BackendMode::Simulated => match self.credentials.verify(identifier, secret) {
                Some(identity) => Session::issue(identity.clone(), now),
                None => {
                    tracing::info!(mode = %mode, "login rejected");
                    return Err(PortalError::AuthenticationRejected);
                }
            },
            BackendMode::Live => {
                let grant = self.authenticator.authenticate(identifier, secret).await.map_err(|e| {
                    tracing::info!(mode = %mode, error = %e, "login failed");
                    e
                })?;
                let expires_at = grant.expires_at.unwrap_or_else(|| now + portal_auth::session_ttl());
                let session = Session::issue_until(grant.identity, now, expires_at).with_token(grant.token);
                if !session.is_valid_at(now) {
                    tracing::warn!(expires_at = %expires_at, "backend issued an already-expired session");
                    return Err(PortalError::SessionExpired);
                }
                session
            }
        };

        let identity = self.install(session).await;
        tracing::info!(identity = %identity.id(), role = %identity.role(), mode = %mode, "logged in");
        Ok(identity)
    }

    /// Clear the session. The mode flag is kept.
    pub async fn logout(&self) {
        let previous = self.write_state().session.take();
        self.discard(SESSION_KEY).await;
        match previous {
            Some(session) => tracing::info!(identity = %session.identity().id(), "logged out"),
            None => tracing::debug!("logout without a session"),
        }
    }

    /// Replace the session with a fresh one for the first demo identity with
    /// `role`. Simulated mode only.
    pub async fn switch_role(&self, role: Role) -> PortalResult<Identity> {
        if !self.current_mode().is_simulated() {
            return Err(PortalError::permission_denied("role switching is only available in simulated mode"));
        }

        let identity = self
            .credentials
            .find_by_role(role)
            .cloned()
            .ok_or_else(|| PortalError::not_found(format!("demo identity with role '{role}'")))?;

        let identity = self.install(Session::issue(identity, self.now())).await;
        tracing::info!(identity = %identity.id(), role = %role, "switched role");
        Ok(identity)
    }

    /// Persist and apply a new mode.
    ///
    /// Entering simulated mode with nobody signed in signs in the default demo
    /// identity.
    pub async fn set_mode(&self, mode: BackendMode) {
        if let Err(e) = self.store.set(MODE_KEY, &mode.encode()).await {
            tracing::warn!(error = %e, "could not persist mode, keeping it in memory only");
        }
        let previous = std::mem::replace(&mut self.write_state().mode, mode);
        tracing::info!(from = %previous, to = %mode, "backend mode changed");

        if mode.is_simulated() && self.current_identity().is_none() {
            match self.credentials.default_identity().cloned() {
                Some(identity) => {
                    let identity = self.install(Session::issue(identity, self.now())).await;
                    tracing::info!(identity = %identity.id(), "signed in default demo identity");
                }
                None => tracing::warn!("no default demo identity to sign in"),
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// The current session if it is still valid.
    ///
    /// A session found expired is dropped from memory here; its persisted
    /// record is removed on the next [`SessionManager::restore`] or
    /// [`SessionManager::logout`].
    pub fn current_session(&self) -> Option<Session> {
        let now = self.now();
        {
            let state = self.read_state();
            match &state.session {
                None => return None,
                Some(session) if session.is_valid_at(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        let mut state = self.write_state();
        if state.session.as_ref().is_some_and(|s| !s.is_valid_at(now)) {
            if let Some(expired) = state.session.take() {
                tracing::info!(identity = %expired.identity().id(), "session expired");
            }
        }
        state.session.clone().filter(|s| s.is_valid_at(now))
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.current_session().map(|s| s.identity().clone())
    }

    pub fn current_mode(&self) -> BackendMode {
        self.read_state().mode
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// Bearer token of a live session.
    pub fn token(&self) -> Option<String> {
        self.current_session().and_then(|s| s.token().map(str::to_string))
    }

    pub fn allows(&self, capability: &str) -> bool {
        portal_auth::allows(self.current_identity().as_ref(), capability)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        portal_auth::has_role(self.current_identity().as_ref(), roles)
    }

    /// `Ok` when the current identity holds `capability`, otherwise
    /// `PermissionDenied` carrying a readable reason.
    pub fn require(&self, capability: &Permission) -> PortalResult<()> {
        let explanation = explain(self.current_identity().as_ref(), capability);
        if explanation.granted {
            Ok(())
        } else {
            Err(PortalError::PermissionDenied(explanation.reason))
        }
    }

    /// `Ok` when the current identity holds one of `roles`. Used by the
    /// role-gated operator console.
    pub fn require_role(&self, roles: &[Role]) -> PortalResult<()> {
        portal_auth::authorize_role(self.current_identity().as_ref(), roles)
            .map_err(|e| PortalError::permission_denied(e.to_string()))
    }

    pub fn visible_navigation(&self) -> Vec<NavItem> {
        visible_navigation(self.current_identity().as_ref())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("SessionManager")
            .field("mode", &state.mode)
            .field("identity", &state.session.as_ref().map(|s| s.identity().id().clone()))
            .finish_non_exhaustive()
    }
}
