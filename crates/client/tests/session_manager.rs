use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use portal_auth::{CredentialStore, Identity, Role, Session, caps};
use portal_client::{
    AuthGrant, Authenticator, BackendMode, KeyValueStore, MODE_KEY, MemoryStore, SESSION_KEY, SessionManager,
    StorageError,
};
use portal_core::{Clock, ManualClock, PortalError, PortalResult};

/// Live authenticator double: accepts exactly one identifier/secret pair,
/// unless `offline` is set.
struct StubAuthenticator {
    calls: AtomicUsize,
    offline: AtomicBool,
    expires_in: Option<Duration>,
    clock: ManualClock,
}

impl StubAuthenticator {
    fn new(clock: ManualClock) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
            expires_in: None,
            clock,
        }
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn authenticate(&self, identifier: &str, secret: &str) -> PortalResult<AuthGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(PortalError::unavailable("connection refused"));
        }
        if identifier != "duty.officer@police.example" || secret != "s3cret" {
            return Err(PortalError::AuthenticationRejected);
        }
        Ok(AuthGrant {
            identity: Identity::new("u-77", identifier, Role::Police, "Duty Officer")
                .with_permissions([caps::INCIDENTS_READ]),
            token: "live-token-77".to_string(),
            expires_at: self.expires_in.map(|d| self.clock.now() + d),
        })
    }
}

/// Store whose writes always fail; reads see nothing.
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".to_string()))
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    clock: ManualClock,
    auth: Arc<StubAuthenticator>,
}

impl Harness {
    fn new() -> Self {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        Self {
            store: Arc::new(MemoryStore::new()),
            auth: Arc::new(StubAuthenticator::new(clock.clone())),
            clock,
        }
    }

    /// A fresh manager over the shared store, as after an application relaunch.
    fn launch(&self) -> SessionManager {
        SessionManager::new(
            self.store.clone(),
            CredentialStore::demo(),
            self.auth.clone(),
            Arc::new(self.clock.clone()),
        )
    }
}

#[tokio::test]
async fn login_with_demo_credentials_issues_an_eight_hour_session() {
    let h = Harness::new();
    let manager = h.launch();

    let identity = manager.login("police1@demo.local", "Police@1234").await.unwrap();
    assert_eq!(identity.role(), Role::Police);

    let session = manager.current_session().unwrap();
    assert_eq!(session.identity(), &identity);
    assert_eq!(session.expires_at(), h.clock.now() + Duration::hours(8));
    assert!(manager.allows(caps::INCIDENTS_ASSIGN.as_str()));
    assert!(!manager.allows(caps::CALLS_HANDLE.as_str()));

    let persisted = h.store.get(SESSION_KEY).await.unwrap().unwrap();
    let persisted: Session = serde_json::from_str(&persisted).unwrap();
    assert_eq!(persisted, session);
}

#[tokio::test]
async fn failed_login_leaves_the_current_session_alone() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("admin@demo.local", "Admin@1234").await.unwrap();
    let before = manager.current_session();

    let err = manager.login("admin@demo.local", "admin@1234").await.unwrap_err();
    assert_eq!(err, PortalError::AuthenticationRejected);
    let err = manager.login("nobody@demo.local", "Admin@1234").await.unwrap_err();
    assert_eq!(err, PortalError::AuthenticationRejected);

    assert_eq!(manager.current_session(), before);
}

#[tokio::test]
async fn anonymous_is_denied_everything() {
    let h = Harness::new();
    let manager = h.launch();

    assert!(manager.current_identity().is_none());
    assert!(!manager.allows(caps::DASHBOARD_VIEW.as_str()));
    assert!(!manager.has_role(&Role::ALL));
    let err = manager.require(&caps::DASHBOARD_VIEW).unwrap_err();
    assert_eq!(err.code(), "permission_denied");
}

#[tokio::test]
async fn admin_wildcard_grants_any_capability() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("admin@demo.local", "Admin@1234").await.unwrap();

    assert!(manager.allows("something.nobody.declared"));
    assert!(manager.require(&caps::AUDIT_READ).is_ok());
    assert!(manager.has_role(&[Role::Admin, Role::Police]));
    assert!(!manager.has_role(&[Role::Tourist]));
}

#[tokio::test]
async fn switch_role_issues_a_fresh_session() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("admin@demo.local", "Admin@1234").await.unwrap();
    let before = manager.current_session().unwrap();

    h.clock.advance(Duration::minutes(5));
    let identity = manager.switch_role(Role::Operator112).await.unwrap();

    assert_eq!(identity.role(), Role::Operator112);
    let after = manager.current_session().unwrap();
    assert!(after.expires_at() > before.expires_at());
    assert!(manager.allows(caps::CALLS_HANDLE.as_str()));
    assert!(!manager.allows(caps::AUDIT_READ.as_str()));
}

#[tokio::test]
async fn switch_role_without_a_matching_entry_is_rejected() {
    let h = Harness::new();
    let manager = SessionManager::new(
        h.store.clone(),
        CredentialStore::empty().with_entry(
            "admin@demo.local",
            "Admin@1234",
            Identity::new("admin-1", "admin@demo.local", Role::Admin, "Admin User"),
        ),
        h.auth.clone(),
        Arc::new(h.clock.clone()),
    );
    manager.login("admin@demo.local", "Admin@1234").await.unwrap();

    let err = manager.switch_role(Role::Hotel).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(manager.current_identity().unwrap().role(), Role::Admin);
}

#[tokio::test]
async fn switch_role_is_refused_in_live_mode() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;
    manager.login("duty.officer@police.example", "s3cret").await.unwrap();
    let before = manager.current_session();

    let err = manager.switch_role(Role::Admin).await.unwrap_err();
    assert_eq!(err.code(), "permission_denied");
    assert_eq!(manager.current_session(), before);
}

#[tokio::test]
async fn live_login_goes_through_the_authenticator() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;

    // Demo credentials mean nothing to the live service.
    let err = manager.login("admin@demo.local", "Admin@1234").await.unwrap_err();
    assert_eq!(err, PortalError::AuthenticationRejected);

    let identity = manager.login("duty.officer@police.example", "s3cret").await.unwrap();
    assert_eq!(identity.name(), "Duty Officer");
    assert_eq!(manager.token().as_deref(), Some("live-token-77"));
    assert_eq!(
        manager.current_session().unwrap().expires_at(),
        h.clock.now() + Duration::hours(8)
    );
    assert_eq!(h.auth.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn live_login_outage_keeps_the_existing_session() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;
    manager.login("duty.officer@police.example", "s3cret").await.unwrap();
    let before = manager.current_session();
    assert!(before.is_some());

    h.auth.offline.store(true, Ordering::SeqCst);
    let err = manager.login("duty.officer@police.example", "s3cret").await.unwrap_err();
    assert_eq!(err.code(), "backend_unavailable");
    assert_eq!(manager.current_session(), before);
    assert_eq!(h.store.get(SESSION_KEY).await.unwrap(), Some(serde_json::to_string(&before.unwrap()).unwrap()));
}

#[tokio::test]
async fn already_expired_live_grant_is_refused() {
    let mut h = Harness::new();
    let mut auth = StubAuthenticator::new(h.clock.clone());
    auth.expires_in = Some(Duration::minutes(-5));
    h.auth = Arc::new(auth);
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;

    let err = manager.login("duty.officer@police.example", "s3cret").await.unwrap_err();
    assert_eq!(err, PortalError::SessionExpired);
    assert!(manager.current_session().is_none());
    assert_eq!(h.store.get(SESSION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn operator_console_requires_the_operator_role() {
    let h = Harness::new();
    let manager = h.launch();
    assert_eq!(manager.require_role(&[Role::Operator112]).unwrap_err().code(), "permission_denied");

    manager.login("police1@demo.local", "Police@1234").await.unwrap();
    let err = manager.require_role(&[Role::Operator112]).unwrap_err();
    assert_eq!(err.code(), "permission_denied");

    manager.switch_role(Role::Operator112).await.unwrap();
    assert!(manager.require_role(&[Role::Operator112]).is_ok());
}

#[tokio::test]
async fn backend_chosen_expiry_is_honoured() {
    let mut h = Harness::new();
    let mut auth = StubAuthenticator::new(h.clock.clone());
    auth.expires_in = Some(Duration::hours(1));
    h.auth = Arc::new(auth);
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;

    manager.login("duty.officer@police.example", "s3cret").await.unwrap();
    h.clock.advance(Duration::minutes(61));
    assert!(manager.current_identity().is_none());
}

#[tokio::test]
async fn sessions_expire_at_exactly_eight_hours() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("tourism1@demo.local", "Tourism@1234").await.unwrap();

    h.clock.advance(Duration::hours(8) - Duration::seconds(1));
    assert!(manager.current_identity().is_some());

    h.clock.advance(Duration::seconds(1));
    assert!(manager.current_identity().is_none());
    assert!(!manager.allows(caps::ZONES_READ.as_str()));
    assert!(manager.visible_navigation().iter().all(|item| item.title == "Settings"));
}

#[tokio::test]
async fn restore_after_relaunch_recovers_session_and_mode() {
    let h = Harness::new();
    {
        let manager = h.launch();
        manager.login("hotel1@demo.local", "Hotel@1234").await.unwrap();
    }

    h.clock.advance(Duration::hours(2));
    let relaunched = h.launch();
    relaunched.restore().await;

    let identity = relaunched.current_identity().unwrap();
    assert_eq!(identity.email(), "hotel1@demo.local");
    assert_eq!(relaunched.current_mode(), BackendMode::Simulated);
}

#[tokio::test]
async fn restore_discards_an_expired_session() {
    let h = Harness::new();
    h.launch().login("police1@demo.local", "Police@1234").await.unwrap();

    h.clock.advance(Duration::hours(9));
    let relaunched = h.launch();
    relaunched.restore().await;

    assert!(relaunched.current_identity().is_none());
    assert_eq!(h.store.get(SESSION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn restore_discards_malformed_records() {
    let h = Harness::new();
    h.store.set(SESSION_KEY, "{\"identity\": 42").await.unwrap();
    h.store.set(MODE_KEY, "maybe").await.unwrap();

    let manager = h.launch();
    manager.restore().await;

    assert!(manager.current_identity().is_none());
    assert_eq!(manager.current_mode(), BackendMode::Simulated);
    assert_eq!(h.store.get(SESSION_KEY).await.unwrap(), None);
    assert_eq!(h.store.get(MODE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn mode_is_persisted_independently_of_the_session() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;
    assert_eq!(h.store.get(MODE_KEY).await.unwrap().as_deref(), Some("false"));
    assert!(manager.current_identity().is_none());

    let relaunched = h.launch();
    relaunched.restore().await;
    assert_eq!(relaunched.current_mode(), BackendMode::Live);
}

#[tokio::test]
async fn entering_simulated_mode_signs_in_the_default_identity() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;
    assert!(manager.current_identity().is_none());

    manager.set_mode(BackendMode::Simulated).await;
    let identity = manager.current_identity().unwrap();
    assert_eq!(identity.email(), "admin@demo.local");
    assert_eq!(identity.role(), Role::Admin);
}

#[tokio::test]
async fn entering_simulated_mode_keeps_an_existing_session() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("police1@demo.local", "Police@1234").await.unwrap();

    manager.set_mode(BackendMode::Simulated).await;
    assert_eq!(manager.current_identity().unwrap().role(), Role::Police);
}

#[tokio::test]
async fn logout_clears_the_session_but_not_the_mode() {
    let h = Harness::new();
    let manager = h.launch();
    manager.set_mode(BackendMode::Live).await;
    manager.login("duty.officer@police.example", "s3cret").await.unwrap();

    manager.logout().await;

    assert!(manager.current_identity().is_none());
    assert!(manager.token().is_none());
    assert_eq!(manager.current_mode(), BackendMode::Live);
    assert_eq!(h.store.get(SESSION_KEY).await.unwrap(), None);
    assert_eq!(h.store.get(MODE_KEY).await.unwrap().as_deref(), Some("false"));
}

#[tokio::test]
async fn storage_failures_keep_the_session_in_memory() {
    let clock = ManualClock::default();
    let manager = SessionManager::new(
        Arc::new(ReadOnlyStore),
        CredentialStore::demo(),
        Arc::new(StubAuthenticator::new(clock.clone())),
        Arc::new(clock),
    );

    let identity = manager.login("operator112@demo.local", "Operator@1234").await.unwrap();
    assert_eq!(manager.current_identity(), Some(identity));

    manager.set_mode(BackendMode::Live).await;
    assert_eq!(manager.current_mode(), BackendMode::Live);

    manager.logout().await;
    assert!(manager.current_identity().is_none());
}

#[tokio::test]
async fn demo_admin_holds_only_the_wildcard() {
    let h = Harness::new();
    let manager = h.launch();

    let identity = manager.login("admin@demo.local", "Admin@1234").await.unwrap();
    assert_eq!(identity.role(), Role::Admin);
    assert_eq!(
        identity.permissions().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["*"]
    );
    assert!(manager.allows("anything.at.all"));
}

#[tokio::test]
async fn wrong_police_secret_keeps_the_previous_identity() {
    let h = Harness::new();
    let manager = h.launch();
    let tourist = manager.login("tourist_demo@demo.local", "Tourist@1234").await.unwrap();

    assert!(manager.login("police1@demo.local", "Police@12345").await.is_err());
    assert_eq!(manager.current_identity(), Some(tourist));
}

#[tokio::test]
async fn logout_then_restore_finds_nobody() {
    let h = Harness::new();
    let manager = h.launch();
    manager.login("police1@demo.local", "Police@1234").await.unwrap();

    manager.logout().await;
    manager.logout().await;
    manager.restore().await;

    assert!(manager.current_identity().is_none());
}
