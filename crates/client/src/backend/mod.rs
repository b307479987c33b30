//! Backends behind the data façade.
//!
//! Both implementations answer the same [`Backend`] contract; the façade picks
//! one per call from the session manager's current mode. Backends return
//! plain [`PortalResult`]s and never touch session state.

mod fixtures;
mod live;
mod simulated;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use portal_auth::Identity;
use portal_core::{CallId, DigitalId, IncidentId, IdentityId, PortalResult, ZoneId};
use portal_operations::{
    Alert, AuditEntry, AuditFilter, CallFilter, DigitalIdentity, DigitalIdentityFilter, HeatmapZone, Incident,
    IncidentFilter, NewAuditEntry, OperatorCall, Verification, Zone, ZoneFilter,
};

pub use fixtures::Fixtures;
pub use live::LiveBackend;
pub use simulated::SimulatedBackend;

/// Who is asking, as far as a backend needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Bearer token of a live session.
    pub token: Option<String>,
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: IdentityId,
    pub name: String,
}

impl Actor {
    pub fn of(identity: &Identity) -> Self {
        Self {
            id: identity.id().clone(),
            name: identity.name().to_string(),
        }
    }
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            token: None,
            actor: Some(Actor::of(identity)),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_incidents(&self, ctx: &RequestContext, filter: &IncidentFilter) -> PortalResult<Vec<Incident>>;

    async fn get_incident(&self, ctx: &RequestContext, id: &IncidentId) -> PortalResult<Incident>;

    async fn assign_incident(&self, ctx: &RequestContext, id: &IncidentId, assignee: &str) -> PortalResult<Incident>;

    async fn list_zones(&self, ctx: &RequestContext, filter: &ZoneFilter) -> PortalResult<Vec<Zone>>;

    async fn get_zone(&self, ctx: &RequestContext, id: &ZoneId) -> PortalResult<Zone>;

    async fn heatmap(&self, ctx: &RequestContext) -> PortalResult<Vec<HeatmapZone>>;

    async fn list_digital_identities(
        &self,
        ctx: &RequestContext,
        filter: &DigitalIdentityFilter,
    ) -> PortalResult<Vec<DigitalIdentity>>;

    async fn get_digital_identity(&self, ctx: &RequestContext, id: &DigitalId) -> PortalResult<DigitalIdentity>;

    async fn verify_digital_identity(&self, ctx: &RequestContext, id: &DigitalId) -> PortalResult<Verification>;

    async fn list_calls(&self, ctx: &RequestContext, filter: &CallFilter) -> PortalResult<Vec<OperatorCall>>;

    async fn get_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall>;

    async fn accept_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall>;

    async fn decline_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall>;

    async fn end_call(&self, ctx: &RequestContext, id: &CallId, notes: Option<&str>) -> PortalResult<OperatorCall>;

    async fn list_audit_entries(&self, ctx: &RequestContext, filter: &AuditFilter) -> PortalResult<Vec<AuditEntry>>;

    async fn append_audit_entry(&self, ctx: &RequestContext, entry: NewAuditEntry) -> PortalResult<AuditEntry>;

    async fn list_alerts(&self, ctx: &RequestContext) -> PortalResult<Vec<Alert>>;
}

/// What a successful live login hands back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    #[serde(rename = "user")]
    pub identity: Identity,
    pub token: String,
    /// Backend-chosen expiry; the standard TTL applies when absent.
    #[serde(default, alias = "expires_at")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Remote credential check used by live-mode login.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `AuthenticationRejected` for bad credentials, `BackendUnavailable` when
    /// the service could not be asked.
    async fn authenticate(&self, identifier: &str, secret: &str) -> PortalResult<AuthGrant>;
}
