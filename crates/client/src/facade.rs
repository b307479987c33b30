//! The data façade: one envelope-returning entry point per portal operation.
//!
//! Every call re-reads the session manager's mode and routes to the matching
//! backend, so a mode switch takes effect on the very next call. Errors never
//! escape as `Err`; they are folded into the envelope.

use std::sync::Arc;

use portal_core::{CallId, DigitalId, Envelope, IncidentId, PortalResult, ZoneId};
use portal_operations::{
    Alert, AuditEntry, AuditFilter, CallFilter, DigitalIdentity, DigitalIdentityFilter, HeatmapZone, Incident,
    IncidentFilter, NewAuditEntry, OperatorCall, Verification, Zone, ZoneFilter,
};

use crate::backend::{Backend, RequestContext};
use crate::mode::BackendMode;
use crate::session::SessionManager;

pub struct DataFacade {
    session: Arc<SessionManager>,
    simulated: Arc<dyn Backend>,
    live: Arc<dyn Backend>,
}

impl DataFacade {
    pub fn new(session: Arc<SessionManager>, simulated: Arc<dyn Backend>, live: Arc<dyn Backend>) -> Self {
        Self {
            session,
            simulated,
            live,
        }
    }

    /// Backend and request context for a call starting now.
    fn route(&self) -> (Arc<dyn Backend>, RequestContext) {
        let backend = match self.session.current_mode() {
            BackendMode::Simulated => Arc::clone(&self.simulated),
            BackendMode::Live => Arc::clone(&self.live),
        };
        let ctx = match self.session.current_session() {
            None => RequestContext::anonymous(),
            Some(session) => {
                let ctx = RequestContext::for_identity(session.identity());
                match session.token() {
                    Some(token) => ctx.with_token(token),
                    None => ctx,
                }
            }
        };
        tracing::debug!(
            backend = backend.name(),
            actor = ctx.actor.as_ref().map(|a| a.id.as_str()).unwrap_or("anonymous"),
            "routing data call"
        );
        (backend, ctx)
    }

    pub async fn list_incidents(&self, filter: IncidentFilter) -> Envelope<Vec<Incident>> {
        let (backend, ctx) = self.route();
        finish("list_incidents", backend.name(), backend.list_incidents(&ctx, &filter).await)
    }

    pub async fn get_incident(&self, id: &IncidentId) -> Envelope<Incident> {
        let (backend, ctx) = self.route();
        finish("get_incident", backend.name(), backend.get_incident(&ctx, id).await)
    }

    pub async fn assign_incident(&self, id: &IncidentId, assignee: &str) -> Envelope<Incident> {
        let (backend, ctx) = self.route();
        finish("assign_incident", backend.name(), backend.assign_incident(&ctx, id, assignee).await)
    }

    pub async fn list_zones(&self, filter: ZoneFilter) -> Envelope<Vec<Zone>> {
        let (backend, ctx) = self.route();
        finish("list_zones", backend.name(), backend.list_zones(&ctx, &filter).await)
    }

    pub async fn get_zone(&self, id: &ZoneId) -> Envelope<Zone> {
        let (backend, ctx) = self.route();
        finish("get_zone", backend.name(), backend.get_zone(&ctx, id).await)
    }

    pub async fn heatmap(&self) -> Envelope<Vec<HeatmapZone>> {
        let (backend, ctx) = self.route();
        finish("heatmap", backend.name(), backend.heatmap(&ctx).await)
    }

    pub async fn list_digital_identities(&self, filter: DigitalIdentityFilter) -> Envelope<Vec<DigitalIdentity>> {
        let (backend, ctx) = self.route();
        finish(
            "list_digital_identities",
            backend.name(),
            backend.list_digital_identities(&ctx, &filter).await,
        )
    }

    pub async fn get_digital_identity(&self, id: &DigitalId) -> Envelope<DigitalIdentity> {
        let (backend, ctx) = self.route();
        finish("get_digital_identity", backend.name(), backend.get_digital_identity(&ctx, id).await)
    }

    pub async fn verify_digital_identity(&self, id: &DigitalId) -> Envelope<Verification> {
        let (backend, ctx) = self.route();
        finish(
            "verify_digital_identity",
            backend.name(),
            backend.verify_digital_identity(&ctx, id).await,
        )
    }

    pub async fn list_calls(&self, filter: CallFilter) -> Envelope<Vec<OperatorCall>> {
        let (backend, ctx) = self.route();
        finish("list_calls", backend.name(), backend.list_calls(&ctx, &filter).await)
    }

    pub async fn get_call(&self, id: &CallId) -> Envelope<OperatorCall> {
        let (backend, ctx) = self.route();
        finish("get_call", backend.name(), backend.get_call(&ctx, id).await)
    }

    pub async fn accept_call(&self, id: &CallId) -> Envelope<OperatorCall> {
        let (backend, ctx) = self.route();
        finish("accept_call", backend.name(), backend.accept_call(&ctx, id).await)
    }

    pub async fn decline_call(&self, id: &CallId) -> Envelope<OperatorCall> {
        let (backend, ctx) = self.route();
        finish("decline_call", backend.name(), backend.decline_call(&ctx, id).await)
    }

    pub async fn end_call(&self, id: &CallId, notes: Option<&str>) -> Envelope<OperatorCall> {
        let (backend, ctx) = self.route();
        finish("end_call", backend.name(), backend.end_call(&ctx, id, notes).await)
    }

    pub async fn list_audit_entries(&self, filter: AuditFilter) -> Envelope<Vec<AuditEntry>> {
        let (backend, ctx) = self.route();
        finish("list_audit_entries", backend.name(), backend.list_audit_entries(&ctx, &filter).await)
    }

    pub async fn append_audit_entry(&self, entry: NewAuditEntry) -> Envelope<AuditEntry> {
        let (backend, ctx) = self.route();
        finish("append_audit_entry", backend.name(), backend.append_audit_entry(&ctx, entry).await)
    }

    pub async fn list_alerts(&self) -> Envelope<Vec<Alert>> {
        let (backend, ctx) = self.route();
        finish("list_alerts", backend.name(), backend.list_alerts(&ctx).await)
    }
}

fn finish<T>(op: &'static str, backend: &'static str, result: PortalResult<T>) -> Envelope<T> {
    if let Err(e) = &result {
        if e.is_not_found() {
            tracing::debug!(op, backend, error = %e, "data call found nothing");
        } else {
            tracing::warn!(op, backend, code = e.code(), error = %e, "data call failed");
        }
    }
    Envelope::from(result)
}
