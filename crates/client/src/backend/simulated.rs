use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use portal_core::{CallId, Clock, DigitalId, IncidentId, PortalError, PortalResult, ZoneId};
use portal_operations::{
    Alert, AuditEntry, AuditFilter, CallFilter, DigitalIdentity, DigitalIdentityFilter, HeatmapZone, Incident,
    IncidentFilter, NewAuditEntry, OperatorCall, Verification, Zone, ZoneFilter,
};

use super::{Backend, Fixtures, RequestContext};
use crate::config::DEFAULT_SIMULATED_DELAY_MS;

/// In-process backend over [`Fixtures`], with an artificial per-call delay
/// (500ms unless overridden).
///
/// Mutations (assignment, verification, call transitions, audit appends)
/// apply to the fixtures and are visible to later reads through the same
/// instance.
pub struct SimulatedBackend {
    fixtures: Mutex<Fixtures>,
    delay: Duration,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub fn new(fixtures: Fixtures, clock: Arc<dyn Clock>) -> Self {
        Self {
            fixtures: Mutex::new(fixtures),
            delay: Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS),
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Demo fixtures stamped relative to the clock's current time.
    pub fn demo(clock: Arc<dyn Clock>) -> Self {
        let fixtures = Fixtures::demo(clock.now());
        Self::new(fixtures, clock)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn fixtures(&self) -> MutexGuard<'_, Fixtures> {
        self.fixtures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transaction_id(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let suffix: String = (&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        format!("TX-{suffix}")
    }
}

fn find<'a, T>(items: &'a [T], key: impl Fn(&T) -> bool, what: impl FnOnce() -> String) -> PortalResult<&'a T> {
    items.iter().find(|item| key(item)).ok_or_else(|| PortalError::not_found(what()))
}

fn find_mut<'a, T>(
    items: &'a mut [T],
    key: impl Fn(&T) -> bool,
    what: impl FnOnce() -> String,
) -> PortalResult<&'a mut T> {
    items.iter_mut().find(|item| key(item)).ok_or_else(|| PortalError::not_found(what()))
}

#[async_trait]
impl Backend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn list_incidents(&self, _ctx: &RequestContext, filter: &IncidentFilter) -> PortalResult<Vec<Incident>> {
        self.pause().await;
        Ok(self.fixtures().incidents.iter().filter(|i| filter.matches(i)).cloned().collect())
    }

    async fn get_incident(&self, _ctx: &RequestContext, id: &IncidentId) -> PortalResult<Incident> {
        self.pause().await;
        let fx = self.fixtures();
        find(&fx.incidents, |i| &i.id == id, || format!("incident {id}")).cloned()
    }

    async fn assign_incident(&self, _ctx: &RequestContext, id: &IncidentId, assignee: &str) -> PortalResult<Incident> {
        self.pause().await;
        let now = self.clock.now();
        let mut fx = self.fixtures();
        let incident = find_mut(&mut fx.incidents, |i| &i.id == id, || format!("incident {id}"))?;
        incident.assign(assignee, now)?;
        tracing::info!(incident = %id, assignee = %assignee.trim(), "incident assigned");
        Ok(incident.clone())
    }

    async fn list_zones(&self, _ctx: &RequestContext, filter: &ZoneFilter) -> PortalResult<Vec<Zone>> {
        self.pause().await;
        Ok(self.fixtures().zones.iter().filter(|z| filter.matches(z)).cloned().collect())
    }

    async fn get_zone(&self, _ctx: &RequestContext, id: &ZoneId) -> PortalResult<Zone> {
        self.pause().await;
        let fx = self.fixtures();
        find(&fx.zones, |z| &z.id == id, || format!("zone {id}")).cloned()
    }

    async fn heatmap(&self, _ctx: &RequestContext) -> PortalResult<Vec<HeatmapZone>> {
        self.pause().await;
        Ok(self.fixtures().zones.iter().map(Zone::heatmap_view).collect())
    }

    async fn list_digital_identities(
        &self,
        _ctx: &RequestContext,
        filter: &DigitalIdentityFilter,
    ) -> PortalResult<Vec<DigitalIdentity>> {
        self.pause().await;
        Ok(self
            .fixtures()
            .digital_identities
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn get_digital_identity(&self, _ctx: &RequestContext, id: &DigitalId) -> PortalResult<DigitalIdentity> {
        self.pause().await;
        let fx = self.fixtures();
        find(&fx.digital_identities, |d| &d.digital_id == id, || format!("digital ID {id}")).cloned()
    }

    async fn verify_digital_identity(&self, _ctx: &RequestContext, id: &DigitalId) -> PortalResult<Verification> {
        self.pause().await;
        let now = self.clock.now();
        let transaction_id = self.transaction_id();
        let mut fx = self.fixtures();
        let record = find_mut(&mut fx.digital_identities, |d| &d.digital_id == id, || format!("digital ID {id}"))?;
        let receipt = record.record_verification(transaction_id, now);
        tracing::info!(
            digital_id = %id,
            transaction_id = %receipt.transaction_id,
            count = receipt.verification_count,
            "digital ID verified"
        );
        Ok(Verification {
            identity: record.clone(),
            receipt,
        })
    }

    async fn list_calls(&self, _ctx: &RequestContext, filter: &CallFilter) -> PortalResult<Vec<OperatorCall>> {
        self.pause().await;
        Ok(self.fixtures().calls.iter().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn get_call(&self, _ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        self.pause().await;
        let fx = self.fixtures();
        find(&fx.calls, |c| &c.id == id, || format!("call {id}")).cloned()
    }

    async fn accept_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        self.pause().await;
        let actor = ctx
            .actor
            .as_ref()
            .ok_or_else(|| PortalError::permission_denied("accepting a call requires a signed-in operator"))?;
        let mut fx = self.fixtures();
        let call = find_mut(&mut fx.calls, |c| &c.id == id, || format!("call {id}"))?;
        call.accept(actor.id.as_str(), &actor.name)?;
        tracing::info!(call = %id, operator = %actor.id, "call accepted");
        Ok(call.clone())
    }

    async fn decline_call(&self, _ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        self.pause().await;
        let mut fx = self.fixtures();
        let call = find_mut(&mut fx.calls, |c| &c.id == id, || format!("call {id}"))?;
        call.decline()?;
        tracing::info!(call = %id, "call declined");
        Ok(call.clone())
    }

    async fn end_call(&self, _ctx: &RequestContext, id: &CallId, notes: Option<&str>) -> PortalResult<OperatorCall> {
        self.pause().await;
        let now = self.clock.now();
        let mut fx = self.fixtures();
        let call = find_mut(&mut fx.calls, |c| &c.id == id, || format!("call {id}"))?;
        call.end(notes, now)?;
        tracing::info!(call = %id, duration = ?call.duration, "call ended");
        Ok(call.clone())
    }

    async fn list_audit_entries(&self, _ctx: &RequestContext, filter: &AuditFilter) -> PortalResult<Vec<AuditEntry>> {
        self.pause().await;
        Ok(self
            .fixtures()
            .audit_entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn append_audit_entry(&self, _ctx: &RequestContext, entry: NewAuditEntry) -> PortalResult<AuditEntry> {
        self.pause().await;
        let now = self.clock.now();
        let mut fx = self.fixtures();
        let entry = entry.into_entry(fx.next_audit_id(), now)?;
        fx.audit_entries.push(entry.clone());
        tracing::info!(audit = %entry.id, action = %entry.action, "audit entry appended");
        Ok(entry)
    }

    async fn list_alerts(&self, _ctx: &RequestContext) -> PortalResult<Vec<Alert>> {
        self.pause().await;
        Ok(self.fixtures().alerts.clone())
    }
}
