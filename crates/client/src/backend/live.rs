//! HTTP backend for the authority API.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use portal_core::{CallId, DigitalId, IncidentId, PortalError, PortalResult, ZoneId};
use portal_operations::{
    Alert, AuditEntry, AuditFilter, CallFilter, DigitalIdentity, DigitalIdentityFilter, HeatmapZone, Incident,
    IncidentFilter, NewAuditEntry, OperatorCall, Verification, Zone, ZoneFilter,
};

use super::{AuthGrant, Authenticator, Backend, RequestContext};

/// Talks to `{api_url}/api/...`.
///
/// Transport failures and non-success statuses are mapped onto
/// [`PortalError`]; nothing here panics on a bad response.
#[derive(Debug, Clone)]
pub struct LiveBackend {
    client: reqwest::Client,
    api_url: String,
}

impl LiveBackend {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.api_url, path)
    }

    fn get(&self, ctx: &RequestContext, path: &str) -> RequestBuilder {
        authorize(self.client.get(self.url(path)), ctx)
    }

    fn post(&self, ctx: &RequestContext, path: &str) -> RequestBuilder {
        authorize(self.client.post(self.url(path)), ctx)
    }

    /// Send, check the status, decode the body.
    ///
    /// Accepts both a bare payload and a `{success, data, error}` envelope so
    /// either server flavour works.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> PortalResult<T> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!(target = %what, error = %e, "live backend unreachable");
            PortalError::unavailable(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            // Error bodies are optional and may not be JSON.
            let text = resp.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(status_error(status, &body, what));
        }

        let body: Value = if status == StatusCode::NO_CONTENT {
            Value::Null
        } else {
            resp.json()
                .await
                .map_err(|e| PortalError::unavailable(format!("unreadable response for {what}: {e}")))?
        };

        let payload = match body {
            Value::Object(mut map) if map.get("success").is_some_and(Value::is_boolean) => {
                if map.get("success") == Some(&Value::Bool(false)) {
                    let message = message_of(&Value::Object(map)).unwrap_or_else(|| format!("{what} failed"));
                    return Err(PortalError::unavailable(message));
                }
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        serde_json::from_value(payload).map_err(|e| PortalError::unavailable(format!("invalid {what} payload: {e}")))
    }
}

fn authorize(request: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
    match &ctx.token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn message_of(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn status_error(status: StatusCode, body: &Value, what: &str) -> PortalError {
    let code = status.as_u16();
    let detail = message_of(body);
    let message = detail.clone().unwrap_or_else(|| format!("HTTP {code}"));
    match status {
        StatusCode::NOT_FOUND => PortalError::not_found(what.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortalError::permission_denied(message),
        StatusCode::CONFLICT => PortalError::conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => PortalError::validation(message),
        _ => match detail {
            Some(detail) => PortalError::unavailable(format!("HTTP {code}: {detail}")),
            None => PortalError::unavailable(message),
        },
    }
}

/// Statuses from the login endpoint that mean "wrong credentials" rather
/// than a broken or throttled service.
fn rejects_credentials(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY
    )
}

/// Wire label of a lowercase-serialized enum.
fn label<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn push<T: Serialize>(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&T>) {
    if let Some(v) = value.and_then(label) {
        query.push((key, v));
    }
}

fn push_text(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

#[async_trait]
impl Backend for LiveBackend {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn list_incidents(&self, ctx: &RequestContext, filter: &IncidentFilter) -> PortalResult<Vec<Incident>> {
        let mut query = Vec::new();
        push(&mut query, "status", filter.status.as_ref());
        push(&mut query, "priority", filter.priority.as_ref());
        push_text(&mut query, "search", filter.search.as_deref());
        self.send(self.get(ctx, "incidents").query(&query), "incidents").await
    }

    async fn get_incident(&self, ctx: &RequestContext, id: &IncidentId) -> PortalResult<Incident> {
        self.send(self.get(ctx, &format!("incidents/{id}")), &format!("incident {id}"))
            .await
    }

    async fn assign_incident(&self, ctx: &RequestContext, id: &IncidentId, assignee: &str) -> PortalResult<Incident> {
        let request = self
            .post(ctx, &format!("incidents/{id}/assign"))
            .json(&json!({ "assignee": assignee }));
        self.send(request, &format!("incident {id}")).await
    }

    async fn list_zones(&self, ctx: &RequestContext, filter: &ZoneFilter) -> PortalResult<Vec<Zone>> {
        let mut query = Vec::new();
        push(&mut query, "status", filter.status.as_ref());
        push(&mut query, "minRisk", filter.min_risk.as_ref());
        self.send(self.get(ctx, "zones").query(&query), "zones").await
    }

    async fn get_zone(&self, ctx: &RequestContext, id: &ZoneId) -> PortalResult<Zone> {
        self.send(self.get(ctx, &format!("zones/{id}")), &format!("zone {id}")).await
    }

    async fn heatmap(&self, ctx: &RequestContext) -> PortalResult<Vec<HeatmapZone>> {
        self.send(self.get(ctx, "heatmap"), "heatmap").await
    }

    async fn list_digital_identities(
        &self,
        ctx: &RequestContext,
        filter: &DigitalIdentityFilter,
    ) -> PortalResult<Vec<DigitalIdentity>> {
        let mut query = Vec::new();
        push(&mut query, "status", filter.status.as_ref());
        push_text(&mut query, "search", filter.search.as_deref());
        self.send(self.get(ctx, "digital-ids").query(&query), "digital IDs").await
    }

    async fn get_digital_identity(&self, ctx: &RequestContext, id: &DigitalId) -> PortalResult<DigitalIdentity> {
        self.send(self.get(ctx, &format!("digital-ids/{id}")), &format!("digital ID {id}"))
            .await
    }

    async fn verify_digital_identity(&self, ctx: &RequestContext, id: &DigitalId) -> PortalResult<Verification> {
        self.send(self.post(ctx, &format!("digital-ids/{id}/verify")), &format!("digital ID {id}"))
            .await
    }

    async fn list_calls(&self, ctx: &RequestContext, filter: &CallFilter) -> PortalResult<Vec<OperatorCall>> {
        let mut query = Vec::new();
        push(&mut query, "status", filter.status.as_ref());
        self.send(self.get(ctx, "calls").query(&query), "calls").await
    }

    async fn get_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        self.send(self.get(ctx, &format!("calls/{id}")), &format!("call {id}")).await
    }

    async fn accept_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        let body = match &ctx.actor {
            Some(actor) => json!({ "operatorId": actor.id, "operatorName": actor.name }),
            None => json!({}),
        };
        let request = self.post(ctx, &format!("calls/{id}/accept")).json(&body);
        self.send(request, &format!("call {id}")).await
    }

    async fn decline_call(&self, ctx: &RequestContext, id: &CallId) -> PortalResult<OperatorCall> {
        self.send(self.post(ctx, &format!("calls/{id}/decline")), &format!("call {id}"))
            .await
    }

    async fn end_call(&self, ctx: &RequestContext, id: &CallId, notes: Option<&str>) -> PortalResult<OperatorCall> {
        let request = self.post(ctx, &format!("calls/{id}/end")).json(&json!({ "notes": notes }));
        self.send(request, &format!("call {id}")).await
    }

    async fn list_audit_entries(&self, ctx: &RequestContext, filter: &AuditFilter) -> PortalResult<Vec<AuditEntry>> {
        let mut query = Vec::new();
        push_text(&mut query, "action", filter.action.as_deref());
        push(&mut query, "status", filter.status.as_ref());
        push_text(&mut query, "user", filter.user.as_deref());
        self.send(self.get(ctx, "audit").query(&query), "audit entries").await
    }

    async fn append_audit_entry(&self, ctx: &RequestContext, entry: NewAuditEntry) -> PortalResult<AuditEntry> {
        entry.validate()?;
        self.send(self.post(ctx, "audit").json(&entry), "audit entry").await
    }

    async fn list_alerts(&self, ctx: &RequestContext) -> PortalResult<Vec<Alert>> {
        self.send(self.get(ctx, "alerts"), "alerts").await
    }
}

#[async_trait]
impl Authenticator for LiveBackend {
    async fn authenticate(&self, identifier: &str, secret: &str) -> PortalResult<AuthGrant> {
        let resp = self
            .client
            .post(self.url("login"))
            .json(&json!({ "email": identifier, "password": secret }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "login service unreachable");
                PortalError::unavailable(e.to_string())
            })?;

        let status = resp.status();
        if rejects_credentials(status) {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            tracing::debug!(
                status = status.as_u16(),
                message = message_of(&body).as_deref().unwrap_or(""),
                "login rejected by backend"
            );
            return Err(PortalError::AuthenticationRejected);
        }
        if !status.is_success() {
            return Err(PortalError::unavailable(format!("login failed with HTTP {}", status.as_u16())));
        }

        resp.json::<AuthGrant>()
            .await
            .map_err(|e| PortalError::unavailable(format!("invalid login response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_operations::{IncidentStatus, Priority};

    #[test]
    fn enum_labels_match_the_wire() {
        assert_eq!(label(&IncidentStatus::Dispatched).as_deref(), Some("dispatched"));
        assert_eq!(label(&Priority::High).as_deref(), Some("high"));
    }

    #[test]
    fn empty_search_terms_are_not_sent() {
        let mut query = Vec::new();
        push_text(&mut query, "search", Some("  "));
        push_text(&mut query, "user", Some("Dispatcher Kumar"));
        assert_eq!(query, vec![("user", "Dispatcher Kumar".to_string())]);
    }

    #[test]
    fn statuses_map_onto_portal_errors() {
        let body = json!({ "message": "nope" });
        assert!(status_error(StatusCode::NOT_FOUND, &body, "incident X").is_not_found());
        assert_eq!(status_error(StatusCode::FORBIDDEN, &body, "x").code(), "permission_denied");
        assert_eq!(status_error(StatusCode::CONFLICT, &body, "x").code(), "conflict");
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, &Value::Null, "x"),
            PortalError::unavailable("HTTP 502")
        );
    }

    #[test]
    fn only_credential_statuses_reject_a_login() {
        assert!(rejects_credentials(StatusCode::UNAUTHORIZED));
        assert!(rejects_credentials(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!rejects_credentials(StatusCode::NOT_FOUND));
        assert!(!rejects_credentials(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(LiveBackend::new("http://host:8001/").url("login"), "http://host:8001/api/login");
    }
}
