use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use portal_auth::Role;
use portal_client::{BackendMode, ClientConfig, Portal};
use portal_core::{CallId, DigitalId, IncidentId, PortalError};
use portal_operations::{IncidentFilter, IncidentStatus, ZoneFilter};

const TOKEN: &str = "tkn-123";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/incidents", get(list_incidents))
            .route("/api/incidents/:id", get(missing_incident))
            .route("/api/zones", get(list_zones))
            .route("/api/digital-ids/:id", get(|| async { StatusCode::NOT_FOUND }))
            .route("/api/alerts", get(|| async { StatusCode::FORBIDDEN }))
            .route("/api/calls/:id/accept", post(accept_call));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "busy@city.gov" {
        return (StatusCode::TOO_MANY_REQUESTS, Json(json!({ "message": "slow down" })));
    }
    if body["email"] == "officer@city.gov" && body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({
                "user": {
                    "id": "u-1",
                    "email": "officer@city.gov",
                    "role": "police",
                    "name": "Officer Live",
                    "badge": "POL900",
                    "permissions": ["incidents.read"]
                },
                "token": TOKEN
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn list_incidents(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "missing token" })));
    }
    let status = query.get("status").cloned().unwrap_or_else(|| "reported".to_string());
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [{
                "id": "INC-LIVE-1",
                "title": "Lost passport",
                "description": "Tourist lost passport near the museum",
                "type": "other",
                "priority": "low",
                "status": status,
                "location": "National Museum",
                "coordinates": { "lat": 28.6118, "lng": 77.2194 },
                "reportedBy": "Front desk",
                "reportedAt": "2024-06-01T09:00:00Z"
            }]
        })),
    )
}

async fn missing_incident(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("no incident {id}") })))
}

async fn list_zones() -> Json<Value> {
    Json(json!([]))
}

async fn accept_call(Path(id): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let operator = body["operatorId"].as_str().unwrap_or("nobody").to_string();
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": format!("call {id} is already active, {operator} cannot take it") })),
    )
}

async fn live_portal(server: &TestServer) -> Portal {
    let portal = Portal::builder(ClientConfig::default().with_api_url(server.base_url.clone())).build();
    portal.session().set_mode(BackendMode::Live).await;
    portal
}

#[tokio::test]
async fn live_login_installs_the_backend_identity_and_token() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;

    let identity = portal.session().login("officer@city.gov", "pw").await.unwrap();
    assert_eq!(identity.role(), Role::Police);
    assert_eq!(identity.badge(), Some("POL900"));
    assert_eq!(portal.session().token().as_deref(), Some(TOKEN));
    assert!(portal.session().allows("incidents.read"));
}

#[tokio::test]
async fn live_login_rejection_is_generic() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;

    let err = portal.session().login("officer@city.gov", "wrong").await.unwrap_err();
    assert_eq!(err, PortalError::AuthenticationRejected);
    assert!(portal.session().current_identity().is_none());
}

#[tokio::test]
async fn live_calls_carry_the_bearer_token_and_unwrap_envelopes() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;

    let denied = portal.data().list_incidents(IncidentFilter::default()).await;
    assert!(!denied.success);
    assert!(denied.error.unwrap().starts_with("permission denied"));

    portal.session().login("officer@city.gov", "pw").await.unwrap();
    let incidents = portal
        .data()
        .list_incidents(IncidentFilter::status(IncidentStatus::Dispatched))
        .await
        .into_result()
        .unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].status, IncidentStatus::Dispatched);

    let zones = portal.data().list_zones(ZoneFilter::default()).await.into_result().unwrap();
    assert!(zones.is_empty());
}

#[tokio::test]
async fn live_statuses_map_onto_envelope_errors() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;
    portal.session().login("officer@city.gov", "pw").await.unwrap();

    let missing = portal.data().get_incident(&IncidentId::new("INC-0")).await;
    assert_eq!(missing.error.as_deref(), Some("incident INC-0 not found"));

    let conflict = portal.data().accept_call(&CallId::new("CALL-9")).await;
    assert!(!conflict.success);
    assert_eq!(
        conflict.error.as_deref(),
        Some("conflict: call CALL-9 is already active, u-1 cannot take it")
    );
}

#[tokio::test]
async fn bodiless_error_statuses_keep_their_meaning() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;
    portal.session().login("officer@city.gov", "pw").await.unwrap();

    let missing = portal.data().get_digital_identity(&DigitalId::new("DID-00000")).await;
    assert!(!missing.success);
    assert_eq!(missing.error.as_deref(), Some("digital ID DID-00000 not found"));

    let forbidden = portal.data().list_alerts().await;
    assert_eq!(forbidden.error.as_deref(), Some("permission denied: HTTP 403"));
}

#[tokio::test]
async fn throttled_login_is_not_reported_as_bad_credentials() {
    let server = TestServer::spawn().await;
    let portal = live_portal(&server).await;

    let err = portal.session().login("busy@city.gov", "pw").await.unwrap_err();
    assert_eq!(err, PortalError::unavailable("login failed with HTTP 429"));
    assert!(portal.session().current_identity().is_none());
}
