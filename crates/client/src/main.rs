//! Command-line demo of the portal client.
//!
//! Restores the persisted session (signing in the default demo identity when
//! simulated mode has nobody signed in), prints what that identity may see,
//! loads a few resources through the façade and optionally runs the event
//! simulator for `PORTAL_DEMO_TICKS` ticks.

use std::time::Duration;

use portal_client::{BackendMode, ClientConfig, Portal};
use portal_events::EventBus;
use portal_observability::LogFormat;
use portal_operations::IncidentFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    portal_observability::init_with(LogFormat::Pretty, "info");

    let config = ClientConfig::from_env();
    let portal = Portal::open(config).await?;
    let session = portal.session();

    if session.current_mode() == BackendMode::Simulated && !session.is_authenticated() {
        session.set_mode(BackendMode::Simulated).await;
    }

    println!("mode: {}", session.current_mode());
    match session.current_identity() {
        Some(identity) => println!(
            "signed in: {} <{}> as {}",
            identity.name(),
            identity.email(),
            identity.role().label()
        ),
        None => println!("signed in: nobody"),
    }

    println!("navigation:");
    for item in session.visible_navigation() {
        println!("  {:<16} {}", item.title, item.href);
    }

    let incidents = portal.data().list_incidents(IncidentFilter::default()).await;
    match incidents.into_result() {
        Ok(incidents) => {
            println!("incidents: {}", incidents.len());
            for incident in incidents {
                println!("  {} [{:?}] {}", incident.id, incident.status, incident.title);
            }
        }
        Err(e) => println!("incidents unavailable: {e}"),
    }

    let ticks: u32 = std::env::var("PORTAL_DEMO_TICKS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    if ticks > 0 {
        let feed = portal.events().subscribe();
        let interval = portal.config().simulator.interval;
        let handle = portal.start_simulator();
        tokio::time::sleep(interval * ticks + Duration::from_millis(50)).await;
        handle.stop().await;

        for event in feed.drain() {
            println!("event: {} at {}", event.kind(), event.occurred_at);
        }
        println!("simulated events published: {}", portal.events().published_count());
    }

    Ok(())
}
