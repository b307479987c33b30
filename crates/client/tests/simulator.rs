use std::sync::Arc;
use std::time::Duration;

use portal_client::{BackendMode, ClientConfig, EventSimulator, Portal, SimulatorConfig};
use portal_core::{Clock, ManualClock};
use portal_events::{EventBus, InMemoryEventBus, PortalEvent};

fn portal(simulator: SimulatorConfig) -> Portal {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
    Portal::builder(ClientConfig::default().with_simulator(simulator))
        .clock(clock)
        .build()
}

#[tokio::test]
async fn tick_publishes_in_simulated_mode() {
    let portal = portal(SimulatorConfig::always().with_seed(3));
    let feed = portal.subscribe();

    let event = portal.simulator().tick().expect("probability 1 always fires");
    assert_eq!(feed.drain(), vec![event]);
}

#[tokio::test]
async fn tick_is_silent_in_live_mode() {
    let portal = portal(SimulatorConfig::always());
    portal.session().set_mode(BackendMode::Live).await;
    let feed = portal.subscribe();

    for _ in 0..20 {
        assert!(portal.simulator().tick().is_none());
    }
    assert!(feed.drain().is_empty());
}

#[tokio::test]
async fn zero_probability_never_fires() {
    let portal = portal(SimulatorConfig {
        probability: 0.0,
        ..SimulatorConfig::default()
    });
    let feed = portal.subscribe();

    for _ in 0..50 {
        assert!(portal.simulator().tick().is_none());
    }
    assert!(feed.drain().is_empty());
}

#[tokio::test]
async fn seeded_simulators_agree() {
    let a = portal(SimulatorConfig::always().with_seed(11));
    let b = portal(SimulatorConfig::always().with_seed(11));

    for _ in 0..10 {
        let ea = a.simulator().tick().unwrap();
        let eb = b.simulator().tick().unwrap();
        assert_eq!(ea.payload, eb.payload);
    }
}

#[tokio::test(start_paused = true)]
async fn background_task_ticks_until_stopped() {
    let portal = portal(SimulatorConfig::always().with_interval(Duration::from_secs(15)));
    let feed = portal.subscribe();

    let handle = portal.start_simulator();
    tokio::time::sleep(Duration::from_secs(46)).await;
    handle.stop().await;

    assert_eq!(feed.drain().len(), 3);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(feed.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_task() {
    let portal = portal(SimulatorConfig::always().with_interval(Duration::from_secs(1)));
    let feed = portal.subscribe();

    drop(portal.start_simulator());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(feed.drain().is_empty());
}

#[tokio::test]
async fn simulator_can_share_an_external_bus() {
    let portal = portal(SimulatorConfig::always());
    let bus = Arc::new(InMemoryEventBus::<PortalEvent>::new());
    let feed = bus.subscribe();

    let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
    let simulator = EventSimulator::new(portal.session().clone(), bus.clone(), clock, SimulatorConfig::always());
    simulator.tick().unwrap();

    assert_eq!(feed.drain().len(), 1);
    assert_eq!(bus.subscriber_count(), 1);
}
