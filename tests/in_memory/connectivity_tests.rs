//! Reachability tracking and reconnect reconciliation.

use super::helpers::{platform, started};
use letz_client::pwa::adapters::memory::InMemoryPlatform;
use letz_client::pwa::domain::{ConnectivityState, ConnectivityTransition};
use rstest::rstest;
use std::sync::{Arc, Mutex};

const SYNC_TAG_COUNT: usize = 2;

#[rstest]
#[tokio::test]
async fn reconnects_schedule_one_reconciliation_each(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let at_start = platform.agent.sync_requests();
    assert_eq!(at_start, SYNC_TAG_COUNT);

    for _ in 0..3 {
        platform.connectivity.go_offline();
        platform.connectivity.go_online();
    }
    orchestrator.process_pending_events().await;

    assert!(orchestrator.state().is_online);
    assert_eq!(
        platform.agent.sync_requests(),
        at_start + 3 * SYNC_TAG_COUNT
    );
}

#[rstest]
#[case(&[false], false)]
#[case(&[false, true, false], false)]
#[case(&[true, true, false, false, true], true)]
#[tokio::test]
async fn online_flag_follows_last_delivered_transition(
    platform: InMemoryPlatform,
    #[case] deliveries: &[bool],
    #[case] expected: bool,
) {
    let orchestrator = started(&platform).await;

    for &online in deliveries {
        platform
            .connectivity
            .deliver(ConnectivityState::from_flag(online));
    }
    orchestrator.process_pending_events().await;

    assert_eq!(orchestrator.state().is_online, expected);
}

#[rstest]
#[tokio::test]
async fn duplicate_deliveries_do_not_reconcile(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let at_start = platform.agent.sync_requests();

    platform.connectivity.go_online();
    platform.connectivity.go_online();
    orchestrator.process_pending_events().await;

    assert_eq!(platform.agent.sync_requests(), at_start);
}

#[rstest]
#[tokio::test]
async fn transition_listeners_see_changes_only(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let seen: Arc<Mutex<Vec<ConnectivityTransition>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let _subscription = orchestrator.on_connectivity_change(Arc::new(move |transition| {
        sink.lock().expect("transition log").push(transition);
    }));

    platform.connectivity.go_offline();
    platform.connectivity.go_offline();
    platform.connectivity.go_online();
    orchestrator.process_pending_events().await;

    let seen = seen.lock().expect("transition log");
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].is_reconnect());
    assert!(seen[1].is_reconnect());
}

#[rstest]
#[tokio::test]
async fn shutdown_stops_forwarding_platform_events(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    orchestrator.shutdown();
    platform.connectivity.go_offline();

    assert_eq!(orchestrator.process_pending_events().await, 0);
    assert!(orchestrator.state().is_online);
}
