//! Deferred reconciliation through background sync.

use super::helpers::{orchestrator, platform, started};
use letz_client::pwa::adapters::memory::{InMemoryAgentRuntime, InMemoryPlatform};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn repeated_reconciliation_registers_the_same_tags(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let tags_after_start = platform.agent.pending_sync_tags();

    assert_eq!(orchestrator.schedule_reconciliation().await, 2);
    assert_eq!(orchestrator.schedule_reconciliation().await, 2);

    assert_eq!(platform.agent.pending_sync_tags(), tags_after_start);
    assert_eq!(
        platform.agent.pending_sync_tags(),
        ["send-messages", "sync-events"]
    );
}

#[rstest]
#[tokio::test]
async fn reconciliation_waits_for_an_agent(platform: InMemoryPlatform) {
    let orchestrator = orchestrator(&platform);

    assert_eq!(orchestrator.schedule_reconciliation().await, 0);
    assert_eq!(platform.agent.sync_requests(), 0);
}

#[tokio::test]
async fn missing_background_sync_skips_reconciliation() {
    let platform =
        InMemoryPlatform::new().with_agent(InMemoryAgentRuntime::new().without_background_sync());
    let orchestrator = started(&platform).await;

    assert_eq!(orchestrator.schedule_reconciliation().await, 0);
    assert!(!orchestrator.supported().background_sync);
    assert!(platform.agent.pending_sync_tags().is_empty());
}
