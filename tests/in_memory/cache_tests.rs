//! Cache clearing, usage estimates and agent cache messages.

use super::helpers::{platform, started};
use letz_client::pwa::adapters::memory::InMemoryPlatform;
use letz_client::pwa::domain::CacheStatus;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn clear_deletes_every_cache_before_reloading(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    assert!(orchestrator.clear_cache().await);

    assert!(platform.caches.cache_names().is_empty());
    assert_eq!(platform.reloader.caches_seen_at_reload(), vec![0]);
    let state = orchestrator.state();
    assert_eq!(state.cache_status, CacheStatus::Cleared);
    assert!(!state.offline_ready);
    assert!(!state.is_loading);
}

#[rstest]
#[tokio::test]
async fn agent_messages_update_cache_status(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    platform.agent.post_message(json!({"type": "OFFLINE_READY"}));
    orchestrator.process_pending_events().await;
    let ready = orchestrator.state();
    assert!(ready.offline_ready);
    assert_eq!(ready.cache_status, CacheStatus::Ready);

    platform.agent.post_message(json!({"type": "CACHE_UPDATED"}));
    orchestrator.process_pending_events().await;
    assert_eq!(orchestrator.state().cache_status, CacheStatus::Updated);
}

#[rstest]
#[tokio::test]
async fn unknown_agent_messages_change_nothing(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let before = orchestrator.state();

    platform.agent.post_message(json!({"type": "PING"}));
    platform.agent.post_message(json!("not an object"));
    let processed = orchestrator.process_pending_events().await;

    assert_eq!(processed, 2);
    assert_eq!(orchestrator.state(), before);
}
