//! Background agent registration, update and removal.

use super::helpers::{platform, started};
use letz_client::pwa::adapters::memory::{InMemoryAgentRuntime, InMemoryPlatform};
use letz_client::pwa::domain::AgentLifecycleState;
use rstest::rstest;

#[rstest]
#[case(InMemoryAgentRuntime::new(), true)]
#[case(InMemoryAgentRuntime::new().without_background_sync(), false)]
#[tokio::test]
async fn failed_registration_keeps_capabilities_and_disables_sync(
    #[case] runtime: InMemoryAgentRuntime,
    #[case] background_sync: bool,
) {
    let platform =
        InMemoryPlatform::new().with_agent(runtime.with_registration_failure("script 404"));
    let orchestrator = started(&platform).await;

    let state = orchestrator.state();
    assert_eq!(state.agent_state, AgentLifecycleState::Failed);
    assert!(state.is_supported.agent);
    assert_eq!(state.is_supported.background_sync, background_sync);
    assert_eq!(orchestrator.schedule_reconciliation().await, 0);
    assert_eq!(platform.agent.sync_requests(), 0);
}

#[tokio::test]
async fn update_retries_a_failed_registration() {
    let platform = InMemoryPlatform::new()
        .with_agent(InMemoryAgentRuntime::new().with_registration_failure("offline"));
    let orchestrator = started(&platform).await;

    platform.agent.clear_registration_failure();
    let state = orchestrator.update().await;

    assert_eq!(state, AgentLifecycleState::Active);
    assert_eq!(platform.agent.registration_options().len(), 2);
    assert_eq!(platform.agent.sync_requests(), 2);
}

#[tokio::test]
async fn unsupported_runtime_leaves_agent_unregistered() {
    let platform = InMemoryPlatform::new().with_agent(InMemoryAgentRuntime::unsupported());
    let orchestrator = started(&platform).await;

    let state = orchestrator.state();
    assert_eq!(state.agent_state, AgentLifecycleState::Unregistered);
    assert!(!state.is_supported.agent);
    assert!(platform.agent.registration_options().is_empty());
}

#[rstest]
#[tokio::test]
async fn installed_update_waits_for_the_update_command(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let first = platform.agent.active_handle().expect("registered handle");

    platform.agent.install_update();
    orchestrator.process_pending_events().await;
    assert_eq!(orchestrator.agent_state(), AgentLifecycleState::UpdateAvailable);

    assert_eq!(orchestrator.update().await, AgentLifecycleState::Active);
    let second = platform.agent.active_handle().expect("activated handle");
    assert_eq!(second.generation(), first.generation() + 1);
}

#[rstest]
#[tokio::test]
async fn update_on_an_active_agent_checks_for_a_new_version(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    orchestrator.update().await;

    assert_eq!(platform.agent.update_checks(), 1);
    assert_eq!(orchestrator.agent_state(), AgentLifecycleState::Active);
}

#[rstest]
#[tokio::test]
async fn unregistering_disables_reconciliation(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    assert!(orchestrator.unregister_agent().await);

    assert_eq!(orchestrator.agent_state(), AgentLifecycleState::Unregistered);
    assert_eq!(orchestrator.schedule_reconciliation().await, 0);
    assert!(!orchestrator.unregister_agent().await);
}
