//! Notification consent, push subscription and display routing.

use super::helpers::{orchestrator, platform, started};
use letz_client::pwa::adapters::memory::{InMemoryPermissionSource, InMemoryPlatform};
use letz_client::pwa::domain::{NotificationOptions, NotificationPermission};
use rstest::rstest;

#[tokio::test]
async fn denial_is_never_prompted_again() {
    let platform = InMemoryPlatform::new()
        .with_permissions(InMemoryPermissionSource::answering(NotificationPermission::Denied));
    let orchestrator = started(&platform).await;

    assert!(!orchestrator.request_notification_permission().await);
    assert!(!orchestrator.request_notification_permission().await);
    assert!(!orchestrator.request_notification_permission().await);

    assert_eq!(platform.permissions.prompts(), 1);
    assert_eq!(
        orchestrator.state().notification_permission,
        NotificationPermission::Denied
    );
}

#[tokio::test]
async fn denial_from_settings_skips_the_prompt() {
    let platform = InMemoryPlatform::new()
        .with_permissions(InMemoryPermissionSource::with_current(NotificationPermission::Denied));
    let orchestrator = started(&platform).await;

    assert!(!orchestrator.request_notification_permission().await);
    assert_eq!(platform.permissions.prompts(), 0);
}

#[rstest]
#[tokio::test]
async fn repeated_grants_subscribe_to_push_once(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    assert!(orchestrator.request_notification_permission().await);
    assert!(orchestrator.request_notification_permission().await);
    assert!(orchestrator.request_notification_permission().await);

    assert_eq!(platform.permissions.prompts(), 1);
    assert_eq!(platform.agent.push_subscribe_calls(), 1);
    assert_eq!(platform.push_api.registered().len(), 1);
    assert!(orchestrator.push_subscription().is_some());
}

#[tokio::test]
async fn prior_grant_subscribes_once_the_agent_is_active() {
    let platform = InMemoryPlatform::new()
        .with_permissions(InMemoryPermissionSource::with_current(NotificationPermission::Granted));
    let orchestrator = orchestrator(&platform);
    assert_eq!(platform.agent.push_subscribe_calls(), 0);

    orchestrator.start().await;
    assert!(orchestrator.request_notification_permission().await);

    assert_eq!(platform.agent.push_subscribe_calls(), 1);
    assert_eq!(platform.permissions.prompts(), 0);
}

#[rstest]
#[tokio::test]
async fn remote_api_failure_keeps_the_subscription(platform: InMemoryPlatform) {
    platform.push_api.fail_requests();
    let orchestrator = started(&platform).await;

    orchestrator.request_notification_permission().await;

    assert!(orchestrator.push_subscription().is_some());
    assert!(platform.push_api.registered().is_empty());
}

#[rstest]
#[tokio::test]
async fn unsubscribe_clears_and_reports_the_endpoint(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    orchestrator.request_notification_permission().await;
    let endpoint = orchestrator
        .push_subscription()
        .expect("subscription after grant")
        .endpoint()
        .to_owned();

    assert!(orchestrator.unsubscribe_push().await);

    assert!(orchestrator.push_subscription().is_none());
    assert_eq!(platform.push_api.unregistered(), vec![endpoint]);
}

#[rstest]
#[tokio::test]
async fn notifications_need_permission_and_route_through_the_agent(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let reminder = NotificationOptions::new().with_body("Doors open at eight.");

    assert!(!orchestrator.notify("Rooftop party", reminder.clone()).await);
    orchestrator.request_notification_permission().await;
    assert!(orchestrator.notify("Rooftop party", reminder).await);

    let shown = platform.agent.notifications();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Rooftop party");
    assert_eq!(shown[0].body.as_deref(), Some("Doors open at eight."));
    assert!(platform.surface.shown().is_empty());
}

#[tokio::test]
async fn update_notification_offers_update_and_later() {
    let platform = InMemoryPlatform::new()
        .with_permissions(InMemoryPermissionSource::with_current(NotificationPermission::Granted));
    let orchestrator = started(&platform).await;

    platform.agent.install_update();
    orchestrator.process_pending_events().await;

    let shown = platform.agent.notifications();
    let update = shown.last().expect("update notification");
    assert_eq!(update.title, "LETZ Updated!");
    assert_eq!(update.tag.as_deref(), Some("app-update"));
    assert!(update.require_interaction);
    let actions: Vec<&str> = update.actions.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(actions, ["update", "later"]);
}
