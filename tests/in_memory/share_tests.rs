//! Outbound sharing with clipboard fallback and inbound shared content.

use super::helpers::{platform, started};
use letz_client::pwa::adapters::memory::{
    InMemoryPermissionSource, InMemoryPlatform, InMemoryShareTarget,
};
use letz_client::pwa::domain::{NotificationPermission, SharePayload};
use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn invite() -> SharePayload {
    SharePayload::new().with_title("T").with_url("https://x")
}

#[rstest]
#[case(NotificationPermission::Granted, 1)]
#[case(NotificationPermission::Default, 0)]
#[case(NotificationPermission::Denied, 0)]
#[tokio::test]
async fn clipboard_fallback_copies_the_url(
    #[case] permission: NotificationPermission,
    #[case] confirmations: usize,
) {
    let platform =
        InMemoryPlatform::new().with_permissions(InMemoryPermissionSource::with_current(permission));
    let orchestrator = started(&platform).await;

    assert!(orchestrator.share(&invite()).await);

    assert_eq!(platform.clipboard.writes(), ["https://x"]);
    let shown = platform.agent.notifications();
    assert_eq!(shown.len(), confirmations);
    if let Some(confirmation) = shown.first() {
        assert_eq!(confirmation.body.as_deref(), Some("Link copied to clipboard!"));
        assert_eq!(confirmation.tag.as_deref(), Some("clipboard"));
    }
}

#[tokio::test]
async fn native_share_bypasses_the_clipboard() {
    let platform = InMemoryPlatform::new().with_share_target(InMemoryShareTarget::succeeding());
    let orchestrator = started(&platform).await;

    assert!(orchestrator.share(&invite()).await);

    assert_eq!(platform.share.shared(), [invite()]);
    assert!(platform.clipboard.writes().is_empty());
    assert!(orchestrator.supported().share);
}

#[tokio::test]
async fn cancelled_native_share_reports_false() {
    let platform = InMemoryPlatform::new().with_share_target(InMemoryShareTarget::cancelling());
    let orchestrator = started(&platform).await;

    assert!(!orchestrator.share(&invite()).await);
    assert!(platform.clipboard.writes().is_empty());
}

#[rstest]
#[tokio::test]
async fn inbound_share_reaches_listeners(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let received: Arc<Mutex<Vec<SharePayload>>> = Arc::default();
    let sink = Arc::clone(&received);
    let _subscription = orchestrator.on_shared_content(Arc::new(move |payload| {
        sink.lock().expect("share log").push(payload);
    }));

    platform.agent.post_message(json!({
        "type": "SHARED_CONTENT",
        "data": {"title": "Picnic", "url": "https://letz.app/events/picnic"}
    }));
    orchestrator.process_pending_events().await;

    let expected = SharePayload::new()
        .with_title("Picnic")
        .with_url("https://letz.app/events/picnic");
    assert_eq!(*received.lock().expect("share log"), [expected.clone()]);
    assert_eq!(orchestrator.last_shared_content(), Some(expected));
}
