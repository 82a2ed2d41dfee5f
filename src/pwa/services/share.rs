//! Outbound sharing with clipboard fallback, and inbound shared content.

use super::NotificationAuthority;
use crate::pwa::{
    domain::{NotificationOptions, SharePayload},
    listeners::{Listener, ListenerSet, Subscription},
    ports::{Clipboard, ShareError, ShareTarget},
};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

const CLIPBOARD_CONFIRMATION: &str = "Link copied to clipboard!";
const CLIPBOARD_TAG: &str = "clipboard";

/// Routes share requests to the native surface or the clipboard.
pub struct SharingBridge {
    target: Arc<dyn ShareTarget>,
    clipboard: Arc<dyn Clipboard>,
    notifications: Arc<NotificationAuthority>,
    app_name: String,
    inbound: ListenerSet<SharePayload>,
    last_inbound: RwLock<Option<SharePayload>>,
}

impl SharingBridge {
    /// Creates a bridge whose clipboard confirmations carry `app_name`.
    #[must_use]
    pub fn new(
        target: Arc<dyn ShareTarget>,
        clipboard: Arc<dyn Clipboard>,
        notifications: Arc<NotificationAuthority>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            target,
            clipboard,
            notifications,
            app_name: app_name.into(),
            inbound: ListenerSet::new(),
            last_inbound: RwLock::new(None),
        }
    }

    /// Reports whether a native share surface exists.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.target.is_supported()
    }

    /// Shares `payload`.
    ///
    /// Uses the native surface when present. A cancelled share returns
    /// `false` quietly; a failed one is logged. Without a native surface the
    /// URL, else the text, goes to the clipboard.
    pub async fn share(&self, payload: &SharePayload) -> bool {
        if self.target.is_supported() {
            return match self.target.share(payload).await {
                Ok(()) => {
                    info!("content shared");
                    true
                }
                Err(ShareError::Cancelled) => {
                    debug!("share cancelled by user");
                    false
                }
                Err(err) => {
                    error!(error = %err, "native share failed");
                    false
                }
            };
        }

        match payload.clipboard_text() {
            Some(text) => self.copy_to_clipboard(text).await,
            None => {
                debug!("nothing to copy from share payload");
                false
            }
        }
    }

    /// Writes `text` to the clipboard and confirms with a notification.
    ///
    /// The confirmation is skipped silently without notification permission.
    pub async fn copy_to_clipboard(&self, text: &str) -> bool {
        if let Err(err) = self.clipboard.write_text(text).await {
            error!(error = %err, "clipboard write failed");
            return false;
        }

        let confirmation = NotificationOptions::new()
            .with_body(CLIPBOARD_CONFIRMATION)
            .with_tag(CLIPBOARD_TAG);
        self.notifications
            .notify(self.app_name.as_str(), confirmation)
            .await;
        true
    }

    /// Delivers content shared into the app to every listener.
    pub fn receive_shared(&self, payload: SharePayload) {
        info!(
            has_url = payload.url().is_some(),
            has_text = payload.text().is_some(),
            "shared content received"
        );
        *self
            .last_inbound
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(payload.clone());
        self.inbound.emit(&payload);
    }

    /// Registers a listener for inbound shared content.
    pub fn on_shared_content(&self, listener: Listener<SharePayload>) -> Subscription {
        self.inbound.add(listener)
    }

    /// Returns the most recent inbound share.
    #[must_use]
    pub fn last_shared_content(&self) -> Option<SharePayload> {
        self.last_inbound
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pwa::adapters::memory::{
        InMemoryAgentRuntime, InMemoryClipboard, InMemoryPermissionSource,
        InMemoryPushSubscriptionApi, InMemoryShareTarget, RecordingNotificationSurface,
    };
    use crate::pwa::domain::NotificationPermission;
    use crate::pwa::services::AgentHandleReader;
    use mockable::DefaultClock;
    use rstest::rstest;
    use std::sync::Mutex;

    struct Harness {
        target: Arc<InMemoryShareTarget>,
        clipboard: Arc<InMemoryClipboard>,
        surface: Arc<RecordingNotificationSurface>,
        bridge: SharingBridge,
    }

    fn harness(target: InMemoryShareTarget, permission: NotificationPermission) -> Harness {
        let target = Arc::new(target);
        let clipboard = Arc::new(InMemoryClipboard::new());
        let surface = Arc::new(RecordingNotificationSurface::new());
        let notifications = Arc::new(NotificationAuthority::new(
            Arc::new(InMemoryPermissionSource::with_current(permission)),
            surface.clone(),
            Arc::new(InMemoryAgentRuntime::new()),
            Arc::new(InMemoryPushSubscriptionApi::new()),
            AgentHandleReader::default(),
            Arc::new(DefaultClock),
        ));
        let bridge = SharingBridge::new(target.clone(), clipboard.clone(), notifications, "LETZ");
        Harness {
            target,
            clipboard,
            surface,
            bridge,
        }
    }

    fn party_link() -> SharePayload {
        SharePayload::new().with_title("T").with_url("https://x")
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn fallback_copies_url_and_confirms_with_permission() {
        let harness = harness(InMemoryShareTarget::unsupported(), NotificationPermission::Granted);

        assert!(harness.bridge.share(&party_link()).await);

        assert_eq!(harness.clipboard.writes(), vec!["https://x".to_owned()]);
        let shown = harness.surface.shown();
        assert_eq!(shown.len(), 1);
        let confirmation = shown.first().expect("confirmation shown");
        assert_eq!(confirmation.title, "LETZ");
        assert_eq!(confirmation.body.as_deref(), Some("Link copied to clipboard!"));
        assert_eq!(confirmation.tag.as_deref(), Some("clipboard"));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn fallback_skips_confirmation_without_permission() {
        let harness = harness(InMemoryShareTarget::unsupported(), NotificationPermission::Default);

        assert!(harness.bridge.share(&party_link()).await);

        assert_eq!(harness.clipboard.writes(), vec!["https://x".to_owned()]);
        assert!(harness.surface.shown().is_empty());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn fallback_uses_text_without_url() {
        let harness = harness(InMemoryShareTarget::unsupported(), NotificationPermission::Default);
        let payload = SharePayload::new().with_text("Join us at eight");

        assert!(harness.bridge.share(&payload).await);

        assert_eq!(harness.clipboard.writes(), vec!["Join us at eight".to_owned()]);
    }

    #[rstest]
    #[case(InMemoryShareTarget::succeeding(), true)]
    #[case(InMemoryShareTarget::cancelling(), false)]
    #[case(InMemoryShareTarget::failing("share sheet crashed"), false)]
    #[tokio::test(flavor = "multi_thread")]
    async fn native_share_outcomes(#[case] target: InMemoryShareTarget, #[case] expected: bool) {
        let harness = harness(target, NotificationPermission::Granted);

        assert_eq!(harness.bridge.share(&party_link()).await, expected);

        assert_eq!(harness.target.shared().len(), 1);
        assert!(harness.clipboard.writes().is_empty());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn denied_clipboard_reports_failure() {
        let harness = harness(InMemoryShareTarget::unsupported(), NotificationPermission::Granted);
        harness.clipboard.deny();

        assert!(!harness.bridge.copy_to_clipboard("https://x").await);
        assert!(harness.surface.shown().is_empty());
    }

    #[test]
    fn inbound_share_reaches_listeners_and_is_retained() {
        let harness = harness(InMemoryShareTarget::unsupported(), NotificationPermission::Default);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = harness.bridge.on_shared_content(Arc::new(move |payload| {
            sink.lock().expect("listener lock").push(payload);
        }));

        harness.bridge.receive_shared(party_link());

        assert_eq!(*seen.lock().expect("listener lock"), vec![party_link()]);
        assert_eq!(harness.bridge.last_shared_content(), Some(party_link()));
    }
}
