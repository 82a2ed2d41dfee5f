//! Notification consent, display routing and push subscription.

use super::AgentHandleReader;
use crate::config::DEFAULT_VAPID_PUBLIC_KEY;
use crate::pwa::{
    domain::{NotificationDefaults, NotificationOptions, NotificationPermission, PushSubscription},
    ports::{AgentRuntime, NotificationSurface, PermissionSource, PushSubscriptionApi},
};
use mockable::Clock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

/// Owns notification permission and the push subscription.
///
/// Notifications route through the background agent when a handle exists and
/// fall back to the direct surface otherwise.
pub struct NotificationAuthority {
    permissions: Arc<dyn PermissionSource>,
    surface: Arc<dyn NotificationSurface>,
    runtime: Arc<dyn AgentRuntime>,
    api: Arc<dyn PushSubscriptionApi>,
    agent: AgentHandleReader,
    clock: Arc<dyn Clock + Send + Sync>,
    application_server_key: String,
    defaults: NotificationDefaults,
    permission: RwLock<NotificationPermission>,
    subscription: RwLock<Option<PushSubscription>>,
    push_attempted: AtomicBool,
}

impl NotificationAuthority {
    /// Creates an authority seeded from the platform's current permission.
    #[must_use]
    pub fn new(
        permissions: Arc<dyn PermissionSource>,
        surface: Arc<dyn NotificationSurface>,
        runtime: Arc<dyn AgentRuntime>,
        api: Arc<dyn PushSubscriptionApi>,
        agent: AgentHandleReader,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let initial = if permissions.is_supported() {
            permissions.current()
        } else {
            NotificationPermission::Default
        };
        Self {
            permissions,
            surface,
            runtime,
            api,
            agent,
            clock,
            application_server_key: DEFAULT_VAPID_PUBLIC_KEY.to_owned(),
            defaults: NotificationDefaults::default(),
            permission: RwLock::new(initial),
            subscription: RwLock::new(None),
            push_attempted: AtomicBool::new(false),
        }
    }

    /// Sets the public key used when creating push subscriptions.
    #[must_use]
    pub fn with_application_server_key(mut self, key: impl Into<String>) -> Self {
        self.application_server_key = key.into();
        self
    }

    /// Sets the icon, badge and vibration applied to every notification.
    #[must_use]
    pub fn with_defaults(mut self, defaults: NotificationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Reports whether the platform has a notification API.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.permissions.is_supported()
    }

    /// Reports whether push subscriptions can be created at all.
    #[must_use]
    pub fn supports_push(&self) -> bool {
        self.runtime.is_supported() && self.runtime.supports_push()
    }

    /// Returns the known permission state.
    #[must_use]
    pub fn permission(&self) -> NotificationPermission {
        *self.permission.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the push subscription held by this installation.
    #[must_use]
    pub fn subscription(&self) -> Option<PushSubscription> {
        self.subscription
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Asks the user for notification permission.
    ///
    /// Resolves `true` at once when already granted and `false` at once when
    /// denied, never prompting again. The first grant subscribes to push when
    /// an agent handle exists.
    pub async fn request_permission(&self) -> bool {
        if !self.permissions.is_supported() {
            debug!("notifications unsupported; permission request skipped");
            return false;
        }

        match self.permission() {
            NotificationPermission::Granted => return true,
            NotificationPermission::Denied => return false,
            NotificationPermission::Default => {}
        }

        let decision = match self.permissions.request().await {
            Ok(decision) => decision,
            Err(err) => {
                error!(error = %err, "notification permission request failed");
                return false;
            }
        };

        if !self.apply_permission(decision) {
            return self.permission().is_granted();
        }
        info!(permission = %decision, "notification permission decided");

        if decision.is_granted() {
            self.push_attempted.store(false, Ordering::SeqCst);
            self.subscribe_once().await;
        }
        decision.is_granted()
    }

    /// Subscribes to push once the agent first becomes active, when
    /// permission was granted before the agent existed.
    pub async fn on_agent_ready(&self) {
        self.subscribe_once().await;
    }

    /// Creates a push subscription and hands it to the remote API.
    ///
    /// Returns `None` when permission, an agent handle or push support is
    /// missing, or the runtime rejects the subscription. A remote API failure
    /// is logged and the subscription is kept.
    pub async fn subscribe_push(&self) -> Option<PushSubscription> {
        if !self.permission().is_granted() {
            debug!("push subscription skipped without permission");
            return None;
        }
        let Some(handle) = self.agent.current() else {
            debug!("push subscription unavailable without agent");
            return None;
        };
        if !self.runtime.supports_push() {
            warn!("push messaging unsupported");
            return None;
        }

        let subscription = match self
            .runtime
            .subscribe_push(&handle, &self.application_server_key)
            .await
        {
            Ok(subscription) => subscription,
            Err(err) => {
                error!(error = %err, "push subscription failed");
                return None;
            }
        };
        info!(endpoint = subscription.endpoint(), "push subscription created");

        *self
            .subscription
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(subscription.clone());

        if let Err(err) = self.api.register(&subscription).await {
            error!(error = %err, "registering push subscription with API failed");
        }
        Some(subscription)
    }

    /// Drops the push subscription and tells the remote API.
    ///
    /// Returns whether a subscription was removed.
    pub async fn unsubscribe_push(&self) -> bool {
        let Some(handle) = self.agent.current() else {
            return false;
        };

        let removed = match self.runtime.unsubscribe_push(&handle).await {
            Ok(removed) => removed,
            Err(err) => {
                error!(error = %err, "push unsubscription failed");
                return false;
            }
        };
        self.subscription
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(subscription) = removed else {
            return false;
        };
        info!(endpoint = subscription.endpoint(), "push subscription removed");
        if let Err(err) = self.api.unregister(subscription.endpoint()).await {
            error!(error = %err, "unregistering push subscription with API failed");
        }
        true
    }

    /// Shows a notification.
    ///
    /// Without permission this does nothing. With an agent handle the agent
    /// displays it; otherwise the direct surface does. Returns whether a
    /// notification was shown.
    pub async fn notify(&self, title: impl Into<String>, options: NotificationOptions) -> bool {
        if !self.permission().is_granted() {
            debug!("notification skipped without permission");
            return false;
        }

        let request = options.resolve(title, &self.defaults, self.clock.utc());
        let outcome = match self.agent.current() {
            Some(handle) => self
                .runtime
                .show_notification(&handle, &request)
                .await
                .map_err(|err| err.to_string()),
            None => self
                .surface
                .show(&request)
                .await
                .map_err(|err| err.to_string()),
        };

        match outcome {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, title = %request.title, "showing notification failed");
                false
            }
        }
    }

    /// Records a decision, keeping denial terminal. Returns whether it changed.
    fn apply_permission(&self, decision: NotificationPermission) -> bool {
        let mut permission = self
            .permission
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *permission == decision || !permission.can_transition_to(decision) {
            return false;
        }
        *permission = decision;
        true
    }

    async fn subscribe_once(&self) {
        if !self.permission().is_granted()
            || !self.agent.is_available()
            || self.subscription().is_some()
        {
            return;
        }
        if self.push_attempted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.subscribe_push().await;
    }
}
