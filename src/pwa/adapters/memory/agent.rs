//! In-memory background agent runtime.

use crate::pwa::{
    domain::{
        AgentHandle, AgentRegistrationOptions, NotificationRequest, PushSubscription,
        PushSubscriptionKeys, SyncTag,
    },
    listeners::{Listener, ListenerSet, Subscription},
    ports::{AgentEvent, AgentRuntime, AgentRuntimeError, AgentRuntimeResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// In-memory agent runtime.
///
/// Records every registration, sync and push request so tests can assert on
/// side effects. Sync tags are de-duplicated by identity the way a platform
/// agent would.
#[derive(Debug, Clone)]
pub struct InMemoryAgentRuntime {
    state: Arc<RwLock<AgentRuntimeState>>,
    listeners: Arc<ListenerSet<AgentEvent>>,
}

#[derive(Debug)]
struct AgentRuntimeState {
    supported: bool,
    background_sync: bool,
    push: bool,
    registration_failure: Option<String>,
    push_failure: bool,
    registrations: Vec<AgentRegistrationOptions>,
    update_checks: usize,
    active: Option<AgentHandle>,
    sync_requests: usize,
    pending_sync: BTreeSet<SyncTag>,
    push_keys: Vec<String>,
    push_subscription: Option<PushSubscription>,
    notifications: Vec<NotificationRequest>,
}

impl Default for AgentRuntimeState {
    fn default() -> Self {
        Self {
            supported: true,
            background_sync: true,
            push: true,
            registration_failure: None,
            push_failure: false,
            registrations: Vec::new(),
            update_checks: 0,
            active: None,
            sync_requests: 0,
            pending_sync: BTreeSet::new(),
            push_keys: Vec::new(),
            push_subscription: None,
            notifications: Vec::new(),
        }
    }
}

impl Default for InMemoryAgentRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAgentRuntime {
    /// Creates a runtime supporting registration, background sync and push.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(AgentRuntimeState::default())),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    /// Creates a runtime for a platform without agent support.
    #[must_use]
    pub fn unsupported() -> Self {
        let runtime = Self::new();
        {
            let mut state = runtime.write();
            state.supported = false;
            state.background_sync = false;
            state.push = false;
        }
        runtime
    }

    /// Disables background sync support.
    #[must_use]
    pub fn without_background_sync(self) -> Self {
        self.write().background_sync = false;
        self
    }

    /// Makes registration reject with `reason`.
    #[must_use]
    pub fn with_registration_failure(self, reason: impl Into<String>) -> Self {
        self.fail_registration(reason);
        self
    }

    /// Makes future registrations reject with `reason`.
    pub fn fail_registration(&self, reason: impl Into<String>) {
        self.write().registration_failure = Some(reason.into());
    }

    /// Lets future registrations succeed.
    pub fn clear_registration_failure(&self) {
        self.write().registration_failure = None;
    }

    /// Makes push subscription requests reject.
    pub fn fail_push_subscriptions(&self) {
        self.write().push_failure = true;
    }

    /// Emits a runtime event to listeners.
    pub fn emit(&self, event: &AgentEvent) {
        self.listeners.emit(event);
    }

    /// Posts a raw message from the agent.
    pub fn post_message(&self, payload: Value) {
        self.emit(&AgentEvent::Message(payload));
    }

    /// Signals that a new agent version finished installing.
    pub fn install_update(&self) {
        self.emit(&AgentEvent::UpdateInstalled);
    }

    /// Returns the options of every registration attempt.
    #[must_use]
    pub fn registration_options(&self) -> Vec<AgentRegistrationOptions> {
        self.read(|state| state.registrations.clone())
    }

    /// Returns how many update checks were requested.
    #[must_use]
    pub fn update_checks(&self) -> usize {
        self.read(|state| state.update_checks)
    }

    /// Returns the handle the runtime considers active.
    #[must_use]
    pub fn active_handle(&self) -> Option<AgentHandle> {
        self.read(|state| state.active.clone())
    }

    /// Returns how many sync registrations were requested.
    #[must_use]
    pub fn sync_requests(&self) -> usize {
        self.read(|state| state.sync_requests)
    }

    /// Returns the distinct pending sync tags, sorted.
    #[must_use]
    pub fn pending_sync_tags(&self) -> Vec<String> {
        self.read(|state| {
            state
                .pending_sync
                .iter()
                .map(|tag| tag.as_str().to_owned())
                .collect()
        })
    }

    /// Returns how many push subscriptions were requested.
    #[must_use]
    pub fn push_subscribe_calls(&self) -> usize {
        self.read(|state| state.push_keys.len())
    }

    /// Returns the application server keys passed to push subscription.
    #[must_use]
    pub fn push_keys(&self) -> Vec<String> {
        self.read(|state| state.push_keys.clone())
    }

    /// Returns notifications the agent displayed.
    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationRequest> {
        self.read(|state| state.notifications.clone())
    }

    fn read<T>(&self, project: impl FnOnce(&AgentRuntimeState) -> T) -> T {
        project(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> RwLockWriteGuard<'_, AgentRuntimeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_checked(&self) -> AgentRuntimeResult<RwLockWriteGuard<'_, AgentRuntimeState>> {
        self.state
            .write()
            .map_err(|err| AgentRuntimeError::runtime(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl AgentRuntime for InMemoryAgentRuntime {
    fn is_supported(&self) -> bool {
        self.read(|state| state.supported)
    }

    fn supports_background_sync(&self) -> bool {
        self.read(|state| state.background_sync)
    }

    fn supports_push(&self) -> bool {
        self.read(|state| state.push)
    }

    async fn register(&self, options: &AgentRegistrationOptions) -> AgentRuntimeResult<AgentHandle> {
        let mut state = self.write_checked()?;
        if !state.supported {
            return Err(AgentRuntimeError::Unsupported);
        }
        state.registrations.push(options.clone());
        if let Some(reason) = &state.registration_failure {
            return Err(AgentRuntimeError::Rejected(reason.clone()));
        }
        let handle = AgentHandle::new(options.scope.clone());
        state.active = Some(handle.clone());
        Ok(handle)
    }

    async fn check_for_update(&self, _handle: &AgentHandle) -> AgentRuntimeResult<()> {
        self.write_checked()?.update_checks += 1;
        Ok(())
    }

    async fn activate_update(&self, handle: &AgentHandle) -> AgentRuntimeResult<AgentHandle> {
        let next = handle.successor();
        self.write_checked()?.active = Some(next.clone());
        Ok(next)
    }

    async fn unregister(&self, _handle: &AgentHandle) -> AgentRuntimeResult<()> {
        let mut state = self.write_checked()?;
        state.active = None;
        state.pending_sync.clear();
        state.push_subscription = None;
        Ok(())
    }

    async fn register_sync(&self, _handle: &AgentHandle, tag: &SyncTag) -> AgentRuntimeResult<()> {
        let mut state = self.write_checked()?;
        if !state.background_sync {
            return Err(AgentRuntimeError::Unsupported);
        }
        state.sync_requests += 1;
        state.pending_sync.insert(tag.clone());
        Ok(())
    }

    async fn subscribe_push(
        &self,
        handle: &AgentHandle,
        application_server_key: &str,
    ) -> AgentRuntimeResult<PushSubscription> {
        let mut state = self.write_checked()?;
        state.push_keys.push(application_server_key.to_owned());
        if state.push_failure {
            return Err(AgentRuntimeError::Rejected(
                "push service unavailable".to_owned(),
            ));
        }
        if let Some(existing) = &state.push_subscription {
            return Ok(existing.clone());
        }

        let keys = PushSubscriptionKeys::new("test-p256dh", "test-auth")
            .map_err(AgentRuntimeError::runtime)?;
        let endpoint = format!(
            "https://push.letz.test/{}/{}",
            handle.id(),
            state.push_keys.len()
        );
        let subscription =
            PushSubscription::new(endpoint, keys).map_err(AgentRuntimeError::runtime)?;
        state.push_subscription = Some(subscription.clone());
        Ok(subscription)
    }

    async fn unsubscribe_push(
        &self,
        _handle: &AgentHandle,
    ) -> AgentRuntimeResult<Option<PushSubscription>> {
        Ok(self.write_checked()?.push_subscription.take())
    }

    async fn show_notification(
        &self,
        _handle: &AgentHandle,
        request: &NotificationRequest,
    ) -> AgentRuntimeResult<()> {
        self.write_checked()?.notifications.push(request.clone());
        Ok(())
    }

    fn subscribe(&self, listener: Listener<AgentEvent>) -> Subscription {
        self.listeners.add(listener)
    }
}
