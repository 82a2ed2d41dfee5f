//! Background execution agent runtime port.

use crate::pwa::domain::{
    AgentHandle, AgentRegistrationOptions, NotificationRequest, PushSubscription, SyncTag,
};
use crate::pwa::listeners::{Listener, Subscription};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent runtime operations.
pub type AgentRuntimeResult<T> = Result<T, AgentRuntimeError>;

/// Event pushed by the agent runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A new agent version finished installing while an older one controls the client.
    UpdateInstalled,
    /// Untyped message posted by the agent.
    Message(Value),
}

/// Control contract for the platform's background agent runtime.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Reports whether the platform has an agent runtime at all.
    fn is_supported(&self) -> bool;

    /// Reports whether the runtime can register deferred sync tasks.
    fn supports_background_sync(&self) -> bool;

    /// Reports whether the runtime can create push subscriptions.
    fn supports_push(&self) -> bool;

    /// Registers the agent script and returns the active handle.
    async fn register(&self, options: &AgentRegistrationOptions) -> AgentRuntimeResult<AgentHandle>;

    /// Asks the runtime to re-fetch the agent script.
    async fn check_for_update(&self, handle: &AgentHandle) -> AgentRuntimeResult<()>;

    /// Hands control to the waiting agent version and returns its handle.
    async fn activate_update(&self, handle: &AgentHandle) -> AgentRuntimeResult<AgentHandle>;

    /// Removes the registration.
    async fn unregister(&self, handle: &AgentHandle) -> AgentRuntimeResult<()>;

    /// Registers a deferred sync task. Re-registering a tag is a no-op.
    async fn register_sync(&self, handle: &AgentHandle, tag: &SyncTag) -> AgentRuntimeResult<()>;

    /// Creates a push subscription using the application server key.
    async fn subscribe_push(
        &self,
        handle: &AgentHandle,
        application_server_key: &str,
    ) -> AgentRuntimeResult<PushSubscription>;

    /// Drops the push subscription, returning it when one existed.
    async fn unsubscribe_push(
        &self,
        handle: &AgentHandle,
    ) -> AgentRuntimeResult<Option<PushSubscription>>;

    /// Shows a notification owned by the agent.
    async fn show_notification(
        &self,
        handle: &AgentHandle,
        request: &NotificationRequest,
    ) -> AgentRuntimeResult<()>;

    /// Registers a listener for runtime events.
    fn subscribe(&self, listener: Listener<AgentEvent>) -> Subscription;
}

/// Errors returned by agent runtime adapters.
#[derive(Debug, Clone, Error)]
pub enum AgentRuntimeError {
    /// The platform has no agent runtime.
    #[error("background agent runtime is unavailable")]
    Unsupported,

    /// The runtime refused the request.
    #[error("background agent runtime rejected the request: {0}")]
    Rejected(String),

    /// Generic runtime failure.
    #[error("background agent runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRuntimeError {
    /// Wraps a runtime error from the adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
