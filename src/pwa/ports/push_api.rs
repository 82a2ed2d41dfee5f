//! Remote API port for push subscription registration.

use crate::pwa::domain::PushSubscription;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for push API calls.
pub type PushApiResult<T> = Result<T, PushApiError>;

/// Remote collaborator that stores push subscriptions.
#[async_trait]
pub trait PushSubscriptionApi: Send + Sync {
    /// Sends a newly created subscription to the backend.
    async fn register(&self, subscription: &PushSubscription) -> PushApiResult<()>;

    /// Tells the backend a subscription endpoint is gone.
    async fn unregister(&self, endpoint: &str) -> PushApiResult<()>;
}

/// Errors returned by push API adapters.
#[derive(Debug, Clone, Error)]
pub enum PushApiError {
    /// The backend answered with a non-success status.
    #[error("push API responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be delivered.
    #[error("push API transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl PushApiError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
