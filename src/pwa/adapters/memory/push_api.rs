//! In-memory push subscription API.

use crate::pwa::{
    domain::PushSubscription,
    ports::{PushApiError, PushApiResult, PushSubscriptionApi},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Remote API double recording subscription calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPushSubscriptionApi {
    state: Arc<RwLock<PushApiState>>,
}

#[derive(Debug, Default)]
struct PushApiState {
    failing: bool,
    registered: Vec<PushSubscription>,
    unregistered: Vec<String>,
}

impl InMemoryPushSubscriptionApi {
    /// Creates an API that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future calls respond with a server error.
    pub fn fail_requests(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .failing = true;
    }

    /// Returns subscriptions the API accepted.
    #[must_use]
    pub fn registered(&self) -> Vec<PushSubscription> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .registered
            .clone()
    }

    /// Returns endpoints the API was told to forget.
    #[must_use]
    pub fn unregistered(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .unregistered
            .clone()
    }
}

#[async_trait]
impl PushSubscriptionApi for InMemoryPushSubscriptionApi {
    async fn register(&self, subscription: &PushSubscription) -> PushApiResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PushApiError::transport(std::io::Error::other(err.to_string())))?;
        if state.failing {
            return Err(PushApiError::Status { status: 503 });
        }
        state.registered.push(subscription.clone());
        Ok(())
    }

    async fn unregister(&self, endpoint: &str) -> PushApiResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PushApiError::transport(std::io::Error::other(err.to_string())))?;
        if state.failing {
            return Err(PushApiError::Status { status: 503 });
        }
        state.unregistered.push(endpoint.to_owned());
        Ok(())
    }
}
