//! Domain model for the client lifecycle and connectivity orchestrator.
//!
//! The domain covers reachability, the background agent lifecycle,
//! installability, notification consent and push subscriptions, cache
//! status, deferred sync tags and share payloads. Platform access stays
//! outside this boundary.

mod agent;
mod cache;
mod capabilities;
mod connectivity;
mod error;
mod install;
mod notification;
mod share;
mod state;
mod sync;

pub use agent::{
    AgentHandle, AgentLifecycleState, AgentMessage, AgentRegistrationId, AgentRegistrationOptions,
    CACHE_UPDATED_MESSAGE, OFFLINE_READY_MESSAGE, SHARED_CONTENT_MESSAGE, UpdateViaCache,
};
pub use cache::{CacheName, CacheStatus, CacheUsageEstimate, StorageEstimate, format_bytes};
pub use capabilities::SupportedFeatures;
pub use connectivity::{ConnectivityState, ConnectivityTransition};
pub use error::{ParseAgentLifecycleStateError, ParseNotificationPermissionError, PwaDomainError};
pub use install::{InstallChoice, InstallationState};
pub use notification::{
    NotificationAction, NotificationDefaults, NotificationOptions, NotificationPermission,
    NotificationRequest, PushSubscription, PushSubscriptionKeys,
};
pub use share::SharePayload;
pub use state::PwaState;
pub use sync::{SEND_MESSAGES_TAG, SYNC_EVENTS_TAG, SyncTag};
