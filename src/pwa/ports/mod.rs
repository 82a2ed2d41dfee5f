//! Port contracts for platform capabilities used by the orchestrator.
//!
//! Each port replaces one piece of ambient platform state, so services can
//! be built over in-memory fakes in tests.

mod agent;
mod cache;
mod connectivity;
mod install;
mod notification;
mod push_api;
mod share;

pub use agent::{AgentEvent, AgentRuntime, AgentRuntimeError, AgentRuntimeResult};
pub use cache::{CacheStore, CacheStoreError, CacheStoreResult, PageReloader};
#[cfg(test)]
pub use cache::{MockCacheStore, MockPageReloader};
pub use connectivity::ConnectivitySource;
pub use install::{InstallEvent, InstallPrompt, InstallPromptError, InstallPromptToken, InstallSource};
pub use notification::{
    NotificationPortError, NotificationPortResult, NotificationSurface, PermissionSource,
};
pub use push_api::{PushApiError, PushApiResult, PushSubscriptionApi};
pub use share::{Clipboard, ClipboardError, ShareError, ShareTarget};
