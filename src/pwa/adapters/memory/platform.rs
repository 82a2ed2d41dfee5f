//! A full set of in-memory platform ports.

use super::{
    InMemoryAgentRuntime, InMemoryCacheStore, InMemoryClipboard, InMemoryConnectivity,
    InMemoryInstallSource, InMemoryPageReloader, InMemoryPermissionSource,
    InMemoryPushSubscriptionApi, InMemoryShareTarget, RecordingNotificationSurface,
};
use crate::pwa::domain::NotificationPermission;
use crate::pwa::services::PwaPlatform;
use std::sync::Arc;

/// Every in-memory adapter, kept concrete so tests can drive and inspect them.
#[derive(Debug, Clone)]
pub struct InMemoryPlatform {
    /// Reachability source.
    pub connectivity: Arc<InMemoryConnectivity>,
    /// Agent runtime.
    pub agent: Arc<InMemoryAgentRuntime>,
    /// Install-eligibility source.
    pub install: Arc<InMemoryInstallSource>,
    /// Permission source; undecided and granting on request by default.
    pub permissions: Arc<InMemoryPermissionSource>,
    /// Direct notification surface.
    pub surface: Arc<RecordingNotificationSurface>,
    /// Cache storage seeded with the app shell and API caches.
    pub caches: Arc<InMemoryCacheStore>,
    /// Page reloader observing `caches`.
    pub reloader: Arc<InMemoryPageReloader>,
    /// Native share surface; unsupported by default.
    pub share: Arc<InMemoryShareTarget>,
    /// Clipboard.
    pub clipboard: Arc<InMemoryClipboard>,
    /// Remote push subscription API.
    pub push_api: Arc<InMemoryPushSubscriptionApi>,
}

impl InMemoryPlatform {
    /// Creates an online, fully capable platform without native sharing.
    #[must_use]
    pub fn new() -> Self {
        let caches = Arc::new(InMemoryCacheStore::with_caches([
            "letz-static-v1",
            "letz-dynamic-v1",
            "letz-api-v1",
        ]));
        Self {
            connectivity: Arc::new(InMemoryConnectivity::new(true)),
            agent: Arc::new(InMemoryAgentRuntime::new()),
            install: Arc::new(InMemoryInstallSource::new()),
            permissions: Arc::new(InMemoryPermissionSource::answering(
                NotificationPermission::Granted,
            )),
            surface: Arc::new(RecordingNotificationSurface::new()),
            reloader: Arc::new(InMemoryPageReloader::observing(&caches)),
            caches,
            share: Arc::new(InMemoryShareTarget::unsupported()),
            clipboard: Arc::new(InMemoryClipboard::new()),
            push_api: Arc::new(InMemoryPushSubscriptionApi::new()),
        }
    }

    /// Replaces the agent runtime.
    #[must_use]
    pub fn with_agent(mut self, agent: InMemoryAgentRuntime) -> Self {
        self.agent = Arc::new(agent);
        self
    }

    /// Replaces the permission source.
    #[must_use]
    pub fn with_permissions(mut self, permissions: InMemoryPermissionSource) -> Self {
        self.permissions = Arc::new(permissions);
        self
    }

    /// Replaces the share surface.
    #[must_use]
    pub fn with_share_target(mut self, share: InMemoryShareTarget) -> Self {
        self.share = Arc::new(share);
        self
    }

    /// Replaces the reachability source.
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: InMemoryConnectivity) -> Self {
        self.connectivity = Arc::new(connectivity);
        self
    }

    /// Replaces the install source.
    #[must_use]
    pub fn with_install_source(mut self, install: InMemoryInstallSource) -> Self {
        self.install = Arc::new(install);
        self
    }

    /// Returns the ports as trait objects for the orchestrator.
    #[must_use]
    pub fn ports(&self) -> PwaPlatform {
        PwaPlatform {
            connectivity: self.connectivity.clone(),
            agent_runtime: self.agent.clone(),
            install_source: self.install.clone(),
            permissions: self.permissions.clone(),
            notification_surface: self.surface.clone(),
            cache_store: self.caches.clone(),
            page_reloader: self.reloader.clone(),
            share_target: self.share.clone(),
            clipboard: self.clipboard.clone(),
            push_api: self.push_api.clone(),
        }
    }
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}
