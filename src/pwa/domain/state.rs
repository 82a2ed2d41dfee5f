//! Consumer-facing state snapshot.

use super::{
    AgentLifecycleState, CacheStatus, InstallationState, NotificationPermission, SupportedFeatures,
};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the orchestrator state handed to UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaState {
    /// Latest reachability reported by the platform.
    pub is_online: bool,
    /// An install prompt can be shown right now.
    pub is_installable: bool,
    /// The app runs installed.
    pub is_installed: bool,
    /// Startup, an install prompt or a cache clear is in flight.
    pub is_loading: bool,
    /// Notification consent.
    pub notification_permission: NotificationPermission,
    /// Cache status.
    pub cache_status: CacheStatus,
    /// The agent reported the app shell is usable offline.
    pub offline_ready: bool,
    /// Background agent lifecycle state.
    pub agent_state: AgentLifecycleState,
    /// Installation lifecycle state.
    pub installation_state: InstallationState,
    /// Platform capability flags.
    pub is_supported: SupportedFeatures,
}
