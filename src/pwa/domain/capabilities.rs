//! Platform capability flags.

use serde::{Deserialize, Serialize};

/// Capabilities detected on the host platform.
///
/// Flags reflect platform support only, never the outcome of a registration
/// or permission request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedFeatures {
    /// A background agent runtime exists.
    pub agent: bool,
    /// Notifications can be requested.
    pub notifications: bool,
    /// A native share surface exists.
    pub share: bool,
    /// The platform emits install-eligibility signals.
    pub install_prompt: bool,
    /// Push subscriptions can be created.
    pub push: bool,
    /// Deferred synchronisation can be registered.
    pub background_sync: bool,
}
