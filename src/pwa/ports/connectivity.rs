//! Platform reachability port.

use crate::pwa::domain::ConnectivityState;
use crate::pwa::listeners::{Listener, Subscription};

/// Source of reachability state and transition events.
pub trait ConnectivitySource: Send + Sync {
    /// Returns the platform's current reachability flag.
    fn is_online(&self) -> bool;

    /// Registers a listener for reachability changes.
    fn subscribe(&self, listener: Listener<ConnectivityState>) -> Subscription;
}
