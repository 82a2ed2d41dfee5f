//! In-memory reachability source.

use crate::pwa::{
    domain::ConnectivityState,
    listeners::{Listener, ListenerSet, Subscription},
    ports::ConnectivitySource,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reachability source driven by test code.
#[derive(Debug, Clone)]
pub struct InMemoryConnectivity {
    online: Arc<AtomicBool>,
    listeners: Arc<ListenerSet<ConnectivityState>>,
}

impl InMemoryConnectivity {
    /// Creates a source with the given initial flag.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    /// Reports the network as reachable and notifies listeners.
    pub fn go_online(&self) {
        self.deliver(ConnectivityState::Online);
    }

    /// Reports the network as unreachable and notifies listeners.
    pub fn go_offline(&self) {
        self.deliver(ConnectivityState::Offline);
    }

    /// Sets the flag and notifies listeners, even when it did not change.
    pub fn deliver(&self, state: ConnectivityState) {
        self.online.store(state.is_online(), Ordering::SeqCst);
        self.listeners.emit(&state);
    }
}

impl Default for InMemoryConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivitySource for InMemoryConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: Listener<ConnectivityState>) -> Subscription {
        self.listeners.add(listener)
    }
}
