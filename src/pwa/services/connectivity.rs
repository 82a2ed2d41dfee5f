//! Reachability tracking.

use crate::pwa::{
    domain::{ConnectivityState, ConnectivityTransition},
    listeners::{Listener, ListenerSet, Subscription},
    ports::ConnectivitySource,
};
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Tracks the latest reachability state and announces transitions.
pub struct ConnectivityMonitor {
    source: Arc<dyn ConnectivitySource>,
    clock: Arc<dyn Clock + Send + Sync>,
    state: RwLock<ConnectivityState>,
    transitions: ListenerSet<ConnectivityTransition>,
}

impl ConnectivityMonitor {
    /// Creates a monitor seeded from the source's current flag.
    #[must_use]
    pub fn new(source: Arc<dyn ConnectivitySource>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let state = ConnectivityState::from_flag(source.is_online());
        Self {
            source,
            clock,
            state: RwLock::new(state),
            transitions: ListenerSet::new(),
        }
    }

    /// Returns whether the latest delivered state is online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state().is_online()
    }

    /// Returns the latest delivered state.
    #[must_use]
    pub fn state(&self) -> ConnectivityState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-reads the source's current flag without announcing a transition.
    ///
    /// Used before listening starts, so a change between construction and
    /// start is not lost.
    pub fn resync(&self) -> ConnectivityState {
        let current = ConnectivityState::from_flag(self.source.is_online());
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        if previous != current {
            debug!(from = %previous, to = %current, "reachability resynchronised");
            *state = current;
        }
        current
    }

    /// Records a delivered state.
    ///
    /// Returns the transition when the state changed. Repeated deliveries of
    /// the current state produce nothing.
    pub fn apply(&self, next: ConnectivityState) -> Option<ConnectivityTransition> {
        let transition = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if *state == next {
                return None;
            }
            let change = ConnectivityTransition::new(*state, next, self.clock.utc());
            *state = next;
            change
        };

        if transition.is_reconnect() {
            info!("connection restored");
        } else {
            info!("connection lost");
        }
        self.transitions.emit(&transition);
        Some(transition)
    }

    /// Registers a listener for state transitions.
    pub fn subscribe(&self, listener: Listener<ConnectivityTransition>) -> Subscription {
        self.transitions.add(listener)
    }

    /// Registers a listener on the underlying platform source.
    pub fn listen(&self, listener: Listener<ConnectivityState>) -> Subscription {
        self.source.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pwa::adapters::memory::InMemoryConnectivity;
    use mockable::DefaultClock;
    use rstest::rstest;
    use std::sync::Mutex;

    fn monitor(online: bool) -> ConnectivityMonitor {
        ConnectivityMonitor::new(
            Arc::new(InMemoryConnectivity::new(online)),
            Arc::new(DefaultClock),
        )
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn initial_state_comes_from_platform_flag(#[case] online: bool) {
        assert_eq!(monitor(online).is_online(), online);
    }

    #[test]
    fn resync_picks_up_changes_made_before_listening() {
        let source = Arc::new(InMemoryConnectivity::new(true));
        let monitor = ConnectivityMonitor::new(source.clone(), Arc::new(DefaultClock));
        let announced = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&announced);
        let _subscription = monitor.subscribe(Arc::new(move |_: ConnectivityTransition| {
            *sink.lock().expect("listener lock") += 1;
        }));

        source.go_offline();

        assert_eq!(monitor.resync(), ConnectivityState::Offline);
        assert!(!monitor.is_online());
        assert_eq!(*announced.lock().expect("listener lock"), 0);
    }

    #[test]
    fn repeated_state_is_not_a_transition() {
        let monitor = monitor(true);

        assert!(monitor.apply(ConnectivityState::Online).is_none());
    }

    #[test]
    fn latest_delivery_wins_and_reconnects_are_flagged() {
        let monitor = monitor(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = monitor.subscribe(Arc::new(move |transition| {
            sink.lock()
                .expect("listener lock")
                .push(transition.is_reconnect());
        }));

        monitor.apply(ConnectivityState::Offline);
        monitor.apply(ConnectivityState::Offline);
        let reconnect = monitor
            .apply(ConnectivityState::Online)
            .expect("transition expected");

        assert!(reconnect.is_reconnect());
        assert!(monitor.is_online());
        assert_eq!(*seen.lock().expect("listener lock"), vec![false, true]);
    }
}
