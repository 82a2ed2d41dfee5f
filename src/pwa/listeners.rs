//! Listener registration with disposer handles.
//!
//! Platform sources and services expose `subscribe`-style hooks that return a
//! [`Subscription`]. Disposing or dropping the subscription detaches the
//! listener, so an owner can tear down every hook it installed in one place.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with each emitted value.
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

type Disposer = Box<dyn FnOnce() + Send + Sync>;

/// Handle for a registered listener.
#[must_use = "dropping a subscription detaches its listener"]
pub struct Subscription {
    disposer: Option<Disposer>,
}

impl Subscription {
    /// Creates a subscription that runs `disposer` exactly once on disposal.
    pub fn new(disposer: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// Creates a subscription with nothing to detach.
    ///
    /// Returned by sources that have no platform support to listen to.
    pub const fn noop() -> Self {
        Self { disposer: None }
    }

    /// Detaches the listener now.
    pub fn dispose(mut self) {
        self.run_disposer();
    }

    /// Returns whether the listener is still attached.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.disposer.is_some()
    }

    fn run_disposer(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_disposer();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Ordered set of listeners sharing one value type.
pub struct ListenerSet<T> {
    inner: Arc<ListenerSetInner<T>>,
}

struct ListenerSetInner<T> {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Listener<T>>>,
}

impl<T> ListenerSetInner<T> {
    fn remove(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

impl<T: 'static> ListenerSet<T> {
    /// Creates an empty listener set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ListenerSetInner {
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Registers a listener. Listeners run in registration order.
    pub fn add(&self, listener: Listener<T>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);

        let weak: Weak<ListenerSetInner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Returns the number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether no listener is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `value` to every attached listener.
    ///
    /// The set is snapshotted first, so listeners may subscribe or dispose
    /// while being notified.
    pub fn emit(&self, value: &T)
    where
        T: Clone,
    {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in snapshot {
            listener(value.clone());
        }
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        formatter
            .debug_struct("ListenerSet")
            .field("listeners", &count)
            .finish()
    }
}
