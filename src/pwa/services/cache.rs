//! Cache usage, status and the clear-then-reload flow.

use crate::pwa::{
    domain::{CacheStatus, CacheUsageEstimate},
    ports::{CacheStore, PageReloader},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Resets the in-flight flag when a clear finishes or is abandoned.
struct ClearingGuard<'a>(&'a AtomicBool);

impl Drop for ClearingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the application's on-device caches.
pub struct CacheStorageController {
    store: Arc<dyn CacheStore>,
    reloader: Arc<dyn PageReloader>,
    status: RwLock<CacheStatus>,
    offline_ready: AtomicBool,
    clearing: AtomicBool,
}

impl CacheStorageController {
    /// Creates a controller with an idle status.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, reloader: Arc<dyn PageReloader>) -> Self {
        Self {
            store,
            reloader,
            status: RwLock::new(CacheStatus::Idle),
            offline_ready: AtomicBool::new(false),
            clearing: AtomicBool::new(false),
        }
    }

    /// Reports whether the platform exposes cache storage.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.store.is_supported()
    }

    /// Returns the cache status.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether the app shell is cached for offline use.
    #[must_use]
    pub fn offline_ready(&self) -> bool {
        self.offline_ready.load(Ordering::SeqCst)
    }

    /// Returns whether a clear is in flight.
    #[must_use]
    pub fn is_clearing(&self) -> bool {
        self.clearing.load(Ordering::SeqCst)
    }

    /// Records that the agent refreshed cached content.
    pub fn mark_updated(&self) {
        self.set_status(CacheStatus::Updated);
        debug!("cache content updated");
    }

    /// Records that the app shell is available offline.
    pub fn mark_offline_ready(&self) {
        self.offline_ready.store(true, Ordering::SeqCst);
        self.set_status(CacheStatus::Ready);
        info!("application ready for offline use");
    }

    /// Estimates storage used by the origin.
    pub async fn estimate_usage(&self) -> Option<CacheUsageEstimate> {
        if !self.store.is_supported() {
            return None;
        }
        match self.store.estimate().await {
            Ok(estimate) => Some(CacheUsageEstimate::from_storage(estimate)),
            Err(err) => {
                error!(error = %err, "storage estimate failed");
                None
            }
        }
    }

    /// Deletes every application cache, then reloads the page.
    ///
    /// Returns `false` without reloading when a clear is already running, the
    /// platform has no cache storage, or any deletion fails.
    pub async fn clear(&self) -> bool {
        if !self.store.is_supported() {
            debug!("cache storage unsupported; clear skipped");
            return false;
        }
        if self.clearing.swap(true, Ordering::SeqCst) {
            debug!("cache clear already in progress");
            return false;
        }
        let _guard = ClearingGuard(&self.clearing);

        let names = match self.store.keys().await {
            Ok(names) => names,
            Err(err) => {
                error!(error = %err, "listing caches failed");
                return false;
            }
        };

        for name in &names {
            if let Err(err) = self.store.delete(name).await {
                error!(error = %err, cache = %name, "deleting cache failed");
                return false;
            }
        }

        self.offline_ready.store(false, Ordering::SeqCst);
        self.set_status(CacheStatus::Cleared);
        info!(caches = names.len(), "application caches cleared; reloading");
        self.reloader.reload();
        true
    }

    fn set_status(&self, status: CacheStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }
}
