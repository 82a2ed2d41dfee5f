//! In-memory cache storage and page reloader.

use crate::pwa::{
    domain::{CacheName, StorageEstimate},
    ports::{CacheStore, CacheStoreError, CacheStoreResult, PageReloader},
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Cache storage holding named namespaces.
#[derive(Debug, Clone)]
pub struct InMemoryCacheStore {
    state: Arc<RwLock<CacheStoreState>>,
}

#[derive(Debug)]
struct CacheStoreState {
    supported: bool,
    caches: BTreeSet<CacheName>,
    estimate: StorageEstimate,
}

impl InMemoryCacheStore {
    /// Creates an empty, supported store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheStoreState {
                supported: true,
                caches: BTreeSet::new(),
                estimate: StorageEstimate {
                    usage: 0,
                    quota: None,
                },
            })),
        }
    }

    /// Creates a store for a platform without cache storage.
    #[must_use]
    pub fn unsupported() -> Self {
        let store = Self::new();
        store
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .supported = false;
        store
    }

    /// Creates a store holding the given namespaces. Blank names are skipped.
    #[must_use]
    pub fn with_caches<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.insert(name);
        }
        store
    }

    /// Sets the storage estimate the store reports.
    #[must_use]
    pub fn with_estimate(self, estimate: StorageEstimate) -> Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .estimate = estimate;
        self
    }

    /// Adds a namespace. Blank names are ignored.
    pub fn insert(&self, name: impl Into<String>) {
        if let Ok(cache) = CacheName::new(name) {
            self.state
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .caches
                .insert(cache);
        }
    }

    /// Returns the remaining namespace names.
    #[must_use]
    pub fn cache_names(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .caches
            .iter()
            .map(|name| name.as_str().to_owned())
            .collect()
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn is_supported(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .supported
    }

    async fn keys(&self) -> CacheStoreResult<Vec<CacheName>> {
        let state = self
            .state
            .read()
            .map_err(|err| CacheStoreError::runtime(std::io::Error::other(err.to_string())))?;
        if !state.supported {
            return Err(CacheStoreError::Unsupported);
        }
        Ok(state.caches.iter().cloned().collect())
    }

    async fn delete(&self, name: &CacheName) -> CacheStoreResult<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CacheStoreError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.caches.remove(name))
    }

    async fn estimate(&self) -> CacheStoreResult<StorageEstimate> {
        let state = self
            .state
            .read()
            .map_err(|err| CacheStoreError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.estimate)
    }
}

/// Page reloader that counts reloads.
///
/// When observing a store it also records how many namespaces still existed
/// at each reload.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPageReloader {
    observed: Option<InMemoryCacheStore>,
    reloads: Arc<RwLock<Vec<usize>>>,
}

impl InMemoryPageReloader {
    /// Creates a reloader that observes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reloader that snapshots `store` on every reload.
    #[must_use]
    pub fn observing(store: &InMemoryCacheStore) -> Self {
        Self {
            observed: Some(store.clone()),
            reloads: Arc::default(),
        }
    }

    /// Returns how many reloads happened.
    #[must_use]
    pub fn reloads(&self) -> usize {
        self.reloads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the observed namespace count at each reload.
    #[must_use]
    pub fn caches_seen_at_reload(&self) -> Vec<usize> {
        self.reloads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PageReloader for InMemoryPageReloader {
    fn reload(&self) {
        let remaining = self
            .observed
            .as_ref()
            .map_or(0, |store| store.cache_names().len());
        self.reloads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(remaining);
    }
}
