//! Cache storage and page reload ports.

use crate::pwa::domain::{CacheName, StorageEstimate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for cache storage operations.
pub type CacheStoreResult<T> = Result<T, CacheStoreError>;

/// Enumerable on-device cache storage owned by the application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reports whether the platform exposes cache storage.
    fn is_supported(&self) -> bool;

    /// Lists every cache namespace.
    async fn keys(&self) -> CacheStoreResult<Vec<CacheName>>;

    /// Deletes one namespace, returning whether it existed.
    async fn delete(&self, name: &CacheName) -> CacheStoreResult<bool>;

    /// Reports storage usage for the origin.
    async fn estimate(&self) -> CacheStoreResult<StorageEstimate>;
}

/// Forces the client to reload.
#[cfg_attr(test, mockall::automock)]
pub trait PageReloader: Send + Sync {
    /// Reloads the client, discarding in-memory state.
    fn reload(&self);
}

/// Errors returned by cache storage adapters.
#[derive(Debug, Clone, Error)]
pub enum CacheStoreError {
    /// The platform has no cache storage.
    #[error("cache storage is unavailable")]
    Unsupported,

    /// Generic storage failure.
    #[error("cache storage error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl CacheStoreError {
    /// Wraps a storage error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
