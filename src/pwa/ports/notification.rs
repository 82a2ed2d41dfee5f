//! Notification permission and direct display ports.

use crate::pwa::domain::{NotificationPermission, NotificationRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification port operations.
pub type NotificationPortResult<T> = Result<T, NotificationPortError>;

/// Source of notification consent.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Reports whether the platform supports notifications.
    fn is_supported(&self) -> bool;

    /// Returns the consent currently recorded by the platform.
    fn current(&self) -> NotificationPermission;

    /// Prompts the user and returns the decision.
    async fn request(&self) -> NotificationPortResult<NotificationPermission>;
}

/// Displays transient notifications directly from the client.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Shows a notification that lives only as long as the client.
    async fn show(&self, request: &NotificationRequest) -> NotificationPortResult<()>;
}

/// Errors returned by notification adapters.
#[derive(Debug, Clone, Error)]
pub enum NotificationPortError {
    /// The platform has no notification support.
    #[error("notifications are unavailable")]
    Unsupported,

    /// Generic platform failure.
    #[error("notification platform error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationPortError {
    /// Wraps a platform error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
