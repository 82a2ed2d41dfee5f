//! Native share and clipboard ports.

use crate::pwa::domain::SharePayload;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Platform share surface.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Reports whether native sharing exists.
    fn is_supported(&self) -> bool;

    /// Opens the share sheet.
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Platform clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Writes plain text to the clipboard.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Errors returned by the share surface.
#[derive(Debug, Clone, Error)]
pub enum ShareError {
    /// The user closed the share sheet.
    #[error("share was cancelled by the user")]
    Cancelled,

    /// The share call failed.
    #[error("share failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl ShareError {
    /// Wraps a platform error.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}

/// Errors returned by the clipboard.
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    /// Clipboard access was refused.
    #[error("clipboard access denied")]
    Denied,

    /// Generic clipboard failure.
    #[error("clipboard error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ClipboardError {
    /// Wraps a platform error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
