//! In-memory share surface and clipboard.

use crate::pwa::{
    domain::SharePayload,
    ports::{Clipboard, ClipboardError, ShareError, ShareTarget},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShareBehaviour {
    Unsupported,
    Succeed,
    Cancel,
    Fail(String),
}

/// Native share surface with a scripted outcome.
#[derive(Debug, Clone)]
pub struct InMemoryShareTarget {
    behaviour: ShareBehaviour,
    shared: Arc<RwLock<Vec<SharePayload>>>,
}

impl InMemoryShareTarget {
    /// Creates a target for a platform without native sharing.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::with_behaviour(ShareBehaviour::Unsupported)
    }

    /// Creates a target whose shares complete.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_behaviour(ShareBehaviour::Succeed)
    }

    /// Creates a target whose shares the user cancels.
    #[must_use]
    pub fn cancelling() -> Self {
        Self::with_behaviour(ShareBehaviour::Cancel)
    }

    /// Creates a target whose shares fail with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behaviour(ShareBehaviour::Fail(reason.into()))
    }

    /// Returns every payload handed to the share surface.
    #[must_use]
    pub fn shared(&self) -> Vec<SharePayload> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_behaviour(behaviour: ShareBehaviour) -> Self {
        Self {
            behaviour,
            shared: Arc::default(),
        }
    }
}

#[async_trait]
impl ShareTarget for InMemoryShareTarget {
    fn is_supported(&self) -> bool {
        self.behaviour != ShareBehaviour::Unsupported
    }

    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        self.shared
            .write()
            .map_err(|err| ShareError::failed(std::io::Error::other(err.to_string())))?
            .push(payload.clone());
        match &self.behaviour {
            ShareBehaviour::Succeed => Ok(()),
            ShareBehaviour::Cancel => Err(ShareError::Cancelled),
            ShareBehaviour::Unsupported => Err(ShareError::failed(std::io::Error::other(
                "native share unavailable",
            ))),
            ShareBehaviour::Fail(reason) => {
                Err(ShareError::failed(std::io::Error::other(reason.clone())))
            }
        }
    }
}

/// Clipboard that records written text.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClipboard {
    denied: Arc<AtomicBool>,
    writes: Arc<RwLock<Vec<String>>>,
}

impl InMemoryClipboard {
    /// Creates a clipboard that accepts writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future writes fail with [`ClipboardError::Denied`].
    pub fn deny(&self) {
        self.denied.store(true, Ordering::SeqCst);
    }

    /// Returns every accepted write.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clipboard for InMemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(ClipboardError::Denied);
        }
        self.writes
            .write()
            .map_err(|err| ClipboardError::runtime(std::io::Error::other(err.to_string())))?
            .push(text.to_owned());
        Ok(())
    }
}
