//! Install-eligibility port and the single-use prompt token.

use crate::pwa::domain::InstallChoice;
use crate::pwa::listeners::{Listener, Subscription};
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

/// Platform install prompt captured from an eligibility signal.
#[async_trait]
pub trait InstallPrompt: Send {
    /// Shows the prompt and waits for the user's choice.
    ///
    /// Consumes the prompt; the platform allows one prompt per signal.
    async fn prompt(self: Box<Self>) -> Result<InstallChoice, InstallPromptError>;
}

/// Single-use capability to trigger the install prompt.
///
/// Clones share one underlying prompt. The first [`InstallPromptToken::take`]
/// empties it; later calls return `None`.
#[derive(Clone)]
pub struct InstallPromptToken {
    id: Uuid,
    prompt: Arc<Mutex<Option<Box<dyn InstallPrompt>>>>,
}

impl InstallPromptToken {
    /// Wraps a captured platform prompt.
    pub fn new(prompt: impl InstallPrompt + 'static) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: Arc::new(Mutex::new(Some(Box::new(prompt)))),
        }
    }

    /// Returns the token identity.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns whether the prompt was already taken.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.prompt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Takes the prompt out of the token, at most once.
    #[must_use]
    pub fn take(&self) -> Option<Box<dyn InstallPrompt>> {
        self.prompt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl fmt::Debug for InstallPromptToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InstallPromptToken")
            .field("id", &self.id)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

/// Installability event from the platform.
#[derive(Debug, Clone)]
pub enum InstallEvent {
    /// The app became installable; carries a fresh prompt token.
    Eligible(InstallPromptToken),
    /// The app was installed, possibly through another surface.
    Installed,
}

/// Source of install-eligibility signals.
pub trait InstallSource: Send + Sync {
    /// Reports whether the platform emits install-eligibility signals.
    fn supports_install_prompt(&self) -> bool;

    /// Reports whether the client already runs as an installed app.
    fn is_standalone(&self) -> bool;

    /// Registers a listener for installability events.
    fn subscribe(&self, listener: Listener<InstallEvent>) -> Subscription;
}

/// Errors raised while showing the install prompt.
#[derive(Debug, Clone, Error)]
pub enum InstallPromptError {
    /// Generic platform failure.
    #[error("install prompt error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl InstallPromptError {
    /// Wraps a platform error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptingPrompt;

    #[async_trait]
    impl InstallPrompt for AcceptingPrompt {
        async fn prompt(self: Box<Self>) -> Result<InstallChoice, InstallPromptError> {
            Ok(InstallChoice::Accepted)
        }
    }

    #[test]
    fn token_yields_prompt_once_across_clones() {
        let token = InstallPromptToken::new(AcceptingPrompt);
        let clone = token.clone();

        assert!(token.take().is_some());
        assert!(clone.take().is_none());
        assert!(clone.is_consumed());
        assert_eq!(clone.id(), token.id());
    }
}
