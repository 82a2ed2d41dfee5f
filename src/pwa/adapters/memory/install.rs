//! In-memory install-eligibility source and scripted prompts.

use crate::pwa::{
    domain::InstallChoice,
    listeners::{Listener, ListenerSet, Subscription},
    ports::{InstallEvent, InstallPrompt, InstallPromptError, InstallPromptToken, InstallSource},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Install prompt that answers with a preset outcome.
///
/// A gated prompt waits for its gate to be notified before answering, so
/// tests can observe the prompting state.
pub struct ScriptedInstallPrompt {
    outcome: Result<InstallChoice, InstallPromptError>,
    shown: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl InstallPrompt for ScriptedInstallPrompt {
    async fn prompt(self: Box<Self>) -> Result<InstallChoice, InstallPromptError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome
    }
}

/// Install source driven by test code.
#[derive(Debug, Clone)]
pub struct InMemoryInstallSource {
    supports_prompt: bool,
    standalone: bool,
    shown: Arc<AtomicUsize>,
    listeners: Arc<ListenerSet<InstallEvent>>,
}

impl InMemoryInstallSource {
    /// Creates a browser-tab source that supports install prompts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            supports_prompt: true,
            standalone: false,
            shown: Arc::new(AtomicUsize::new(0)),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    /// Creates a source for an app already running installed.
    #[must_use]
    pub fn standalone() -> Self {
        Self {
            standalone: true,
            ..Self::new()
        }
    }

    /// Creates a source for a platform without install prompts.
    #[must_use]
    pub fn without_prompt_support() -> Self {
        Self {
            supports_prompt: false,
            ..Self::new()
        }
    }

    /// Builds a prompt token answering `choice`.
    #[must_use]
    pub fn eligible_token(&self, choice: InstallChoice) -> InstallPromptToken {
        self.token(Ok(choice), None)
    }

    /// Builds a prompt token whose prompt fails.
    #[must_use]
    pub fn failing_token(&self) -> InstallPromptToken {
        self.token(
            Err(InstallPromptError::runtime(std::io::Error::other(
                "prompt unavailable",
            ))),
            None,
        )
    }

    /// Builds a prompt token that answers `choice` once the gate is notified.
    #[must_use]
    pub fn gated_token(&self, choice: InstallChoice) -> (InstallPromptToken, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (self.token(Ok(choice), Some(Arc::clone(&gate))), gate)
    }

    /// Emits an eligibility event carrying a token answering `choice`.
    pub fn announce_eligible(&self, choice: InstallChoice) -> InstallPromptToken {
        let token = self.eligible_token(choice);
        self.listeners.emit(&InstallEvent::Eligible(token.clone()));
        token
    }

    /// Emits the installed event.
    pub fn announce_installed(&self) {
        self.listeners.emit(&InstallEvent::Installed);
    }

    /// Returns how many prompts were shown.
    #[must_use]
    pub fn prompts_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    fn token(
        &self,
        outcome: Result<InstallChoice, InstallPromptError>,
        gate: Option<Arc<Notify>>,
    ) -> InstallPromptToken {
        InstallPromptToken::new(ScriptedInstallPrompt {
            outcome,
            shown: Arc::clone(&self.shown),
            gate,
        })
    }
}

impl Default for InMemoryInstallSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallSource for InMemoryInstallSource {
    fn supports_install_prompt(&self) -> bool {
        self.supports_prompt
    }

    fn is_standalone(&self) -> bool {
        self.standalone
    }

    fn subscribe(&self, listener: Listener<InstallEvent>) -> Subscription {
        self.listeners.add(listener)
    }
}
