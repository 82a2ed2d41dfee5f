//! Install-eligibility capture and the single-use install prompt flow.

use crate::pwa::{
    domain::{InstallChoice, InstallationState},
    listeners::{Listener, Subscription},
    ports::{InstallEvent, InstallPromptToken, InstallSource},
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};

#[derive(Debug, Default)]
struct InstallRecord {
    state: InstallationState,
    token: Option<InstallPromptToken>,
}

/// Tracks installability and drives the platform install prompt.
pub struct InstallabilityController {
    source: Arc<dyn InstallSource>,
    record: Mutex<InstallRecord>,
}

impl InstallabilityController {
    /// Creates a controller, starting as installed when the app already runs
    /// in standalone mode.
    #[must_use]
    pub fn new(source: Arc<dyn InstallSource>) -> Self {
        let state = if source.is_standalone() {
            InstallationState::Installed
        } else {
            InstallationState::NotInstallable
        };
        Self {
            source,
            record: Mutex::new(InstallRecord { state, token: None }),
        }
    }

    /// Reports whether the platform can raise an install prompt at all.
    #[must_use]
    pub fn supports_install_prompt(&self) -> bool {
        self.source.supports_install_prompt()
    }

    /// Returns the installation state.
    #[must_use]
    pub fn state(&self) -> InstallationState {
        self.lock().state
    }

    /// Returns whether the app is eligible for installation.
    ///
    /// Stays `true` after a declined prompt even though the token is spent;
    /// `install` then returns `false` until a fresh eligibility event.
    #[must_use]
    pub fn is_installable(&self) -> bool {
        matches!(
            self.state(),
            InstallationState::Installable | InstallationState::Dismissed
        )
    }

    /// Returns whether the app is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.state() == InstallationState::Installed
    }

    /// Returns whether the install prompt is showing.
    #[must_use]
    pub fn is_prompting(&self) -> bool {
        self.state() == InstallationState::Prompting
    }

    /// Applies a platform install event.
    pub fn on_event(&self, event: InstallEvent) {
        let mut record = self.lock();
        let current = record.state;
        match event {
            InstallEvent::Eligible(token) => match current {
                InstallationState::Installed | InstallationState::Prompting => {
                    debug!(state = %current, "install eligibility ignored");
                }
                _ => {
                    debug!(token = %token.id(), "install prompt captured");
                    record.token = Some(token);
                    record.state = InstallationState::Installable;
                }
            },
            InstallEvent::Installed => {
                record.token = None;
                record.state = InstallationState::Installed;
                info!("application installed");
            }
        }
    }

    /// Shows the install prompt and waits for the user's choice.
    ///
    /// Returns `false` without side effects when no token is held or a
    /// prompt is already showing. The token is spent either way once the
    /// prompt is shown.
    pub async fn install(&self) -> bool {
        let prompt = {
            let mut record = self.lock();
            if record.state == InstallationState::Prompting {
                debug!("install prompt already showing");
                return false;
            }
            let Some(prompt) = record.token.take().and_then(|token| token.take()) else {
                debug!(state = %record.state, "install requested without a prompt token");
                return false;
            };
            record.state = InstallationState::Prompting;
            prompt
        };

        let outcome = prompt.prompt().await;

        let mut record = self.lock();
        if record.state != InstallationState::Prompting {
            return record.state == InstallationState::Installed;
        }
        match outcome {
            Ok(InstallChoice::Accepted) => {
                record.state = InstallationState::Installed;
                info!("install prompt accepted");
                true
            }
            Ok(InstallChoice::Dismissed) => {
                record.state = InstallationState::Dismissed;
                info!("install prompt dismissed");
                false
            }
            Err(err) => {
                record.state = InstallationState::Dismissed;
                error!(error = %err, "install prompt failed");
                false
            }
        }
    }

    /// Registers a listener on the platform install source.
    pub fn listen(&self, listener: Listener<InstallEvent>) -> Subscription {
        self.source.subscribe(listener)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InstallRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
