//! Installability lifecycle types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Installation lifecycle of the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationState {
    /// No install-eligibility signal has been captured.
    #[default]
    NotInstallable,
    /// A prompt token is held and the install flow can be triggered.
    Installable,
    /// The platform install prompt is showing.
    Prompting,
    /// The app is installed.
    Installed,
    /// The user declined. Still installable, but the token was spent and a
    /// new eligibility signal is needed before prompting again.
    Dismissed,
}

impl InstallationState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotInstallable => "not_installable",
            Self::Installable => "installable",
            Self::Prompting => "prompting",
            Self::Installed => "installed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for InstallationState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The user's answer to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallChoice {
    /// The user installed the app.
    Accepted,
    /// The user closed the prompt.
    Dismissed,
}
