//! Deferred synchronisation task tokens.

use super::PwaDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for pending event mutations.
pub const SYNC_EVENTS_TAG: &str = "sync-events";
/// Tag for outgoing messages queued while offline.
pub const SEND_MESSAGES_TAG: &str = "send-messages";

/// Named category of pending work registered with the agent.
///
/// The agent de-duplicates registrations by tag identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncTag(String);

impl SyncTag {
    /// Creates a validated sync tag.
    ///
    /// Tags are trimmed and lowercased; only `[a-z0-9-_]` is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PwaDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, PwaDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(PwaDomainError::EmptySyncTag);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '-'
                || character == '_'
        });
        if !is_valid {
            return Err(PwaDomainError::InvalidSyncTag(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the fixed set of tags the client reconciles.
    #[must_use]
    pub fn default_set() -> Vec<Self> {
        [SYNC_EVENTS_TAG, SEND_MESSAGES_TAG]
            .into_iter()
            .map(|tag| Self(tag.to_owned()))
            .collect()
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SyncTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SyncTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
