//! Error types for client lifecycle domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or transitioning lifecycle domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PwaDomainError {
    /// A sync tag is empty after trimming.
    #[error("sync tag must not be empty")]
    EmptySyncTag,

    /// A sync tag contains whitespace or characters outside `[a-z0-9-_]`.
    #[error(
        "sync tag '{0}' contains invalid characters (only lowercase alphanumeric, '-' and '_' allowed)"
    )]
    InvalidSyncTag(String),

    /// A cache namespace name is empty after trimming.
    #[error("cache name must not be empty")]
    EmptyCacheName,

    /// A push subscription endpoint is empty.
    #[error("push subscription endpoint must not be empty")]
    EmptyPushEndpoint,

    /// A push subscription key is empty.
    #[error("push subscription key '{0}' must not be empty")]
    EmptyPushKey(&'static str),

    /// Transitioning the background agent between two states is invalid.
    #[error("invalid background agent transition: {from} -> {to}")]
    InvalidAgentTransition {
        /// Current lifecycle state.
        from: String,
        /// Requested target lifecycle state.
        to: String,
    },
}

/// Error returned while parsing a notification permission value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification permission: {0}")]
pub struct ParseNotificationPermissionError(pub String);

/// Error returned while parsing a background agent lifecycle state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown background agent lifecycle state: {0}")]
pub struct ParseAgentLifecycleStateError(pub String);
