//! Network reachability domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reachability reported by the platform.
///
/// This is a best-effort hint. Requests still fail independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    /// The platform reports a usable network.
    Online,
    /// The platform reports no network.
    Offline,
}

impl ConnectivityState {
    /// Maps the platform's boolean reachability flag.
    #[must_use]
    pub const fn from_flag(is_online: bool) -> Self {
        if is_online { Self::Online } else { Self::Offline }
    }

    /// Returns whether this state is [`ConnectivityState::Online`].
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A change between two distinct reachability states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityTransition {
    from: ConnectivityState,
    to: ConnectivityState,
    occurred_at: DateTime<Utc>,
}

impl ConnectivityTransition {
    /// Creates a transition record.
    #[must_use]
    pub const fn new(
        from: ConnectivityState,
        to: ConnectivityState,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from,
            to,
            occurred_at,
        }
    }

    /// Returns the state before the transition.
    #[must_use]
    pub const fn from(&self) -> ConnectivityState {
        self.from
    }

    /// Returns the state after the transition.
    #[must_use]
    pub const fn to(&self) -> ConnectivityState {
        self.to
    }

    /// Returns when the transition was observed.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns whether connectivity came back (`offline -> online`).
    #[must_use]
    pub const fn is_reconnect(&self) -> bool {
        matches!(
            (self.from, self.to),
            (ConnectivityState::Offline, ConnectivityState::Online)
        )
    }
}
