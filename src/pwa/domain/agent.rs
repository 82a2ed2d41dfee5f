//! Background execution agent lifecycle, handle and message types.

use super::{ParseAgentLifecycleStateError, SharePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Message type posted by the agent when it refreshed its caches.
pub const CACHE_UPDATED_MESSAGE: &str = "CACHE_UPDATED";
/// Message type posted by the agent once the app can run offline.
pub const OFFLINE_READY_MESSAGE: &str = "OFFLINE_READY";
/// Message type posted by the agent when content was shared into the app.
pub const SHARED_CONTENT_MESSAGE: &str = "SHARED_CONTENT";

/// Lifecycle state of the background execution agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLifecycleState {
    /// No registration exists, or the platform has no agent runtime.
    Unregistered,
    /// Registration is in flight.
    Registering,
    /// A registration controls the client.
    Active,
    /// A new agent version finished installing while the old one still controls the client.
    UpdateAvailable,
    /// The waiting version is taking control.
    Activating,
    /// Registration was rejected. Only an explicit retry leaves this state.
    Failed,
}

impl AgentLifecycleState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Registering => "registering",
            Self::Active => "active",
            Self::UpdateAvailable => "update_available",
            Self::Activating => "activating",
            Self::Failed => "failed",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unregistered | Self::Failed, Self::Registering)
                | (Self::Registering, Self::Active | Self::Failed)
                | (Self::Active, Self::UpdateAvailable | Self::Unregistered)
                | (Self::UpdateAvailable, Self::Activating | Self::Unregistered)
                | (Self::Activating, Self::Active | Self::UpdateAvailable)
        )
    }
}

impl fmt::Display for AgentLifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentLifecycleState {
    type Error = ParseAgentLifecycleStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unregistered" => Ok(Self::Unregistered),
            "registering" => Ok(Self::Registering),
            "active" => Ok(Self::Active),
            "update_available" => Ok(Self::UpdateAvailable),
            "activating" => Ok(Self::Activating),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseAgentLifecycleStateError(value.to_owned())),
        }
    }
}

/// Unique identifier for an agent registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentRegistrationId(Uuid);

impl AgentRegistrationId {
    /// Creates a new random registration identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AgentRegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentRegistrationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque reference to the active agent registration.
///
/// Runtimes mint handles; the lifecycle manager is the only component that
/// stores or replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentHandle {
    id: AgentRegistrationId,
    scope: String,
    generation: u64,
}

impl AgentHandle {
    /// Creates the first-generation handle for a registration scope.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            id: AgentRegistrationId::new(),
            scope: scope.into(),
            generation: 1,
        }
    }

    /// Returns the handle for the next agent version of the same registration.
    #[must_use]
    pub fn successor(&self) -> Self {
        Self {
            id: self.id,
            scope: self.scope.clone(),
            generation: self.generation.saturating_add(1),
        }
    }

    /// Returns the registration identifier.
    #[must_use]
    pub const fn id(&self) -> AgentRegistrationId {
        self.id
    }

    /// Returns the registration scope.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the agent version generation, starting at 1.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// How intermediate HTTP caches may serve the agent script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateViaCache {
    /// Only imported scripts may come from the HTTP cache.
    Imports,
    /// The script and its imports may come from the HTTP cache.
    All,
    /// Always fetch the script fresh.
    None,
}

impl UpdateViaCache {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::All => "all",
            Self::None => "none",
        }
    }
}

/// Options passed to the runtime when registering the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRegistrationOptions {
    /// Path of the agent script.
    pub script_url: String,
    /// Navigation scope controlled by the agent.
    pub scope: String,
    /// HTTP cache policy for the agent script.
    pub update_via_cache: UpdateViaCache,
}

impl Default for AgentRegistrationOptions {
    fn default() -> Self {
        Self {
            script_url: "/sw.js".to_owned(),
            scope: "/".to_owned(),
            update_via_cache: UpdateViaCache::None,
        }
    }
}

/// Typed message posted by the agent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentMessage {
    /// The agent refreshed its caches.
    CacheUpdated,
    /// The app shell is cached and usable offline.
    OfflineReady,
    /// Content was shared into the app through the agent.
    SharedContent(SharePayload),
    /// Any message this client does not understand.
    Unknown {
        /// The `type` field, when one was present.
        kind: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawAgentMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<Value>,
}

impl AgentMessage {
    /// Decodes an untyped `{ "type": ..., "data": ... }` payload.
    ///
    /// Unrecognised types and malformed payloads decode to
    /// [`AgentMessage::Unknown`] so new agent versions never break older
    /// clients.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let Ok(raw) = RawAgentMessage::deserialize(payload) else {
            let kind = payload
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_owned);
            return Self::Unknown { kind };
        };

        let RawAgentMessage { kind, data } = raw;
        match kind.as_str() {
            CACHE_UPDATED_MESSAGE => Self::CacheUpdated,
            OFFLINE_READY_MESSAGE => Self::OfflineReady,
            SHARED_CONTENT_MESSAGE => data
                .and_then(|value| serde_json::from_value::<SharePayload>(value).ok())
                .map_or_else(
                    || Self::Unknown {
                        kind: Some(kind.clone()),
                    },
                    Self::SharedContent,
                ),
            _ => Self::Unknown {
                kind: Some(kind.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(AgentLifecycleState::Unregistered, AgentLifecycleState::Registering, true)]
    #[case(AgentLifecycleState::Failed, AgentLifecycleState::Registering, true)]
    #[case(AgentLifecycleState::Registering, AgentLifecycleState::Active, true)]
    #[case(AgentLifecycleState::Registering, AgentLifecycleState::Failed, true)]
    #[case(AgentLifecycleState::Active, AgentLifecycleState::UpdateAvailable, true)]
    #[case(AgentLifecycleState::UpdateAvailable, AgentLifecycleState::Activating, true)]
    #[case(AgentLifecycleState::Activating, AgentLifecycleState::Active, true)]
    #[case(AgentLifecycleState::Unregistered, AgentLifecycleState::Active, false)]
    #[case(AgentLifecycleState::Active, AgentLifecycleState::Registering, false)]
    #[case(AgentLifecycleState::Failed, AgentLifecycleState::Active, false)]
    #[case(AgentLifecycleState::UpdateAvailable, AgentLifecycleState::Active, false)]
    fn lifecycle_transition_matrix(
        #[case] current: AgentLifecycleState,
        #[case] target: AgentLifecycleState,
        #[case] expected: bool,
    ) {
        assert_eq!(current.can_transition_to(target), expected);
    }

    #[test]
    fn lifecycle_state_parses_canonical_names() {
        assert_eq!(
            AgentLifecycleState::try_from(" Update_Available "),
            Ok(AgentLifecycleState::UpdateAvailable)
        );
        assert!(AgentLifecycleState::try_from("installed").is_err());
    }

    #[test]
    fn successor_keeps_registration_and_bumps_generation() {
        let handle = AgentHandle::new("/");
        let next = handle.successor();

        assert_eq!(next.id(), handle.id());
        assert_eq!(next.generation(), 2);
        assert_ne!(next, handle);
    }

    #[rstest]
    #[case(json!({"type": "CACHE_UPDATED"}), AgentMessage::CacheUpdated)]
    #[case(json!({"type": "OFFLINE_READY", "data": null}), AgentMessage::OfflineReady)]
    #[case(
        json!({"type": "SKIP_WAITING"}),
        AgentMessage::Unknown { kind: Some("SKIP_WAITING".to_owned()) }
    )]
    #[case(json!({"payload": 1}), AgentMessage::Unknown { kind: None })]
    #[case(json!("CACHE_UPDATED"), AgentMessage::Unknown { kind: None })]
    fn decodes_agent_messages(#[case] payload: Value, #[case] expected: AgentMessage) {
        assert_eq!(AgentMessage::from_payload(&payload), expected);
    }

    #[test]
    fn decodes_shared_content() {
        let payload = json!({
            "type": "SHARED_CONTENT",
            "data": {"title": "Picnic", "url": "https://letz.app/e/1"}
        });

        let AgentMessage::SharedContent(shared) = AgentMessage::from_payload(&payload) else {
            panic!("expected shared content");
        };
        assert_eq!(shared.title(), Some("Picnic"));
        assert_eq!(shared.url(), Some("https://letz.app/e/1"));
        assert_eq!(shared.text(), None);
    }

    #[test]
    fn shared_content_without_data_is_not_dispatched() {
        let payload = json!({"type": "SHARED_CONTENT"});

        assert_eq!(
            AgentMessage::from_payload(&payload),
            AgentMessage::Unknown {
                kind: Some(SHARED_CONTENT_MESSAGE.to_owned())
            }
        );
    }
}
