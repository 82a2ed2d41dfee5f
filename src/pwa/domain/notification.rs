//! Notification permission, notification request and push subscription types.

use super::{ParseNotificationPermissionError, PwaDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// User consent for notifications.
///
/// Once [`NotificationPermission::Denied`] the platform never prompts again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    /// The user has not decided yet.
    #[default]
    Default,
    /// Notifications may be shown.
    Granted,
    /// Notifications are blocked.
    Denied,
}

impl NotificationPermission {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Returns whether notifications may be shown.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        !matches!(self, Self::Denied) || matches!(target, Self::Denied)
    }
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationPermission {
    type Error = ParseNotificationPermissionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            _ => Err(ParseNotificationPermissionError(value.to_owned())),
        }
    }
}

/// Action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Identifier reported back when the action is clicked.
    pub action: String,
    /// Button label.
    pub title: String,
    /// Optional button icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationAction {
    /// Creates an action without an icon.
    #[must_use]
    pub fn new(action: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            title: title.into(),
            icon: None,
        }
    }

    /// Sets the action icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Presentation defaults merged under every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDefaults {
    /// Default icon path.
    pub icon: String,
    /// Default badge path.
    pub badge: String,
    /// Default vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            icon: "/icons/icon-192x192.png".to_owned(),
            badge: "/icons/badge-72x72.png".to_owned(),
            vibrate: vec![200, 100, 200],
        }
    }
}

/// Caller-supplied notification options. Unset fields fall back to
/// [`NotificationDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    body: Option<String>,
    tag: Option<String>,
    icon: Option<String>,
    badge: Option<String>,
    vibrate: Option<Vec<u32>>,
    require_interaction: bool,
    actions: Vec<NotificationAction>,
    data: Map<String, Value>,
}

impl NotificationOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the replacement tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Overrides the default icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Overrides the default badge.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Overrides the default vibration pattern.
    #[must_use]
    pub fn with_vibrate(mut self, pattern: impl IntoIterator<Item = u32>) -> Self {
        self.vibrate = Some(pattern.into_iter().collect());
        self
    }

    /// Keeps the notification on screen until the user acts on it.
    #[must_use]
    pub const fn requiring_interaction(mut self) -> Self {
        self.require_interaction = true;
        self
    }

    /// Appends an action button.
    #[must_use]
    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a custom data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Merges these options over `defaults` into a displayable request.
    ///
    /// A `timestamp` data entry is added unless the caller supplied one.
    #[must_use]
    pub fn resolve(
        self,
        title: impl Into<String>,
        defaults: &NotificationDefaults,
        now: DateTime<Utc>,
    ) -> NotificationRequest {
        let mut data = self.data;
        data.entry("timestamp")
            .or_insert_with(|| Value::from(now.timestamp_millis()));

        NotificationRequest {
            title: title.into(),
            body: self.body,
            tag: self.tag,
            icon: self.icon.unwrap_or_else(|| defaults.icon.clone()),
            badge: self.badge.unwrap_or_else(|| defaults.badge.clone()),
            vibrate: self.vibrate.unwrap_or_else(|| defaults.vibrate.clone()),
            require_interaction: self.require_interaction,
            actions: self.actions,
            data,
        }
    }
}

/// Fully resolved notification handed to a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Notification title.
    pub title: String,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Replacement tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Icon path.
    pub icon: String,
    /// Badge path.
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
    /// Whether the notification stays until the user acts.
    pub require_interaction: bool,
    /// Action buttons.
    pub actions: Vec<NotificationAction>,
    /// Free-form data delivered back on click.
    pub data: Map<String, Value>,
}

/// Key material of a push subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PushSubscriptionKeys {
    p256dh: String,
    auth: String,
}

impl PushSubscriptionKeys {
    /// Creates validated key material.
    ///
    /// # Errors
    ///
    /// Returns [`PwaDomainError::EmptyPushKey`] when either key is blank.
    pub fn new(
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Result<Self, PwaDomainError> {
        let p256dh_key = p256dh.into().trim().to_owned();
        let auth_key = auth.into().trim().to_owned();
        if p256dh_key.is_empty() {
            return Err(PwaDomainError::EmptyPushKey("p256dh"));
        }
        if auth_key.is_empty() {
            return Err(PwaDomainError::EmptyPushKey("auth"));
        }
        Ok(Self {
            p256dh: p256dh_key,
            auth: auth_key,
        })
    }

    /// Returns the client public key.
    #[must_use]
    pub fn p256dh(&self) -> &str {
        &self.p256dh
    }

    /// Returns the authentication secret.
    #[must_use]
    pub fn auth(&self) -> &str {
        &self.auth
    }
}

/// Platform-issued push endpoint and keys for this installation.
///
/// Serialises to the standard push subscription JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    endpoint: String,
    expiration_time: Option<i64>,
    keys: PushSubscriptionKeys,
}

impl PushSubscription {
    /// Creates a validated subscription without an expiry.
    ///
    /// # Errors
    ///
    /// Returns [`PwaDomainError::EmptyPushEndpoint`] when the endpoint is blank.
    pub fn new(
        endpoint: impl Into<String>,
        keys: PushSubscriptionKeys,
    ) -> Result<Self, PwaDomainError> {
        let normalized = endpoint.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(PwaDomainError::EmptyPushEndpoint);
        }
        Ok(Self {
            endpoint: normalized,
            expiration_time: None,
            keys,
        })
    }

    /// Sets the expiry as milliseconds since the Unix epoch.
    #[must_use]
    pub const fn with_expiration_time(mut self, expiration_time: i64) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    /// Returns the push service endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the expiry, if any.
    #[must_use]
    pub const fn expiration_time(&self) -> Option<i64> {
        self.expiration_time
    }

    /// Returns the key material.
    #[must_use]
    pub const fn keys(&self) -> &PushSubscriptionKeys {
        &self.keys
    }
}
