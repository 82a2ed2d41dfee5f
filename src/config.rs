//! Runtime configuration for the client orchestrator.
//!
//! Values come from defaults, optionally overridden by environment variables.
//! [`PwaConfig::from_lookup`] takes the lookup as a function so callers and
//! tests can supply values without touching the process environment.

use crate::pwa::domain::{
    AgentRegistrationOptions, NotificationDefaults, PwaDomainError, SyncTag, UpdateViaCache,
};
use thiserror::Error;

/// Development VAPID public key used when none is configured.
///
/// Not for production deployments.
pub const DEFAULT_VAPID_PUBLIC_KEY: &str =
    "BEl62iUYgUivxIkv69yViEuiBIa40HI2eaa7ufLdqgKGRbCWJcYYoXYgSz5nWJD_qFOEm_T4vVP3pTWWMM7DqSM";

/// Default base URL of the remote API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Environment variable holding the VAPID public key.
pub const VAPID_PUBLIC_KEY_ENV: &str = "LETZ_VAPID_PUBLIC_KEY";
/// Environment variable holding the API base URL.
pub const API_BASE_URL_ENV: &str = "LETZ_API_BASE_URL";
/// Environment variable overriding the agent script URL.
pub const AGENT_SCRIPT_URL_ENV: &str = "LETZ_AGENT_SCRIPT_URL";
/// Environment variable overriding the sync tags, comma separated.
pub const SYNC_TAGS_ENV: &str = "LETZ_SYNC_TAGS";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A configured value was present but blank.
    #[error("{name} must not be blank")]
    Blank {
        /// Environment variable name.
        name: &'static str,
    },

    /// The API base URL does not use http or https.
    #[error("{name} must be an http(s) URL, got {value}")]
    InvalidUrl {
        /// Environment variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A sync tag failed validation.
    #[error("invalid sync tag in {name}: {source}")]
    InvalidSyncTag {
        /// Environment variable name.
        name: &'static str,
        /// Validation failure.
        source: PwaDomainError,
    },
}

/// Orchestrator configuration.
///
/// # Examples
///
/// ```
/// use letz_client::config::PwaConfig;
///
/// let config = PwaConfig::default();
/// assert_eq!(config.agent_script_url, "/sw.js");
/// assert_eq!(config.sync_tags.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwaConfig {
    /// Background agent script location.
    pub agent_script_url: String,
    /// Scope the agent controls.
    pub agent_scope: String,
    /// HTTP cache policy for agent script fetches.
    pub update_via_cache: UpdateViaCache,
    /// Public key used to create push subscriptions.
    pub vapid_public_key: String,
    /// Base URL of the remote API.
    pub api_base_url: String,
    /// Sync tags registered on every reconciliation.
    pub sync_tags: Vec<SyncTag>,
    /// Title used for app-level notifications.
    pub app_name: String,
    /// Icon, badge and vibration applied to notifications.
    pub notification_defaults: NotificationDefaults,
}

impl Default for PwaConfig {
    fn default() -> Self {
        Self {
            agent_script_url: "/sw.js".to_owned(),
            agent_scope: "/".to_owned(),
            update_via_cache: UpdateViaCache::None,
            vapid_public_key: DEFAULT_VAPID_PUBLIC_KEY.to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            sync_tags: SyncTag::default_set(),
            app_name: "LETZ".to_owned(),
            notification_defaults: NotificationDefaults::default(),
        }
    }
}

impl PwaConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(key) = lookup(VAPID_PUBLIC_KEY_ENV) {
            config.vapid_public_key = non_blank(VAPID_PUBLIC_KEY_ENV, &key)?;
        }

        if let Some(url) = lookup(API_BASE_URL_ENV) {
            let trimmed = non_blank(API_BASE_URL_ENV, &url)?;
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name: API_BASE_URL_ENV,
                    value: trimmed,
                });
            }
            config.api_base_url = trimmed.trim_end_matches('/').to_owned();
        }

        if let Some(script) = lookup(AGENT_SCRIPT_URL_ENV) {
            config.agent_script_url = non_blank(AGENT_SCRIPT_URL_ENV, &script)?;
        }

        if let Some(tags) = lookup(SYNC_TAGS_ENV) {
            config.sync_tags = parse_sync_tags(&tags)?;
        }

        Ok(config)
    }

    /// Returns the options used to register the background agent.
    #[must_use]
    pub fn registration_options(&self) -> AgentRegistrationOptions {
        AgentRegistrationOptions {
            script_url: self.agent_script_url.clone(),
            scope: self.agent_scope.clone(),
            update_via_cache: self.update_via_cache,
        }
    }
}

fn non_blank(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Blank { name });
    }
    Ok(trimmed.to_owned())
}

fn parse_sync_tags(value: &str) -> Result<Vec<SyncTag>, ConfigError> {
    let tags = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            SyncTag::new(part).map_err(|source| ConfigError::InvalidSyncTag {
                name: SYNC_TAGS_ENV,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if tags.is_empty() {
        return Err(ConfigError::Blank {
            name: SYNC_TAGS_ENV,
        });
    }
    Ok(tags)
}
