//! In-memory adapters for every platform port.
//!
//! These fakes model platform behaviour deterministically. They back the
//! unit, integration and behaviour tests and the simulator binary.

mod agent;
mod cache;
mod clock;
mod connectivity;
mod install;
mod notification;
mod platform;
mod push_api;
mod share;

pub use agent::InMemoryAgentRuntime;
pub use cache::{InMemoryCacheStore, InMemoryPageReloader};
pub use clock::FixedClock;
pub use connectivity::InMemoryConnectivity;
pub use install::{InMemoryInstallSource, ScriptedInstallPrompt};
pub use notification::{InMemoryPermissionSource, RecordingNotificationSurface};
pub use platform::InMemoryPlatform;
pub use push_api::InMemoryPushSubscriptionApi;
pub use share::{InMemoryClipboard, InMemoryShareTarget};
