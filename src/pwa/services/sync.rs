//! Deferred reconciliation through background sync tags.

use super::AgentHandleReader;
use crate::pwa::{domain::SyncTag, ports::AgentRuntime};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Registers the fixed sync tag set with the background agent.
pub struct SyncScheduler {
    runtime: Arc<dyn AgentRuntime>,
    agent: AgentHandleReader,
    tags: Vec<SyncTag>,
}

impl SyncScheduler {
    /// Creates a scheduler for `tags`.
    #[must_use]
    pub fn new(runtime: Arc<dyn AgentRuntime>, agent: AgentHandleReader, tags: Vec<SyncTag>) -> Self {
        Self {
            runtime,
            agent,
            tags,
        }
    }

    /// Reports platform background sync support, independent of whether an
    /// agent is registered.
    #[must_use]
    pub fn supports_background_sync(&self) -> bool {
        self.runtime.is_supported() && self.runtime.supports_background_sync()
    }

    /// Registers every sync tag with the agent.
    ///
    /// Without an agent handle or sync support this does nothing. Returns the
    /// number of tags the agent accepted.
    pub async fn schedule_reconciliation(&self) -> usize {
        let Some(handle) = self.agent.current() else {
            debug!("reconciliation skipped without agent");
            return 0;
        };
        if !self.runtime.supports_background_sync() {
            debug!("background sync unsupported; reconciliation skipped");
            return 0;
        }

        let mut accepted = 0;
        for tag in &self.tags {
            match self.runtime.register_sync(&handle, tag).await {
                Ok(()) => accepted += 1,
                Err(err) => error!(error = %err, tag = %tag, "sync registration failed"),
            }
        }
        info!(accepted, requested = self.tags.len(), "reconciliation scheduled");
        accepted
    }
}
