//! In-memory permission source and notification surface.

use crate::pwa::{
    domain::{NotificationPermission, NotificationRequest},
    ports::{NotificationPortError, NotificationPortResult, NotificationSurface, PermissionSource},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Permission source answering prompts with a preset decision.
#[derive(Debug, Clone)]
pub struct InMemoryPermissionSource {
    state: Arc<RwLock<PermissionState>>,
}

#[derive(Debug)]
struct PermissionState {
    supported: bool,
    current: NotificationPermission,
    answer: NotificationPermission,
    prompts: usize,
}

impl InMemoryPermissionSource {
    /// Creates an undecided source whose prompt answers `answer`.
    #[must_use]
    pub fn answering(answer: NotificationPermission) -> Self {
        Self::build(true, NotificationPermission::Default, answer)
    }

    /// Creates a source already at `current`.
    #[must_use]
    pub fn with_current(current: NotificationPermission) -> Self {
        Self::build(true, current, current)
    }

    /// Creates a source for a platform without notifications.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::build(
            false,
            NotificationPermission::Default,
            NotificationPermission::Denied,
        )
    }

    /// Overrides the current permission, as if changed in site settings.
    pub fn set_current(&self, permission: NotificationPermission) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .current = permission;
    }

    /// Returns how many times the user was prompted.
    #[must_use]
    pub fn prompts(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
    }

    fn build(
        supported: bool,
        current: NotificationPermission,
        answer: NotificationPermission,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(PermissionState {
                supported,
                current,
                answer,
                prompts: 0,
            })),
        }
    }
}

#[async_trait]
impl PermissionSource for InMemoryPermissionSource {
    fn is_supported(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .supported
    }

    fn current(&self) -> NotificationPermission {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    async fn request(&self) -> NotificationPortResult<NotificationPermission> {
        let mut state = self.state.write().map_err(|err| {
            NotificationPortError::runtime(std::io::Error::other(err.to_string()))
        })?;
        if !state.supported {
            return Err(NotificationPortError::Unsupported);
        }
        state.prompts += 1;
        state.current = state.answer;
        Ok(state.answer)
    }
}

/// Notification surface that records what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSurface {
    shown: Arc<RwLock<Vec<NotificationRequest>>>,
}

impl RecordingNotificationSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification shown so far.
    #[must_use]
    pub fn shown(&self) -> Vec<NotificationRequest> {
        self.shown
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationSurface for RecordingNotificationSurface {
    async fn show(&self, request: &NotificationRequest) -> NotificationPortResult<()> {
        self.shown
            .write()
            .map_err(|err| NotificationPortError::runtime(std::io::Error::other(err.to_string())))?
            .push(request.clone());
        Ok(())
    }
}
