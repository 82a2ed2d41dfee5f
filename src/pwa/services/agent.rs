//! Background agent registration, update and message dispatch.

use crate::pwa::{
    domain::{
        AgentHandle, AgentLifecycleState, AgentMessage, AgentRegistrationOptions, PwaDomainError,
    },
    listeners::{Listener, Subscription},
    ports::{AgentEvent, AgentRuntime},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

/// Read-only view of the current agent handle.
///
/// Readers observe replacements made by [`BackgroundAgentManager`] but cannot
/// make any themselves.
#[derive(Debug, Clone, Default)]
pub struct AgentHandleReader {
    slot: Arc<RwLock<Option<Arc<AgentHandle>>>>,
}

impl AgentHandleReader {
    /// Returns the active handle, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<AgentHandle>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether an agent handle is held.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.current().is_some()
    }
}

/// Exclusive writer for the agent handle slot.
#[derive(Debug, Default)]
struct AgentHandleSlot {
    reader: AgentHandleReader,
}

impl AgentHandleSlot {
    fn replace(&self, handle: AgentHandle) {
        *self
            .reader
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handle));
    }

    fn clear(&self) {
        *self
            .reader
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Outcome of translating a runtime event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSignal {
    /// Nothing for other components to do.
    Ignored,
    /// A new version waits to take control.
    UpdateAvailable,
    /// A typed message for another component.
    Message(AgentMessage),
}

/// Owns the background agent registration and its lifecycle state.
pub struct BackgroundAgentManager {
    runtime: Arc<dyn AgentRuntime>,
    options: AgentRegistrationOptions,
    state: RwLock<AgentLifecycleState>,
    handle: AgentHandleSlot,
    activation_reported: AtomicBool,
}

impl BackgroundAgentManager {
    /// Creates a manager in the `unregistered` state.
    #[must_use]
    pub fn new(runtime: Arc<dyn AgentRuntime>, options: AgentRegistrationOptions) -> Self {
        Self {
            runtime,
            options,
            state: RwLock::new(AgentLifecycleState::Unregistered),
            handle: AgentHandleSlot::default(),
            activation_reported: AtomicBool::new(false),
        }
    }

    /// Reports whether the platform has an agent runtime.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.runtime.is_supported()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> AgentLifecycleState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a read-only view of the handle slot for dependent components.
    #[must_use]
    pub fn handle_reader(&self) -> AgentHandleReader {
        self.handle.reader.clone()
    }

    /// Returns the active handle, if any.
    #[must_use]
    pub fn current_handle(&self) -> Option<Arc<AgentHandle>> {
        self.handle.reader.current()
    }

    /// Registers the agent.
    ///
    /// Without runtime support the state stays `unregistered`. A rejected
    /// registration moves to `failed`; calling this again retries. Calls
    /// while a registration is held or in flight return the current state.
    pub async fn register(&self) -> AgentLifecycleState {
        if !self.runtime.is_supported() {
            info!("background agent runtime unsupported; continuing without agent");
            return self.state();
        }

        if let Err(current) = self.begin(AgentLifecycleState::Registering) {
            debug!(state = %current, "agent registration skipped");
            return current;
        }

        match self.runtime.register(&self.options).await {
            Ok(handle) => {
                info!(
                    registration = %handle.id(),
                    scope = handle.scope(),
                    script = %self.options.script_url,
                    "background agent registered"
                );
                self.handle.replace(handle);
                self.set_state(AgentLifecycleState::Active);
            }
            Err(err) => {
                error!(
                    error = %err,
                    script = %self.options.script_url,
                    "background agent registration failed"
                );
                self.set_state(AgentLifecycleState::Failed);
            }
        }
        self.state()
    }

    /// Returns `true` exactly once, the first time the agent is active.
    pub fn take_first_activation(&self) -> bool {
        self.state() == AgentLifecycleState::Active
            && !self.activation_reported.swap(true, Ordering::SeqCst)
    }

    /// Applies the explicit update command.
    ///
    /// With a waiting version, control passes to it and the handle is
    /// replaced. With only an active version, the runtime is asked to look
    /// for a newer script. Any other state is left alone.
    pub async fn update(&self) -> AgentLifecycleState {
        let Some(handle) = self.current_handle() else {
            debug!(state = %self.state(), "update ignored without agent handle");
            return self.state();
        };

        match self.state() {
            AgentLifecycleState::UpdateAvailable => self.activate_waiting(&handle).await,
            AgentLifecycleState::Active => {
                match self.runtime.check_for_update(&handle).await {
                    Ok(()) => info!(registration = %handle.id(), "checked for agent update"),
                    Err(err) => error!(error = %err, "agent update check failed"),
                }
                self.state()
            }
            other => other,
        }
    }

    /// Removes the registration and invalidates the handle.
    ///
    /// Returns `false` when nothing was registered or the runtime refused.
    pub async fn unregister(&self) -> bool {
        let Some(handle) = self.current_handle() else {
            return false;
        };

        match self.runtime.unregister(&handle).await {
            Ok(()) => {
                self.handle.clear();
                self.set_state(AgentLifecycleState::Unregistered);
                info!(registration = %handle.id(), "background agent unregistered");
                true
            }
            Err(err) => {
                error!(error = %err, "background agent unregistration failed");
                false
            }
        }
    }

    /// Translates a runtime event into a signal for other components.
    pub fn on_event(&self, event: AgentEvent) -> AgentSignal {
        match event {
            AgentEvent::UpdateInstalled => {
                match self.transition(AgentLifecycleState::UpdateAvailable) {
                    Ok(()) => {
                        info!("new background agent version installed and waiting");
                        AgentSignal::UpdateAvailable
                    }
                    Err(err) => {
                        debug!(error = %err, "update signal ignored");
                        AgentSignal::Ignored
                    }
                }
            }
            AgentEvent::Message(payload) => {
                let message = AgentMessage::from_payload(&payload);
                if let AgentMessage::Unknown { kind } = &message {
                    debug!(
                        kind = kind.as_deref().unwrap_or("<none>"),
                        "ignoring unknown agent message"
                    );
                    return AgentSignal::Ignored;
                }
                AgentSignal::Message(message)
            }
        }
    }

    /// Registers a listener for runtime events.
    pub fn listen(&self, listener: Listener<AgentEvent>) -> Subscription {
        if !self.runtime.is_supported() {
            return Subscription::noop();
        }
        self.runtime.subscribe(listener)
    }

    async fn activate_waiting(&self, handle: &AgentHandle) -> AgentLifecycleState {
        if let Err(current) = self.begin(AgentLifecycleState::Activating) {
            return current;
        }

        match self.runtime.activate_update(handle).await {
            Ok(next) => {
                info!(
                    registration = %next.id(),
                    generation = next.generation(),
                    "waiting agent version took control"
                );
                self.handle.replace(next);
                self.set_state(AgentLifecycleState::Active);
            }
            Err(err) => {
                warn!(error = %err, "agent activation failed; update still waiting");
                self.set_state(AgentLifecycleState::UpdateAvailable);
            }
        }
        self.state()
    }

    /// Moves into an in-flight state, refusing when the transition is invalid.
    fn begin(&self, target: AgentLifecycleState) -> Result<(), AgentLifecycleState> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(target) {
            return Err(*state);
        }
        *state = target;
        Ok(())
    }

    fn transition(&self, target: AgentLifecycleState) -> Result<(), PwaDomainError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(target) {
            return Err(PwaDomainError::InvalidAgentTransition {
                from: state.as_str().to_owned(),
                to: target.as_str().to_owned(),
            });
        }
        *state = target;
        Ok(())
    }

    fn set_state(&self, target: AgentLifecycleState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = target;
    }
}
