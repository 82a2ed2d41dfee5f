//! Facade that wires the lifecycle components to platform events.
//!
//! Platform listeners only enqueue [`PlatformEvent`]s. The orchestrator drains
//! the queue one event at a time, so component reactions run in delivery
//! order regardless of which source produced them. Every command and every
//! processed event publishes a fresh [`PwaState`] to state listeners.

use super::{
    AgentSignal, BackgroundAgentManager, CacheStorageController, ConnectivityMonitor,
    InstallabilityController, NotificationAuthority, SharingBridge, SyncScheduler,
};
use crate::config::PwaConfig;
use crate::pwa::{
    domain::{
        AgentLifecycleState, AgentMessage, CacheUsageEstimate, ConnectivityState,
        ConnectivityTransition, NotificationAction, NotificationOptions, PushSubscription,
        PwaState, SharePayload, SupportedFeatures,
    },
    listeners::{Listener, ListenerSet, Subscription},
    ports::{
        AgentEvent, AgentRuntime, CacheStore, Clipboard, ConnectivitySource, InstallEvent,
        InstallSource, NotificationSurface, PageReloader, PermissionSource, PushSubscriptionApi,
        ShareTarget,
    },
};
use mockable::Clock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, mpsc, watch};
use tracing::{debug, info};

/// Platform capability providers the orchestrator is built from.
#[derive(Clone)]
pub struct PwaPlatform {
    /// Reachability signal.
    pub connectivity: Arc<dyn ConnectivitySource>,
    /// Background agent runtime.
    pub agent_runtime: Arc<dyn AgentRuntime>,
    /// Install-eligibility signal.
    pub install_source: Arc<dyn InstallSource>,
    /// Notification permission.
    pub permissions: Arc<dyn PermissionSource>,
    /// Direct notification display.
    pub notification_surface: Arc<dyn NotificationSurface>,
    /// On-device cache storage.
    pub cache_store: Arc<dyn CacheStore>,
    /// Full page reload.
    pub page_reloader: Arc<dyn PageReloader>,
    /// Native share surface.
    pub share_target: Arc<dyn ShareTarget>,
    /// Clipboard access.
    pub clipboard: Arc<dyn Clipboard>,
    /// Remote push subscription API.
    pub push_api: Arc<dyn PushSubscriptionApi>,
}

/// An event delivered by a platform source.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Reachability changed.
    Connectivity(ConnectivityState),
    /// The background agent reported something.
    Agent(AgentEvent),
    /// Install eligibility or installation happened.
    Install(InstallEvent),
}

/// Lifecycle and connectivity orchestrator for the client.
pub struct PwaOrchestrator {
    connectivity: ConnectivityMonitor,
    agent: BackgroundAgentManager,
    install: InstallabilityController,
    notifications: Arc<NotificationAuthority>,
    cache: CacheStorageController,
    sync: SyncScheduler,
    sharing: SharingBridge,
    app_name: String,
    sender: mpsc::UnboundedSender<PlatformEvent>,
    receiver: AsyncMutex<mpsc::UnboundedReceiver<PlatformEvent>>,
    subscriptions: Mutex<Vec<Subscription>>,
    state_listeners: ListenerSet<PwaState>,
    in_flight: AtomicUsize,
    started: AtomicBool,
    stop: watch::Sender<bool>,
}

/// Marks a long-running command as in flight until dropped.
struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PwaOrchestrator {
    /// Builds the orchestrator and its components.
    ///
    /// Nothing touches the platform until [`Self::start`] runs.
    #[must_use]
    pub fn new(platform: PwaPlatform, config: &PwaConfig, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let agent = BackgroundAgentManager::new(
            Arc::clone(&platform.agent_runtime),
            config.registration_options(),
        );
        let notifications = Arc::new(
            NotificationAuthority::new(
                platform.permissions,
                platform.notification_surface,
                Arc::clone(&platform.agent_runtime),
                platform.push_api,
                agent.handle_reader(),
                Arc::clone(&clock),
            )
            .with_application_server_key(config.vapid_public_key.as_str())
            .with_defaults(config.notification_defaults.clone()),
        );
        let sync = SyncScheduler::new(
            Arc::clone(&platform.agent_runtime),
            agent.handle_reader(),
            config.sync_tags.clone(),
        );
        let sharing = SharingBridge::new(
            platform.share_target,
            platform.clipboard,
            Arc::clone(&notifications),
            config.app_name.as_str(),
        );
        let (sender, receiver) = mpsc::unbounded_channel();
        let (stop, _) = watch::channel(false);

        Self {
            connectivity: ConnectivityMonitor::new(platform.connectivity, clock),
            install: InstallabilityController::new(platform.install_source),
            cache: CacheStorageController::new(platform.cache_store, platform.page_reloader),
            agent,
            notifications,
            sync,
            sharing,
            app_name: config.app_name.clone(),
            sender,
            receiver: AsyncMutex::new(receiver),
            subscriptions: Mutex::new(Vec::new()),
            state_listeners: ListenerSet::new(),
            in_flight: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            stop,
        }
    }

    /// Attaches platform listeners and registers the background agent.
    ///
    /// Calling this again before [`Self::shutdown`] only returns the state.
    pub async fn start(&self) -> PwaState {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.state();
        }
        self.stop.send_replace(false);
        let loading = self.begin_loading();

        self.connectivity.resync();
        let connectivity = self.forwarder(PlatformEvent::Connectivity);
        let agent = self.forwarder(PlatformEvent::Agent);
        let install = self.forwarder(PlatformEvent::Install);
        let attached = vec![
            self.connectivity.listen(connectivity),
            self.agent.listen(agent),
            self.install.listen(install),
        ];
        self.lock_subscriptions().extend(attached);

        let agent_state = self.agent.register().await;
        self.after_agent_change().await;

        drop(loading);
        info!(
            agent = %agent_state,
            online = self.connectivity.is_online(),
            installed = self.install.is_installed(),
            "client orchestrator started"
        );
        self.publish_state()
    }

    /// Detaches every platform listener and stops [`Self::run`].
    pub fn shutdown(&self) {
        let attached: Vec<Subscription> = self.lock_subscriptions().drain(..).collect();
        let count = attached.len();
        for subscription in attached {
            subscription.dispose();
        }
        self.started.store(false, Ordering::SeqCst);
        self.stop.send_replace(true);
        info!(listeners = count, "client orchestrator shut down");
    }

    /// Applies one platform event.
    pub async fn dispatch(&self, event: PlatformEvent) {
        match event {
            PlatformEvent::Connectivity(next) => {
                if let Some(transition) = self.connectivity.apply(next)
                    && transition.is_reconnect()
                {
                    self.sync.schedule_reconciliation().await;
                }
            }
            PlatformEvent::Agent(agent_event) => self.handle_agent_event(agent_event).await,
            PlatformEvent::Install(install_event) => self.install.on_event(install_event),
        }
        self.publish_state();
    }

    /// Applies every queued platform event in delivery order.
    ///
    /// Returns the number of events processed.
    pub async fn process_pending_events(&self) -> usize {
        let mut processed = 0;
        loop {
            let next = self.receiver.lock().await.try_recv();
            let Ok(event) = next else {
                return processed;
            };
            self.dispatch(event).await;
            processed += 1;
        }
    }

    /// Applies platform events as they arrive until [`Self::shutdown`].
    ///
    /// Returns at once when the orchestrator is shut down. After a restart
    /// through [`Self::start`] it can be driven again.
    pub async fn run(&self) {
        let mut stop = self.stop.subscribe();
        let mut receiver = self.receiver.lock().await;
        loop {
            let stopped = *stop.borrow_and_update();
            if stopped {
                break;
            }
            tokio::select! {
                changed = stop.changed() => if changed.is_err() {
                    break;
                },
                received = receiver.recv() => match received {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },
            }
        }
        debug!("event loop stopped");
    }

    /// Returns a snapshot of the consumer-facing state.
    #[must_use]
    pub fn state(&self) -> PwaState {
        PwaState {
            is_online: self.connectivity.is_online(),
            is_installable: self.install.is_installable(),
            is_installed: self.install.is_installed(),
            is_loading: self.in_flight.load(Ordering::SeqCst) > 0,
            notification_permission: self.notifications.permission(),
            cache_status: self.cache.status(),
            offline_ready: self.cache.offline_ready(),
            agent_state: self.agent.state(),
            installation_state: self.install.state(),
            is_supported: self.supported(),
        }
    }

    /// Reports platform capabilities. Registration outcomes never change it.
    #[must_use]
    pub fn supported(&self) -> SupportedFeatures {
        SupportedFeatures {
            agent: self.agent.is_supported(),
            notifications: self.notifications.is_supported(),
            share: self.sharing.is_supported(),
            install_prompt: self.install.supports_install_prompt(),
            push: self.notifications.supports_push(),
            background_sync: self.sync.supports_background_sync(),
        }
    }

    /// Registers a listener for state snapshots.
    pub fn subscribe_state(&self, listener: Listener<PwaState>) -> Subscription {
        self.state_listeners.add(listener)
    }

    /// Registers a listener for reachability transitions.
    pub fn on_connectivity_change(&self, listener: Listener<ConnectivityTransition>) -> Subscription {
        self.connectivity.subscribe(listener)
    }

    /// Registers a listener for content shared into the app.
    pub fn on_shared_content(&self, listener: Listener<SharePayload>) -> Subscription {
        self.sharing.on_shared_content(listener)
    }

    /// Returns the most recent inbound share.
    #[must_use]
    pub fn last_shared_content(&self) -> Option<SharePayload> {
        self.sharing.last_shared_content()
    }

    /// Returns the agent lifecycle state.
    #[must_use]
    pub fn agent_state(&self) -> AgentLifecycleState {
        self.agent.state()
    }

    /// Returns the push subscription, if one was created.
    #[must_use]
    pub fn push_subscription(&self) -> Option<PushSubscription> {
        self.notifications.subscription()
    }

    /// Shows the install prompt. See [`InstallabilityController::install`].
    ///
    /// The state reports loading while the prompt is showing.
    pub async fn install(&self) -> bool {
        let installed = {
            let _loading = self.begin_loading();
            self.install.install().await
        };
        self.publish_state();
        installed
    }

    /// Asks for notification permission.
    pub async fn request_notification_permission(&self) -> bool {
        let granted = self.notifications.request_permission().await;
        self.publish_state();
        granted
    }

    /// Shows a notification when permission allows.
    pub async fn notify(&self, title: impl Into<String>, options: NotificationOptions) -> bool {
        self.notifications.notify(title, options).await
    }

    /// Subscribes to push messaging.
    pub async fn subscribe_push(&self) -> Option<PushSubscription> {
        self.notifications.subscribe_push().await
    }

    /// Removes the push subscription.
    pub async fn unsubscribe_push(&self) -> bool {
        self.notifications.unsubscribe_push().await
    }

    /// Deletes every application cache and reloads.
    ///
    /// The state reports loading until deletion finishes.
    pub async fn clear_cache(&self) -> bool {
        let cleared = {
            let _loading = self.begin_loading();
            self.cache.clear().await
        };
        self.publish_state();
        cleared
    }

    /// Estimates storage usage.
    pub async fn estimate_usage(&self) -> Option<CacheUsageEstimate> {
        self.cache.estimate_usage().await
    }

    /// Activates a waiting agent version or checks for a new one.
    ///
    /// After a failed registration this retries it instead.
    pub async fn update(&self) -> AgentLifecycleState {
        let state = if self.agent.state() == AgentLifecycleState::Failed {
            self.agent.register().await
        } else {
            self.agent.update().await
        };
        self.after_agent_change().await;
        self.publish_state();
        state
    }

    /// Unregisters the background agent.
    pub async fn unregister_agent(&self) -> bool {
        let removed = self.agent.unregister().await;
        self.publish_state();
        removed
    }

    /// Registers the sync tags with the agent.
    pub async fn schedule_reconciliation(&self) -> usize {
        self.sync.schedule_reconciliation().await
    }

    /// Shares through the native surface or the clipboard.
    pub async fn share(&self, payload: &SharePayload) -> bool {
        self.sharing.share(payload).await
    }

    /// Copies text to the clipboard with a confirmation notification.
    pub async fn copy_to_clipboard(&self, text: &str) -> bool {
        self.sharing.copy_to_clipboard(text).await
    }

    async fn handle_agent_event(&self, event: AgentEvent) {
        match self.agent.on_event(event) {
            AgentSignal::Ignored => {}
            AgentSignal::UpdateAvailable => {
                self.notifications
                    .notify(format!("{} Updated!", self.app_name), update_notification())
                    .await;
            }
            AgentSignal::Message(AgentMessage::CacheUpdated) => self.cache.mark_updated(),
            AgentSignal::Message(AgentMessage::OfflineReady) => self.cache.mark_offline_ready(),
            AgentSignal::Message(AgentMessage::SharedContent(payload)) => {
                self.sharing.receive_shared(payload);
            }
            AgentSignal::Message(AgentMessage::Unknown { .. }) => {}
        }
    }

    async fn after_agent_change(&self) {
        if self.agent.take_first_activation() {
            self.sync.schedule_reconciliation().await;
            self.notifications.on_agent_ready().await;
        }
    }

    fn forwarder<T: 'static>(&self, wrap: fn(T) -> PlatformEvent) -> Listener<T> {
        let sender = self.sender.clone();
        Arc::new(move |value| {
            if sender.send(wrap(value)).is_err() {
                debug!("platform event dropped after shutdown");
            }
        })
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        let guard = LoadingGuard::enter(&self.in_flight);
        self.publish_state();
        guard
    }

    fn publish_state(&self) -> PwaState {
        let state = self.state();
        self.state_listeners.emit(&state);
        state
    }

    fn lock_subscriptions(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn update_notification() -> NotificationOptions {
    NotificationOptions::new()
        .with_body("New version available. Tap to update.")
        .with_tag("app-update")
        .requiring_interaction()
        .with_action(NotificationAction::new("update", "Update").with_icon("/icons/action-update.png"))
        .with_action(NotificationAction::new("later", "Later").with_icon("/icons/action-close.png"))
}
