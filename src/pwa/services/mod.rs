//! Lifecycle components and the orchestrator facade.

mod agent;
mod cache;
mod connectivity;
mod install;
mod notification;
mod orchestrator;
mod share;
mod sync;

pub use agent::{AgentHandleReader, AgentSignal, BackgroundAgentManager};
pub use cache::CacheStorageController;
pub use connectivity::ConnectivityMonitor;
pub use install::InstallabilityController;
pub use notification::NotificationAuthority;
pub use orchestrator::{PlatformEvent, PwaOrchestrator, PwaPlatform};
pub use share::SharingBridge;
pub use sync::SyncScheduler;
