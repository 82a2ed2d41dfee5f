//! Shared fixtures for the in-memory orchestrator tests.

use letz_client::config::PwaConfig;
use letz_client::pwa::adapters::memory::InMemoryPlatform;
use letz_client::pwa::services::PwaOrchestrator;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Provides an online, fully capable platform without native sharing.
#[fixture]
pub fn platform() -> InMemoryPlatform {
    InMemoryPlatform::new()
}

/// Builds an orchestrator over `platform` with the default configuration.
pub fn orchestrator(platform: &InMemoryPlatform) -> PwaOrchestrator {
    PwaOrchestrator::new(
        platform.ports(),
        &PwaConfig::default(),
        Arc::new(DefaultClock),
    )
}

/// Builds and starts an orchestrator over `platform`.
pub async fn started(platform: &InMemoryPlatform) -> PwaOrchestrator {
    let orchestrator = orchestrator(platform);
    orchestrator.start().await;
    orchestrator
}
