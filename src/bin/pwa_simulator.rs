//! Replays a short client session against in-memory platform adapters.
//!
//! Usage:
//!
//! ```text
//! pwa_simulator [--remote-api]
//! ```
//!
//! Configuration comes from the `LETZ_*` environment variables. With
//! `--remote-api` push subscriptions are posted to `LETZ_API_BASE_URL`
//! instead of an in-memory API. Every state snapshot is logged; set
//! `RUST_LOG` to adjust verbosity.

use letz_client::config::PwaConfig;
use letz_client::pwa::adapters::HttpPushSubscriptionApi;
use letz_client::pwa::adapters::memory::InMemoryPlatform;
use letz_client::pwa::domain::{InstallChoice, NotificationOptions, PwaState, SharePayload};
use letz_client::pwa::services::PwaOrchestrator;
use letz_client::telemetry::{LogFormat, init_tracing};
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::{debug, info};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const REMOTE_API_FLAG: &str = "--remote-api";

fn main() -> Result<(), BoxError> {
    if !init_tracing("info", LogFormat::Compact) {
        debug!("tracing subscriber already installed");
    }
    let config = PwaConfig::from_env()?;
    let remote_api = std::env::args().skip(1).any(|arg| arg == REMOTE_API_FLAG);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(simulate(config, remote_api))
}

async fn simulate(config: PwaConfig, remote_api: bool) -> Result<(), BoxError> {
    let platform = InMemoryPlatform::new();
    let mut ports = platform.ports();
    if remote_api {
        ports.push_api = Arc::new(HttpPushSubscriptionApi::new(config.api_base_url.as_str()));
    }

    let orchestrator = PwaOrchestrator::new(ports, &config, Arc::new(DefaultClock));
    let _state_log = orchestrator.subscribe_state(Arc::new(|state: PwaState| {
        match serde_json::to_string(&state) {
            Ok(snapshot) => info!(%snapshot, "state"),
            Err(err) => info!(error = %err, "state snapshot not serialisable"),
        }
    }));

    orchestrator.start().await;

    platform.connectivity.go_offline();
    platform.connectivity.go_online();
    orchestrator.process_pending_events().await;

    orchestrator.request_notification_permission().await;
    orchestrator
        .notify(
            config.app_name.as_str(),
            NotificationOptions::new().with_body("Your event starts in one hour."),
        )
        .await;

    platform.install.announce_eligible(InstallChoice::Accepted);
    orchestrator.process_pending_events().await;
    orchestrator.install().await;

    let invite = SharePayload::new()
        .with_title("Rooftop party")
        .with_url("https://letz.app/events/rooftop");
    orchestrator.share(&invite).await;

    if let Some(usage) = orchestrator.estimate_usage().await {
        info!(usage = usage.human_readable(), "cache usage");
    }
    orchestrator.clear_cache().await;

    orchestrator.shutdown();
    info!(
        reloads = platform.reloader.reloads(),
        synced_tags = ?platform.agent.pending_sync_tags(),
        "simulation finished"
    );
    Ok(())
}
