//! LETZ client: lifecycle and connectivity orchestration.
//!
//! This crate keeps the LETZ social event-planning client usable as an
//! installable, offline-capable application. It coordinates a background
//! execution agent, installability, notification consent and push,
//! on-device caches, deferred sync and sharing, and exposes one facade with a
//! consumer-facing state snapshot.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Lifecycle states and value objects with no platform access
//! - **Ports**: Capability provider traits replacing ambient platform state
//! - **Adapters**: In-memory fakes and the HTTP push subscription client
//! - **Services**: Lifecycle components and the orchestrator facade
//!
//! # Modules
//!
//! - [`pwa`]: Orchestrator, components, ports and adapters
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod pwa;
pub mod telemetry;
