//! Client lifecycle and connectivity orchestration.
//!
//! The orchestrator keeps the client usable as an installable, offline-capable
//! app. It tracks reachability, owns the background agent registration, drives
//! the install prompt, manages notification consent and push subscription,
//! clears caches, schedules deferred sync and bridges sharing.
//!
//! Platform capabilities enter through [`ports`]; [`adapters::memory`] holds
//! deterministic fakes for every port.

pub mod adapters;
pub mod domain;
pub mod listeners;
pub mod ports;
pub mod services;
