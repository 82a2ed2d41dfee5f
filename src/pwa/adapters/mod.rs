//! Adapter implementations for the platform ports.

pub mod memory;

mod http;

pub use http::HttpPushSubscriptionApi;
