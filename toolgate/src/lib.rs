//! Tool-name allow-list filter facade.
//!
//! Bundles the toolgate crates behind feature flags so embedders can pull in
//! only the filter and registry without configuration or logging setup.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use gate_primitives as primitives;

/// Tool catalog and source trait (enabled by `registry` feature).
#[cfg(feature = "registry")]
pub use gate_registry as registry;

/// Allow-list loading, filtering, and reports (enabled by `filter` feature).
#[cfg(feature = "filter")]
pub use gate_filter as filter;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use gate_config as config;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use gate_telemetry as telemetry;
