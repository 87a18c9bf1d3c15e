//! Observability utilities for toolgate.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support;

pub use tracing_support::{LOG_ENV, init, resolve_directive};
