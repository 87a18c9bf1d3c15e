//! Configuration management for toolgate.
//!
//! Settings come from an optional JSON file and are then overridden field by
//! field by command-line values.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigResult, load_file};
pub use schema::{ConfigOverrides, GateConfig};
