//! Core shared types for the toolgate allow-list filter.

#![warn(missing_docs, clippy::pedantic)]

mod descriptor;
mod error;
mod scope;

/// Tool descriptors advertised by a registry.
pub use descriptor::{DEFAULT_MAX_NAME_LEN, ToolDescriptor, name_len};
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Optional category predicate shared by listing and registry queries.
pub use scope::CategoryScope;
