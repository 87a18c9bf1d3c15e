//! Tool catalog used as the upstream source of the allow-list filter.
//!
//! The registry keeps descriptors in registration order and answers
//! category-scoped listing queries. Catalogs can be loaded from a JSON file
//! or from a directory holding one JSON file per category.

#![warn(missing_docs, clippy::pedantic)]

pub mod catalog;
pub mod registry;

pub use catalog::load_catalog;
pub use registry::{RegistryError, RegistryResult, ToolRegistry, ToolSource};
