//! Allow-list filtering of advertised tools.
//!
//! An allow-list file is parsed once into an immutable [`AllowList`], wrapped
//! in an [`AllowListState`] that distinguishes "no filter configured" from
//! "filter configured", and applied to registry listings by [`apply`]. The
//! [`report`] module helps operators build and validate such files.

#![warn(missing_docs, clippy::pedantic)]

pub mod allowlist;
pub mod engine;
pub mod error;
pub mod report;

pub use allowlist::{AllowList, AllowListState, parse_lines};
pub use engine::{AllowListHandle, FilteredRegistry, apply};
pub use error::{AllowListError, AllowListResult};
