//! Errors raised while loading an allow-list.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for allow-list operations.
pub type AllowListResult<T> = Result<T, AllowListError>;

/// Fatal allow-list load failures. Both variants carry the offending path.
#[derive(Debug, Error)]
pub enum AllowListError {
    /// The allow-list path does not exist.
    #[error("allow-list file `{}` not found", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The path exists but could not be read as UTF-8 text.
    #[error("allow-list file `{}` is unreadable: {source}", path.display())]
    Unreadable {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl AllowListError {
    /// Returns the path that failed to load.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } => path,
        }
    }
}
