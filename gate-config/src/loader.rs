//! Configuration file loading.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::schema::GateConfig;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read config file `{}`: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Configuration file is not valid JSON for [`GateConfig`].
    #[error("failed to parse config file `{}`: {source}", path.display())]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Merged configuration violated a constraint.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    /// No catalog path was supplied.
    #[error("no tool catalog configured; pass --catalog or set `catalog` in the config file")]
    MissingCatalog,
}

/// Reads a JSON configuration file.
///
/// Relative `catalog` and `tools_file` paths are resolved against the
/// directory holding the config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] naming the path.
pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<GateConfig> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: GateConfig =
        serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(base) = path.parent() {
        config.catalog = config.catalog.map(|p| base.join(p));
        config.tools_file = config.tools_file.map(|p| base.join(p));
    }

    debug!(path = %path.display(), ?config, "configuration file loaded");
    Ok(config)
}
