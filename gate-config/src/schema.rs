//! Strongly typed configuration schema.

use std::path::PathBuf;

use gate_primitives::DEFAULT_MAX_NAME_LEN;
use serde::{Deserialize, Serialize};

use crate::loader::{ConfigError, ConfigResult};

fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Resolved settings for one toolgate run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Tool catalog file or directory.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Allow-list file. `None` means every tool is advertised.
    #[serde(default)]
    pub tools_file: Option<PathBuf>,
    /// Downstream identifier length limit.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    /// Default `tracing` filter directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            tools_file: None,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the file value.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Overrides [`GateConfig::catalog`].
    pub catalog: Option<PathBuf>,
    /// Overrides [`GateConfig::tools_file`].
    pub tools_file: Option<PathBuf>,
    /// Overrides [`GateConfig::max_name_len`].
    pub max_name_len: Option<usize>,
    /// Overrides [`GateConfig::log_level`].
    pub log_level: Option<String>,
}

impl GateConfig {
    /// Applies command-line overrides on top of this configuration.
    #[must_use]
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(catalog) = overrides.catalog {
            self.catalog = Some(catalog);
        }
        if let Some(tools_file) = overrides.tools_file {
            self.tools_file = Some(tools_file);
        }
        if let Some(max_name_len) = overrides.max_name_len {
            self.max_name_len = max_name_len;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the length limit is zero or the
    /// log level is blank.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid(
                "max_name_len must be greater than zero",
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level cannot be empty"));
        }
        Ok(())
    }

    /// Returns the catalog path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCatalog`] when neither the file nor the
    /// command line named one.
    pub fn catalog(&self) -> ConfigResult<&std::path::Path> {
        self.catalog.as_deref().ok_or(ConfigError::MissingCatalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_supplied_fields() {
        let base = GateConfig {
            catalog: Some("catalog.json".into()),
            tools_file: Some("tools.txt".into()),
            ..GateConfig::default()
        };

        let merged = base.merge(ConfigOverrides {
            tools_file: Some("short.txt".into()),
            max_name_len: Some(48),
            ..ConfigOverrides::default()
        });

        assert_eq!(merged.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(merged.tools_file, Some(PathBuf::from("short.txt")));
        assert_eq!(merged.max_name_len, 48);
        assert_eq!(merged.log_level, "info");
    }

    #[test]
    fn zero_limit_is_invalid() {
        let config = GateConfig {
            max_name_len: 0,
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_catalog_is_reported() {
        let config = GateConfig::default();
        assert!(matches!(config.catalog(), Err(ConfigError::MissingCatalog)));
    }
}
