//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use gate_config::{ConfigOverrides, GateConfig};
use gate_primitives::CategoryScope;

/// Advertise only allow-listed tools from a tool catalog.
#[derive(Debug, Parser)]
#[command(name = "toolgate", version, about)]
pub struct Cli {
    /// JSON configuration file; command-line flags override its values.
    #[arg(long, value_name = "PATH", env = "TOOLGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tool catalog: a JSON file or a directory of per-category JSON files.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Allow-list file, one tool name per line.
    #[arg(long, value_name = "PATH")]
    pub tools_file: Option<PathBuf>,

    /// Print the tool enumeration and exit without serving.
    #[arg(long, conflicts_with_all = ["check_names", "validate"])]
    pub list_tools: bool,

    /// Restrict --list-tools to one category (exact match).
    #[arg(long, value_name = "NAME", requires = "list_tools")]
    pub category: Option<String>,

    /// Check every catalog name against the length limit; exit 1 on violations.
    #[arg(long, conflicts_with = "validate")]
    pub check_names: bool,

    /// Report allow-list entries that are missing from the catalog or too long.
    #[arg(long)]
    pub validate: bool,

    /// Downstream tool-name length limit.
    #[arg(long, value_name = "N")]
    pub max_name_len: Option<usize>,

    /// Report format for --list-tools and --validate.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter directive used when TOOLGATE_LOG is unset.
    #[arg(long, value_name = "DIRECTIVE")]
    pub log_level: Option<String>,

    /// Only log errors.
    #[arg(long, short)]
    pub quiet: bool,
}

/// Report rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// What the invocation does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Print the catalog enumeration.
    List,
    /// Scan catalog names against the length limit.
    CheckNames,
    /// Validate the allow-list against the catalog.
    Validate,
    /// Answer tool listing requests on stdin/stdout.
    Serve,
}

impl Cli {
    /// Selected mode; serving is the default.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.list_tools {
            Mode::List
        } else if self.check_names {
            Mode::CheckNames
        } else if self.validate {
            Mode::Validate
        } else {
            Mode::Serve
        }
    }

    /// Category predicate for listing.
    #[must_use]
    pub fn scope(&self) -> CategoryScope {
        self.category.clone().into()
    }

    /// Loads the optional config file and applies flag overrides.
    ///
    /// # Errors
    ///
    /// Propagates config file and validation errors.
    pub fn resolve_config(&self) -> Result<GateConfig> {
        let base = match &self.config {
            Some(path) => gate_config::load_file(path)?,
            None => GateConfig::default(),
        };
        let config = base.merge(ConfigOverrides {
            catalog: self.catalog.clone(),
            tools_file: self.tools_file.clone(),
            max_name_len: self.max_name_len,
            log_level: self.log_level.clone(),
        });
        config.validate()?;
        Ok(config)
    }

    /// Filter directive for the logging subscriber.
    #[must_use]
    pub fn log_directive<'a>(&self, config: &'a GateConfig) -> &'a str {
        if self.quiet { "error" } else { &config.log_level }
    }
}
