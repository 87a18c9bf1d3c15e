//! Library side of the `toolgate` binary.
//!
//! [`execute`] takes its input and output streams as parameters so every mode
//! can be driven from tests without a terminal.

#![warn(missing_docs, clippy::pedantic)]

pub mod cli;
pub mod serve;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use gate_config::GateConfig;
use gate_filter::report::{self, ValidationReport};
use gate_filter::{AllowListHandle, AllowListState, FilteredRegistry};
use gate_registry::{ToolSource, load_catalog};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

pub use cli::{Cli, Mode, OutputFormat};

/// Result of a successful run, mapped onto the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Exit code 0.
    Success,
    /// Exit code 1: the name-length check found violations.
    Violations,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Violations => ExitCode::from(1),
        }
    }
}

/// Resolves configuration, installs logging, and runs on stdin/stdout.
///
/// # Errors
///
/// Returns configuration, catalog, and allow-list load failures. These are
/// fatal: the binary exits non-zero naming the offending path.
pub async fn run(cli: Cli) -> Result<Outcome> {
    let config = cli.resolve_config()?;
    gate_telemetry::init(cli.log_directive(&config))?;

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    execute(&cli, &config, input, output).await
}

/// Runs the mode selected by `cli` against explicit streams.
///
/// # Errors
///
/// See [`run`].
pub async fn execute<R, W>(cli: &Cli, config: &GateConfig, input: R, mut output: W) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let catalog = config.catalog()?;
    let registry = load_catalog(catalog)
        .with_context(|| format!("cannot load tool catalog `{}`", catalog.display()))?;

    match cli.mode() {
        Mode::List => {
            if let Some(path) = config.tools_file.as_deref() {
                warn!(
                    path = %path.display(),
                    "--tools-file is ignored by --list-tools; the full catalog is listed"
                );
            }
            let listing = report::list_tools(&registry, &cli.scope(), config.max_name_len);
            emit(&mut output, cli.format, &listing).await?;
            Ok(Outcome::Success)
        }
        Mode::CheckNames => {
            let check = report::check_name_lengths(&registry, config.max_name_len);
            emit(&mut output, OutputFormat::Text, &check).await?;
            Ok(if check.is_clean() {
                Outcome::Success
            } else {
                Outcome::Violations
            })
        }
        Mode::Validate => {
            let path = config
                .tools_file
                .as_deref()
                .ok_or_else(|| anyhow!("--validate needs an allow-list; pass --tools-file"))?;
            let state = AllowListState::from_source(Some(path))?;
            let allow_list = state.allow_list().cloned().unwrap_or_default();
            let validation = report::validate(&allow_list, &registry, config.max_name_len);
            emit(&mut output, cli.format, &validation).await?;
            Ok(Outcome::Success)
        }
        Mode::Serve => {
            let handle = Arc::new(AllowListHandle::load(config.tools_file.clone())?);
            if let Some(allow_list) = handle.snapshot().allow_list() {
                let validation = report::validate(allow_list, &registry, config.max_name_len);
                log_validation(&validation);
            }

            let tools = FilteredRegistry::new(registry, handle);
            info!(
                total = tools.source().len(),
                advertised = tools.all_tools().len(),
                "serving filtered tool list"
            );
            serve::serve(&tools, input, output).await?;
            Ok(Outcome::Success)
        }
    }
}

fn log_validation(validation: &ValidationReport) {
    let missing = validation.missing().count();
    let too_long = validation.too_long().count();
    if missing + too_long > 0 {
        warn!(missing, too_long, "allow-list has entries that will not be advertised as-is");
    }
}

async fn emit<W, T>(output: &mut W, format: OutputFormat, report: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: std::fmt::Display + Serialize,
{
    let mut rendered = match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };
    rendered.push('\n');
    output.write_all(rendered.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
