//! Structured tracing helpers.
//!
//! Logs always go to stderr: stdout carries listings and serve-mode JSON
//! lines that downstream clients parse.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other log setting.
pub const LOG_ENV: &str = "TOOLGATE_LOG";

/// Picks the filter directive: the environment value when set and non-blank,
/// otherwise `fallback`.
#[must_use]
pub fn resolve_directive(env_value: Option<String>, fallback: &str) -> String {
    env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Fails if the directive does not parse or a global subscriber is already
/// installed.
pub fn init(fallback: &str) -> Result<()> {
    let directive = resolve_directive(std::env::var(LOG_ENV).ok(), fallback);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter `{directive}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
