//! Subscriber installation.
//!
//! The library only emits `tracing` events. Hosts that want them printed call
//! [`init`] once with the application's [`LogOptions`].

use crate::config::LogOptions;
use crate::error::{Result, StagehandError};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `options.level` is used as the filter.
pub fn init(options: &LogOptions) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&options.level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| StagehandError::Logging(e.to_string()))?;

    tracing::debug!(name = %options.name, level = %options.level, "logging initialized");
    Ok(())
}

/// Parse a filter directive such as `info` or `stagehand=debug,warn`.
pub fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| StagehandError::Logging(e.to_string()))
}
