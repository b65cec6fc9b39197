// src/logging.rs

//! Logging setup for `surveil` using `tracing` + `tracing-subscriber`.
//!
//! The max level comes from `--log-level` when given, otherwise from the
//! `SURVEIL_LOG` environment variable, otherwise `info`. Discarded
//! rewrite-echo events and watcher re-attach notices are logged at
//! `trace`/`debug`; they are diagnostics, not errors.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level.map(Level::from).unwrap_or_else(env_level);

    fmt().with_max_level(level).with_target(true).init();

    Ok(())
}

/// `SURVEIL_LOG`, parsed leniently (`Level`'s `FromStr` accepts names and
/// the numeric forms 1-5). Unset or unparsable falls back to `info`.
fn env_level() -> Level {
    std::env::var("SURVEIL_LOG")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(Level::INFO)
}
