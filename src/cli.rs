// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `surveil`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "surveil",
    version,
    about = "Watch per-target file sets and run their tasks on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Surveil.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Surveil.toml")]
    pub config: String,

    /// Watch only this target instead of all configured targets.
    ///
    /// Requesting a target that is not configured is a fatal error; no
    /// watcher is attached in that case.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Keep running later task batches even after one batch had a failing
    /// task. This is the default restored at the start of every fresh watch
    /// invocation; a dispatch itself always force-enables its own batch.
    #[arg(long)]
    pub force: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SURVEIL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print targets and tasks, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
