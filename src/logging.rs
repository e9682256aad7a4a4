// src/logging.rs

//! `tracing` setup for the `execfile` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to the whole process)
//! 2. `EXECFILE_LOG`, in `EnvFilter` syntax (`debug`, `execfile::sink=trace`, ...)
//! 3. `info`
//!
//! Output goes to stderr; stdout carries only the adapted configuration.

use anyhow::{Result, anyhow};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "EXECFILE_LOG";

/// Install the global subscriber. Call once, before adapting anything.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::default().add_directive(level_filter(level).into()),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy(),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
