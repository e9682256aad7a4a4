// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::OutputFormat;

/// Command-line arguments for `execfile`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "execfile",
    version,
    about = "Adapt an Execfile of exec declarations into encoded configuration.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the Execfile.
    ///
    /// Default: `Execfile` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output encoding for the adapted configuration.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `EXECFILE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + adapt, print a summary of the commands instead of the
    /// encoded configuration.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The Execfile to read: `--config` if given, else the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_falls_back_to_default() {
        let args = CliArgs::try_parse_from(["execfile"]).unwrap();
        assert_eq!(args.config_path(), default_config_path());

        let args = CliArgs::try_parse_from(["execfile", "--config", "/etc/Execfile"]).unwrap();
        assert_eq!(args.config_path(), PathBuf::from("/etc/Execfile"));
    }
}
