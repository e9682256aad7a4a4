// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod logging;
pub mod sink;
pub mod syntax;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::command::Command;
use crate::config::{AdaptedConfig, load_from_path};
use crate::sink::{SinkDescriptor, SinkRegistry};

/// High-level entry point used by `main.rs`.
///
/// Loads and adapts the Execfile named on the command line with the default
/// sink modules, then prints either the encoded configuration or, with
/// `--dry-run`, a summary of every command.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config_path();
    let sinks = SinkRegistry::with_defaults();
    debug!(?sinks, path = %config_path.display(), "loading Execfile");

    let adapted = load_from_path(&config_path, &sinks)
        .with_context(|| format!("adapting {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&adapted)?;
        return Ok(());
    }

    println!("{}", adapted.render(args.format, args.pretty)?);
    Ok(())
}

/// Human readable listing of what the Execfile declares.
fn print_dry_run(cfg: &AdaptedConfig) -> Result<()> {
    let app = cfg.exec_app()?;

    println!("execfile dry-run");
    println!();
    println!("top-level commands ({}):", app.len());
    for (idx, cmd) in app.commands.iter().enumerate() {
        let at: Vec<&str> = cmd.triggers.iter().map(|t| t.as_str()).collect();
        println!("  {idx}. {} [{}]", cmd.command_line(), at.join(", "));
        print_details(cmd);
    }

    println!();
    println!("routes ({}):", cfg.routes.len());
    for route in &cfg.routes {
        println!(
            "  - {} {}: {}",
            route.addresses.join(", "),
            route.matcher.as_deref().unwrap_or("*"),
            route.handler.command_line()
        );
        print_details(&route.handler);
    }

    debug!("dry-run complete");
    Ok(())
}

fn print_details(cmd: &Command) {
    if let Some(ref dir) = cmd.directory {
        println!("      directory: {dir}");
    }
    match cmd.timeout_duration() {
        Some(Ok(timeout)) => println!("      timeout: {timeout:?}"),
        Some(Err(e)) => {
            warn!(command = %cmd.command, error = %e, "timeout will be rejected when the command runs");
            println!("      timeout: {} (invalid: {e})", cmd.timeout.as_deref().unwrap_or(""));
        }
        None => {}
    }
    if cmd.foreground {
        println!("      foreground: true");
    }
    if let Some(ref sink) = cmd.stdout_sink {
        println!("      log: {}", describe_sink(sink));
    }
    if let Some(ref sink) = cmd.stderr_sink {
        println!("      err_log: {}", describe_sink(sink));
    }
}

fn describe_sink(sink: &SinkDescriptor) -> String {
    if sink.options.is_empty() {
        return sink.output.clone();
    }
    let opts: Vec<String> = sink
        .options
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("{} ({})", sink.output, opts.join(" "))
}
