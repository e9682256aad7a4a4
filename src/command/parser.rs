// src/command/parser.rs

//! The `exec` directive parser.
//!
//! Syntax:
//!
//! ```text
//! exec [<command> [<args...>]] {
//!     command     <text> [<args...>]
//!     args        <text...>
//!     directory   <text>
//!     timeout     <duration>
//!     log         <sink> [...]
//!     err_log     <sink> [...]
//!     foreground
//!     startup
//!     shutdown
//! }
//! ```
//!
//! Handler matchers are stripped before the tokens reach this parser, and no
//! trigger default is applied here.

use tracing::{debug, trace};

use crate::command::model::Command;
use crate::errors::Result;
use crate::sink::{SinkRegistry, resolve_sink};
use crate::syntax::Dispenser;
use crate::types::Trigger;

/// Parse one `exec` directive from a dispenser positioned before it.
///
/// Fails on the first problem; no partially filled command is returned.
pub fn parse_command(d: &mut Dispenser, sinks: &SinkRegistry) -> Result<Command> {
    let mut cmd = Command::default();

    // consume the directive name, then the inline command, if present
    if d.next_arg() && d.next_arg() {
        cmd.command = d.val().to_string();
    }
    cmd.args = d.remaining_args();

    let level = d.nesting();
    while d.next_block(level)? {
        parse_field(&mut cmd, d, sinks)?;
    }

    debug!(
        command = %cmd.command,
        args = ?cmd.args,
        triggers = ?cmd.triggers,
        "parsed exec directive"
    );
    Ok(cmd)
}

fn parse_field(cmd: &mut Command, d: &mut Dispenser, sinks: &SinkRegistry) -> Result<()> {
    trace!(field = %d.val(), line = d.line(), "exec block field");

    match d.val() {
        "command" => {
            if !cmd.command.is_empty() {
                return Err(d.duplicate_err("command"));
            }
            if !d.next_arg() {
                return Err(d.arg_err());
            }
            cmd.command = d.val().to_string();

            let trailing = d.remaining_args();
            if !trailing.is_empty() {
                if !cmd.args.is_empty() {
                    return Err(d.duplicate_err("args"));
                }
                cmd.args = trailing;
            }
        }
        "args" => {
            if !cmd.args.is_empty() {
                return Err(d.duplicate_err("args"));
            }
            cmd.args = d.remaining_args();
        }
        "directory" => cmd.directory = Some(d.single_arg()?),
        "timeout" => cmd.timeout = Some(d.single_arg()?),
        "foreground" => {
            d.expect_no_args()?;
            cmd.foreground = true;
        }
        "startup" => {
            d.expect_no_args()?;
            cmd.triggers.insert(Trigger::Startup);
        }
        "shutdown" => {
            d.expect_no_args()?;
            cmd.triggers.insert(Trigger::Shutdown);
        }
        "log" => {
            if cmd.stdout_sink.is_some() {
                return Err(d.duplicate_err("log"));
            }
            cmd.stdout_sink = Some(resolve_sink(d, sinks)?);
        }
        "err_log" => {
            if cmd.stderr_sink.is_some() {
                return Err(d.duplicate_err("err_log"));
            }
            cmd.stderr_sink = Some(resolve_sink(d, sinks)?);
        }
        _ => return Err(d.unexpected_err()),
    }

    Ok(())
}
