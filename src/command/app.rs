// src/command/app.rs

//! Merging top-level `exec` declarations into the `exec` app.
//!
//! Top-level declarations are not bound to a route, so a declaration that
//! names no trigger runs once at startup. Route-scoped declarations keep an
//! empty trigger set, meaning "run per matched request". Both call sites go
//! through [`parse_declaration`] and say which default they want.

use tracing::{debug, info};

use crate::command::model::{Command, ExecApp};
use crate::command::parser::parse_command;
use crate::errors::{ExecfileError, Result};
use crate::sink::SinkRegistry;
use crate::syntax::Dispenser;
use crate::types::Trigger;

/// Name the aggregate is published under in the adapted configuration.
pub const APP_NAME: &str = "exec";

/// Trigger given to top-level declarations that specify none.
pub const TOP_LEVEL_DEFAULT_TRIGGER: Trigger = Trigger::Startup;

/// Encoded configuration for one app, tagged with the app's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPayload {
    pub name: String,
    /// JSON bytes.
    pub value: Vec<u8>,
}

/// Parse one declaration, filling in `default_trigger` if it names none.
pub fn parse_declaration(
    d: &mut Dispenser,
    sinks: &SinkRegistry,
    default_trigger: Option<Trigger>,
) -> Result<Command> {
    let mut cmd = parse_command(d, sinks)?;
    if cmd.triggers.is_empty() {
        if let Some(trigger) = default_trigger {
            debug!(command = %cmd.command, %trigger, "no trigger given, using default");
            cmd.triggers.insert(trigger);
        }
    }
    Ok(cmd)
}

impl ExecApp {
    /// Parse a top-level declaration and append it.
    pub fn merge_declaration(&mut self, d: &mut Dispenser, sinks: &SinkRegistry) -> Result<&Command> {
        let cmd = parse_declaration(d, sinks, Some(TOP_LEVEL_DEFAULT_TRIGGER))?;
        info!(
            command = %cmd.command_line(),
            position = self.commands.len(),
            "merged top-level exec declaration"
        );
        let idx = self.commands.len();
        self.commands.push(cmd);
        Ok(&self.commands[idx])
    }

    pub fn to_payload(&self) -> Result<AppPayload> {
        Ok(AppPayload {
            name: APP_NAME.to_string(),
            value: serde_json::to_vec(self)?,
        })
    }

    /// Decode a payload produced by [`ExecApp::to_payload`].
    ///
    /// A payload that fails to decode was corrupted by an earlier stage, so
    /// this is an internal error rather than a user one.
    pub fn from_payload(payload: &AppPayload) -> Result<Self> {
        serde_json::from_slice(&payload.value)
            .map_err(|e| ExecfileError::Internal(format!("decoding {} app: {e}", payload.name)))
    }
}

/// Snapshot form of [`ExecApp::merge_declaration`] for pipelines that only
/// keep the encoded result between declarations.
///
/// `prev` is decoded (when it is this app's payload), the declaration is
/// appended, and the result is encoded again.
pub fn merge_encoded(
    d: &mut Dispenser,
    sinks: &SinkRegistry,
    prev: Option<&AppPayload>,
) -> Result<AppPayload> {
    let mut app = match prev {
        Some(payload) if payload.name == APP_NAME => ExecApp::from_payload(payload)?,
        _ => ExecApp::default(),
    };
    app.merge_declaration(d, sinks)?;
    app.to_payload()
}
