// src/command/model.rs

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sink::SinkDescriptor;
use crate::types::Trigger;

/// One parsed `exec` declaration.
///
/// Encodes as:
///
/// ```json
/// {
///   "command": "echo",
///   "args": ["hello", "world"],
///   "directory": "/srv",
///   "timeout": "10s",
///   "foreground": true,
///   "at": ["startup"],
///   "log": {"output": "stdout"},
///   "err_log": {"output": "file", "filename": "err.log"}
/// }
/// ```
///
/// Empty and unset fields are left out of the encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Duration text, interpreted by whoever runs the command
    /// (see [`Command::timeout_duration`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub foreground: bool,

    /// Lifecycle triggers. Empty means "run per matched request".
    #[serde(default, rename = "at", skip_serializing_if = "BTreeSet::is_empty")]
    pub triggers: BTreeSet<Trigger>,

    #[serde(default, rename = "log", skip_serializing_if = "Option::is_none")]
    pub stdout_sink: Option<SinkDescriptor>,

    #[serde(default, rename = "err_log", skip_serializing_if = "Option::is_none")]
    pub stderr_sink: Option<SinkDescriptor>,
}

impl Command {
    /// Interpret `timeout` as `<n>ms`, `<n>s`, `<n>m` or `<n>h`.
    ///
    /// `None` when no timeout was given. The parser stores the text as
    /// written and never calls this.
    pub fn timeout_duration(&self) -> Option<Result<Duration, String>> {
        self.timeout.as_deref().map(parse_timeout)
    }

    pub fn runs_at(&self, trigger: Trigger) -> bool {
        self.triggers.contains(&trigger)
    }

    /// Command line as it would be typed into a shell, for display only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_timeout(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("timeout '{text}' has no unit (ms, s, m or h)"))?;
    let (digits, unit) = text.split_at(split);
    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("timeout '{text}' does not start with a number"))?;

    let seconds_per_unit = match unit {
        "ms" => return Ok(Duration::from_millis(amount)),
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        other => return Err(format!("unknown timeout unit '{other}' in '{text}'")),
    };
    amount
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("timeout '{text}' is too large"))
}

/// The `exec` app: every top-level declaration of one configuration load,
/// in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecApp {
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl ExecApp {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands bound to `trigger`, in declaration order.
    pub fn at(&self, trigger: Trigger) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| c.runs_at(trigger))
    }
}
