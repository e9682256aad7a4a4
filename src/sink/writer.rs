// src/sink/writer.rs

//! The writer-opener capability and the writers that ship with execfile.
//!
//! A writer opener describes where a command's output stream goes. Nothing
//! here opens a file or a socket; the descriptors are handed to whatever
//! runs the commands later.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ExecfileError, Result};
use crate::syntax::Dispenser;

/// Capability every output sink must provide.
pub trait WriterOpener: fmt::Display + fmt::Debug {
    /// Name the sink is referred to by in an Execfile (`stdout`, `file`, ...).
    fn module_name(&self) -> &str;

    /// Identity of the underlying destination. Two openers with the same key
    /// write to the same place and can share one opened writer.
    fn writer_key(&self) -> String;

    /// Module specific options, ready to be embedded in a sink descriptor.
    fn options(&self) -> Result<Map<String, Value>>;
}

fn encode_options<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ExecfileError::Internal(format!(
            "sink options must encode to an object, got {other}"
        ))),
    }
}

/// Sinks that need no configuration and no registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardSink {
    Stdout,
    Stderr,
    Discard,
}

impl StandardSink {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stdout" => Some(StandardSink::Stdout),
            "stderr" => Some(StandardSink::Stderr),
            "discard" => Some(StandardSink::Discard),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StandardSink::Stdout => "stdout",
            StandardSink::Stderr => "stderr",
            StandardSink::Discard => "discard",
        }
    }
}

impl fmt::Display for StandardSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl WriterOpener for StandardSink {
    fn module_name(&self) -> &str {
        self.name()
    }

    fn writer_key(&self) -> String {
        match self {
            StandardSink::Stdout => "std:out".to_string(),
            StandardSink::Stderr => "std:err".to_string(),
            StandardSink::Discard => "discard".to_string(),
        }
    }

    fn options(&self) -> Result<Map<String, Value>> {
        Ok(Map::new())
    }
}

/// `file <filename> { ... }`
///
/// ```text
/// log file /var/log/job.log {
///     roll_size      100
///     roll_keep      5
///     roll_keep_days 30
///     mode           0640
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWriter {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_size_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_keep: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_keep_days: Option<u32>,
    /// Octal permission bits, kept as written (e.g. `"0640"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl FileWriter {
    pub fn from_dispenser(d: &mut Dispenser) -> Result<Box<dyn WriterOpener>> {
        let mut writer = FileWriter {
            filename: d.single_arg()?,
            ..Default::default()
        };

        let level = d.nesting();
        while d.next_block(level)? {
            match d.val() {
                "roll_disabled" => {
                    d.expect_no_args()?;
                    writer.roll = Some(false);
                }
                "roll_size" => {
                    let raw = d.single_arg()?;
                    writer.roll_size_mb = Some(
                        parse_megabytes(&raw)
                            .ok_or_else(|| d.err(format!("invalid roll_size '{raw}'")))?,
                    );
                }
                "roll_keep" => {
                    let raw = d.single_arg()?;
                    writer.roll_keep = Some(
                        raw.parse()
                            .map_err(|_| d.err(format!("invalid roll_keep '{raw}'")))?,
                    );
                }
                "roll_keep_days" => {
                    let raw = d.single_arg()?;
                    writer.roll_keep_days = Some(
                        raw.parse()
                            .map_err(|_| d.err(format!("invalid roll_keep_days '{raw}'")))?,
                    );
                }
                "mode" => {
                    let raw = d.single_arg()?;
                    if raw.is_empty() || u32::from_str_radix(&raw, 8).is_err() {
                        return Err(d.err(format!("mode must be octal, got '{raw}'")));
                    }
                    writer.mode = Some(raw);
                }
                _ => return Err(d.unexpected_err()),
            }
        }

        Ok(Box::new(writer))
    }
}

/// `100`, `100mb` or `100MiB`, all meaning megabytes.
fn parse_megabytes(raw: &str) -> Option<u64> {
    let lower = raw.trim().to_lowercase();
    let digits = lower
        .strip_suffix("mib")
        .or_else(|| lower.strip_suffix("mb"))
        .unwrap_or(&lower);
    digits.parse().ok()
}

impl fmt::Display for FileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{}", self.filename)
    }
}

impl WriterOpener for FileWriter {
    fn module_name(&self) -> &str {
        "file"
    }

    fn writer_key(&self) -> String {
        format!("file:{}", self.filename)
    }

    fn options(&self) -> Result<Map<String, Value>> {
        encode_options(self)
    }
}

/// `net <address> { dial_timeout <duration>; soft_start }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWriter {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dial_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub soft_start: bool,
}

impl NetWriter {
    pub fn from_dispenser(d: &mut Dispenser) -> Result<Box<dyn WriterOpener>> {
        let mut writer = NetWriter {
            address: d.single_arg()?,
            ..Default::default()
        };

        let level = d.nesting();
        while d.next_block(level)? {
            match d.val() {
                "dial_timeout" => writer.dial_timeout = Some(d.single_arg()?),
                "soft_start" => {
                    d.expect_no_args()?;
                    writer.soft_start = true;
                }
                _ => return Err(d.unexpected_err()),
            }
        }

        Ok(Box::new(writer))
    }
}

impl fmt::Display for NetWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net:{}", self.address)
    }
}

impl WriterOpener for NetWriter {
    fn module_name(&self) -> &str {
        "net"
    }

    fn writer_key(&self) -> String {
        format!("net:{}", self.address)
    }

    fn options(&self) -> Result<Map<String, Value>> {
        encode_options(self)
    }
}
