use execfile::command::Command;
use execfile::sink::SinkDescriptor;
use execfile::types::Trigger;
use serde_json::{Map, Value};

/// Builder for `Command` to simplify test expectations.
pub struct CommandBuilder {
    cmd: Command,
}

impl CommandBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            cmd: Command {
                command: command.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn directory(mut self, dir: &str) -> Self {
        self.cmd.directory = Some(dir.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.cmd.timeout = Some(timeout.to_string());
        self
    }

    pub fn foreground(mut self) -> Self {
        self.cmd.foreground = true;
        self
    }

    pub fn at(mut self, trigger: Trigger) -> Self {
        self.cmd.triggers.insert(trigger);
        self
    }

    pub fn log(mut self, sink: SinkDescriptor) -> Self {
        self.cmd.stdout_sink = Some(sink);
        self
    }

    pub fn err_log(mut self, sink: SinkDescriptor) -> Self {
        self.cmd.stderr_sink = Some(sink);
        self
    }

    pub fn build(self) -> Command {
        self.cmd
    }
}

/// Builder for `SinkDescriptor`.
pub struct SinkBuilder {
    output: String,
    options: Map<String, Value>,
}

impl SinkBuilder {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            options: Map::new(),
        }
    }

    pub fn option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> SinkDescriptor {
        SinkDescriptor {
            output: self.output,
            options: self.options,
        }
    }
}
