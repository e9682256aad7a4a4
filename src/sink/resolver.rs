// src/sink/resolver.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{ExecfileError, Result};
use crate::sink::registry::{SinkRegistry, module_id};
use crate::sink::writer::{StandardSink, WriterOpener};
use crate::syntax::Dispenser;

/// Encoded sink: the sink name as written next to its options.
///
/// Serializes as a flat object, e.g.
/// `{"output": "file", "filename": "/var/log/job.log", "roll_keep": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkDescriptor {
    pub output: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl SinkDescriptor {
    /// Tag `writer`'s options with `name`, the sink name chosen in the
    /// Execfile. A module registered under an alias is tagged with the alias.
    ///
    /// `output` is reserved for the tag; a module emitting it as an option
    /// is rejected.
    pub fn from_writer(name: &str, writer: &dyn WriterOpener) -> Result<Self> {
        let options = writer.options()?;
        if options.contains_key("output") {
            return Err(ExecfileError::Internal(format!(
                "sink module {} ({}) emits reserved option 'output'",
                module_id(name),
                writer.module_name()
            )));
        }
        Ok(Self {
            output: name.to_string(),
            options,
        })
    }

    pub fn standard(&self) -> Option<StandardSink> {
        StandardSink::from_name(&self.output)
    }
}

/// Resolve the sink named by the next argument.
///
/// The dispenser must sit on the keyword introducing the sink (`log`,
/// `err_log`). Standard sinks resolve without consulting `registry`; any
/// other name is looked up there and its constructor consumes the rest of
/// the line and any nested block.
pub fn resolve_sink(d: &mut Dispenser, registry: &SinkRegistry) -> Result<SinkDescriptor> {
    if !d.next_arg() {
        return Err(d.arg_err());
    }
    let name = d.val().to_string();

    let writer: Box<dyn WriterOpener> = match StandardSink::from_name(&name) {
        Some(standard) => Box::new(standard),
        None => {
            let id = module_id(&name);
            let Some(constructor) = registry.get(&name) else {
                return Err(d.resolution_err(id, "no registered module"));
            };
            constructor(d)?
        }
    };

    debug!(name = %name, sink = %writer, key = %writer.writer_key(), "resolved output sink");
    SinkDescriptor::from_writer(&name, writer.as_ref())
}
