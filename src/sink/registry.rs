// src/sink/registry.rs

//! Typed registry of dynamically named output sinks.
//!
//! Constructors return `Box<dyn WriterOpener>` directly, so whether a module
//! can act as a sink is decided when it is registered, not when a config
//! refers to it.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::errors::{ExecfileError, Result};
use crate::sink::writer::{FileWriter, NetWriter, StandardSink, WriterOpener};
use crate::syntax::Dispenser;

/// Namespace every registered sink module lives under.
pub const WRITER_NAMESPACE: &str = "logging.writers";

/// Builds a writer from the tokens following the module name.
pub type SinkConstructor = fn(&mut Dispenser) -> Result<Box<dyn WriterOpener>>;

/// Fully qualified identifier for a sink module name.
pub fn module_id(name: &str) -> String {
    format!("{WRITER_NAMESPACE}.{name}")
}

#[derive(Clone, Default)]
pub struct SinkRegistry {
    constructors: BTreeMap<String, SinkConstructor>,
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("modules", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SinkRegistry {
    /// A registry with nothing registered; only the standard sinks resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registry execfile uses unless told otherwise: `file` and `net`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.constructors.insert("file".to_string(), FileWriter::from_dispenser);
        registry.constructors.insert("net".to_string(), NetWriter::from_dispenser);
        registry
    }

    /// Register a sink module under `name`.
    ///
    /// Fails if the name is blank, shadows a standard sink, or is taken.
    pub fn register(&mut self, name: &str, constructor: SinkConstructor) -> Result<()> {
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ExecfileError::Internal(format!(
                "invalid sink module name '{name}'"
            )));
        }
        if StandardSink::from_name(name).is_some() {
            return Err(ExecfileError::Internal(format!(
                "sink module '{name}' would shadow a standard sink"
            )));
        }
        if self.constructors.contains_key(name) {
            return Err(ExecfileError::Internal(format!(
                "module {} registered twice",
                module_id(name)
            )));
        }

        debug!(id = %module_id(name), "registered sink module");
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SinkConstructor> {
        self.constructors.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}
