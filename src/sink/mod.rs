// src/sink/mod.rs

//! Output sinks for command stdout/stderr.
//!
//! - [`writer`] defines the `WriterOpener` capability, the standard sinks
//!   (`stdout`, `stderr`, `discard`) and the `file` / `net` modules.
//! - [`registry`] maps module names to constructors.
//! - [`resolver`] turns `log <name> ...` into a [`SinkDescriptor`].

pub mod registry;
pub mod resolver;
pub mod writer;

pub use registry::{SinkConstructor, SinkRegistry, WRITER_NAMESPACE, module_id};
pub use resolver::{SinkDescriptor, resolve_sink};
pub use writer::{FileWriter, NetWriter, StandardSink, WriterOpener};
