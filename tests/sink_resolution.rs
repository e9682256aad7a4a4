// tests/sink_resolution.rs

use std::fmt;

use execfile::command::ExecApp;
use execfile::errors::{ExecfileError, Result};
use execfile::sink::{
    NetWriter, SinkDescriptor, SinkRegistry, StandardSink, WriterOpener, resolve_sink,
};
use execfile::syntax::Dispenser;
use serde_json::{Map, Value};
use execfile_test_utils::builders::SinkBuilder;
use execfile_test_utils::sinks::TagWriter;
use execfile_test_utils::{dispenser, init_tracing, parse_handler_with};

/// Resolve the sink following `log` on a one-line source.
fn resolve(src: &str, registry: &SinkRegistry) -> Result<SinkDescriptor> {
    let mut d = dispenser(src);
    d.next();
    resolve_sink(&mut d, registry)
}

#[test]
fn standard_sinks_resolve_without_registry() {
    init_tracing();
    let empty = SinkRegistry::empty();

    for name in ["stdout", "stderr", "discard"] {
        let sink = resolve(&format!("log {name}"), &empty).unwrap();
        assert_eq!(sink, SinkBuilder::new(name).build());
        assert!(sink.standard().is_some());
    }
    assert_eq!(
        resolve("log stdout", &empty).unwrap().standard(),
        Some(StandardSink::Stdout)
    );
}

#[test]
fn unregistered_name_is_a_resolution_error() {
    let err = resolve("log foo", &SinkRegistry::with_defaults()).unwrap_err();
    match err {
        ExecfileError::Resolution { id, found, .. } => {
            assert_eq!(id, "logging.writers.foo");
            assert!(!found.is_empty());
        }
        other => panic!("Expected Resolution error, got: {:?}", other),
    }
}

#[test]
fn empty_registry_cannot_resolve_file() {
    let err = resolve("log file out.log", &SinkRegistry::empty()).unwrap_err();
    assert!(err.to_string().contains("logging.writers.file"));
}

#[test]
fn registered_module_resolves() {
    let mut registry = SinkRegistry::with_defaults();
    registry.register("tag", TagWriter::from_dispenser).unwrap();

    let sink = resolve("log tag nightly", &registry).unwrap();
    assert_eq!(sink, SinkBuilder::new("tag").option("label", "nightly").build());
    assert!(sink.standard().is_none());

    let cmd = parse_handler_with("exec job {\n err_log tag failures\n}", &registry).unwrap();
    assert_eq!(
        cmd.stderr_sink,
        Some(SinkBuilder::new("tag").option("label", "failures").build())
    );
}

#[test]
fn module_errors_propagate() {
    let mut registry = SinkRegistry::empty();
    registry.register("tag", TagWriter::from_dispenser).unwrap();

    let err = resolve("log tag", &registry).unwrap_err();
    assert!(matches!(err, ExecfileError::Syntax { .. }));
}

#[test]
fn descriptor_encodes_flat_and_decodes_back() {
    let sink = resolve("log file /var/log/app.log", &SinkRegistry::with_defaults()).unwrap();

    let json = serde_json::to_value(&sink).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"output": "file", "filename": "/var/log/app.log"})
    );

    let decoded: SinkDescriptor = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, sink);
}

#[test]
fn alias_registration_tags_descriptor_with_chosen_name() {
    let mut registry = SinkRegistry::with_defaults();
    registry.register("udp", NetWriter::from_dispenser).unwrap();

    let cmd = parse_handler_with("exec job {\n log udp 10.0.0.1:514\n}", &registry).unwrap();
    let sink = cmd.stdout_sink.unwrap();
    assert_eq!(sink.output, "udp");
    assert_eq!(sink.options.get("address"), Some(&Value::from("10.0.0.1:514")));
}

/// Sink whose options collide with the descriptor tag.
#[derive(Debug)]
struct PipeWriter;

impl PipeWriter {
    fn from_dispenser(d: &mut Dispenser) -> Result<Box<dyn WriterOpener>> {
        d.remaining_args();
        Ok(Box::new(PipeWriter))
    }
}

impl fmt::Display for PipeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pipe")
    }
}

impl WriterOpener for PipeWriter {
    fn module_name(&self) -> &str {
        "pipe"
    }

    fn writer_key(&self) -> String {
        self.to_string()
    }

    fn options(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("output".to_string(), Value::from("x"));
        Ok(map)
    }
}

#[test]
fn reserved_output_option_is_rejected() {
    let mut registry = SinkRegistry::empty();
    registry.register("pipe", PipeWriter::from_dispenser).unwrap();

    let err = parse_handler_with("exec job {\n log pipe\n}", &registry).unwrap_err();
    match err {
        ExecfileError::Internal(msg) => {
            assert!(msg.contains("logging.writers.pipe"), "got: {msg}");
            assert!(msg.contains("'output'"), "got: {msg}");
        }
        other => panic!("Expected Internal error, got: {:?}", other),
    }
}

#[test]
fn resolved_sinks_survive_payload_round_trip() {
    let mut registry = SinkRegistry::with_defaults();
    registry.register("udp", NetWriter::from_dispenser).unwrap();

    let cmd = parse_handler_with(
        "exec job {\n log udp 10.0.0.1:514\n err_log file /tmp/err.log\n}",
        &registry,
    )
    .unwrap();
    let app = ExecApp { commands: vec![cmd] };
    let decoded = ExecApp::from_payload(&app.to_payload().unwrap()).unwrap();
    assert_eq!(decoded, app);
}
