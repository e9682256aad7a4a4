pub mod builders;
pub mod sinks;

use std::sync::Once;

use execfile::command::{Command, ExecApp, parse_declaration};
use execfile::errors::Result;
use execfile::sink::SinkRegistry;
use execfile::syntax::Dispenser;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `-- --nocapture`). Raise the level with `RUST_LOG=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// A dispenser over `src`, positioned before its first token.
pub fn dispenser(src: &str) -> Dispenser {
    Dispenser::from_source(src, "Execfile").expect("test source should tokenize")
}

/// Parse `src` as a route-scoped declaration (no trigger default).
pub fn parse_handler(src: &str) -> Result<Command> {
    parse_handler_with(src, &SinkRegistry::with_defaults())
}

pub fn parse_handler_with(src: &str, sinks: &SinkRegistry) -> Result<Command> {
    parse_declaration(&mut dispenser(src), sinks, None)
}

/// Merge each source as a successive top-level declaration.
pub fn merge_top_level(sources: &[&str]) -> Result<ExecApp> {
    let sinks = SinkRegistry::with_defaults();
    let mut app = ExecApp::default();
    for src in sources {
        app.merge_declaration(&mut dispenser(src), &sinks)?;
    }
    Ok(app)
}
