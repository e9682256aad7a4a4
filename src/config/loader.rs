// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::{APP_NAME, ExecApp, parse_declaration};
use crate::config::model::{AdaptedConfig, Route};
use crate::errors::{Result, SyntaxErrorKind};
use crate::sink::SinkRegistry;
use crate::syntax::{Dispenser, Token, tokenize};

/// The only directive execfile knows.
const EXEC_DIRECTIVE: &str = "exec";

/// Load an Execfile from `path` and adapt it.
pub fn load_from_path(path: impl AsRef<Path>, sinks: &SinkRegistry) -> Result<AdaptedConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    adapt_str(&contents, &path.display().to_string(), sinks)
}

/// Adapt Execfile text.
///
/// - A leading block without keys is the global block; every entry in it is
///   a top-level `exec` declaration merged into the `exec` app.
/// - Every other block is `<address>[, <address>...] { ... }`; each `exec`
///   inside becomes a [`Route`].
pub fn adapt_str(input: &str, file: &str, sinks: &SinkRegistry) -> Result<AdaptedConfig> {
    let tokens = tokenize(input, file)?;
    let mut app = ExecApp::default();
    let mut routes = Vec::new();

    let mut i = 0;
    let mut first = true;
    while i < tokens.len() {
        let block = next_server_block(&tokens, i)?;
        i = block.end + 1;

        let body = &tokens[block.open + 1..block.end];
        if block.keys.is_empty() {
            if !first {
                return Err(tokens[block.open].location().syntax(SyntaxErrorKind::Message(
                    "the global block must be the first block".to_string(),
                )));
            }
            for segment in directive_segments(body)? {
                ensure_exec(segment)?;
                let mut d = Dispenser::new(segment.to_vec());
                app.merge_declaration(&mut d, sinks)?;
                ensure_consumed(&mut d)?;
            }
        } else {
            for segment in directive_segments(body)? {
                ensure_exec(segment)?;
                let (matcher, segment) = extract_matcher(segment);
                let mut d = Dispenser::new(segment);
                let handler = parse_declaration(&mut d, sinks, None)?;
                ensure_consumed(&mut d)?;
                debug!(addresses = ?block.keys, ?matcher, command = %handler.command, "adapted exec route");
                routes.push(Route {
                    addresses: block.keys.clone(),
                    matcher,
                    handler,
                });
            }
        }
        first = false;
    }

    let mut adapted = AdaptedConfig {
        routes,
        ..Default::default()
    };
    if !app.is_empty() {
        adapted.apps.insert(APP_NAME.to_string(), app.to_payload()?);
    }

    info!(
        file,
        top_level = app.len(),
        routes = adapted.routes.len(),
        "adapted Execfile"
    );
    Ok(adapted)
}

/// Default Execfile location: `Execfile` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Execfile")
}

struct ServerBlock {
    keys: Vec<String>,
    open: usize,
    end: usize,
}

/// Read `<keys...> {` starting at `start` and find the matching `}`.
fn next_server_block(tokens: &[Token], start: usize) -> Result<ServerBlock> {
    let line = tokens[start].logical_line;
    let mut keys = Vec::new();
    let mut i = start;

    while i < tokens.len() && tokens[i].logical_line == line && !tokens[i].is_open_brace() {
        if tokens[i].is_close_brace() {
            return Err(tokens[i].location().syntax(SyntaxErrorKind::UnexpectedToken("}".to_string())));
        }
        keys.extend(
            tokens[i]
                .text
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        );
        i += 1;
    }

    if i >= tokens.len() || !tokens[i].is_open_brace() || tokens[i].logical_line != line {
        let last = &tokens[i.saturating_sub(1).max(start)];
        return Err(last.location().syntax(SyntaxErrorKind::Message(format!(
            "expected '{{' to open a block after '{}'",
            last.text
        ))));
    }

    let end = matching_close(tokens, i)?;
    Ok(ServerBlock { keys, open: i, end })
}

fn matching_close(tokens: &[Token], open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (idx, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_open_brace() {
            depth += 1;
        } else if tok.is_close_brace() {
            depth -= 1;
            if depth == 0 {
                return Ok(idx);
            }
        }
    }
    Err(tokens[open].location().syntax(SyntaxErrorKind::UnexpectedEof(format!(
        "block opened on line {} is never closed",
        tokens[open].line
    ))))
}

/// Split a block body into directives: one logical line each, extended
/// through a block opened on that line.
fn directive_segments(body: &[Token]) -> Result<Vec<&[Token]>> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < body.len() {
        let start = i;
        if body[start].is_close_brace() {
            return Err(body[start].location().syntax(SyntaxErrorKind::UnexpectedToken("}".to_string())));
        }
        let line = body[start].logical_line;
        while i < body.len() && body[i].logical_line == line {
            if body[i].is_open_brace() {
                i = matching_close(body, i)?;
                i += 1;
                break;
            }
            i += 1;
        }
        segments.push(&body[start..i]);
    }

    Ok(segments)
}

fn ensure_exec(segment: &[Token]) -> Result<()> {
    match segment.first() {
        Some(tok) if tok.text == EXEC_DIRECTIVE && !tok.quoted => Ok(()),
        Some(tok) => Err(tok
            .location()
            .syntax(SyntaxErrorKind::UnexpectedToken(tok.text.clone()))),
        None => Ok(()),
    }
}

fn ensure_consumed(d: &mut Dispenser) -> Result<()> {
    if d.next() {
        return Err(d.unexpected_err());
    }
    Ok(())
}

fn is_matcher(tok: &Token) -> bool {
    !tok.quoted && (tok.text == "*" || tok.text.starts_with('/') || tok.text.starts_with('@'))
}

/// Pull a handler matcher out of `exec <matcher> ...`.
fn extract_matcher(segment: &[Token]) -> (Option<String>, Vec<Token>) {
    match segment {
        [name, candidate, ..]
            if candidate.logical_line == name.logical_line && is_matcher(candidate) =>
        {
            let mut rest = segment.to_vec();
            let matcher = rest.remove(1);
            (Some(matcher.text), rest)
        }
        _ => (None, segment.to_vec()),
    }
}
