// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every failure while reading an Execfile ends up here. Syntax and
//! resolution errors carry the position of the offending token so the
//! operator can find it; internal errors mean an earlier stage handed us
//! something we produced ourselves and can no longer decode.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecfileError {
    #[error("{file}:{line}: {kind}")]
    Syntax {
        file: String,
        line: usize,
        kind: SyntaxErrorKind,
    },

    #[error("{file}:{line}: cannot resolve sink module {id} (found {found})")]
    Resolution {
        file: String,
        line: usize,
        id: String,
        found: String,
    },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML encoding error: {0}")]
    TomlError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The distinct syntax conditions the parser can hit.
///
/// They all share [`ExecfileError::Syntax`] as their outward channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("{0} specified twice")]
    DuplicateField(String),

    #[error("wrong argument count or unexpected line ending after '{0}'")]
    MissingArgument(String),

    #[error("'{0}' not expected")]
    UnexpectedToken(String),

    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    #[error("unterminated quote opened on line {0}")]
    UnterminatedQuote(usize),

    #[error("{0}")]
    Message(String),
}

impl ExecfileError {
    /// Syntax kind, if this is a syntax error.
    pub fn syntax_kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            ExecfileError::Syntax { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// A `file:line` pair used when building positioned errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn syntax(&self, kind: SyntaxErrorKind) -> ExecfileError {
        ExecfileError::Syntax {
            file: self.file.clone(),
            line: self.line,
            kind,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

pub type Result<T> = std::result::Result<T, ExecfileError>;
