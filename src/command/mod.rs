// src/command/mod.rs

//! `exec` declarations.
//!
//! - [`model`] holds the command descriptor and the `exec` app aggregate.
//! - [`parser`] reads one `exec` directive into a [`Command`].
//! - [`app`] merges top-level declarations into an [`ExecApp`] and encodes
//!   it for the configuration pipeline.

pub mod app;
pub mod model;
pub mod parser;

pub use app::{
    APP_NAME, AppPayload, TOP_LEVEL_DEFAULT_TRIGGER, merge_encoded, parse_declaration,
};
pub use model::{Command, ExecApp};
pub use parser::parse_command;
