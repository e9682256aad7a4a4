// src/config/mod.rs

//! Execfile loading and adaptation.
//!
//! Responsibilities:
//! - Define the adapted output (`model.rs`).
//! - Read an Execfile and split it into global and site blocks, handing each
//!   `exec` to the right parse path (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{adapt_str, default_config_path, load_from_path};
pub use model::{AdaptedConfig, Route};
