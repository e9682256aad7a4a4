// src/syntax/mod.rs

//! Reading Execfile text.
//!
//! - [`lexer`] turns source text into positioned tokens.
//! - [`dispenser`] is the cursor directive parsers consume those tokens
//!   through, and the place positioned errors are built.

pub mod dispenser;
pub mod lexer;

pub use dispenser::Dispenser;
pub use lexer::{Token, tokenize};
