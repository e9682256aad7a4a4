// src/syntax/dispenser.rs

//! Cursor over a token stream.
//!
//! Directive parsers never touch tokens directly; they walk a [`Dispenser`]
//! and build errors through it so every failure carries a position.

use crate::errors::{ExecfileError, Location, Result, SyntaxErrorKind};
use crate::syntax::lexer::{Token, tokenize};

#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    /// `None` until the first token has been loaded.
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Tokenize `input` and wrap the result.
    pub fn from_source(input: &str, file: &str) -> Result<Self> {
        Ok(Self::new(tokenize(input, file)?))
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next_index())
    }

    /// Load the next token, wherever it is. Returns false at end of input.
    pub fn next(&mut self) -> bool {
        let idx = self.next_index();
        if idx < self.tokens.len() {
            self.cursor = Some(idx);
            true
        } else {
            false
        }
    }

    fn next_on_same_line(&self) -> bool {
        let Some(next) = self.peek() else {
            return false;
        };
        match self.current() {
            None => true,
            Some(curr) => curr.file == next.file && curr.logical_line == next.logical_line,
        }
    }

    /// Load the next token if it is on the same line and is not a block
    /// brace. The very first call always loads the first token.
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        if self.cursor.is_some()
            && self
                .peek()
                .is_some_and(|t| t.is_open_brace() || t.is_close_brace())
        {
            return false;
        }
        self.next()
    }

    /// Every remaining argument on the current line, in order.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            args.push(self.val().to_string());
        }
        args
    }

    /// Exactly one argument on the rest of the line.
    pub fn single_arg(&mut self) -> Result<String> {
        if !self.next_arg() {
            return Err(self.arg_err());
        }
        let value = self.val().to_string();
        if self.next_arg() {
            return Err(self.arg_err());
        }
        Ok(value)
    }

    /// Fail with an argument error if anything else follows on this line.
    pub fn expect_no_args(&mut self) -> Result<()> {
        if self.next_arg() {
            return Err(self.arg_err());
        }
        Ok(())
    }

    /// Step through the entries of a block opened on the current line.
    ///
    /// Call it as the loop condition with the nesting level the block starts
    /// at: `while d.next_block(nesting)? { ... }`. After each `true`, the
    /// entry's first token is loaded. Delegates that parse their own nested
    /// block pass [`Dispenser::nesting`].
    pub fn next_block(&mut self, initial_nesting: usize) -> Result<bool> {
        if self.nesting > initial_nesting {
            if !self.next() {
                return Err(self.eof_err("expected '}' to close block"));
            }
            let (close, open) = self
                .current()
                .map_or((false, false), |t| (t.is_close_brace(), t.is_open_brace()));
            if close {
                self.nesting -= 1;
            } else if open {
                self.nesting += 1;
            }
            return Ok(self.nesting > initial_nesting);
        }

        if !self.next_on_same_line() || !self.peek().is_some_and(Token::is_open_brace) {
            return Ok(false);
        }
        self.next();
        if !self.next() {
            return Err(self.eof_err("expected '}' to close block"));
        }
        if self.current().is_some_and(Token::is_close_brace) {
            return Ok(false);
        }
        self.nesting += 1;
        Ok(true)
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Text of the current token, or `""` before the first one.
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    pub fn location(&self) -> Location {
        self.current()
            .or_else(|| self.tokens.first())
            .map(Token::location)
            .unwrap_or_else(|| Location {
                file: String::new(),
                line: 0,
            })
    }

    pub fn line(&self) -> usize {
        self.location().line
    }

    pub fn file(&self) -> String {
        self.location().file
    }

    pub fn err(&self, msg: impl Into<String>) -> ExecfileError {
        self.location().syntax(SyntaxErrorKind::Message(msg.into()))
    }

    pub fn arg_err(&self) -> ExecfileError {
        self.location()
            .syntax(SyntaxErrorKind::MissingArgument(self.val().to_string()))
    }

    pub fn duplicate_err(&self, field: &str) -> ExecfileError {
        self.location()
            .syntax(SyntaxErrorKind::DuplicateField(field.to_string()))
    }

    pub fn unexpected_err(&self) -> ExecfileError {
        self.location()
            .syntax(SyntaxErrorKind::UnexpectedToken(self.val().to_string()))
    }

    pub fn eof_err(&self, msg: impl Into<String>) -> ExecfileError {
        self.location()
            .syntax(SyntaxErrorKind::UnexpectedEof(msg.into()))
    }

    pub fn resolution_err(&self, id: impl Into<String>, found: impl Into<String>) -> ExecfileError {
        let loc = self.location();
        ExecfileError::Resolution {
            file: loc.file,
            line: loc.line,
            id: id.into(),
            found: found.into(),
        }
    }
}
