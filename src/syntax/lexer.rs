// src/syntax/lexer.rs

//! Tokenizer for the Execfile block language.
//!
//! The grammar is deliberately small:
//!
//! - whitespace separates tokens, newlines end a line
//! - `"..."` quotes a token (`\"` and `\\` escape inside it)
//! - `` `...` `` quotes a token verbatim
//! - `#` at the start of a token comments out the rest of the line
//! - a backslash right before a newline continues the line
//! - `{` and `}` are structural only as whole, unquoted tokens

use crate::errors::{Location, Result, SyntaxErrorKind};

/// A single token together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub file: String,
    /// Physical line the token starts on (1-based); used in error messages.
    pub line: usize,
    /// Logical line counter; tokens on the same logical line are arguments
    /// of one another. Differs from `line` after continuations or quoted
    /// tokens spanning several lines.
    pub logical_line: usize,
    pub quoted: bool,
}

impl Token {
    pub fn is_open_brace(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    pub fn is_close_brace(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    pub fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
        }
    }
}

struct Pending {
    text: String,
    line: usize,
    logical_line: usize,
    quoted: bool,
}

struct Lexer<'a> {
    file: &'a str,
    line: usize,
    logical_line: usize,
    pending: Option<Pending>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            line: 1,
            logical_line: 1,
            pending: None,
            tokens: Vec::new(),
        }
    }

    fn begin(&mut self, quoted: bool) -> &mut Pending {
        let (line, logical_line) = (self.line, self.logical_line);
        self.pending.get_or_insert_with(|| Pending {
            text: String::new(),
            line,
            logical_line,
            quoted,
        })
    }

    fn push(&mut self, c: char) {
        self.begin(false).text.push(c);
    }

    fn in_token(&self) -> bool {
        self.pending.is_some()
    }

    fn flush(&mut self) {
        if let Some(p) = self.pending.take() {
            self.tokens.push(Token {
                text: p.text,
                file: self.file.to_string(),
                line: p.line,
                logical_line: p.logical_line,
                quoted: p.quoted,
            });
        }
    }

    /// Advance the physical line; `ends_line` is false for continuations.
    fn newline(&mut self, ends_line: bool) {
        self.line += 1;
        if ends_line {
            self.logical_line += 1;
        }
    }
}

/// Split `input` into tokens, tagging each with `file`.
pub fn tokenize(input: &str, file: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(file);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                lexer.flush();
                lexer.newline(true);
            }
            '\\' if matches!(chars.peek(), Some('\n') | Some('\r')) => {
                if chars.peek() == Some(&'\r') {
                    chars.next();
                }
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lexer.flush();
                lexer.newline(false);
            }
            c if c.is_whitespace() => lexer.flush(),
            '#' if !lexer.in_token() => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' | '`' if !lexer.in_token() => {
                let opened_on = lexer.line;
                lexer.begin(true);
                loop {
                    match chars.next() {
                        None => {
                            let loc = Location {
                                file: file.to_string(),
                                line: opened_on,
                            };
                            return Err(loc.syntax(SyntaxErrorKind::UnterminatedQuote(opened_on)));
                        }
                        Some(q) if q == c => break,
                        Some('\\') if c == '"' && matches!(chars.peek(), Some('"') | Some('\\')) => {
                            if let Some(escaped) = chars.next() {
                                lexer.push(escaped);
                            }
                        }
                        Some('\n') => {
                            lexer.push('\n');
                            lexer.newline(false);
                        }
                        Some(other) => lexer.push(other),
                    }
                }
                lexer.flush();
            }
            other => lexer.push(other),
        }
    }

    lexer.flush();
    Ok(lexer.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_whitespace_and_tracks_lines() {
        let toks = tokenize("exec echo hi\n  startup\n", "Execfile").unwrap();
        assert_eq!(texts(&toks), vec!["exec", "echo", "hi", "startup"]);
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[3].line, 2);
        assert_ne!(toks[2].logical_line, toks[3].logical_line);
    }

    #[test]
    fn quoted_tokens_keep_spaces_and_escapes() {
        let toks = tokenize(r#"args "hello world" "say \"hi\"" `raw \n`"#, "f").unwrap();
        assert_eq!(texts(&toks), vec!["args", "hello world", "say \"hi\"", "raw \\n"]);
        assert!(toks[1].quoted);
        assert!(!toks[0].quoted);
    }

    #[test]
    fn empty_quoted_token_is_kept() {
        let toks = tokenize(r#"args "" x"#, "f").unwrap();
        assert_eq!(texts(&toks), vec!["args", "", "x"]);
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let toks = tokenize("exec ls # list things\nexec pwd", "f").unwrap();
        assert_eq!(texts(&toks), vec!["exec", "ls", "exec", "pwd"]);
        // a hash inside a token is literal
        let toks = tokenize("args a#b", "f").unwrap();
        assert_eq!(texts(&toks), vec!["args", "a#b"]);
    }

    #[test]
    fn continuation_keeps_logical_line() {
        let toks = tokenize("exec echo \\\n  more\nnext", "f").unwrap();
        assert_eq!(texts(&toks), vec!["exec", "echo", "more", "next"]);
        assert_eq!(toks[1].logical_line, toks[2].logical_line);
        assert_eq!(toks[2].line, 2);
        assert_eq!(toks[3].line, 3);
    }

    #[test]
    fn braces_only_structural_when_whole() {
        let toks = tokenize("exec {foo} \"{\" {", "f").unwrap();
        assert!(!toks[1].is_open_brace());
        assert!(!toks[2].is_open_brace());
        assert!(toks[3].is_open_brace());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = tokenize("exec\n\"oops", "Execfile").unwrap_err();
        assert_eq!(
            err.syntax_kind(),
            Some(&SyntaxErrorKind::UnterminatedQuote(2))
        );
    }
}
