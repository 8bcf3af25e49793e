//! Tokenizer for KiCad S-expression text.
//!
//! A single forward pass over the input that yields [`Token`]s lazily. The
//! tokenizer knows nothing about document structure: it only separates parens,
//! quoted strings and bare atoms.

use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::Span;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    Open,
    /// `)`
    Close,
    /// A quoted atom; the token text is the unescaped value.
    String,
    /// A bare atom (symbol or number-like); the token text is the raw lexeme.
    Atom,
}

/// A lexical token borrowed from the input where possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
}

/// Lazy token stream over a string.
///
/// Yields `Err` at most once; the stream ends after an error.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    fn punct(&mut self, kind: TokenKind, start: usize) -> Token<'a> {
        self.pos = start + 1;
        Token {
            kind,
            text: Cow::Borrowed(&self.input[start..start + 1]),
            span: Span::new(start, start + 1),
        }
    }

    fn bare(&mut self, start: usize) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let mut end = start;
        while end < bytes.len() && !is_whitespace(bytes[end]) && !is_paren(bytes[end]) {
            end += 1;
        }
        self.pos = end;
        Token {
            kind: TokenKind::Atom,
            text: Cow::Borrowed(&self.input[start..end]),
            span: Span::new(start, end),
        }
    }

    /// Scan a quoted atom. Only `\"` and `\\` are escapes; any other
    /// backslash stays in the value together with the character after it.
    fn quoted(&mut self, start: usize) -> Result<Token<'a>, LexError> {
        let bytes = self.input.as_bytes();
        let mut unescaped: Option<String> = None;
        let mut run_start = start + 1;
        let mut idx = start + 1;

        while idx < bytes.len() {
            match bytes[idx] {
                b'"' => {
                    let run = &self.input[run_start..idx];
                    let text = match unescaped {
                        Some(mut buf) => {
                            buf.push_str(run);
                            Cow::Owned(buf)
                        }
                        None => Cow::Borrowed(run),
                    };
                    self.pos = idx + 1;
                    return Ok(Token {
                        kind: TokenKind::String,
                        text,
                        span: Span::new(start, idx + 1),
                    });
                }
                b'\\' if matches!(bytes.get(idx + 1), Some(b'"' | b'\\')) => {
                    unescaped
                        .get_or_insert_with(String::new)
                        .push_str(&self.input[run_start..idx]);
                    // The escaped character opens the next run.
                    run_start = idx + 1;
                    idx += 2;
                }
                _ => idx += 1,
            }
        }

        Err(LexError::UnterminatedString { offset: start })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_whitespace(bytes[self.pos]) {
            self.pos += 1;
        }

        let start = self.pos;
        let token = match *bytes.get(start)? {
            b'(' => self.punct(TokenKind::Open, start),
            b')' => self.punct(TokenKind::Close, start),
            b'"' => match self.quoted(start) {
                Ok(token) => token,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            },
            _ => self.bare(start),
        };
        Some(Ok(token))
    }
}

impl FusedIterator for Tokenizer<'_> {}

pub(crate) fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn is_paren(ch: u8) -> bool {
    ch == b'(' || ch == b')'
}
