//! Primitive tree builder: recursive descent over the token stream.

use std::iter::Peekable;

use crate::token::{LexError, Token, TokenKind, Tokenizer};
use crate::{Number, Sexpr, SexprKind, Span};

/// Structural errors in otherwise well-tokenized input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Unbalanced parentheses: a `)` with no open list.
    #[error("unbalanced parentheses: unexpected ')' at byte {offset}")]
    UnexpectedClose { offset: usize },
    /// Unbalanced parentheses: input ended inside a list.
    #[error("unbalanced parentheses: list opened at byte {offset} is never closed")]
    UnclosedList { offset: usize },
    #[error("input contains no S-expression")]
    Empty,
}

/// Any failure turning text into a primitive tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Builds [`Sexpr`] trees from a [`Tokenizer`].
pub struct Parser<'a> {
    tokens: Peekable<Tokenizer<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(input).peekable(),
        }
    }

    /// Parse every top-level form in the input.
    pub fn parse_all(&mut self) -> Result<Vec<Sexpr>, Error> {
        let mut forms = Vec::new();
        while let Some(token) = self.tokens.next() {
            forms.push(self.form(token?)?);
        }
        Ok(forms)
    }

    /// Whether any tokens remain.
    pub fn is_at_end(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    fn form(&mut self, token: Token<'a>) -> Result<Sexpr, Error> {
        match token.kind {
            TokenKind::Open => self.list(token.span.start),
            TokenKind::Close => Err(ParseError::UnexpectedClose {
                offset: token.span.start,
            }
            .into()),
            TokenKind::String => Ok(Sexpr::with_span(
                SexprKind::String(token.text.into_owned()),
                token.span,
            )),
            TokenKind::Atom => Ok(Sexpr::with_span(bare_kind(&token.text), token.span)),
        }
    }

    fn list(&mut self, start: usize) -> Result<Sexpr, Error> {
        let mut items = Vec::new();

        loop {
            let Some(token) = self.tokens.next() else {
                return Err(ParseError::UnclosedList { offset: start }.into());
            };
            let token = token?;

            if token.kind == TokenKind::Close {
                return Ok(Sexpr::with_span(
                    SexprKind::List(items),
                    Span::new(start, token.span.end),
                ));
            }

            items.push(self.form(token)?);

            if items.len() % 1000 == 0 {
                log::trace!("Parsed {} items in list at byte {start}", items.len());
            }
        }
    }
}

/// Classify a bare atom: numbers are recognized lexically, everything else is
/// a symbol.
pub(crate) fn bare_kind(text: &str) -> SexprKind {
    match Number::from_lexeme(text) {
        Some(number) => SexprKind::Number(number),
        None => SexprKind::Symbol(text.to_string()),
    }
}

/// Parse every top-level form in `input`.
pub fn parse_all(input: &str) -> Result<Vec<Sexpr>, Error> {
    log::trace!(
        "Parsing S-expressions from {} bytes of input",
        input.len()
    );
    let result = Parser::new(input).parse_all();
    match &result {
        Ok(forms) => log::trace!("Parsed {} top-level S-expressions", forms.len()),
        Err(e) => log::trace!("Failed to parse S-expressions: {e}"),
    }
    result
}

/// Parse `input` and return its first top-level form.
///
/// The whole input is still checked for balance.
pub fn parse(input: &str) -> Result<Sexpr, Error> {
    parse_all(input)?
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::Empty.into())
}
