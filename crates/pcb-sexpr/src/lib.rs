//! Primitive S-expression layer for KiCad file formats.
//!
//! Text goes through a lazy [`token::Tokenizer`] and a recursive-descent
//! [`parser::Parser`] into [`Sexpr`] trees that keep source spans and numeric
//! lexemes. Nothing here knows about KiCad schemas; typed binding lives in
//! `pcb-kicad-codec`.
//!
//! # Tree Traversal
//!
//! - [`Sexpr::walk`] - Depth-first traversal with ancestor context
//! - [`Sexpr::find_list`] / [`Sexpr::find_all_lists`] - Direct child lookup by head symbol
//! - [`Sexpr::normalized`] - Numeric normalization for structural comparison

pub mod formatter;
pub mod number;
pub mod parser;
pub mod token;

use std::borrow::Cow;
use std::fmt;

pub use number::{is_number_lexeme, Number};
pub use parser::{parse, parse_all, Error, ParseError, Parser};
pub use token::{LexError, Token, TokenKind, Tokenizer};

/// Find a direct child list `(name ...)` within a list of [`Sexpr`] nodes.
pub fn find_child_list<'a>(items: &'a [Sexpr], name: &str) -> Option<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .find(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
}

/// Find all direct child lists `(name ...)` within a list of [`Sexpr`] nodes.
pub fn find_all_child_lists<'a>(items: &'a [Sexpr], name: &str) -> Vec<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .filter(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
        .collect()
}

/// Context provided while walking the S-expression tree.
#[derive(Debug, Clone)]
pub struct WalkCtx<'a> {
    /// Ancestors from root to parent of the current node (root first).
    pub ancestors: &'a [&'a Sexpr],
    /// Index of this node in its parent list, if it has a parent.
    pub index_in_parent: Option<usize>,
}

impl<'a> WalkCtx<'a> {
    /// Get the parent node (last ancestor).
    pub fn parent(&self) -> Option<&'a Sexpr> {
        self.ancestors.last().copied()
    }

    /// Head symbol of the parent list.
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent()?.head()
    }

    /// Nesting depth (0 for the root).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Byte span in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span for nodes built in code rather than parsed.
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_synthetic(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The kind of S-expression value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SexprKind {
    /// A bare, non-numeric atom
    Symbol(String),
    /// A quoted atom (unescaped value), even if it looks numeric
    String(String),
    /// A bare atom that is lexically a number
    Number(Number),
    /// A list of S-expressions
    List(Vec<Sexpr>),
}

/// An S-expression value with source span
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sexpr {
    pub kind: SexprKind,
    pub span: Span,
}

impl PartialEq for Sexpr {
    fn eq(&self, other: &Self) -> bool {
        // Spans are positional metadata, not content.
        self.kind == other.kind
    }
}

impl Sexpr {
    pub fn with_span(kind: SexprKind, span: Span) -> Self {
        Self { kind, span }
    }

    fn synthetic(kind: SexprKind) -> Self {
        Self::with_span(kind, Span::synthetic())
    }

    /// Create a symbol (unquoted atom) with synthetic span
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::synthetic(SexprKind::Symbol(s.into()))
    }

    /// Create a string (quoted atom) with synthetic span
    pub fn string(s: impl Into<String>) -> Self {
        Self::synthetic(SexprKind::String(s.into()))
    }

    /// Create a number with synthetic span
    pub fn number(n: impl Into<Number>) -> Self {
        Self::synthetic(SexprKind::Number(n.into()))
    }

    /// Create a bare atom, classified the way the parser would classify it.
    pub fn bare(text: &str) -> Self {
        Self::synthetic(parser::bare_kind(text))
    }

    /// Create a list from a vector of S-expressions with synthetic span
    pub fn list(items: Vec<Sexpr>) -> Self {
        Self::synthetic(SexprKind::List(items))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, SexprKind::List(_))
    }

    pub fn is_atom(&self) -> bool {
        !self.is_list()
    }

    /// Get the text of a symbol or string atom
    pub fn as_atom(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text of any atom, numbers included.
    pub fn atom_text(&self) -> Option<Cow<'_, str>> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(Cow::Borrowed(s)),
            SexprKind::Number(n) => Some(n.text()),
            SexprKind::List(_) => None,
        }
    }

    /// Get the symbol name if this is a symbol
    pub fn as_sym(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get the string content if this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.kind {
            SexprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::value)
    }

    /// Get the list items if this is a list
    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match &self.kind {
            SexprKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get mutable access to list items if this is a list
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Sexpr>> {
        match &mut self.kind {
            SexprKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// Head symbol of a list, e.g. `pad` for `(pad "1" smd ...)`.
    pub fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_sym()
    }

    /// Find a child list with the given name (first element)
    pub fn find_list(&self, name: &str) -> Option<&[Sexpr]> {
        find_child_list(self.as_list()?, name)
    }

    /// Find all child lists with the given name
    pub fn find_all_lists(&self, name: &str) -> Vec<&[Sexpr]> {
        self.as_list()
            .map(|items| find_all_child_lists(items, name))
            .unwrap_or_default()
    }

    /// Copy of this tree with every number rewritten to its minimal decimal
    /// spelling and spans cleared.
    ///
    /// Two trees are numerically and structurally equal iff their normalized
    /// forms compare equal.
    pub fn normalized(&self) -> Sexpr {
        let kind = match &self.kind {
            SexprKind::Number(n) => SexprKind::Number(n.normalized()),
            SexprKind::List(items) => SexprKind::List(items.iter().map(Sexpr::normalized).collect()),
            other => other.clone(),
        };
        Sexpr::synthetic(kind)
    }

    /// Single-line rendering with no prettification.
    pub fn to_compact_string(&self) -> String {
        formatter::serialize_compact(self)
    }

    /// Depth-first traversal of the tree, visiting every node once.
    ///
    /// The callback receives each node along with a [`WalkCtx`] containing
    /// the ancestor stack and index within its parent list.
    ///
    /// # Example
    ///
    /// ```
    /// use pcb_sexpr::{parse, SexprKind};
    ///
    /// let sexpr = parse("(a (b c) d)").unwrap();
    /// let mut symbols = Vec::new();
    /// sexpr.walk(|node, _ctx| {
    ///     if let SexprKind::Symbol(s) = &node.kind {
    ///         symbols.push(s.clone());
    ///     }
    /// });
    /// assert_eq!(symbols, vec!["a", "b", "c", "d"]);
    /// ```
    pub fn walk<F>(&self, mut f: F)
    where
        F: FnMut(&Sexpr, WalkCtx<'_>),
    {
        fn walk_recursive<'a, F>(
            node: &'a Sexpr,
            stack: &mut Vec<&'a Sexpr>,
            f: &mut F,
            index_in_parent: Option<usize>,
        ) where
            F: FnMut(&Sexpr, WalkCtx<'_>),
        {
            f(
                node,
                WalkCtx {
                    ancestors: stack,
                    index_in_parent,
                },
            );

            if let Some(children) = node.as_list() {
                stack.push(node);
                for (i, child) in children.iter().enumerate() {
                    walk_recursive(child, stack, f, Some(i));
                }
                stack.pop();
            }
        }

        let mut stack = Vec::new();
        walk_recursive(self, &mut stack, &mut f, None);
    }
}

/// Create a key-value pair list
pub fn kv<K: Into<String>, V: Into<Sexpr>>(k: K, v: V) -> Sexpr {
    Sexpr::list(vec![Sexpr::symbol(k), v.into()])
}

/// A builder for constructing lists incrementally
#[derive(Debug, Default)]
pub struct ListBuilder {
    items: Vec<Sexpr>,
}

impl ListBuilder {
    /// Create a new builder with a node name
    pub fn node<N: Into<Sexpr>>(name: N) -> Self {
        Self {
            items: vec![name.into()],
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<V: Into<Sexpr>>(&mut self, v: V) -> &mut Self {
        self.items.push(v.into());
        self
    }

    pub fn push_if<V: Into<Sexpr>>(&mut self, cond: bool, v: V) -> &mut Self {
        if cond {
            self.items.push(v.into());
        }
        self
    }

    pub fn extend<I, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Sexpr>,
    {
        self.items.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Insert at `index`, clamped to the current length.
    pub fn insert<V: Into<Sexpr>>(&mut self, index: usize, v: V) -> &mut Self {
        let index = index.min(self.items.len());
        self.items.insert(index, v.into());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build(self) -> Sexpr {
        Sexpr::list(self.items)
    }
}

impl From<&str> for Sexpr {
    fn from(s: &str) -> Self {
        Self::symbol(s)
    }
}

impl From<String> for Sexpr {
    fn from(s: String) -> Self {
        Self::symbol(s)
    }
}

impl From<i64> for Sexpr {
    fn from(n: i64) -> Self {
        Sexpr::number(n)
    }
}

impl From<f64> for Sexpr {
    fn from(n: f64) -> Self {
        Sexpr::number(n)
    }
}

impl From<Number> for Sexpr {
    fn from(n: Number) -> Self {
        Sexpr::number(n)
    }
}

impl From<bool> for Sexpr {
    fn from(b: bool) -> Self {
        Self::symbol(if b { "yes" } else { "no" })
    }
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = formatter::format_tree(self, formatter::FormatMode::Normal);
        f.write_str(formatted.trim_end_matches('\n'))
    }
}
