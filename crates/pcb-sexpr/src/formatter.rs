//! Formatting helpers for S-expressions.
//!
//! This module contains:
//! - A KiCad-style text prettifier (`prettify`) that mirrors KiCad's `Prettify()`
//! - A tree entrypoint (`format_tree`) that serializes compactly and then prettifies
//! - Atom quoting/escaping shared with the typed encoder

use crate::token::is_whitespace;
use crate::{Sexpr, SexprKind};

/// KiCad-compatible formatting modes from `KICAD_FORMAT::FORMAT_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// Standard KiCad formatting.
    #[default]
    Normal,
    /// Keep `font`, `stroke`, `fill`, ... lists on a single line.
    CompactTextProperties,
}

const INDENT: u8 = b'\t';
const XY_COLUMN_LIMIT: usize = 99;
const WRAP_COLUMN: usize = 72;
const SHORT_FORM_TOKENS: &[&[u8]] = &[
    b"font",
    b"stroke",
    b"fill",
    b"teardrop",
    b"offset",
    b"rotate",
    b"scale",
];

/// Character-stream state of the prettifier.
struct Prettifier<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    compact_text: bool,
    depth: usize,
    column: usize,
    last_non_whitespace: u8,
    in_quote: bool,
    backslashes: usize,
    inserted_space: bool,
    multi_line: bool,
    in_xy: bool,
    short_form_depth: Option<usize>,
}

impl<'a> Prettifier<'a> {
    fn new(source: &'a str, mode: FormatMode) -> Self {
        Self {
            src: source.as_bytes(),
            out: Vec::with_capacity(source.len()),
            compact_text: mode == FormatMode::CompactTextProperties,
            depth: 0,
            column: 0,
            last_non_whitespace: 0,
            in_quote: false,
            backslashes: 0,
            inserted_space: false,
            multi_line: false,
            in_xy: false,
            short_form_depth: None,
        }
    }

    fn run(mut self) -> Vec<u8> {
        let src = self.src;
        for (i, &ch) in src.iter().enumerate() {
            if is_whitespace(ch) && !self.in_quote {
                self.whitespace(i);
                continue;
            }

            self.inserted_space = false;
            match ch {
                b'(' if !self.in_quote => self.open(i),
                b')' if !self.in_quote => self.close(),
                _ => self.atom_byte(ch),
            }
            self.last_non_whitespace = ch;
        }

        // POSIX newline at EOF.
        self.out.push(b'\n');
        self.out
    }

    fn whitespace(&mut self, i: usize) {
        let next = next_non_whitespace(self.src, i + 1);
        if self.inserted_space
            || self.depth == 0
            || self.last_non_whitespace == b'('
            || next == b')'
            || next == b'('
        {
            return;
        }

        if self.in_xy || self.column < WRAP_COLUMN {
            self.out.push(b' ');
            self.column += 1;
        } else if self.short_form_depth.is_some() {
            self.out.push(b' ');
        } else {
            self.newline(self.depth);
            self.multi_line = true;
        }
        self.inserted_space = true;
    }

    fn open(&mut self, i: usize) {
        let is_xy = self.src[i + 1..].starts_with(b"xy ");
        let is_short_form = self.compact_text && SHORT_FORM_TOKENS.contains(&token_after(self.src, i));

        if self.out.is_empty() {
            self.out.push(b'(');
            self.column += 1;
        } else if (self.in_xy && is_xy && self.column < XY_COLUMN_LIMIT)
            || self.short_form_depth.is_some()
        {
            self.out.extend_from_slice(b" (");
            self.column += 2;
        } else {
            self.newline(self.depth);
            self.out.push(b'(');
            self.column += 1;
        }

        self.in_xy = is_xy;
        if is_short_form && self.short_form_depth.is_none() {
            self.short_form_depth = Some(self.depth);
        }
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);

        if self.short_form_depth.is_some() {
            self.out.push(b')');
            self.column += 1;
        } else if self.last_non_whitespace == b')' || self.multi_line {
            self.newline(self.depth);
            self.out.push(b')');
            self.column += 1;
            self.multi_line = false;
        } else {
            self.out.push(b')');
            self.column += 1;
        }

        if self.short_form_depth == Some(self.depth) {
            self.short_form_depth = None;
        }
    }

    fn atom_byte(&mut self, ch: u8) {
        if ch == b'\\' {
            self.backslashes += 1;
        } else {
            if ch == b'"' && self.backslashes % 2 == 0 {
                self.in_quote = !self.in_quote;
            }
            self.backslashes = 0;
        }
        self.out.push(ch);
        self.column += 1;
    }

    fn newline(&mut self, depth: usize) {
        self.out.push(b'\n');
        self.out.extend(std::iter::repeat_n(INDENT, depth));
        self.column = depth;
    }
}

/// Pretty-print raw S-expression text using KiCad's `Prettify()` logic.
///
/// Normalizes whitespace, indents with tabs, puts a list's closing paren on
/// its own line when the list holds nested lists, and keeps runs of `(xy ...)`
/// points on one line.
pub fn prettify(source: &str, mode: FormatMode) -> String {
    let out = Prettifier::new(source, mode).run();
    // Only ASCII bytes are inserted or removed, so UTF-8 sequences survive intact.
    String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

/// Format an S-expression tree through the KiCad-style prettifier.
///
/// The returned string includes a trailing newline.
pub fn format_tree(sexpr: &Sexpr, mode: FormatMode) -> String {
    prettify(&serialize_compact(sexpr), mode)
}

/// Render a tree on a single line, separating items with one space.
pub fn serialize_compact(sexpr: &Sexpr) -> String {
    let mut out = String::new();
    write_compact(sexpr, &mut out);
    out
}

fn write_compact(sexpr: &Sexpr, out: &mut String) {
    match &sexpr.kind {
        SexprKind::Symbol(s) => out.push_str(s),
        SexprKind::String(s) => out.push_str(&quote_string(s)),
        SexprKind::Number(n) => out.push_str(&n.text()),
        SexprKind::List(items) => {
            out.push('(');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_compact(item, out);
            }
            out.push(')');
        }
    }
}

/// Quote a string value, escaping special characters.
pub fn quote_string(value: &str) -> String {
    let escaped = escape_string(value);
    let mut quoted = String::with_capacity(escaped.len() + 2);
    quoted.push('"');
    quoted.push_str(&escaped);
    quoted.push('"');
    quoted
}

/// Escape a string for use between quotes.
///
/// The tokenizer only understands `\"` and `\\`, and keeps every other
/// backslash verbatim. A backslash is therefore doubled only when it would
/// otherwise form one of those escapes or swallow the closing quote.
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' if matches!(chars.peek(), None | Some('"') | Some('\\')) => {
                result.push_str("\\\\")
            }
            _ => result.push(ch),
        }
    }
    result
}

/// Whether `text` cannot be written as a bare atom.
pub fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.bytes().any(|b| is_whitespace(b) || matches!(b, b'(' | b')' | b'"'))
}

fn next_non_whitespace(bytes: &[u8], idx: usize) -> u8 {
    bytes
        .get(idx..)
        .and_then(|rest| rest.iter().copied().find(|&ch| !is_whitespace(ch)))
        .unwrap_or(0)
}

fn token_after(bytes: &[u8], pos: usize) -> &[u8] {
    let start = pos + 1;
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    &bytes[start..start + len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Sexpr};

    #[test]
    fn prettify_basic_board() {
        let input = "(kicad_pcb (version 20240101) (generator pcbnew) (general (thickness 1.6)))";
        let expected = "(kicad_pcb\n\t(version 20240101)\n\t(generator pcbnew)\n\t(general\n\t\t(thickness 1.6)\n\t)\n)\n";

        assert_eq!(prettify(input, FormatMode::Normal), expected);
    }

    #[test]
    fn prettify_xy_stays_on_line() {
        let input = "(pts (xy 1 2) (xy 3 4) (xy 5 6) (xy 7 8))";
        let expected = "(pts\n\t(xy 1 2) (xy 3 4) (xy 5 6) (xy 7 8)\n)\n";

        assert_eq!(prettify(input, FormatMode::Normal), expected);
    }

    #[test]
    fn prettify_compact_text_properties_short_form_tokens() {
        let input =
            "(effects (font (size 1 1) (thickness 0.15)) (stroke (width 0.12) (type solid)))";
        let expected = "(effects\n\t(font (size 1 1) (thickness 0.15))\n\t(stroke (width 0.12) (type solid))\n)\n";

        assert_eq!(prettify(input, FormatMode::CompactTextProperties), expected);
    }

    #[test]
    fn prettify_ignores_parens_inside_quoted_strings() {
        let input = "(root (field \"a (b) \\\"c\\\"\") (x 1))";
        let expected = "(root\n\t(field \"a (b) \\\"c\\\"\")\n\t(x 1)\n)\n";

        assert_eq!(prettify(input, FormatMode::Normal), expected);
    }

    #[test]
    fn prettify_flat_list_stays_on_one_line() {
        assert_eq!(
            prettify("(at   10\n 20)", FormatMode::Normal),
            "(at 10 20)\n"
        );
    }

    #[test]
    fn format_tree_has_trailing_newline() {
        let sexpr = Sexpr::list(vec![Sexpr::symbol("at"), Sexpr::number(10i64), Sexpr::number(20i64)]);
        assert_eq!(format_tree(&sexpr, FormatMode::Normal), "(at 10 20)\n");
    }

    #[test]
    fn format_tree_preserves_parsed_numeric_lexemes() {
        let sexpr = parse(
            r#"(kicad_pcb
                (setup
                    (pcbplotparams
                        (dashed_line_dash_ratio 12.000000)
                        (hpglpendiameter 15.000000)
                    )
                )
            )"#,
        )
        .unwrap();

        let out = format_tree(&sexpr, FormatMode::Normal);
        assert!(out.contains("(dashed_line_dash_ratio 12.000000)"));
        assert!(out.contains("(hpglpendiameter 15.000000)"));
    }

    #[test]
    fn escaping_only_doubles_significant_backslashes() {
        assert_eq!(escape_string(r"a\nb"), r"a\nb");
        assert_eq!(escape_string(r"a\"), r"a\\");
        assert_eq!(escape_string(r#"a\"b"#), r#"a\\\"b"#);
        assert_eq!(escape_string(r"\\"), r"\\\\");
    }

    #[test]
    fn quoting_rules() {
        assert!(needs_quotes(""));
        assert!(needs_quotes("two words"));
        assert!(needs_quotes("a(b"));
        assert!(!needs_quotes("F.Cu"));
        assert!(!needs_quotes("${REFERENCE}"));
    }

    #[test]
    fn utf8_survives_prettify() {
        let sexpr = parse("(property \"Value\" \"10kΩ\")").unwrap();
        assert_eq!(
            format_tree(&sexpr, FormatMode::Normal),
            "(property \"Value\" \"10kΩ\")\n"
        );
    }
}
