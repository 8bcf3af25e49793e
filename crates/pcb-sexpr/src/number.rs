//! Numeric atoms.
//!
//! KiCad writes coordinates, sizes and versions as bare decimal lexemes and is
//! not consistent about integers vs floats (`(width 1)` and `(width 1.0)` are
//! both seen in the wild). A [`Number`] keeps the lexeme it was read from, so a
//! raw tree re-emits exactly what it parsed, and offers [`Number::minimal`] as
//! the canonical spelling used for comparisons and freshly encoded values.

use std::borrow::Cow;
use std::fmt;

/// A numeric atom: its value plus the source lexeme when it came from text.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Number {
    value: f64,
    lexeme: Option<String>,
}

impl Number {
    /// A synthetic number with no source lexeme.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            lexeme: None,
        }
    }

    /// Parse a bare atom, returning `None` unless it is lexically numeric.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        if !is_number_lexeme(lexeme) {
            return None;
        }
        let value = lexeme.parse::<f64>().ok()?;
        Some(Self {
            value,
            lexeme: Some(lexeme.to_string()),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The lexeme this number was parsed from, if any.
    pub fn lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }

    /// The value as an integer, if it has no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        (self.value.fract() == 0.0 && self.value.abs() < i64::MAX as f64)
            .then_some(self.value as i64)
    }

    /// Shortest decimal spelling that parses back to the same value.
    pub fn minimal(&self) -> String {
        format_minimal(self.value)
    }

    /// Drop the source lexeme so the number compares by value.
    pub fn normalized(&self) -> Self {
        Self::new(self.value)
    }

    /// Spelling used when a bound numeric field is written back out.
    ///
    /// Minimal decimal, except that a scientific-notation lexeme from the
    /// source is kept as-is.
    pub fn encoded(&self) -> Self {
        match self.lexeme.as_deref() {
            Some(lexeme) if lexeme.contains(['e', 'E']) => self.clone(),
            _ => Self {
                value: self.value,
                lexeme: Some(self.minimal()),
            },
        }
    }

    /// Text of this atom as it would be written.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.lexeme {
            Some(lexeme) => Cow::Borrowed(lexeme),
            None => Cow::Owned(self.minimal()),
        }
    }
}

/// Numbers compare by their written text; use [`Number::normalized`] on both
/// sides to compare by value.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::new(value as f64)
    }
}

/// Check whether a bare atom is a number: optional sign, digits, optional
/// fraction, optional exponent.
pub fn is_number_lexeme(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_start = idx;
    idx += count_digits(&bytes[idx..]);
    let mut digits = idx - int_start;

    if bytes.get(idx) == Some(&b'.') {
        idx += 1;
        let fraction = count_digits(&bytes[idx..]);
        idx += fraction;
        digits += fraction;
    }

    if digits == 0 {
        return false;
    }

    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let exponent = count_digits(&bytes[idx..]);
        if exponent == 0 {
            return false;
        }
        idx += exponent;
    }

    idx == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn format_minimal(value: f64) -> String {
    // `Display` for f64 is the shortest round-tripping decimal and never uses
    // an exponent; it only needs help with negative zero.
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_numbers() {
        for text in ["0", "-1", "+2", "1.5", "-0.25", "5.", ".5", "1e5", "2.5E-3"] {
            assert!(is_number_lexeme(text), "{text} should be numeric");
        }
        for text in ["", "-", ".", "e5", "1e", "1.2.3", "F.Cu", "inf", "nan", "1x"] {
            assert!(!is_number_lexeme(text), "{text} should not be numeric");
        }
    }

    #[test]
    fn minimal_spelling() {
        assert_eq!(Number::from_lexeme("1.000000").unwrap().minimal(), "1");
        assert_eq!(Number::from_lexeme("+0.250").unwrap().minimal(), "0.25");
        assert_eq!(Number::from_lexeme("-0").unwrap().minimal(), "0");
        assert_eq!(Number::new(20231120.0).minimal(), "20231120");
        assert_eq!(Number::new(-3.81).minimal(), "-3.81");
    }

    #[test]
    fn encoded_keeps_scientific_lexemes_only() {
        let sci = Number::from_lexeme("1e-3").unwrap();
        assert_eq!(sci.encoded().text(), "1e-3");

        let padded = Number::from_lexeme("12.000000").unwrap();
        assert_eq!(padded.text(), "12.000000");
        assert_eq!(padded.encoded().text(), "12");
    }

    #[test]
    fn equality_is_textual_until_normalized() {
        let a = Number::from_lexeme("1.0").unwrap();
        let b = Number::from_lexeme("1").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.normalized(), b.normalized());
    }
}
