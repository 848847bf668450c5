//! Cursor and lexical atoms.
//!
//! The [`Cursor`] tracks a byte position in the source text. The atoms
//! (keyword, number, string) each attempt a match at the current
//! position and, on mismatch, fail without consuming any input, so a
//! caller trying alternatives sees the cursor where it left it.

use crate::report::SyntaxError;

/// A byte-position cursor over the source text.
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Current byte offset into the source.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once the whole input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek at the current byte without consuming it.
    pub(crate) fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Skip whitespace characters (space, tab, newline, carriage return).
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.bump();
        }
    }

    /// Consume `byte` if it is next, reporting whether it was.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `byte` or fail at the current position.
    pub(crate) fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), SyntaxError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.fail(self.pos, expected))
        }
    }

    /// Capture a failure at `at`, with the line text and position resolved
    /// against this cursor's source.
    pub fn fail(&self, at: usize, expected: &'static str) -> SyntaxError {
        SyntaxError::new(self.source, at, expected)
    }

    /// Match an exact keyword (`true`, `false`, `null`).
    ///
    /// The keyword must not be the prefix of a longer identifier:
    /// `nullx` does not match `null`.
    pub fn keyword(&mut self, kw: &'static str, expected: &'static str) -> Result<(), SyntaxError> {
        let start = self.pos;
        if self.source.as_bytes()[start..].starts_with(kw.as_bytes()) {
            let after = start + kw.len();
            let bounded = match self.source.as_bytes().get(after) {
                Some(b) => !b.is_ascii_alphanumeric() && *b != b'_',
                None => true,
            };
            if bounded {
                self.pos = after;
                return Ok(());
            }
        }
        Err(self.fail(start, expected))
    }

    /// Match a numeric literal: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
    ///
    /// The fraction and exponent groups are committed only when they can
    /// complete, so `1.` matches `1` and leaves the dot unconsumed, just
    /// as the regular expression would. The whole matched span is parsed
    /// as an `f64`.
    pub fn number(&mut self) -> Result<f64, SyntaxError> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.bump();
        }

        // Integer part: a lone zero, or a nonzero digit followed by more
        match self.peek() {
            Some(b'0') => self.bump(),
            Some(b'1'..=b'9') => {
                self.bump();
                while let Some(b'0'..=b'9') = self.peek() {
                    self.bump();
                }
            }
            _ => {
                self.pos = start;
                return Err(self.fail(start, "a number"));
            }
        }

        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.bump();
            while let Some(b'0'..=b'9') = self.peek() {
                self.bump();
            }
        }

        if let Some(b'e' | b'E') = self.peek() {
            let digits_at = match self.peek_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if matches!(self.peek_at(digits_at), Some(b'0'..=b'9')) {
                self.pos += digits_at;
                while let Some(b'0'..=b'9') = self.peek() {
                    self.bump();
                }
            }
        }

        self.source[start..self.pos]
            .parse::<f64>()
            .map_err(|_| self.fail(start, "a number"))
    }

    /// Match a double-quoted string and return the span between the quotes.
    ///
    /// A backslash makes the following character non-terminating, so `\"`
    /// stays inside the span; escape sequences are otherwise preserved
    /// verbatim and not decoded. A raw newline or the end of input before
    /// the closing quote fails at the opening quote.
    pub fn string(&mut self) -> Result<&'a str, SyntaxError> {
        let start = self.pos;
        if self.peek() != Some(b'"') {
            return Err(self.fail(start, "a string"));
        }
        self.bump();

        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    self.pos = start;
                    return Err(self.fail(start, "a closing `\"`"));
                }
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.bump();
                    match self.peek() {
                        None | Some(b'\n' | b'\r') => {
                            self.pos = start;
                            return Err(self.fail(start, "a closing `\"`"));
                        }
                        Some(_) => self.bump(),
                    }
                }
                Some(_) => self.bump(),
            }
        }

        Ok(&self.source[start + 1..self.pos - 1])
    }
}
