//! Failure positions and diagnostics.
//!
//! Grammar rules fail with a [`SyntaxError`] carrying the byte offset of
//! the failure, a description of what was expected there, and the text of
//! the source line containing it. [`SyntaxError::render`] reproduces the
//! two-line caret diagnostic:
//!
//! ```text
//! {"a": }
//!       ^
//! ```

use thiserror::Error;

/// A position in the source text, derived from a byte offset.
///
/// Line and column are 1-based; the column counts characters from the
/// start of the line, so the caret in [`SyntaxError::render`] lines up
/// under multibyte text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePosition {
    /// Byte offset into the source
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number, counted in characters
    pub column: usize,
}

impl ParsePosition {
    /// Derive the line and column of a byte offset in `source`.
    ///
    /// Offsets past the end of the input locate the position just after
    /// the final character.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = floor_char_boundary(source, offset);
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = source[..line_start].matches('\n').count() + 1;
        let column = source[line_start..offset].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The error reported when no grammar rule matches at some position.
///
/// Carries everything needed to reproduce the diagnostic without keeping
/// the source text alive: the position, the expected-rule description,
/// and the full text of the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at line {}, column {}", .position.line, .position.column)]
pub struct SyntaxError {
    /// Where the failing rule gave up
    pub position: ParsePosition,
    /// Description of what the failing rule expected
    pub expected: &'static str,
    /// Full text of the source line containing the failure
    pub source_line: String,
}

impl SyntaxError {
    /// Capture a failure at `offset` in `source`.
    pub fn new(source: &str, offset: usize, expected: &'static str) -> Self {
        let position = ParsePosition::locate(source, offset);
        let line_start = source[..position.offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |i| line_start + i);
        let source_line = source[line_start..line_end]
            .strip_suffix('\r')
            .unwrap_or(&source[line_start..line_end]);
        Self {
            position,
            expected,
            source_line: source_line.to_string(),
        }
    }

    /// Render the two-line diagnostic: the offending source line, a
    /// newline, then spaces up to the failure column and a caret.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source_line.len() + self.position.column + 1);
        out.push_str(&self.source_line);
        out.push('\n');
        for _ in 1..self.position.column {
            out.push(' ');
        }
        out.push('^');
        out
    }
}
