//! Error taxonomy for parsing.
//!
//! [`ParseError::Syntax`] is the only kind the grammar itself raises;
//! the limit kinds come from [`crate::limits::Limits`] enforcement and
//! are deliberately distinct so callers can tell malformed input from
//! input rejected by policy.

use thiserror::Error;

use crate::report::SyntaxError;

/// Any error produced by a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not match the grammar at some position.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The input exceeds the configured size limit.
    #[error("input too large: {got} bytes exceeds the {limit} byte limit")]
    InputTooLarge {
        /// Size of the rejected input in bytes
        got: u64,
        /// The configured limit
        limit: u64,
    },

    /// Arrays/objects nest deeper than the configured limit.
    #[error("nesting too deep: depth {depth} exceeds the limit of {limit}")]
    NestingTooDeep {
        /// Depth at which parsing stopped
        depth: u64,
        /// The configured limit
        limit: u64,
    },
}

impl ParseError {
    /// Returns true for syntax errors (as opposed to limit rejections).
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }

    /// Returns the underlying syntax error, if that is what this is.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
