//! The mutually recursive value grammar.
//!
//! One method per non-terminal: Value, Array, Pair, Object. Each either
//! consumes a complete construct and returns the built [`Value`], or
//! fails at a stated position; a losing alternative never leaves partial
//! side effects. Dispatch between the Value alternatives is by first
//! non-whitespace character, which the lexical classes keep disjoint.
//!
//! Construction is a plain return-value contract: a rule returns the
//! value it built, arrays collect children in match order, and objects
//! fold `(key, value)` pairs into the map. On a duplicate key the later
//! pair overwrites the earlier one.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::atoms::Cursor;
use crate::error::{ParseError, ParseResult};
use crate::limits::Limits;
use crate::value::Value;

/// Grammar state for one parse: the cursor, the limits in force, and the
/// current container nesting depth.
pub struct Grammar<'a> {
    cursor: Cursor<'a>,
    limits: Limits,
    depth: u64,
}

impl<'a> Grammar<'a> {
    /// Create a grammar over `source`, enforcing the input-size limit
    /// before any grammar work.
    pub fn new(source: &'a str, limits: Limits) -> ParseResult<Self> {
        if source.len() as u64 > limits.max_input_size {
            debug!(
                "rejecting {} byte input, limit is {}",
                source.len(),
                limits.max_input_size
            );
            return Err(ParseError::InputTooLarge {
                got: source.len() as u64,
                limit: limits.max_input_size,
            });
        }
        Ok(Self {
            cursor: Cursor::new(source),
            limits,
            depth: 0,
        })
    }

    /// Parse one document: a single value, then (in full-match mode)
    /// nothing but whitespace to the end of the input.
    pub fn parse(&mut self, require_full_match: bool) -> ParseResult<Value> {
        let value = self.parse_value()?;

        if require_full_match {
            self.cursor.skip_whitespace();
            if !self.cursor.at_end() {
                return Err(self
                    .cursor
                    .fail(self.cursor.position(), "end of input")
                    .into());
            }
        }

        Ok(value)
    }

    /// Byte offset one past the last consumed input.
    pub fn consumed(&self) -> usize {
        self.cursor.position()
    }

    /// Value = Object | Array | String | Number | `true` | `false` | `null`.
    fn parse_value(&mut self) -> ParseResult<Value> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Value::String(self.cursor.string()?.to_string())),
            Some(b'-' | b'0'..=b'9') => Ok(Value::Number(self.cursor.number()?)),
            Some(b't') => {
                self.cursor.keyword("true", "literal `true`")?;
                Ok(Value::Bool(true))
            }
            Some(b'f') => {
                self.cursor.keyword("false", "literal `false`")?;
                Ok(Value::Bool(false))
            }
            Some(b'n') => {
                self.cursor.keyword("null", "literal `null`")?;
                Ok(Value::Null)
            }
            _ => Err(self
                .cursor
                .fail(self.cursor.position(), "a value")
                .into()),
        }
    }

    /// Array = `[` (Value (`,` Value)*)? `]`.
    fn parse_array(&mut self) -> ParseResult<Value> {
        self.enter()?;
        self.cursor.expect(b'[', "`[`")?;

        let mut elements = Vec::new();

        self.cursor.skip_whitespace();
        if self.cursor.eat(b']') {
            self.depth -= 1;
            return Ok(Value::Array(elements));
        }

        loop {
            elements.push(self.parse_value()?);

            self.cursor.skip_whitespace();
            if self.cursor.eat(b',') {
                // The grammar requires an element after each comma, so a
                // trailing comma fails in the next parse_value call.
                continue;
            }
            if self.cursor.eat(b']') {
                break;
            }
            return Err(self
                .cursor
                .fail(self.cursor.position(), "`,` or `]`")
                .into());
        }

        self.depth -= 1;
        Ok(Value::Array(elements))
    }

    /// Pair = String `:` Value.
    fn parse_pair(&mut self) -> ParseResult<(String, Value)> {
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(b'"') {
            return Err(self
                .cursor
                .fail(self.cursor.position(), "a string key")
                .into());
        }
        let key = self.cursor.string()?.to_string();

        self.cursor.skip_whitespace();
        self.cursor.expect(b':', "`:`")?;

        let value = self.parse_value()?;
        Ok((key, value))
    }

    /// Object = `{` (Pair (`,` Pair)*)? `}`.
    fn parse_object(&mut self) -> ParseResult<Value> {
        self.enter()?;
        self.cursor.expect(b'{', "`{`")?;

        let mut members = BTreeMap::new();

        self.cursor.skip_whitespace();
        if self.cursor.eat(b'}') {
            self.depth -= 1;
            return Ok(Value::Object(members));
        }

        loop {
            let (key, value) = self.parse_pair()?;
            members.insert(key, value);

            self.cursor.skip_whitespace();
            if self.cursor.eat(b',') {
                continue;
            }
            if self.cursor.eat(b'}') {
                break;
            }
            return Err(self
                .cursor
                .fail(self.cursor.position(), "`,` or `}`")
                .into());
        }

        self.depth -= 1;
        Ok(Value::Object(members))
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            debug!(
                "rejecting nesting depth {}, limit is {}",
                self.depth, self.limits.max_nesting_depth
            );
            return Err(ParseError::NestingTooDeep {
                depth: self.depth,
                limit: self.limits.max_nesting_depth,
            });
        }
        Ok(())
    }
}

/// Parse `source` as one complete JSON document with standard limits.
///
/// Trailing non-whitespace content after the value is a syntax error.
pub fn parse(source: &str) -> ParseResult<Value> {
    parse_with_limits(source, Limits::standard())
}

/// Parse `source` as one complete JSON document with custom limits.
pub fn parse_with_limits(source: &str, limits: Limits) -> ParseResult<Value> {
    trace!("parsing {} bytes (full match)", source.len());
    let mut grammar = Grammar::new(source, limits)?;
    grammar.parse(true)
}

/// Parse one JSON value from the start of `source` with standard limits.
///
/// Returns the value and the number of bytes consumed; trailing content
/// is the caller's concern.
pub fn parse_prefix(source: &str) -> ParseResult<(Value, usize)> {
    parse_prefix_with_limits(source, Limits::standard())
}

/// Parse one JSON value from the start of `source` with custom limits.
pub fn parse_prefix_with_limits(source: &str, limits: Limits) -> ParseResult<(Value, usize)> {
    trace!("parsing {} bytes (prefix match)", source.len());
    let mut grammar = Grammar::new(source, limits)?;
    let value = grammar.parse(false)?;
    Ok((value, grammar.consumed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_parse_null() {
        assert_eq!(parse("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_booleans() {
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse("42").unwrap(), Value::Number(42.0));
        assert_eq!(parse("-123").unwrap(), Value::Number(-123.0));
        assert_eq!(parse("0").unwrap(), Value::Number(0.0));
        assert_eq!(parse("1234.5435e-2").unwrap(), Value::Number(12.345435));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse(r#""hello""#).unwrap(),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(
            parse("[1, 2, 3]").unwrap(),
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
            ])
        );
    }

    #[test]
    fn test_parse_object() {
        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Value::Number(1.0));
        expected.insert("b".to_string(), Value::Number(2.0));
        assert_eq!(parse(r#"{"a": 1, "b": 2}"#).unwrap(), Value::Object(expected));
    }

    #[test]
    fn test_parse_nested() {
        let result = parse(r#"{"arr": [1, {"nested": true}], "num": 42}"#).unwrap();
        assert!(result.is_object());
        let arr = result.get("arr").unwrap();
        assert!(arr.is_array());
        assert_eq!(
            arr.get_index(1).unwrap().get("nested"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse("").unwrap_err();
        assert_eq!(err.as_syntax().unwrap().expected, "a value");
    }

    #[test]
    fn test_trailing_content_rejected() {
        let err = parse("null extra").unwrap_err();
        let syntax = err.as_syntax().unwrap();
        assert_eq!(syntax.expected, "end of input");
        assert_eq!(syntax.position.offset, 5);
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse("[1, 2,]").is_err());
        assert!(parse(r#"{"a": 1,}"#).is_err());
    }

    #[test]
    fn test_missing_value_position() {
        let err = parse(r#"{"a": }"#).unwrap_err();
        let syntax = err.as_syntax().unwrap();
        assert_eq!(syntax.expected, "a value");
        assert_eq!(syntax.position.column, 7);
    }

    #[test]
    fn test_missing_colon() {
        let err = parse(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(err.as_syntax().unwrap().expected, "`:`");
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = parse("{1: 2}").unwrap_err();
        assert_eq!(err.as_syntax().unwrap().expected, "a string key");
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let result = parse(r#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(result.get("a"), Some(&Value::Number(2.0)));
        assert_eq!(result.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_nesting_depth_limit() {
        let mut limits = Limits::standard();
        limits.max_nesting_depth = 2;

        assert!(parse_with_limits("[[1]]", limits).is_ok());

        let err = parse_with_limits("[[[1]]]", limits).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { depth: 3, limit: 2 }));
        assert!(!err.is_syntax());
    }

    #[test]
    fn test_input_size_limit() {
        let mut limits = Limits::standard();
        limits.max_input_size = 4;

        let err = parse_with_limits("[1, 2, 3]", limits).unwrap_err();
        assert!(matches!(err, ParseError::InputTooLarge { got: 9, limit: 4 }));
    }

    #[test]
    fn test_prefix_match_allows_trailing_content() {
        let (value, consumed) = parse_prefix("[1, 2] tail").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])
        );
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_whitespace_everywhere() {
        assert_eq!(
            parse(" { \"x\" : 1 } ").unwrap(),
            parse(r#"{"x":1}"#).unwrap()
        );
    }
}
