//! Read cursor over immutable source text
//!
//! Tracks a byte offset together with the 1-based line and column of the
//! next unread character. Patterns are always matched anchored at the
//! current position.

use crate::utils::Position;
use regex::Regex;

/// What a terminal matches: a fixed string or an anchored regular expression
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(&'static str),
    Regex(Regex),
}

impl Pattern {
    /// Compile a regular expression pattern, anchoring it if needed
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        let anchored = if source.starts_with('^') {
            source.to_string()
        } else {
            format!("^(?:{})", source)
        };
        Regex::new(&anchored).map(Pattern::Regex)
    }

    /// Byte length of the match at the start of `input`, if any
    pub fn match_len(&self, input: &str) -> Option<usize> {
        match self {
            Pattern::Literal(text) => input.starts_with(text).then_some(text.len()),
            Pattern::Regex(regex) => regex
                .find(input)
                .filter(|m| m.start() == 0)
                .map(|m| m.end()),
        }
    }
}

/// Raised by `read_pattern` when the pattern does not match here
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No match")]
pub struct NoMatch;

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::start(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Unread text
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    /// True iff only whitespace remains
    pub fn no_more_input(&self) -> bool {
        self.remaining().trim_start().is_empty()
    }

    /// Pure lookahead
    pub fn starts_with(&self, pattern: &Pattern) -> bool {
        pattern.match_len(self.remaining()).is_some()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        let skipped = rest.len() - rest.trim_start().len();
        self.advance_bytes(skipped);
    }

    /// Consume exactly `count` characters (fewer if input ends first)
    pub fn read(&mut self, count: usize) -> &'a str {
        let rest = self.remaining();
        let bytes = rest
            .char_indices()
            .nth(count)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        self.advance_bytes(bytes)
    }

    /// Consume the span matched by `pattern`
    pub fn read_pattern(&mut self, pattern: &Pattern) -> Result<&'a str, NoMatch> {
        let len = pattern.match_len(self.remaining()).ok_or(NoMatch)?;
        Ok(self.advance_bytes(len))
    }

    /// Up to `count` characters ahead of the cursor, without consuming
    pub fn peek(&self, count: usize) -> &'a str {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .nth(count)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Up to `count` characters already consumed, ending at the cursor
    pub fn peek_back(&self, count: usize) -> &'a str {
        let consumed = &self.input[..self.position.offset];
        let start = consumed
            .char_indices()
            .rev()
            .nth(count.saturating_sub(1))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        if count == 0 {
            ""
        } else {
            &consumed[start..]
        }
    }

    /// Run `attempt`; if it yields nothing the cursor is restored exactly
    pub fn try_this<T>(&mut self, attempt: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.position;
        let result = attempt(self);
        if result.is_none() {
            self.position = saved;
        }
        result
    }

    fn advance_bytes(&mut self, len: usize) -> &'a str {
        let start = self.position.offset;
        let consumed = &self.input[start..start + len];
        self.position = self.position.advance_str(consumed);
        consumed
    }
}
