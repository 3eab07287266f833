//! Immutable token stream for backtracking parsers
//!
//! A stream is a shared, never-mutated token buffer plus an offset.
//! Consuming hands back a new stream one token further along; the original
//! stays valid, so speculative parses need no save/restore bookkeeping.

use crate::tokens::token::Token;
use std::rc::Rc;

/// Raised when a token is consumed from an exhausted stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("premature end of input")]
pub struct PrematureEnd;

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Rc<[Token]>,
    offset: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            offset: 0,
        }
    }

    /// Next token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.offset)
    }

    /// Take the next token, returning it with the advanced stream
    pub fn consume(&self) -> Result<(&Token, TokenStream), PrematureEnd> {
        let token = self.tokens.get(self.offset).ok_or(PrematureEnd)?;
        let rest = Self {
            tokens: Rc::clone(&self.tokens),
            offset: self.offset + 1,
        };
        Ok((token, rest))
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.tokens.len()
    }

    /// Number of tokens not yet consumed
    pub fn len(&self) -> usize {
        self.tokens.len().saturating_sub(self.offset)
    }

    /// Remaining tokens as a slice
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.offset..).unwrap_or(&[])
    }

    /// Line and column of the next token, or of the last token once exhausted
    pub fn location(&self) -> (u32, u32) {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1))
    }

    /// Whether both streams view the same buffer at the same offset
    pub fn same_position(&self, other: &TokenStream) -> bool {
        Rc::ptr_eq(&self.tokens, &other.tokens) && self.offset == other.offset
    }

    /// Space-joined raw text of the remaining tokens
    pub fn source_text(&self) -> String {
        self.remaining()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Debug dump of the remaining tokens, one per line
    pub fn render(&self) -> String {
        let lines: Vec<String> = self.remaining().iter().map(Token::describe).collect();
        format!(
            "\n> {}\n[\n    {}\n]\n",
            self.source_text(),
            lines.join("\n    ")
        )
    }
}

impl PartialEq for TokenStream {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::token::{Term, TokenValue};

    fn tokens() -> Vec<Token> {
        vec![
            Token {
                kind: Term::Int,
                text: "1".into(),
                value: TokenValue::Number(1.0),
                id: 1,
                line: 1,
                column: 1,
                discard: false,
            },
            Token {
                kind: Term::Plus,
                text: "+".into(),
                value: TokenValue::Text("+".into()),
                id: 2,
                line: 1,
                column: 3,
                discard: false,
            },
        ]
    }

    #[test]
    fn test_peek_does_not_consume() {
        let stream = TokenStream::new(tokens());
        assert_eq!(stream.peek().map(|t| t.id), Some(1));
        assert_eq!(stream.peek().map(|t| t.id), Some(1));
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_consume_leaves_original_untouched() {
        let stream = TokenStream::new(tokens());
        let (first, rest) = stream.consume().unwrap();
        assert_eq!(first.kind, Term::Int);
        assert_eq!(rest.len(), 1);
        assert_eq!(stream.len(), 2);
        assert!(!rest.same_position(&stream));

        let (second, end) = rest.consume().unwrap();
        assert_eq!(second.kind, Term::Plus);
        assert!(end.is_empty());
        assert_eq!(end.consume().unwrap_err(), PrematureEnd);
    }

    #[test]
    fn test_location_falls_back_to_last_token() {
        let stream = TokenStream::new(tokens());
        assert_eq!(stream.location(), (1, 1));
        let (_, rest) = stream.consume().unwrap();
        let (_, end) = rest.consume().unwrap();
        assert_eq!(end.location(), (1, 3));
        assert_eq!(TokenStream::new(vec![]).location(), (1, 1));
    }

    #[test]
    fn test_render() {
        let stream = TokenStream::new(tokens());
        let rendered = stream.render();
        assert!(rendered.starts_with("\n> 1 +\n[\n    1 (name=Int; val=1; id=1; l=1, 1; false)"));
        assert!(rendered.ends_with("+ (name=Plus; val=\"+\"; id=2; l=1, 3; false)\n]\n"));
    }
}
