//! Token kinds, converted token values and the token record itself

use crate::utils::{as_integer, format_number};
use serde::{Serialize, Serializer};
use std::fmt;

// ============================================================================
// TERMINAL KINDS
// ============================================================================

/// Every token kind the expression language lexes.
///
/// Declaration order mirrors the terminal table: keywords before
/// identifiers, multi-character operators before their prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    True,
    False,
    Null,
    Float,
    Int,
    Identifier,
    StringA,
    StringB,
    LogicalAnd,
    LogicalOr,
    Pipe,
    Pow,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Doublecolon,
    Equals,
    ParenthesisOpen,
    ParenthesisClose,
    BracketOpen,
    BracketClose,
    CurlybracketOpen,
    CurlybracketClose,
    Comma,
    Semicolon,
}

impl Term {
    pub fn name(&self) -> &'static str {
        match self {
            Term::True => "True",
            Term::False => "False",
            Term::Null => "Null",
            Term::Float => "Float",
            Term::Int => "Int",
            Term::Identifier => "Identifier",
            Term::StringA => "StringA",
            Term::StringB => "StringB",
            Term::LogicalAnd => "LogicalAnd",
            Term::LogicalOr => "LogicalOr",
            Term::Pipe => "Pipe",
            Term::Pow => "Pow",
            Term::Plus => "Plus",
            Term::Minus => "Minus",
            Term::Mul => "Mul",
            Term::Div => "Div",
            Term::Mod => "Mod",
            Term::Doublecolon => "Doublecolon",
            Term::Equals => "Equals",
            Term::ParenthesisOpen => "ParenthesisOpen",
            Term::ParenthesisClose => "ParenthesisClose",
            Term::BracketOpen => "BracketOpen",
            Term::BracketClose => "BracketClose",
            Term::CurlybracketOpen => "CurlybracketOpen",
            Term::CurlybracketClose => "CurlybracketClose",
            Term::Comma => "Comma",
            Term::Semicolon => "Semicolon",
        }
    }

    /// Literal kinds carry a converted value instead of their text
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Term::True
                | Term::False
                | Term::Null
                | Term::Float
                | Term::Int
                | Term::StringA
                | Term::StringB
        )
    }

    pub fn is_arithmetic_operator(&self) -> bool {
        matches!(
            self,
            Term::Pow | Term::Plus | Term::Minus | Term::Mul | Term::Div | Term::Mod
        )
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ============================================================================
// TOKEN VALUES
// ============================================================================

/// Value produced by a terminal's converter
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl TokenValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON rendering used by token dumps
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Null => f.write_str("null"),
            TokenValue::Bool(b) => write!(f, "{}", b),
            TokenValue::Number(n) => f.write_str(&format_number(*n)),
            TokenValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for TokenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenValue::Null => serializer.serialize_unit(),
            TokenValue::Bool(b) => serializer.serialize_bool(*b),
            TokenValue::Number(n) => match as_integer(*n) {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*n),
            },
            TokenValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

// ============================================================================
// TOKEN
// ============================================================================

/// One lexed token. Immutable once produced by the lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: Term,
    /// Raw matched source text
    pub text: String,
    pub value: TokenValue,
    /// Sequence id, 1-based and strictly increasing per tokenize call
    pub id: usize,
    pub line: u32,
    pub column: u32,
    /// Structurally required but never surfaced in the AST
    pub discard: bool,
}

impl Token {
    pub fn is(&self, kind: Term) -> bool {
        self.kind == kind
    }

    /// One-line debug description used by token dumps
    pub fn describe(&self) -> String {
        format!(
            "{} (name={}; val={}; id={}; l={}, {}; {})",
            self.text,
            self.kind,
            self.value.to_json(),
            self.id,
            self.line,
            self.column,
            self.discard
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: Term, text: &str, value: TokenValue, discard: bool) -> Token {
        Token {
            kind,
            text: text.to_string(),
            value,
            id: 1,
            line: 1,
            column: 2,
            discard,
        }
    }

    #[test]
    fn test_term_classification() {
        assert!(Term::Float.is_literal());
        assert!(Term::StringB.is_literal());
        assert!(!Term::Identifier.is_literal());
        assert!(Term::Pow.is_arithmetic_operator());
        assert!(!Term::Pipe.is_arithmetic_operator());
        assert_eq!(Term::CurlybracketOpen.to_string(), "CurlybracketOpen");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(TokenValue::Number(123.0).to_string(), "123");
        assert_eq!(TokenValue::Number(1.23).to_string(), "1.23");
        assert_eq!(TokenValue::Null.to_string(), "null");
        assert_eq!(TokenValue::Bool(false).to_string(), "false");
        assert_eq!(TokenValue::Text("x".into()).to_string(), "x");
    }

    #[test]
    fn test_value_json() {
        assert_eq!(TokenValue::Number(123.0).to_json(), "123");
        assert_eq!(TokenValue::Number(123.45).to_json(), "123.45");
        assert_eq!(TokenValue::Text("a\"b".into()).to_json(), "\"a\\\"b\"");
        assert_eq!(TokenValue::Null.to_json(), "null");
    }

    #[test]
    fn test_describe() {
        let t = token(Term::Comma, ",", TokenValue::Text(",".into()), true);
        assert_eq!(t.describe(), ", (name=Comma; val=\",\"; id=1; l=1, 2; true)");

        let t = token(Term::Int, "7", TokenValue::Number(7.0), false);
        assert_eq!(t.describe(), "7 (name=Int; val=7; id=1; l=1, 2; false)");
    }
}
