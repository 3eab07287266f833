//! Table-driven lexer
//!
//! Terminal definitions are tried in declaration order and the first one
//! that matches at the cursor wins. Order therefore encodes priority.

use crate::config::compile_time::lexical::*;
use crate::config::compile_time::source::MAX_SOURCE_SIZE;
use crate::config::runtime::LexicalPreferences;
use crate::lexical::cursor::{Cursor, Pattern};
use crate::logging::codes;
use crate::tokens::{Term, Token, TokenStream, TokenValue};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Parser error at line {line}, col {column}: {before}🚨{after}")]
    UnrecognizedInput {
        line: u32,
        column: u32,
        before: String,
        after: String,
    },

    #[error("Invalid {kind} literal '{text}' at line {line}, col {column}")]
    InvalidLiteral {
        kind: Term,
        text: String,
        line: u32,
        column: u32,
    },

    #[error("Source too large: {size} bytes (max {MAX_SOURCE_SIZE})")]
    SourceTooLarge { size: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Invalid pattern for terminal {id}: {message}")]
    PatternCompilation { id: Term, message: String },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnrecognizedInput { .. } => codes::lexical::UNRECOGNIZED_INPUT,
            LexerError::InvalidLiteral { .. } => codes::lexical::INVALID_LITERAL,
            LexerError::SourceTooLarge { .. } => codes::source::SOURCE_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::PatternCompilation { .. } => codes::lexical::INVALID_PATTERN,
        }
    }

    /// Source position of the failure, where one exists
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            LexerError::UnrecognizedInput { line, column, .. }
            | LexerError::InvalidLiteral { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Turns matched text into a token value; `None` rejects the literal
pub type Converter = fn(&str) -> Option<TokenValue>;

/// One entry of the terminal table
#[derive(Debug, Clone)]
pub struct TerminalDefinition {
    pub id: Term,
    pub pattern: Pattern,
    pub discard: bool,
    pub converter: Option<Converter>,
}

impl TerminalDefinition {
    pub fn literal(id: Term, text: &'static str) -> Self {
        Self {
            id,
            pattern: Pattern::Literal(text),
            discard: false,
            converter: None,
        }
    }

    pub fn regex(id: Term, pattern: &str) -> Result<Self, LexerError> {
        let pattern = Pattern::regex(pattern).map_err(|e| LexerError::PatternCompilation {
            id,
            message: e.to_string(),
        })?;
        Ok(Self {
            id,
            pattern,
            discard: false,
            converter: None,
        })
    }

    /// Mark tokens of this kind as structural only
    pub fn discarded(mut self) -> Self {
        self.discard = true;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Identity conversion unless a converter is set
    fn convert(&self, text: &str) -> Option<TokenValue> {
        match self.converter {
            Some(converter) => converter(text),
            None => Some(TokenValue::Text(text.to_string())),
        }
    }
}

pub struct Lexer {
    definitions: Vec<TerminalDefinition>,
    preferences: LexicalPreferences,
}

impl Lexer {
    pub fn new(definitions: Vec<TerminalDefinition>) -> Self {
        Self::with_preferences(definitions, LexicalPreferences::default())
    }

    pub fn with_preferences(
        definitions: Vec<TerminalDefinition>,
        preferences: LexicalPreferences,
    ) -> Self {
        Self {
            definitions,
            preferences,
        }
    }

    pub fn definitions(&self) -> &[TerminalDefinition] {
        &self.definitions
    }

    /// Tokenize the whole input into an immutable stream
    pub fn tokenize(&self, source: &str) -> Result<TokenStream, LexerError> {
        self.tokens(source).map(TokenStream::new)
    }

    /// Tokenize the whole input into a vector; ids restart at 1 on every call
    pub fn tokens(&self, source: &str) -> Result<Vec<Token>, LexerError> {
        if source.len() as u64 > MAX_SOURCE_SIZE {
            let error = LexerError::SourceTooLarge { size: source.len() };
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        let mut cursor = Cursor::new(source);
        let mut tokens = Vec::new();

        while !cursor.no_more_input() {
            cursor.skip_whitespace();
            let line = cursor.line();
            let column = cursor.column();

            let matched = cursor.try_this(|c| {
                self.definitions.iter().find_map(|definition| {
                    c.read_pattern(&definition.pattern)
                        .ok()
                        .filter(|text| !text.is_empty())
                        .map(|text| (definition, text))
                })
            });

            let Some((definition, text)) = matched else {
                return Err(self.unrecognized(&cursor));
            };

            let value = definition.convert(text).ok_or_else(|| {
                let error = LexerError::InvalidLiteral {
                    kind: definition.id,
                    text: text.to_string(),
                    line,
                    column,
                };
                log_error!(error.error_code(), &error.to_string(), span = Span::at(line, column));
                error
            })?;

            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                };
                log_error!(error.error_code(), &error.to_string());
                return Err(error);
            }

            tokens.push(Token {
                kind: definition.id,
                text: text.to_string(),
                value,
                id: tokens.len() + 1,
                line,
                column,
                discard: definition.discard,
            });
        }

        if self.preferences.log_tokenization_summary {
            log_success!(
                codes::success::TOKENIZATION_COMPLETE,
                "Tokenization completed",
                "tokens" => tokens.len(),
                "source_bytes" => source.len()
            );
        } else {
            log_debug!("Tokenization completed", "tokens" => tokens.len());
        }

        Ok(tokens)
    }

    fn unrecognized(&self, cursor: &Cursor<'_>) -> LexerError {
        let (before, after) = if self.preferences.include_context_in_errors {
            (
                cursor.peek_back(ERROR_CONTEXT_CHARS).to_string(),
                cursor.peek(ERROR_CONTEXT_CHARS).to_string(),
            )
        } else {
            (String::new(), String::new())
        };

        let error = LexerError::UnrecognizedInput {
            line: cursor.line(),
            column: cursor.column(),
            before,
            after,
        };
        log_error!(
            error.error_code(),
            "No terminal definition matches",
            span = Span::at(cursor.line(), cursor.column())
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn definitions() -> Vec<TerminalDefinition> {
        vec![
            TerminalDefinition::literal(Term::True, "true")
                .with_converter(|_| Some(TokenValue::Bool(true))),
            TerminalDefinition::regex(Term::Int, r"^[0-9]+")
                .unwrap()
                .with_converter(|s| s.parse().ok().map(TokenValue::Number)),
            TerminalDefinition::regex(Term::Identifier, r"^[a-zA-Z_]+\b").unwrap(),
            TerminalDefinition::literal(Term::Pow, "**"),
            TerminalDefinition::literal(Term::Mul, "*"),
            TerminalDefinition::literal(Term::Comma, ",").discarded(),
        ]
    }

    #[test]
    fn test_first_matching_definition_wins() {
        let lexer = Lexer::new(definitions());
        let tokens = lexer.tokens("2 ** 3 * x").unwrap();
        let kinds: Vec<Term> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Term::Int, Term::Pow, Term::Int, Term::Mul, Term::Identifier]);
        assert_eq!(tokens[0].value, TokenValue::Number(2.0));
        assert_eq!(tokens[1].value, TokenValue::Text("**".into()));
    }

    #[test]
    fn test_positions_ids_and_discard() {
        let lexer = Lexer::new(definitions());
        let tokens = lexer.tokens(" 12,\n  ab").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].id, tokens[0].line, tokens[0].column), (1, 1, 2));
        assert_eq!((tokens[1].id, tokens[1].line, tokens[1].column), (2, 1, 4));
        assert!(tokens[1].discard);
        assert_eq!((tokens[2].id, tokens[2].line, tokens[2].column), (3, 2, 3));
    }

    #[test]
    fn test_ids_restart_per_call() {
        let lexer = Lexer::new(definitions());
        let first = lexer.tokens("1, 2").unwrap();
        let second = lexer.tokens("1, 2").unwrap();
        assert_eq!(first, second);
        assert_eq!(second[0].id, 1);
    }

    #[test]
    fn test_unrecognized_input_reports_context() {
        let lexer = Lexer::new(definitions());
        let error = lexer.tokens("12 ab @ cd").unwrap_err();
        assert_matches!(
            &error,
            LexerError::UnrecognizedInput { line: 1, column: 7, before, after }
                if before == "12 ab " && after == "@ cd"
        );
        assert_eq!(error.to_string(), "Parser error at line 1, col 7: 12 ab 🚨@ cd");
        assert_eq!(error.error_code(), codes::lexical::UNRECOGNIZED_INPUT);
    }

    #[test]
    fn test_context_can_be_suppressed() {
        let preferences = LexicalPreferences {
            include_context_in_errors: false,
            log_tokenization_summary: false,
        };
        let lexer = Lexer::with_preferences(definitions(), preferences);
        let error = lexer.tokens("@").unwrap_err();
        assert_eq!(error.to_string(), "Parser error at line 1, col 1: 🚨");
    }

    #[test]
    fn test_converter_failure_is_invalid_literal() {
        let defs = vec![TerminalDefinition::regex(Term::Int, r"^[0-9]+")
            .unwrap()
            .with_converter(|_| None)];
        let error = Lexer::new(defs).tokens(" 7").unwrap_err();
        assert_matches!(error, LexerError::InvalidLiteral { kind: Term::Int, line: 1, column: 2, .. });
    }

    #[test]
    fn test_invalid_pattern() {
        let error = TerminalDefinition::regex(Term::Int, r"^[0-9").unwrap_err();
        assert_matches!(error, LexerError::PatternCompilation { id: Term::Int, .. });
    }

    #[test]
    fn test_whitespace_only_input_yields_no_tokens() {
        let lexer = Lexer::new(definitions());
        assert!(lexer.tokens("  \n\t ").unwrap().is_empty());
        assert!(lexer.tokenize("").unwrap().is_empty());
    }
}
