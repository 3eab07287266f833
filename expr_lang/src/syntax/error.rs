//! Syntax errors raised by the parser engine

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, Code};
use crate::tokens::PrematureEnd;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Parser error: premature end of input")]
    PrematureEnd,

    #[error("End of file not reached at line {line}, column {column}")]
    TrailingInput { line: u32, column: u32 },

    #[error("Parser error: no viable parse at line {line}, column {column}")]
    NoViableParse { line: u32, column: u32 },

    #[error("Max recursion depth reached: {depth} (max {MAX_PARSE_DEPTH})")]
    MaxRecursionDepth { depth: usize },

    #[error("Unknown grammar rule: {name}")]
    UnknownRule { name: String },
}

impl SyntaxError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::PrematureEnd => codes::syntax::PREMATURE_END,
            Self::TrailingInput { .. } => codes::syntax::TRAILING_INPUT,
            Self::NoViableParse { .. } => codes::syntax::NO_VIABLE_PARSE,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::UnknownRule { .. } => codes::syntax::UNKNOWN_RULE,
        }
    }

    /// Fatal errors abort the whole parse; the rest only fail the
    /// alternative they occur in.
    pub fn is_fatal(&self) -> bool {
        !codes::is_recoverable(self.error_code().as_str())
    }

    /// Point span where a position is known
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::TrailingInput { line, column } | Self::NoViableParse { line, column } => {
                Some(Span::at(*line, *column))
            }
            _ => None,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

impl From<PrematureEnd> for SyntaxError {
    fn from(_: PrematureEnd) -> Self {
        SyntaxError::PrematureEnd
    }
}
