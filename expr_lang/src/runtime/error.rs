//! Evaluation errors

use crate::config::compile_time::runtime::MAX_FUNCTION_ARGUMENTS;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Function \"{name}\" not found")]
    FunctionNotFound { name: String },

    #[error("Function \"{name}\" failed: {message}")]
    FunctionFailed { name: String, message: String },

    #[error("Too many arguments for \"{name}\": {count} (max {MAX_FUNCTION_ARGUMENTS})")]
    TooManyArguments { name: String, count: usize },

    #[error("Unknown type: {kind}")]
    UnknownNodeKind { kind: String },

    #[error("Unknown math symbol: {symbol}")]
    UnknownOperator { symbol: String },

    #[error("Operator '{symbol}' cannot be used as a value")]
    OperatorAsValue { symbol: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Pipeline stage must be a function call, found {kind}")]
    InvalidPipelineStage { kind: String },

    #[error("Fatal error: {source} at line {line}, column {column}")]
    Located {
        line: u32,
        column: u32,
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Attach a source position unless one is already attached
    pub fn located(self, line: u32, column: u32) -> Self {
        match self {
            located @ RuntimeError::Located { .. } => located,
            other => RuntimeError::Located {
                line,
                column,
                source: Box::new(other),
            },
        }
    }

    /// The error underneath any position wrapper
    pub fn root_cause(&self) -> &RuntimeError {
        match self {
            RuntimeError::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn error_code(&self) -> Code {
        match self.root_cause() {
            RuntimeError::FunctionNotFound { .. } => codes::runtime::FUNCTION_NOT_FOUND,
            RuntimeError::FunctionFailed { .. } => codes::runtime::FUNCTION_FAILED,
            RuntimeError::TooManyArguments { .. } => codes::runtime::TOO_MANY_ARGUMENTS,
            RuntimeError::TypeMismatch { .. } => codes::runtime::TYPE_MISMATCH,
            RuntimeError::InvalidPipelineStage { .. } => codes::runtime::INVALID_PIPELINE_STAGE,
            RuntimeError::UnknownNodeKind { .. }
            | RuntimeError::UnknownOperator { .. }
            | RuntimeError::OperatorAsValue { .. }
            | RuntimeError::Located { .. } => codes::runtime::UNKNOWN_NODE_KIND,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::Located { line, column, .. } => Some(Span::at(*line, *column)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_located_wraps_once() {
        let error = RuntimeError::UnknownOperator { symbol: "&&".into() }
            .located(1, 5)
            .located(1, 1);
        assert_matches!(error, RuntimeError::Located { line: 1, column: 5, .. });
        assert_eq!(
            error.root_cause(),
            &RuntimeError::UnknownOperator { symbol: "&&".into() }
        );
        assert_eq!(error.span(), Some(Span::at(1, 5)));
    }

    #[test]
    fn test_codes_follow_root_cause() {
        let error = RuntimeError::FunctionNotFound {
            name: "missing".into(),
        };
        assert_eq!(error.to_string(), "Function \"missing\" not found");
        assert_eq!(error.clone().located(2, 3).error_code(), codes::runtime::FUNCTION_NOT_FOUND);
        assert_eq!(error.span(), None);
    }
}
