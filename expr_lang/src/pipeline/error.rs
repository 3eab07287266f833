use crate::lexical::LexerError;
use crate::pipeline::source::SourceError;
use crate::runtime::RuntimeError;
use crate::syntax::SyntaxError;

/// Any failure between source text and result value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Source loading failed: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Lexical(#[from] LexerError),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::Source(e) => e.error_code(),
            PipelineError::Lexical(e) => e.error_code(),
            PipelineError::Syntax(e) => e.error_code(),
            PipelineError::Runtime(e) => e.error_code(),
        }
    }

    /// Line and column the failure points at, when known
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            PipelineError::Source(_) => None,
            PipelineError::Lexical(e) => e.location(),
            PipelineError::Syntax(e) => e.span().map(|s| (s.start.line, s.start.column)),
            PipelineError::Runtime(e) => e.span().map(|s| (s.start.line, s.start.column)),
        }
    }

    /// Stage that failed, for reporting
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Source(_) => "source",
            PipelineError::Lexical(_) => "lexical",
            PipelineError::Syntax(_) => "syntax",
            PipelineError::Runtime(_) => "runtime",
        }
    }
}
