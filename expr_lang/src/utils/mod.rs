//! Shared source-location primitives and numeric formatting used by the
//! lexer, parser, evaluator and logging.

pub mod number;
pub mod span;

pub use number::{as_integer, format_number};
pub use span::{Position, SourceMap, Span};
