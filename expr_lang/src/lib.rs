//! Embeddable expression language
//!
//! Source text flows through [`lexical`] (tokens), [`syntax`] (a
//! grammar-driven backtracking parser over the tables in [`grammar`]) and
//! [`runtime`] (a tree-walking evaluator calling host functions).
//! [`pipeline::ExpressionLanguage`] ties the stages together.

// Internal modules
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod runtime;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::AstNode;
pub use pipeline::{ExpressionLanguage, PipelineError, PipelineResult, Program};
pub use runtime::{FunctionRegistry, RuntimeError, Value};
