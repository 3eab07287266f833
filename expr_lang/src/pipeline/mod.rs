//! End-to-end compile and execute
//!
//! [`ExpressionLanguage`] owns a lexer and a parser over the language
//! tables. `compile` turns source text into a [`Program`] that can be
//! executed any number of times against a [`FunctionRegistry`].

mod error;
pub mod source;

pub use error::PipelineError;
pub use source::{load_source, SourceError};

use crate::config::runtime::RuntimeConfig;
use crate::grammar::AstNode;
use crate::lexical::{self, Lexer};
use crate::logging::codes;
use crate::runtime::{self, FunctionRegistry, RuntimeResult, Value};
use crate::syntax::{self, Parser};
use crate::tokens::TokenStream;
use crate::{log_info, log_performance};
use std::path::Path;
use std::time::Instant;

pub type PipelineResult<T> = Result<T, PipelineError>;

pub struct ExpressionLanguage {
    lexer: Lexer,
    parser: Parser,
}

impl ExpressionLanguage {
    /// Language with preferences taken from the environment
    pub fn new() -> PipelineResult<Self> {
        Self::with_config(&RuntimeConfig::default())
    }

    pub fn with_config(config: &RuntimeConfig) -> PipelineResult<Self> {
        Ok(Self {
            lexer: lexical::create_lexer_with_preferences(config.lexical.clone())?,
            parser: syntax::create_parser_with_preferences(config.parser.clone()),
        })
    }

    /// Tokenize only
    pub fn tokenize(&self, source: &str) -> PipelineResult<TokenStream> {
        Ok(self.lexer.tokenize(source)?)
    }

    /// Lex and parse `source` as a single expression
    pub fn compile(&self, source: &str) -> PipelineResult<Program> {
        let start = Instant::now();
        log_info!("Compiling expression", "chars" => source.chars().count());

        let tokens = self.lexer.tokenize(source)?;
        let token_count = tokens.len();
        let ast = syntax::parse_expression(&self.parser, tokens)?;

        log_performance!(
            codes::success::COMPILATION_COMPLETE,
            "Compilation completed",
            duration = start.elapsed(),
            "tokens" => token_count
        );

        Ok(Program { ast, token_count })
    }

    /// Load and compile an expression file
    pub fn compile_file(&self, path: impl AsRef<Path>) -> PipelineResult<Program> {
        let source = load_source(path)?;
        self.compile(&source)
    }

    /// Compile and execute in one call
    pub fn evaluate(&self, source: &str, registry: &FunctionRegistry) -> PipelineResult<Value> {
        Ok(self.compile(source)?.execute(registry)?)
    }
}

/// Executable handle over a parsed expression
#[derive(Debug, Clone)]
pub struct Program {
    ast: AstNode,
    token_count: usize,
}

impl Program {
    pub fn ast(&self) -> &AstNode {
        &self.ast
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// S-expression form of the tree
    pub fn render(&self) -> String {
        self.ast.render()
    }

    pub fn execute(&self, registry: &FunctionRegistry) -> RuntimeResult<Value> {
        runtime::execute(&self.ast, registry)
    }
}
