//! Lexical analysis for the expression language
//!
//! A [`Cursor`] walks the source text and a [`Lexer`] drives it with an
//! ordered table of [`TerminalDefinition`]s. The language's own table lives
//! in [`crate::grammar::language::terminals`].

pub mod analyzer;
pub mod cursor;

pub use analyzer::{Converter, Lexer, LexerError, TerminalDefinition};
pub use cursor::{Cursor, NoMatch, Pattern};

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize with the expression language's terminal table
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    create_lexer()?.tokenize(source)
}

/// Lexer over the language's terminal table with default preferences
pub fn create_lexer() -> Result<Lexer, LexerError> {
    Ok(Lexer::new(crate::grammar::language::terminals()?))
}

/// Lexer over the language's terminal table with custom preferences
pub fn create_lexer_with_preferences(preferences: LexicalPreferences) -> Result<Lexer, LexerError> {
    Ok(Lexer::with_preferences(
        crate::grammar::language::terminals()?,
        preferences,
    ))
}
