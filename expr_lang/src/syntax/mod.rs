//! Syntax analysis - TokenStream to AST transformation
//!
//! [`Parser`] interprets any [`crate::grammar::Grammar`]; the helpers here
//! bind it to the expression language's own rule table and start rule.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::Parser;

use crate::config::runtime::ParserPreferences;
use crate::grammar::{nt, rules, AstNode, START_RULE};
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_success};

/// Parser over the language grammar with default preferences
pub fn create_parser() -> Parser {
    Parser::new(rules())
}

/// Parser over the language grammar with custom preferences
pub fn create_parser_with_preferences(preferences: ParserPreferences) -> Parser {
    Parser::with_preferences(rules(), preferences)
}

/// Parse a complete token stream as one `expression`
pub fn parse_expression(parser: &Parser, token_stream: TokenStream) -> SyntaxResult<AstNode> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let ast = parser.parse(&nt(START_RULE), token_stream)?;

    log_success!(
        codes::success::PARSE_COMPLETE,
        "Syntax analysis completed",
        "root" => ast.kind,
        "nodes" => ast.node_count()
    );
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_expression() {
        let parser = create_parser();
        let ast = parse_expression(&parser, tokenize("1 + 2").unwrap()).unwrap();
        assert_eq!(ast.render(), "(mathExpression 1 + 2)");
        assert!(ast.kind.is_rule("mathExpression"));
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = create_parser_with_preferences(ParserPreferences {
            trace_alternatives: true,
        });
        for _ in 0..2 {
            let ast = parse_expression(&parser, tokenize("f(1) |> g()").unwrap()).unwrap();
            assert_eq!(ast.render(), "(pipeline (function f 1) (function g))");
        }
        assert_matches!(
            parse_expression(&parser, tokenize("[1,").unwrap()),
            Err(SyntaxError::NoViableParse { .. })
        );
    }
}
