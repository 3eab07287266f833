//! Expression evaluation
//!
//! An [`Evaluator`] walks a syntax tree and calls out to a
//! [`FunctionRegistry`] for every function node. Values are the closed
//! [`Value`] union.

pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod registry;
pub mod value;

pub use builtins::{default_registry, register_defaults};
pub use error::{RuntimeError, RuntimeResult};
pub use evaluator::{Evaluator, MathOp};
pub use registry::{FunctionRegistry, NativeFunction};
pub use value::Value;

use crate::grammar::AstNode;
use crate::logging::codes;
use crate::{log_error, log_success};

/// Evaluate a tree against `registry`, logging the outcome
pub fn execute(ast: &AstNode, registry: &FunctionRegistry) -> RuntimeResult<Value> {
    match Evaluator::new(registry).evaluate(ast) {
        Ok(value) => {
            log_success!(
                codes::success::EVALUATION_COMPLETE,
                "Evaluation completed",
                "type" => value.type_name()
            );
            Ok(value)
        }
        Err(error) => {
            match error.span() {
                Some(span) => log_error!(error.error_code(), &error.to_string(), span = span),
                None => log_error!(error.error_code(), &error.to_string()),
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::{create_parser, parse_expression};

    #[test]
    fn test_execute_with_default_registry() {
        let ast = parse_expression(&create_parser(), tokenize("4 |> add(2) |> div(3)").unwrap())
            .unwrap();
        assert_eq!(execute(&ast, &default_registry()), Ok(Value::Number(2.0)));
    }

    #[test]
    fn test_execute_reports_missing_function() {
        let ast = parse_expression(&create_parser(), tokenize("missing(1)").unwrap()).unwrap();
        let error = execute(&ast, &FunctionRegistry::new()).unwrap_err();
        assert!(error.to_string().contains("Function \"missing\" not found"));
    }
}
