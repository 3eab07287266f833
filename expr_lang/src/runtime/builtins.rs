//! Small host library of numeric and string helpers
//!
//! Nothing in the evaluator depends on these; hosts opt in with
//! [`register_defaults`].

use crate::runtime::registry::FunctionRegistry;
use crate::runtime::value::Value;

type BuiltinResult = Result<Value, String>;

/// Install every builtin into `registry`
pub fn register_defaults(registry: &mut FunctionRegistry) {
    registry.add_function("add", |args| fold_numbers(args, 0.0, |acc, n| acc + n));
    registry.add_function("mul", |args| fold_numbers(args, 1.0, |acc, n| acc * n));
    registry.add_function("sub", |args| {
        let (a, b) = two_numbers(args)?;
        Ok(Value::Number(a - b))
    });
    registry.add_function("div", |args| {
        let (a, b) = two_numbers(args)?;
        if b == 0.0 {
            return Err("division by zero".to_string());
        }
        Ok(Value::Number(a / b))
    });
    registry.add_function("pow", |args| {
        let (a, b) = two_numbers(args)?;
        Ok(Value::Number(a.powf(b)))
    });

    // Half-way cases round towards positive infinity
    registry.add_function("round", |args| unary(args, |n| (n + 0.5).floor()));
    registry.add_function("floor", |args| unary(args, f64::floor));
    registry.add_function("ceil", |args| unary(args, f64::ceil));
    registry.add_function("abs", |args| unary(args, f64::abs));

    registry.add_function("min", |args| extremum(args, f64::min));
    registry.add_function("max", |args| extremum(args, f64::max));

    registry.add_function("len", |args| match exactly_one(args)? {
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::List(items) => Ok(Value::Number(items.len() as f64)),
        Value::Map(entries) => Ok(Value::Number(entries.len() as f64)),
        other => Err(format!("cannot take the length of a {}", other.type_name())),
    });
    registry.add_function("upper", |args| {
        text(exactly_one(args)?).map(|s| Value::String(s.to_uppercase()))
    });
    registry.add_function("lower", |args| {
        text(exactly_one(args)?).map(|s| Value::String(s.to_lowercase()))
    });
    registry.add_function("concat", |args| {
        Ok(Value::String(args.iter().map(Value::to_text).collect()))
    });
}

/// Registry with the builtins already installed
pub fn default_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    register_defaults(&mut registry);
    registry
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

fn number(value: &Value, position: usize) -> Result<f64, String> {
    value
        .as_number()
        .ok_or_else(|| format!("argument {} must be a number, got {}", position + 1, value.type_name()))
}

fn numbers(args: &[Value]) -> Result<Vec<f64>, String> {
    args.iter().enumerate().map(|(i, v)| number(v, i)).collect()
}

fn exactly_one(args: &[Value]) -> Result<&Value, String> {
    match args {
        [value] => Ok(value),
        _ => Err(format!("expected 1 argument, got {}", args.len())),
    }
}

fn two_numbers(args: &[Value]) -> Result<(f64, f64), String> {
    match args {
        [a, b] => Ok((number(a, 0)?, number(b, 1)?)),
        _ => Err(format!("expected 2 arguments, got {}", args.len())),
    }
}

fn text(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a string, got {}", value.type_name()))
}

fn unary(args: &[Value], f: fn(f64) -> f64) -> BuiltinResult {
    Ok(Value::Number(f(number(exactly_one(args)?, 0)?)))
}

fn fold_numbers(args: &[Value], init: f64, f: fn(f64, f64) -> f64) -> BuiltinResult {
    Ok(Value::Number(numbers(args)?.into_iter().fold(init, f)))
}

fn extremum(args: &[Value], f: fn(f64, f64) -> f64) -> BuiltinResult {
    numbers(args)?
        .into_iter()
        .reduce(f)
        .map(Value::Number)
        .ok_or_else(|| "expected at least 1 argument".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::RuntimeError;
    use assert_matches::assert_matches;

    fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        default_registry().invoke(name, args)
    }

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(call("add", &[n(1.0), n(2.0), n(3.0)]), Ok(n(6.0)));
        assert_eq!(call("add", &[]), Ok(n(0.0)));
        assert_eq!(call("mul", &[n(2.0), n(4.0)]), Ok(n(8.0)));
        assert_eq!(call("sub", &[n(2.0), n(4.0)]), Ok(n(-2.0)));
        assert_eq!(call("div", &[n(6.0), n(3.0)]), Ok(n(2.0)));
        assert_eq!(call("pow", &[n(2.0), n(8.0)]), Ok(n(256.0)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(call("round", &[n(5.5)]), Ok(n(6.0)));
        assert_eq!(call("round", &[n(-5.5)]), Ok(n(-5.0)));
        assert_eq!(call("floor", &[n(1.7)]), Ok(n(1.0)));
        assert_eq!(call("ceil", &[n(1.2)]), Ok(n(2.0)));
        assert_eq!(call("abs", &[n(-3.0)]), Ok(n(3.0)));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(call("min", &[n(6.0), n(5.0)]), Ok(n(5.0)));
        assert_eq!(call("max", &[n(6.0), n(5.0), n(9.0)]), Ok(n(9.0)));
        assert_matches!(call("min", &[]), Err(RuntimeError::FunctionFailed { .. }));
    }

    #[test]
    fn test_strings_and_collections() {
        assert_eq!(call("len", &[Value::from("héllo")]), Ok(n(5.0)));
        assert_eq!(call("len", &[Value::List(vec![n(1.0)])]), Ok(n(1.0)));
        assert_eq!(call("upper", &[Value::from("ab")]), Ok(Value::from("AB")));
        assert_eq!(call("lower", &[Value::from("AB")]), Ok(Value::from("ab")));
        assert_eq!(
            call("concat", &[Value::from("a"), n(1.0), Value::Null]),
            Ok(Value::from("a1null"))
        );
    }

    #[test]
    fn test_argument_errors() {
        assert_matches!(
            call("div", &[n(1.0), n(0.0)]),
            Err(RuntimeError::FunctionFailed { message, .. }) if message == "division by zero"
        );
        assert_matches!(
            call("sub", &[n(1.0)]),
            Err(RuntimeError::FunctionFailed { message, .. }) if message == "expected 2 arguments, got 1"
        );
        assert_matches!(
            call("upper", &[n(1.0)]),
            Err(RuntimeError::FunctionFailed { message, .. }) if message == "expected a string, got number"
        );
        assert_matches!(
            call("add", &[n(1.0), Value::Null]),
            Err(RuntimeError::FunctionFailed { message, .. }) if message == "argument 2 must be a number, got null"
        );
    }
}
