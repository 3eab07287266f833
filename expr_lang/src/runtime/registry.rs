//! Host functions callable from expressions

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Variadic host callable. An `Err` message becomes a `FunctionFailed` error.
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Name to callable table, read-only while an expression executes
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, NativeFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any previous one with the same name
    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.add_function(name, function);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Apply a registered function; its result is returned unmodified
    pub fn invoke(&self, name: &str, args: &[Value]) -> RuntimeResult<Value> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| RuntimeError::FunctionNotFound {
                name: name.to_string(),
            })?;

        function(args).map_err(|message| RuntimeError::FunctionFailed {
            name: name.to_string(),
            message,
        })
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_invoke_registered_function() {
        let registry = FunctionRegistry::new().with_function("count", |args| {
            Ok(Value::Number(args.len() as f64))
        });
        let result = registry.invoke("count", &[Value::Null, Value::Bool(true)]).unwrap();
        assert_eq!(result, Value::Number(2.0));
        assert!(registry.contains("count"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_function() {
        let error = FunctionRegistry::new().invoke("missing", &[]).unwrap_err();
        assert_matches!(&error, RuntimeError::FunctionNotFound { name } if name == "missing");
        assert_eq!(error.to_string(), "Function \"missing\" not found");
    }

    #[test]
    fn test_function_failure_is_reported() {
        let registry = FunctionRegistry::new().with_function("boom", |_| Err("no".to_string()));
        assert_matches!(
            registry.invoke("boom", &[]),
            Err(RuntimeError::FunctionFailed { name, message }) if name == "boom" && message == "no"
        );
    }

    #[test]
    fn test_replacing_a_function() {
        let mut registry = FunctionRegistry::new();
        registry.add_function("f", |_| Ok(Value::Number(1.0)));
        registry.add_function("f", |_| Ok(Value::Number(2.0)));
        assert_eq!(registry.invoke("f", &[]), Ok(Value::Number(2.0)));
        assert_eq!(registry.names(), vec!["f"]);
        assert_eq!(format!("{:?}", registry), "FunctionRegistry { functions: [\"f\"] }");
    }
}
