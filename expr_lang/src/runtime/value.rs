//! Dynamically typed evaluation result

use crate::tokens::TokenValue;
use crate::utils::{as_integer, format_number};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Closed set of values an expression can produce
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    /// Key/value pairs in source order; keys are unique
    Map(Vec<(String, Value)>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a map entry by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert into a map, replacing the value of an existing key in place
    pub fn insert(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Plain text form: strings unquoted, everything else as JSON
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<TokenValue> for Value {
    fn from(value: TokenValue) -> Self {
        match value {
            TokenValue::Null => Value::Null,
            TokenValue::Bool(b) => Value::Bool(b),
            TokenValue::Number(n) => Value::Number(n),
            TokenValue::Text(s) => Value::String(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match as_integer(*n) {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// JSON-like rendering. Non-finite numbers print as `NaN`/`Infinity`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(f, "{}: {}", quoted, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::Map(vec![
            ("a".to_string(), Value::Number(1.0)),
            ("b".to_string(), Value::List(vec![Value::Bool(true), Value::Null])),
            ("c".to_string(), Value::from("x\"y")),
        ])
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), r#"{"a": 1, "b": [true, null], "c": "x\"y"}"#);
        assert_eq!(Value::Number(5.5).to_string(), "5.5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from("hi").to_text(), "hi");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn test_json_keeps_key_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"a":1,"b":[true,null],"c":"x\"y"}"#);
        assert_eq!(serde_json::to_string(&Value::Number(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut entries = vec![("a".to_string(), Value::Number(1.0))];
        Value::insert(&mut entries, "b".to_string(), Value::Null);
        Value::insert(&mut entries, "a".to_string(), Value::Number(2.0));
        let map = Value::Map(entries);
        assert_eq!(map.get("a"), Some(&Value::Number(2.0)));
        assert_eq!(map.to_string(), r#"{"a": 2, "b": null}"#);
    }

    #[test]
    fn test_accessors_and_conversions() {
        assert_eq!(Value::from(TokenValue::Number(3.0)), Value::Number(3.0));
        assert_eq!(Value::from(TokenValue::Text("t".into())).as_str(), Some("t"));
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::List(vec![]).as_list().map(<[Value]>::len), Some(0));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Number(1.0).get("a"), None);
    }
}
