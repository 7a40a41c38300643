//! Scalar leaf values stored in a [`Tree`](super::Tree).
//!
//! Responsibilities:
//! - Define the closed set of scalar shapes a source can produce.
//! - Provide lossless conversions from Rust primitives.
//! - Render values for diagnostics and JSON output.
//!
//! Does NOT handle:
//! - Converting values into typed fields (see `schema::coerce`).
//!
//! Invariants:
//! - `Value` has exactly five variants; coercion matches over all of them.
//! - `Nil` is a present-but-null leaf, distinct from a missing key.

use serde::Serialize;
use std::fmt;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A present leaf with no value (YAML `~`, `null`, or an empty mapping entry).
    Nil,
    /// Text, as produced by environment and dotenv sources.
    String(String),
    /// A whole number that fits in 64 signed bits.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
}

impl Value {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "null",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
        }
    }

    /// Returns true for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Borrow the text of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_strings_and_keeps_float_point() {
        assert_eq!(Value::from("localhost").to_string(), "\"localhost\"");
        assert_eq!(Value::Float(8080.0).to_string(), "8080.0");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Nil.to_string(), "null");
    }

    #[test]
    fn test_serializes_untagged() {
        let rendered = serde_json::to_string(&vec![
            Value::Nil,
            Value::from("a"),
            Value::Integer(1),
            Value::Float(1.5),
            Value::Bool(true),
        ])
        .unwrap();
        assert_eq!(rendered, r#"[null,"a",1,1.5,true]"#);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some(5i64)), Value::Integer(5));
    }
}
