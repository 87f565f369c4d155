use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// A literal argument of a query node.
///
/// Every literal starts out as a [`Value::String`] straight from the lexer.
/// Validation against a schema replaces it with the typed value of the field
/// it is compared to.
///
/// # Examples
///
/// ```
/// use rql::Value;
///
/// let raw = Value::String("42".to_string());
/// assert_eq!(raw.as_str(), Some("42"));
///
/// let converted = Value::Float(42.0);
/// assert_eq!(converted.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unconverted literal, or the value of a string field
    String(String),

    /// Boolean field value
    Bool(bool),

    /// Signed integer field value
    Int(i64),

    /// Unsigned integer field value
    Uint(u64),

    /// Floating-point field value
    Float(f64),

    /// Exact decimal field value
    Decimal(Decimal),

    /// Time field value, parsed with the field's layout
    Time(DateTime<FixedOffset>),

    /// The literal `null` compared to a nullable field
    Null,
}

impl Value {
    /// Borrow the raw literal, if this value has not been converted.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Time(_) => "time",
            Value::Null => "null",
        }
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

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Null => write!(f, "null"),
        }
    }
}
