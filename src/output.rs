//! JSON rendering of parsed queries.
//!
//! Nodes render as `{"op": ..., "args": [...]}`. Converted values keep their
//! JSON type where JSON has one; decimals and times render as strings so no
//! precision or offset is lost. Object keys are sorted, so output is
//! deterministic.
//!
//! # Examples
//!
//! ```
//! use rql::Parser;
//! use rql::output::to_json;
//!
//! let root = Parser::new().parse("eq(a,1)&limit(5)").unwrap();
//! assert_eq!(
//!     to_json(&root),
//!     r#"{"limit":5,"node":{"args":["a","1"],"op":"eq"},"offset":null,"select":[],"sort":[]}"#
//! );
//! ```

use serde_json::{Number, json};

use crate::ast::{Arg, Node, RootNode};
use crate::value::Value;

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, root: &RootNode) -> String {
        let value = root_to_json(root);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        // serializing a serde_json::Value does not fail
        rendered.unwrap_or_default()
    }
}

pub fn root_to_json(root: &RootNode) -> serde_json::Value {
    json!({
        "node": root.node.as_ref().map(node_to_json),
        "limit": root.limit(),
        "offset": root.offset(),
        "sort": root
            .sort()
            .iter()
            .map(|s| json!({ "field": s.field, "desc": s.descending }))
            .collect::<Vec<_>>(),
        "select": root.select(),
    })
}

pub fn node_to_json(node: &Node) -> serde_json::Value {
    let args: Vec<_> = node
        .args
        .iter()
        .map(|arg| match arg {
            Arg::Node(n) => node_to_json(n),
            Arg::Value(v) => value_to_json(v),
        })
        .collect();
    json!({ "op": node.op, "args": args })
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Int(n) => json!(n),
        Value::Uint(n) => json!(n),
        Value::Float(n) => Number::from_f64(*n).map_or(serde_json::Value::Null, Into::into),
        Value::Decimal(d) => json!(d.to_string()),
        Value::Time(t) => json!(t.to_rfc3339()),
        Value::Null => serde_json::Value::Null,
    }
}

/// Compact JSON.
pub fn to_json(root: &RootNode) -> String {
    JsonPrinter::new(false).print(root)
}

/// JSON indented by two spaces.
pub fn to_json_pretty(root: &RootNode) -> String {
    JsonPrinter::new(true).print(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_keeps_json_number() {
        assert_eq!(value_to_json(&Value::Float(10.0)), json!(10.0));
        assert_eq!(value_to_json(&Value::Float(f64::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn test_empty_root() {
        let root = RootNode::default();
        assert_eq!(root_to_json(&root)["node"], serde_json::Value::Null);
    }
}
