use std::fmt;

use crate::value::Value;

/// Operator name of array-literal nodes built from `field,[v1,v2]` blocs.
pub const GROUP_OP: &str = "group";

/// A predicate node: an operator applied to ordered arguments.
///
/// For comparison and function operators the argument at position 0 is the
/// field name and the following arguments are the values it is compared to.
/// Combinators (`AND`, `OR`, `not`) take nested nodes.
///
/// # Examples
/// ```text
/// eq(price,10)            -> Node { op: "eq", args: [price, 10] }
/// foo=1&bar=2             -> Node { op: "AND", args: [eq(foo,1), eq(bar,2)] }
/// in(color,[red,blue])    -> Node { op: "in", args: [color, group(color,red,blue)] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub op: String,
    pub args: Vec<Arg>,
}

/// One argument of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Literal value (field name, raw string or converted value)
    Value(Value),

    /// Nested node
    Node(Node),
}

impl Node {
    pub fn new(op: impl Into<String>, args: Vec<Arg>) -> Self {
        Node {
            op: op.into(),
            args,
        }
    }

    /// Operator compared case-insensitively, the way translators look it up.
    pub fn is_op(&self, op: &str) -> bool {
        self.op.eq_ignore_ascii_case(op)
    }

    pub fn is_group(&self) -> bool {
        self.op == GROUP_OP
    }

    /// Raw field name at position 0, if present and still a string literal.
    pub fn field(&self) -> Option<&str> {
        match self.args.first() {
            Some(Arg::Value(v)) => v.as_str(),
            _ => None,
        }
    }
}

impl Arg {
    pub fn literal(s: impl Into<String>) -> Self {
        Arg::Value(Value::String(s.into()))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Arg::Node(n) => Some(n),
            Arg::Value(_) => None,
        }
    }
}

impl From<Node> for Arg {
    fn from(n: Node) -> Self {
        Arg::Node(n)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::literal(s)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.op)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => write!(f, "{}", v),
            Arg::Node(n) => write!(f, "{}", n),
        }
    }
}
