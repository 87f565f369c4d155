use crate::ast::{Arg, Node};
use crate::parser::ParseError;

pub const LIMIT_OP: &str = "limit";
pub const OFFSET_OP: &str = "offset";
pub const SORT_OP: &str = "sort";
pub const SELECT_OP: &str = "select";

/// One `sort` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

/// Result of parsing a whole query.
///
/// The special operators (`limit`, `offset`, `sort`, `select`) are pulled out
/// of the predicate tree into their own fields; what is left of the tree is
/// the residual predicate in [`RootNode::node`].
///
/// # Examples
/// ```text
/// foo=1&sort(-price)&limit(10)
///   node  = eq(foo,1)
///   sort  = [price desc]
///   limit = 10
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootNode {
    /// Residual predicate, `None` when the query held only special operators
    pub node: Option<Node>,
    pub(crate) limit: Option<String>,
    pub(crate) offset: Option<String>,
    pub(crate) sort: Vec<Sort>,
    pub(crate) select: Vec<String>,
}

impl RootNode {
    /// Wraps a raw tree. Special operators are still part of `node` until
    /// [`RootNode::hoist_special_ops`] runs.
    pub fn new(node: Option<Node>) -> Self {
        RootNode {
            node,
            ..Default::default()
        }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit.as_deref().and_then(|l| l.parse().ok())
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset.as_deref().and_then(|o| o.parse().ok())
    }

    /// Literal `limit` argument as written in the query.
    pub fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    /// Literal `offset` argument as written in the query.
    pub fn raw_offset(&self) -> Option<&str> {
        self.offset.as_deref()
    }

    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    pub fn select(&self) -> &[String] {
        &self.select
    }

    /// Moves special operators out of the predicate tree.
    ///
    /// A special operator at the top is consumed entirely. Under a top-level
    /// `AND` every direct special-operator child is removed; an `AND` emptied
    /// this way leaves no predicate, and one left with a single nested node
    /// is replaced by that node. Special operators below that level, such as
    /// inside a parenthesized `AND`, stay in the tree. When the surviving node
    /// still holds one directly, the outer `AND` is kept around it so running
    /// this twice changes nothing the second time.
    pub fn hoist_special_ops(&mut self) -> Result<(), ParseError> {
        let Some(node) = self.node.take() else {
            return Ok(());
        };

        if self.extract(&node)? {
            return Ok(());
        }

        if !node.is_op("and") {
            self.node = Some(node);
            return Ok(());
        }

        let before = node.args.len();
        let mut kept = Vec::with_capacity(before);
        for arg in node.args {
            match arg {
                Arg::Node(child) => {
                    if !self.extract(&child)? {
                        kept.push(Arg::Node(child));
                    }
                }
                value => kept.push(value),
            }
        }
        if kept.is_empty() {
            return Ok(());
        }

        // a lone literal keeps its AND wrapper
        let changed = kept.len() != before;
        if changed
            && kept.len() == 1
            && let Arg::Node(child) = &kept[0]
            && !holds_special_op(child)
        {
            if let Some(Arg::Node(child)) = kept.pop() {
                self.node = Some(child);
            }
            return Ok(());
        }

        self.node = Some(Node::new(node.op, kept));
        Ok(())
    }

    /// Records `node` if it is a special operator.
    fn extract(&mut self, node: &Node) -> Result<bool, ParseError> {
        let op = node.op.to_ascii_lowercase();
        match op.as_str() {
            LIMIT_OP => {
                let args = literal_args(node)?;
                match args.as_slice() {
                    [limit] => self.limit = Some(limit.to_string()),
                    [limit, offset] => {
                        self.limit = Some(limit.to_string());
                        self.offset = Some(offset.to_string());
                    }
                    _ => return Err(special_op_error(node, "expects a limit and an optional offset")),
                }
            }
            OFFSET_OP => {
                let args = literal_args(node)?;
                match args.as_slice() {
                    [offset] => self.offset = Some(offset.to_string()),
                    _ => return Err(special_op_error(node, "expects exactly one argument")),
                }
            }
            SORT_OP => {
                for property in literal_args(node)? {
                    let (field, descending) = match property.as_bytes().first() {
                        Some(b'+') => (&property[1..], false),
                        Some(b'-') => (&property[1..], true),
                        _ => (property, false),
                    };
                    if field.is_empty() {
                        return Err(special_op_error(node, "has an empty field name"));
                    }
                    self.sort.push(Sort {
                        field: field.to_string(),
                        descending,
                    });
                }
            }
            SELECT_OP => {
                for field in literal_args(node)? {
                    if field.is_empty() {
                        return Err(special_op_error(node, "has an empty field name"));
                    }
                    self.select.push(field.to_string());
                }
            }
            _ => return Ok(false),
        }
        tracing::trace!(op = %node.op, "hoisted special operator");
        Ok(true)
    }
}

fn is_special_op(node: &Node) -> bool {
    let op = node.op.to_ascii_lowercase();
    matches!(op.as_str(), LIMIT_OP | OFFSET_OP | SORT_OP | SELECT_OP)
}

/// Whether hoisting `node` as the top of a tree would extract anything.
fn holds_special_op(node: &Node) -> bool {
    is_special_op(node)
        || (node.is_op("and")
            && node
                .args
                .iter()
                .any(|arg| arg.as_node().is_some_and(is_special_op)))
}

fn literal_args(node: &Node) -> Result<Vec<&str>, ParseError> {
    node.args
        .iter()
        .map(|arg| match arg {
            Arg::Value(v) => v
                .as_str()
                .ok_or_else(|| special_op_error(node, "takes only literal arguments")),
            Arg::Node(_) => Err(special_op_error(node, "takes only literal arguments")),
        })
        .collect()
}

fn special_op_error(node: &Node, message: &str) -> ParseError {
    ParseError::SpecialOp {
        op: node.op.clone(),
        message: message.to_string(),
    }
}
