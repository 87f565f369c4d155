//! Operator dispatch for translators.
//!
//! A translator turns a validated tree into a backend query. It registers one
//! callback per operator in an [`OpTable`]; callbacks receive the table so
//! they can translate nested nodes through it.
//!
//! Field names end up interpolated into the backend query, so callbacks must
//! check them with [`is_valid_field`]. Every other literal must be passed as a
//! parameter or quoted, never interpolated as is.
//!
//! # Examples
//!
//! ```
//! use rql::translate::{is_valid_field, OpTable, TranslateError};
//! use rql::{Arg, Parser};
//!
//! let mut table = OpTable::new();
//! table.set_op("eq", |_, node| {
//!     let field = node.field().filter(|f| is_valid_field(f));
//!     let field = field.ok_or_else(|| TranslateError::InvalidField(node.to_string()))?;
//!     Ok(format!("{} = ?", field))
//! });
//! table.set_op("and", |table, node| {
//!     let parts = node
//!         .args
//!         .iter()
//!         .filter_map(Arg::as_node)
//!         .map(|n| table.translate(n))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     Ok(parts.join(" AND "))
//! });
//!
//! let root = Parser::new().parse("a=1&b=2").unwrap();
//! let sql = table.translate(root.node.as_ref().unwrap()).unwrap();
//! assert_eq!(sql, "a = ? AND b = ?");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Node, RootNode};

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("no handler for operator {0:?}")]
    NoHandler(String),
    #[error("invalid field name in {0}")]
    InvalidField(String),
    #[error("operator {op}: {message}")]
    Invalid { op: String, message: String },
}

pub type OpFn<T> = Box<dyn Fn(&OpTable<T>, &Node) -> Result<T, TranslateError> + Send + Sync>;

/// Callbacks keyed by upper-cased operator name.
pub struct OpTable<T> {
    ops: HashMap<String, OpFn<T>>,
}

impl<T> Default for OpTable<T> {
    fn default() -> Self {
        OpTable {
            ops: HashMap::new(),
        }
    }
}

impl<T> OpTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the callback of `op`.
    pub fn set_op(
        &mut self,
        op: &str,
        f: impl Fn(&OpTable<T>, &Node) -> Result<T, TranslateError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.ops.insert(op.to_uppercase(), Box::new(f));
        self
    }

    /// Removes the callback of `op`, returning whether there was one.
    pub fn delete_op(&mut self, op: &str) -> bool {
        self.ops.remove(&op.to_uppercase()).is_some()
    }

    pub fn has_op(&self, op: &str) -> bool {
        self.ops.contains_key(&op.to_uppercase())
    }

    pub fn translate(&self, node: &Node) -> Result<T, TranslateError> {
        let f = self
            .ops
            .get(&node.op.to_uppercase())
            .ok_or_else(|| TranslateError::NoHandler(node.op.clone()))?;
        f(self, node)
    }

    /// Translates the residual predicate, if the query has one.
    pub fn translate_root(&self, root: &RootNode) -> Result<Option<T>, TranslateError> {
        root.node.as_ref().map(|node| self.translate(node)).transpose()
    }
}

impl<T> fmt::Debug for OpTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ops: Vec<_> = self.ops.keys().collect();
        ops.sort();
        f.debug_struct("OpTable").field("ops", &ops).finish()
    }
}

/// True if `s` may be interpolated into a backend query as a field name:
/// ASCII letters, digits, `_`, `-` and `.` only.
pub fn is_valid_field(s: &str) -> bool {
    FIELD_NAME.is_match(s)
}
