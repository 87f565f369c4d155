//! # Resource Query Language - Abstract Syntax Tree
//!
//! This module defines the tree the parser produces for an RQL query: a
//! compact, URL-embeddable language letting API clients filter, sort, project
//! and paginate resources without writing database syntax.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - Predicate nodes and their arguments
//! - **[root]** - The parsed query with special operators hoisted out
//!
//! ## Quick Start
//!
//! ```text
//! and(eq(status,active),gt(price,100))&sort(-price)&limit(10)
//! ```
//!
//! This query keeps active resources priced above 100, most expensive first,
//! ten at a time.
//!
//! ## Surface Syntaxes
//!
//! The same comparison can be written three ways:
//!
//! ```text
//! eq(price,10)     function style
//! price=10         simple equal, always `eq`
//! price=gt=10      double equal, any operator
//! ```
//!
//! Blocs are combined with `&` (AND) or with `|` / `;` (OR). Mixing both at
//! the same level needs parentheses:
//!
//! ```text
//! (status=active|status=pending)&price=lt=100
//! ```
//!
//! ### Array Groups
//!
//! ```text
//! in(color,[red,blue])  ->  in(color, group(color,red,blue))
//! color=in=(red,blue)   ->  in(color,red,blue)
//! ```
//!
//! ### Special Operators
//!
//! `limit(n[,offset])`, `offset(n)`, `sort(+field,-field)` and
//! `select(field,...)` are not predicates; they end up on [`RootNode`].
pub mod node;
pub mod root;
pub mod tokens;

pub use node::{Arg, GROUP_OP, Node};
pub use root::{RootNode, Sort};
pub use tokens::Token;
