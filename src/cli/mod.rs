//! CLI support for rql
//!
//! Provides programmatic access to the `rql` commands for embedding in other
//! tools.

mod check;
mod fields;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use fields::{describe_fields, load_resource};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Rql(#[from] crate::RqlError),
    #[error("Invalid schema: {0}")]
    Schema(#[from] crate::SchemaError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,
}
