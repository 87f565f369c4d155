//! Parse and validate rql queries

use super::{CliError, load_resource};
use crate::output::root_to_json;
use crate::{Config, Parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// Path of a JSON resource description to validate fields against
    pub schema: Option<String>,
    /// Treat the query as a URL query string
    pub url: bool,
    /// Only check syntax and special operators
    pub syntax_only: bool,
    /// Largest limit a query may ask for
    pub max_limit: Option<u64>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The parsed query as JSON
    Success(serde_json::Value),
}

pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = options.query.trim();
    if query.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut config = Config::default();
    if let Some(max) = options.max_limit {
        config = config.with_limit_max_value(max);
    }

    let parser = match &options.schema {
        Some(path) if !options.syntax_only => {
            Parser::with_schema(config, &load_resource(path)?)?
        }
        _ => Parser::with_config(config),
    };

    let root = if options.url {
        parser.parse_query_string(query)?
    } else {
        parser.parse(query)?
    };

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }
    Ok(CheckResult::Success(root_to_json(&root)))
}
