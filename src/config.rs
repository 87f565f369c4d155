//! Parser configuration.

use std::fmt;
use std::sync::Arc;

use heck::{ToLowerCamelCase, ToSnakeCase};

pub const DEFAULT_TAG_NAME: &str = "rql";
pub const DEFAULT_FIELD_SEP: &str = "_";
pub const DEFAULT_LIMIT: u64 = 25;
pub const DEFAULT_MAX_LIMIT: u64 = 100;

/// Derives the output name of a field from its declared name.
pub type ColumnFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Receives diagnostics emitted while the schema registry is built.
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Configuration of a [`Parser`](crate::Parser).
///
/// Empty or zero values fall back to the defaults, so a partially filled
/// config behaves like `Config::default()` for the fields left out.
///
/// # Examples
///
/// ```
/// use rql::Config;
///
/// let config = Config::default()
///     .with_field_sep(".")
///     .with_limit_max_value(500);
/// assert_eq!(config.limit_max_value, 500);
/// assert_eq!(config.default_limit, 25);
/// ```
#[derive(Clone)]
pub struct Config {
    /// Tag key holding a field's RQL options. Defaults to `"rql"`.
    pub tag_name: String,
    /// Joins the names of nested fields, `address_city` by default.
    pub field_sep: String,
    /// Applied to every segment of a field path. Defaults to lower camel case.
    pub column_fn: ColumnFn,
    /// Diagnostic sink. Defaults to a `tracing` warning.
    pub log: LogFn,
    /// Reported as the limit when a query carries none.
    pub default_limit: u64,
    /// Largest limit a query may ask for.
    pub limit_max_value: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            field_sep: DEFAULT_FIELD_SEP.to_string(),
            column_fn: Arc::new(column),
            log: Arc::new(|msg: &str| tracing::warn!("{}", msg)),
            default_limit: DEFAULT_LIMIT,
            limit_max_value: DEFAULT_MAX_LIMIT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn with_field_sep(mut self, sep: impl Into<String>) -> Self {
        self.field_sep = sep.into();
        self
    }

    pub fn with_column_fn(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.column_fn = Arc::new(f);
        self
    }

    pub fn with_log(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Arc::new(f);
        self
    }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_limit_max_value(mut self, limit: u64) -> Self {
        self.limit_max_value = limit;
        self
    }

    /// Replaces empty and zero settings with their defaults.
    pub(crate) fn normalized(mut self) -> Self {
        if self.tag_name.is_empty() {
            self.tag_name = DEFAULT_TAG_NAME.to_string();
        }
        if self.field_sep.is_empty() {
            self.field_sep = DEFAULT_FIELD_SEP.to_string();
        }
        if self.default_limit == 0 {
            self.default_limit = DEFAULT_LIMIT;
        }
        if self.limit_max_value == 0 {
            self.limit_max_value = DEFAULT_MAX_LIMIT;
        }
        self
    }

    pub(crate) fn log(&self, msg: &str) {
        (self.log)(msg)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tag_name", &self.tag_name)
            .field("field_sep", &self.field_sep)
            .field("default_limit", &self.default_limit)
            .field("limit_max_value", &self.limit_max_value)
            .finish_non_exhaustive()
    }
}

/// Default column function: lower camel case.
///
/// ```
/// use rql::config::column;
///
/// assert_eq!(column("Username"), "username");
/// assert_eq!(column("FullName"), "fullName");
/// assert_eq!(column("HTTPPort"), "httpPort");
/// ```
pub fn column(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Snake case, for hosts whose columns follow `full_name` conventions.
///
/// ```
/// use rql::config::snake_case;
///
/// assert_eq!(snake_case("FullName"), "full_name");
/// assert_eq!(snake_case("HTTPPort"), "http_port");
/// ```
pub fn snake_case(name: &str) -> String {
    name.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(column("HTTPCode"), "httpCode");
        assert_eq!(column("created_at"), "createdAt");
        assert_eq!(column("ID"), "id");
        assert_eq!(snake_case("createdAt"), "created_at");
        assert_eq!(snake_case("Address.City"), "address_city");
    }

    #[test]
    fn test_normalized_restores_defaults() {
        let config = Config {
            tag_name: String::new(),
            default_limit: 0,
            ..Config::default()
        }
        .normalized();
        assert_eq!(config.tag_name, "rql");
        assert_eq!(config.default_limit, 25);
    }
}
