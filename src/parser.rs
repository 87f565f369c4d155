use std::collections::BTreeMap;

use crate::ast::RootNode;
use crate::config::Config;
use crate::error::RqlError;
use crate::lexer::Lexer;
use crate::schema::{FieldRegistry, Resource, SchemaError};
use crate::url;
use crate::validation;

mod bloc;

/// A query that does not follow the RQL grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unbalanced parenthesis in {0:?}")]
    UnbalancedParenthesis(String),
    #[error("malformed array bloc {0:?}")]
    MalformedGroup(String),
    #[error("unexpected {found:?} after {bloc:?}")]
    TrailingTokens { bloc: String, found: String },
    #[error("ambiguous combinators in {0:?}; add parentheses")]
    AmbiguousCombinators(String),
    #[error("empty expression in {0:?}")]
    EmptyExpression(String),
    #[error("unrecognized bloc {0:?}")]
    UnrecognizedBloc(String),
    #[error("query {0:?} is a bare value, not a predicate")]
    BareValue(String),
    #[error("invalid {op} operator: {message}")]
    SpecialOp { op: String, message: String },
}

/// Parses RQL queries into validated [`RootNode`]s.
///
/// A parser built with [`Parser::new`] checks syntax and the special
/// operators only. One built with [`Parser::with_schema`] also checks every
/// field against the resource and converts literals to the field types.
///
/// The parser holds no per-query state and can be shared between threads.
///
/// # Examples
///
/// ```
/// use rql::{Config, FieldDef, FieldType, Parser, Resource};
///
/// let resource = Resource::new("Product")
///     .field(FieldDef::new("Name", FieldType::String).rql("filter"))
///     .field(FieldDef::new("Price", FieldType::F64).rql("filter,sort"));
/// let parser = Parser::with_schema(Config::default(), &resource)?;
///
/// let root = parser.parse("name=Pen&sort(-price)&limit(10)")?;
/// assert_eq!(root.node.as_ref().unwrap().to_string(), "eq(name,Pen)");
/// assert_eq!(root.limit(), Some(10));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Config,
    fields: Option<FieldRegistry>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser without a schema, using `config` for the limit bounds.
    pub fn with_config(config: Config) -> Self {
        Parser {
            config: config.normalized(),
            fields: None,
        }
    }

    /// Builds the field registry of `resource`. Fails if any tagged field
    /// has an unsupported type or an unparsable layout.
    pub fn with_schema(config: Config, resource: &Resource) -> Result<Self, SchemaError> {
        let config = config.normalized();
        let fields = FieldRegistry::build(resource, &config)?;
        Ok(Parser {
            config,
            fields: Some(fields),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fields(&self) -> Option<&FieldRegistry> {
        self.fields.as_ref()
    }

    pub fn parse(&self, input: &str) -> Result<RootNode, RqlError> {
        let tokens = Lexer::new(input).tokenize()?;
        tracing::debug!(tokens = tokens.len(), "scanned query");

        let mut root = RootNode::new(bloc::parse_query(&tokens)?);
        root.hoist_special_ops()?;
        tracing::debug!(
            residual = root.node.is_some(),
            sort = root.sort().len(),
            select = root.select().len(),
            "hoisted special operators"
        );

        validation::validate_special_ops(&mut root, &self.config, self.fields.as_ref())?;

        if let Some(fields) = &self.fields {
            if let Some(node) = root.node.as_mut() {
                validation::validate_fields(node, fields)?;
            }
            if root.limit.is_none() {
                root.limit = Some(self.config.default_limit.to_string());
            }
        }
        Ok(root)
    }

    /// Parses key/values pairs, as decoded from a request URL.
    pub fn parse_url(&self, values: &BTreeMap<String, Vec<String>>) -> Result<RootNode, RqlError> {
        let query = url::query_from_values(values);
        tracing::debug!(%query, "encoded url values");
        self.parse(&query).map_err(|e| RqlError::Url(Box::new(e)))
    }

    /// Parses the raw query string of a URL, e.g. `foo=1&sort(+price)`.
    pub fn parse_query_string(&self, query: &str) -> Result<RootNode, RqlError> {
        self.parse_url(&url::values_from_query_string(query))
    }
}
