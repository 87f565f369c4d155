use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::schema::SchemaError;
use crate::validation::{FieldError, RangeError};

/// Any error a parse can end with. Every stage stops at its first error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RqlError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("url parse error: {0}")]
    Url(Box<RqlError>),
}

impl RqlError {
    /// The error behind any `Url` wrapping.
    pub fn root_cause(&self) -> &RqlError {
        match self {
            RqlError::Url(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// True for errors in the query's grammar, as opposed to its content.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self.root_cause(),
            RqlError::Lex(_) | RqlError::Parse(_)
        )
    }
}
