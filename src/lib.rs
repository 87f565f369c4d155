pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod schema;
pub mod translate;
pub mod url;
pub mod validation;
pub mod value;

pub use ast::{Arg, Node, RootNode, Sort, Token};
pub use config::Config;
pub use error::RqlError;
pub use lexer::{LexError, Lexer};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use schema::{
    FieldDef, FieldDescriptor, FieldKind, FieldRegistry, FieldType, FloatWidth, Resource,
    SchemaError, Width,
};
pub use translate::{OpTable, TranslateError};
pub use validation::{FieldError, RangeError};
pub use value::Value;
