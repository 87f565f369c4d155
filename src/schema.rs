//! Schema registry.
//!
//! A [`Resource`] describes the record type a query runs against: its fields,
//! their types and their tag options. [`FieldRegistry::build`] flattens it into
//! one [`FieldDescriptor`] per queryable field.
//!
//! Resources usually come from JSON:
//!
//! ```json
//! {
//!   "name": "User",
//!   "fields": [
//!     { "name": "Name", "type": "string", "tags": { "rql": "filter,sort" } },
//!     { "name": "Age", "type": { "nullable": "i64" }, "tags": { "rql": "filter" } },
//!     { "name": "Address", "type": { "struct": [
//!         { "name": "City", "type": "string", "tags": { "rql": "filter" } }
//!     ] } }
//!   ]
//! }
//! ```

pub mod field;
pub mod layout;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::Config;

pub use field::{FieldDescriptor, FieldKind, FloatWidth, Width};
pub use layout::Layout;

static VALUED_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(column|replacewith|layout)=(.*)$").expect("valid regex"));

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Decimal,
    Time,
    Slice(Box<FieldType>),
    Nullable(Box<FieldType>),
    Struct(Vec<FieldDef>),
    /// A host type with no RQL meaning
    Opaque(String),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::String => write!(f, "string"),
            FieldType::I8 => write!(f, "i8"),
            FieldType::I16 => write!(f, "i16"),
            FieldType::I32 => write!(f, "i32"),
            FieldType::I64 => write!(f, "i64"),
            FieldType::Isize => write!(f, "isize"),
            FieldType::U8 => write!(f, "u8"),
            FieldType::U16 => write!(f, "u16"),
            FieldType::U32 => write!(f, "u32"),
            FieldType::U64 => write!(f, "u64"),
            FieldType::Usize => write!(f, "usize"),
            FieldType::F32 => write!(f, "f32"),
            FieldType::F64 => write!(f, "f64"),
            FieldType::Decimal => write!(f, "decimal"),
            FieldType::Time => write!(f, "time"),
            FieldType::Slice(inner) => write!(f, "[{}]", inner),
            FieldType::Nullable(inner) => write!(f, "{}?", inner),
            FieldType::Struct(_) => write!(f, "struct"),
            FieldType::Opaque(name) => write!(f, "{}", name),
        }
    }
}

/// One declared field of a resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Tag values keyed by tag name, e.g. `{"rql": "filter,sort"}`
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Embedded structs contribute their fields without a name prefix.
    #[serde(default)]
    pub embedded: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            tags: BTreeMap::new(),
            embedded: false,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the default `rql` tag.
    pub fn rql(self, options: impl Into<String>) -> Self {
        self.tag(crate::config::DEFAULT_TAG_NAME, options)
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// The record type queries are validated against.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Resource {
            name: name.into(),
            fields: vec![],
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds a resource from an arbitrary type; only structs describe one.
    pub fn from_type(name: impl Into<String>, ty: FieldType) -> Result<Self, SchemaError> {
        let name = name.into();
        match ty {
            FieldType::Struct(fields) => Ok(Resource { name, fields }),
            other => Err(SchemaError::NotAStruct {
                name,
                ty: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("resource {name} must be a struct, got {ty}")]
    NotAStruct { name: String, ty: String },
    #[error("field {field}: type {ty} is not supported")]
    UnsupportedType { field: String, ty: String },
    #[error("field {field}: {message}")]
    Layout { field: String, message: String },
    #[error("field {field} is declared twice")]
    DuplicateField { field: String },
}

/// Flattened view of a resource: output field name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldDescriptor>,
}

struct Pending<'a> {
    path: Vec<String>,
    def: &'a FieldDef,
}

impl FieldRegistry {
    /// Walks the resource breadth-first, turning every tagged field into a
    /// descriptor and expanding untagged structs into their children.
    pub fn build(resource: &Resource, config: &Config) -> Result<Self, SchemaError> {
        let mut fields = HashMap::new();
        let mut worklist: Vec<Pending<'_>> = resource
            .fields
            .iter()
            .map(|def| Pending {
                path: vec![def.name.clone()],
                def,
            })
            .collect();

        let mut next = 0;
        while next < worklist.len() {
            let path = worklist[next].path.clone();
            let def = worklist[next].def;
            next += 1;

            if let Some(options) = def.tags.get(&config.tag_name) {
                let descriptor = descriptor(&path, def, options, config)?;
                tracing::trace!(field = %descriptor.name, kind = descriptor.kind.type_name(), "registered field");
                if fields.contains_key(&descriptor.name) {
                    return Err(SchemaError::DuplicateField {
                        field: descriptor.name,
                    });
                }
                fields.insert(descriptor.name.clone(), descriptor);
                continue;
            }

            match &def.ty {
                FieldType::Struct(children) => {
                    for child in children {
                        let mut child_path = path.clone();
                        if def.embedded {
                            child_path.pop();
                        }
                        child_path.push(child.name.clone());
                        worklist.push(Pending {
                            path: child_path,
                            def: child,
                        });
                    }
                }
                _ if def.embedded => config.log(&format!(
                    "rql: ignore embedded field {:?} that is not a struct type",
                    def.name
                )),
                _ => {}
            }
        }

        tracing::debug!(resource = %resource.name, fields = fields.len(), "built field registry");
        Ok(FieldRegistry { fields })
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}

fn descriptor(
    path: &[String],
    def: &FieldDef,
    options: &str,
    config: &Config,
) -> Result<FieldDescriptor, SchemaError> {
    let mut name = path
        .iter()
        .map(|segment| (config.column_fn)(segment))
        .collect::<Vec<_>>()
        .join(&config.field_sep);
    let mut filterable = false;
    let mut sortable = false;
    let mut replace_with = None;
    let mut layout = None;

    for option in options.split(',').map(str::trim) {
        match option {
            "" => {}
            "filter" => filterable = true,
            "sort" => sortable = true,
            _ => match VALUED_OPTION.captures(option) {
                Some(caps) => {
                    let value = caps[2].to_string();
                    match &caps[1] {
                        "column" => name = value,
                        "replacewith" => replace_with = Some(value),
                        _ => {
                            layout = Some(Layout::new(&value).map_err(|message| {
                                SchemaError::Layout {
                                    field: def.name.clone(),
                                    message,
                                }
                            })?)
                        }
                    }
                }
                None => config.log(&format!(
                    "rql: unknown option {:?} in struct tag of field {:?}",
                    option, def.name
                )),
            },
        }
    }

    let (kind, nullable) = resolve_kind(&def.ty, layout).ok_or_else(|| {
        SchemaError::UnsupportedType {
            field: def.name.clone(),
            ty: def.ty.to_string(),
        }
    })?;

    Ok(FieldDescriptor {
        name,
        replace_with,
        filterable,
        sortable,
        kind,
        nullable,
    })
}

/// Kind of a tagged field, and whether it is nullable. `None` for types
/// queries cannot compare against.
fn resolve_kind(ty: &FieldType, layout: Option<Layout>) -> Option<(FieldKind, bool)> {
    match ty {
        FieldType::Nullable(inner) => match inner.as_ref() {
            FieldType::Nullable(_) => None,
            inner => scalar_kind(inner, layout).map(|kind| (kind, true)),
        },
        FieldType::Slice(inner) => match inner.as_ref() {
            FieldType::String => Some((FieldKind::Strings, false)),
            _ => None,
        },
        ty => scalar_kind(ty, layout).map(|kind| (kind, false)),
    }
}

fn scalar_kind(ty: &FieldType, layout: Option<Layout>) -> Option<FieldKind> {
    let kind = match ty {
        FieldType::Bool => FieldKind::Bool,
        FieldType::String => FieldKind::String,
        FieldType::I8 => FieldKind::Int(Width::W8),
        FieldType::I16 => FieldKind::Int(Width::W16),
        FieldType::I32 => FieldKind::Int(Width::W32),
        FieldType::I64 | FieldType::Isize => FieldKind::Int(Width::W64),
        FieldType::U8 => FieldKind::Uint(Width::W8),
        FieldType::U16 => FieldKind::Uint(Width::W16),
        FieldType::U32 => FieldKind::Uint(Width::W32),
        FieldType::U64 | FieldType::Usize => FieldKind::Uint(Width::W64),
        FieldType::F32 => FieldKind::Float(FloatWidth::F32),
        FieldType::F64 => FieldKind::Float(FloatWidth::F64),
        FieldType::Decimal => FieldKind::Decimal,
        FieldType::Time => FieldKind::Time(layout.unwrap_or_default()),
        FieldType::Slice(_)
        | FieldType::Nullable(_)
        | FieldType::Struct(_)
        | FieldType::Opaque(_) => return None,
    };
    Some(kind)
}
