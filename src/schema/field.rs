use std::str::FromStr;

use rust_decimal::Decimal;

use super::layout::Layout;
use crate::value::Value;

/// Value family of a field, selecting how its literals are validated and
/// converted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    String,
    Int(Width),
    Uint(Width),
    Float(FloatWidth),
    Decimal,
    /// Slice of strings; each literal is one member
    Strings,
    Time(Layout),
}

/// Bit width of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    fn signed_range(self) -> (i64, i64) {
        match self {
            Width::W8 => (i8::MIN.into(), i8::MAX.into()),
            Width::W16 => (i16::MIN.into(), i16::MAX.into()),
            Width::W32 => (i32::MIN.into(), i32::MAX.into()),
            Width::W64 => (i64::MIN, i64::MAX),
        }
    }

    fn unsigned_max(self) -> u64 {
        match self {
            Width::W8 => u8::MAX.into(),
            Width::W16 => u16::MAX.into(),
            Width::W32 => u32::MAX.into(),
            Width::W64 => u64::MAX,
        }
    }
}

/// Precision of a floating point field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::F32 => 32,
            FloatWidth::F64 => 64,
        }
    }
}

/// Schema metadata for one queryable field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Name clients use in queries
    pub name: String,
    /// Substituted for `name` in the validated tree
    pub replace_with: Option<String>,
    pub filterable: bool,
    pub sortable: bool,
    pub kind: FieldKind,
    /// Accepts the literal `null`
    pub nullable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            replace_with: None,
            filterable: false,
            sortable: false,
            kind,
            nullable: false,
        }
    }

    /// Name the validated tree uses for this field.
    pub fn output_name(&self) -> &str {
        self.replace_with.as_deref().unwrap_or(&self.name)
    }

    /// Converts a raw literal into the field's typed value.
    pub fn convert(&self, literal: &str) -> Result<Value, String> {
        if self.nullable && literal == "null" {
            return Ok(Value::Null);
        }
        let value = match &self.kind {
            FieldKind::Bool => Value::Bool(parse_bool(literal)?),
            FieldKind::String | FieldKind::Strings => Value::String(literal.to_string()),
            FieldKind::Int(_) => Value::Int(
                literal
                    .parse()
                    .map_err(|e| format!("invalid integer {:?}: {}", literal, e))?,
            ),
            FieldKind::Uint(_) => {
                if literal.starts_with('-') {
                    return Err(format!("{:?} is not an unsigned integer", literal));
                }
                Value::Uint(
                    literal
                        .parse()
                        .map_err(|e| format!("invalid unsigned integer {:?}: {}", literal, e))?,
                )
            }
            FieldKind::Float(_) => Value::Float(
                literal
                    .parse()
                    .map_err(|e| format!("invalid float {:?}: {}", literal, e))?,
            ),
            FieldKind::Decimal => Value::Decimal(
                Decimal::from_str(literal)
                    .map_err(|e| format!("invalid decimal {:?}: {}", literal, e))?,
            ),
            FieldKind::Time(layout) => Value::Time(layout.parse(literal).map_err(|e| {
                format!("{:?} does not match layout {:?}: {}", literal, layout.as_str(), e)
            })?),
        };
        self.validate(&value)?;
        Ok(value)
    }

    /// Checks that a value has the field's type and fits its range.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match (&self.kind, value) {
            (_, Value::Null) if self.nullable => Ok(()),
            (FieldKind::Bool, Value::Bool(_)) => Ok(()),
            (FieldKind::String | FieldKind::Strings, Value::String(_)) => Ok(()),
            (FieldKind::Int(width), Value::Int(n)) => {
                let (min, max) = width.signed_range();
                if *n < min || *n > max {
                    return Err(format!("{} overflows a {}-bit integer", n, width.bits()));
                }
                Ok(())
            }
            (FieldKind::Uint(width), Value::Uint(n)) => {
                if *n > width.unsigned_max() {
                    return Err(format!(
                        "{} overflows a {}-bit unsigned integer",
                        n,
                        width.bits()
                    ));
                }
                Ok(())
            }
            (FieldKind::Float(width), Value::Float(n)) => {
                let too_wide = *width == FloatWidth::F32 && n.abs() > f64::from(f32::MAX);
                if !n.is_finite() || too_wide {
                    return Err(format!(
                        "{} is out of range for a {}-bit float",
                        n,
                        width.bits()
                    ));
                }
                Ok(())
            }
            (FieldKind::Decimal, Value::Decimal(_)) => Ok(()),
            (FieldKind::Time(_), Value::Time(_)) => Ok(()),
            (kind, value) => Err(format!(
                "expect <{}>, got <{}>",
                kind.type_name(),
                value.type_name()
            )),
        }
    }
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Int(_) => "int",
            FieldKind::Uint(_) => "uint",
            FieldKind::Float(_) => "float",
            FieldKind::Decimal => "decimal",
            FieldKind::Strings => "strings",
            FieldKind::Time(_) => "time",
        }
    }
}

fn parse_bool(literal: &str) -> Result<bool, String> {
    match literal {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("invalid boolean {:?}", literal)),
    }
}
