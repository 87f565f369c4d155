//! Checks a hoisted tree against the configuration and the field registry,
//! converting literals to their fields' types along the way.

use crate::ast::{Arg, Node, RootNode};
use crate::config::Config;
use crate::error::RqlError;
use crate::schema::{FieldDescriptor, FieldRegistry};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field name (arg: {0}) is not filterable")]
    NotFilterable(String),
    #[error("field {0} is not sortable")]
    NotSortable(String),
    #[error("field {0} can not be selected")]
    NotSelectable(String),
    #[error("no field is found for node value {0}")]
    NoField(String),
    #[error("encounter field error: field {field}, value {value:?}: {message}")]
    Conversion {
        field: String,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid format for limit: {0}")]
    InvalidLimit(String),
    #[error("specified limit is less than zero")]
    NegativeLimit,
    #[error("specified limit {limit} is more than the max limit {max} allowed")]
    LimitTooLarge { limit: u64, max: u64 },
    #[error("invalid format for offset: {0}")]
    InvalidOffset(String),
    #[error("offset is less than zero")]
    NegativeOffset,
}

/// Checks `limit`, `offset`, `sort` and `select`. Sort and select fields are
/// only checked, and renamed, when a registry is given.
pub(crate) fn validate_special_ops(
    root: &mut RootNode,
    config: &Config,
    fields: Option<&FieldRegistry>,
) -> Result<(), RqlError> {
    if let Some(limit) = root.raw_limit() {
        let limit = count(limit).map_err(|e| match e {
            Count::Invalid(msg) => RangeError::InvalidLimit(msg),
            Count::Negative => RangeError::NegativeLimit,
        })?;
        if limit > config.limit_max_value {
            return Err(RangeError::LimitTooLarge {
                limit,
                max: config.limit_max_value,
            }
            .into());
        }
    }

    if let Some(offset) = root.raw_offset() {
        count(offset).map_err(|e| match e {
            Count::Invalid(msg) => RangeError::InvalidOffset(msg),
            Count::Negative => RangeError::NegativeOffset,
        })?;
    }

    let Some(fields) = fields else {
        return Ok(());
    };

    for sort in &mut root.sort {
        let field = fields
            .get(&sort.field)
            .filter(|f| f.sortable)
            .ok_or_else(|| FieldError::NotSortable(sort.field.clone()))?;
        sort.field = field.output_name().to_string();
    }

    for name in &mut root.select {
        let field = fields
            .get(name)
            .ok_or_else(|| FieldError::NotSelectable(name.clone()))?;
        *name = field.output_name().to_string();
    }

    Ok(())
}

enum Count {
    Invalid(String),
    Negative,
}

fn count(raw: &str) -> Result<u64, Count> {
    let n: i64 = raw.parse().map_err(|e| Count::Invalid(format!("{raw:?}: {e}")))?;
    u64::try_from(n).map_err(|_| Count::Negative)
}

/// Validates a predicate node and, recursively, its nested nodes.
///
/// The literal at position 0 names the field; every later literal is
/// converted with that field's converter.
pub(crate) fn validate_fields(node: &mut Node, fields: &FieldRegistry) -> Result<(), FieldError> {
    let mut field: Option<&FieldDescriptor> = None;

    for (i, arg) in node.args.iter_mut().enumerate() {
        match arg {
            Arg::Value(value) if i == 0 => {
                let name = value.to_string();
                let descriptor = fields
                    .get(&name)
                    .filter(|f| f.filterable)
                    .ok_or(FieldError::NotFilterable(name))?;
                *value = Value::String(descriptor.output_name().to_string());
                field = Some(descriptor);
            }
            Arg::Value(value) => {
                let descriptor = field.ok_or_else(|| FieldError::NoField(value.to_string()))?;
                *value = convert(descriptor, value)?;
            }
            Arg::Node(child) => match field {
                Some(descriptor) if child.is_group() => convert_group(child, descriptor)?,
                _ => validate_fields(child, fields)?,
            },
        }
    }
    Ok(())
}

/// An array literal belongs to the field of the node holding it.
fn convert_group(group: &mut Node, field: &FieldDescriptor) -> Result<(), FieldError> {
    for (i, arg) in group.args.iter_mut().enumerate() {
        match arg {
            Arg::Value(value) if i == 0 => {
                *value = Value::String(field.output_name().to_string());
            }
            Arg::Value(value) => *value = convert(field, value)?,
            Arg::Node(nested) => return Err(FieldError::NoField(nested.to_string())),
        }
    }
    Ok(())
}

fn convert(field: &FieldDescriptor, value: &Value) -> Result<Value, FieldError> {
    let result = match value {
        Value::String(raw) => field.convert(raw),
        other => field.validate(other).map(|()| other.clone()),
    };
    result.map_err(|message| FieldError::Conversion {
        field: field.name.clone(),
        value: value.to_string(),
        message,
    })
}
