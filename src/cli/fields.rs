//! Describe the queryable fields of a resource

use std::fs;

use serde_json::json;

use super::CliError;
use crate::schema::{FieldKind, FieldRegistry, Resource};
use crate::Config;

/// Reads a JSON resource description.
pub fn load_resource(path: &str) -> Result<Resource, CliError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// One JSON object per queryable field, sorted by name.
pub fn describe_fields(resource: &Resource) -> Result<serde_json::Value, CliError> {
    let registry = FieldRegistry::build(resource, &Config::default())?;
    let mut fields: Vec<_> = registry.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let described = fields
        .into_iter()
        .map(|f| {
            let layout = match &f.kind {
                FieldKind::Time(layout) => Some(layout.as_str()),
                _ => None,
            };
            json!({
                "name": f.name,
                "replace_with": f.replace_with,
                "type": f.kind.type_name(),
                "nullable": f.nullable,
                "filter": f.filterable,
                "sort": f.sortable,
                "layout": layout,
            })
        })
        .collect();
    Ok(serde_json::Value::Array(described))
}
