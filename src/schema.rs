//! Parsing of the field list returned by `GET /projects/{id}`.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use crate::errors::SchemaError;
use crate::types::{FieldDescriptor, FieldType, Project};

/// Parses a JSON array of field objects into descriptors, keeping the array order.
///
/// Each object must carry an `id` (string, or an integer which is kept as its
/// decimal text), a `name` string and an integer `type` between 1 and 5.
/// IDs must be unique within the list.
pub fn load(raw: &[u8]) -> Result<Vec<FieldDescriptor>, SchemaError>
{
    let json = parse_json(raw)?;
    parse_fields(&json)
}

/// Parses a full project response, `{ "name": ..., "fields": [...], ... }`.
///
/// Only the project name and its fields are kept; other metadata is ignored.
pub fn load_project(raw: &[u8]) -> Result<Project, SchemaError>
{
    let json = parse_json(raw)?;

    if !json.is_object() {
        return Err(SchemaError::Malformed {
            details: "expected a project object".to_string(),
        });
    }

    let fields = json.get("fields").ok_or(SchemaError::MissingField {
        index: None,
        field: "fields",
    })?;

    Ok(Project {
        name: json["name"].as_str().map(str::to_string),
        fields: parse_fields(fields)?,
    })
}

fn parse_json(raw: &[u8]) -> Result<JsonValue, SchemaError>
{
    serde_json::from_slice(raw).map_err(|e| SchemaError::Malformed {
        details: format!("invalid JSON: {}", e),
    })
}

fn parse_fields(json: &JsonValue) -> Result<Vec<FieldDescriptor>, SchemaError>
{
    let entries = json.as_array().ok_or_else(|| SchemaError::Malformed {
        details: "expected an array of fields".to_string(),
    })?;

    // Upload documents are keyed by ID, so a repeated ID would drop a field's values
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let field = parse_field(index, entry)?;
        if !seen.insert(field.id.clone()) {
            return Err(SchemaError::Malformed {
                details: format!("field #{} repeats the id '{}'", index, field.id),
            });
        }
        fields.push(field);
    }

    Ok(fields)
}

fn parse_field(index: usize, entry: &JsonValue) -> Result<FieldDescriptor, SchemaError>
{
    let object = entry.as_object().ok_or_else(|| SchemaError::Malformed {
        details: format!("field #{} is not an object", index),
    })?;

    let missing = |field| SchemaError::MissingField {
        index: Some(index),
        field,
    };

    // The service has sent IDs both as strings and as bare numbers
    let id = match object.get("id") {
        Some(JsonValue::String(id)) => id.clone(),
        Some(JsonValue::Number(id)) => id.to_string(),
        Some(other) => {
            return Err(SchemaError::Malformed {
                details: format!("field #{} has a non-string id {}", index, other),
            })
        }
        None => return Err(missing("id")),
    };

    let name = match object.get("name") {
        Some(JsonValue::String(name)) => name.clone(),
        Some(other) => {
            return Err(SchemaError::Malformed {
                details: format!("field #{} has a non-string name {}", index, other),
            })
        }
        None => return Err(missing("name")),
    };

    let code = object.get("type").ok_or_else(|| missing("type"))?;
    let field_type = code
        .as_u64()
        .and_then(FieldType::from_code)
        .ok_or_else(|| SchemaError::UnknownType {
            index,
            code: code.to_string(),
        })?;

    Ok(FieldDescriptor { id, name, field_type })
}

