//! Assembly of the upload document from session metadata, fields and pushed values.

use serde_json::{Map, Number, Value as JsonValue};

use crate::errors::BuildError;
use crate::types::{Credential, FieldDescriptor, FieldType, UploadDocument};
use crate::values::FieldValues;

/// Contributor name used when none was set.
pub const DEFAULT_CONTRIBUTOR_NAME: &str = "cURL";

/// Everything the builder reads. Borrowed from a session, or assembled by hand.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a>
{
    pub project_id: Option<&'a str>,
    pub title: Option<&'a str>,
    pub credential: Option<&'a Credential>,
    /// Label shown next to the contribution; falls back to `default_contributor_name`
    pub contributor_name: Option<&'a str>,
    pub default_contributor_name: &'a str,
    /// Target dataset when appending
    pub dataset_id: Option<&'a str>,
    pub fields: &'a [FieldDescriptor],
    pub values: &'a FieldValues,
}

/// Builds the document for `request`.
///
/// Checks run in a fixed order: project ID, title, credential, fields, values.
/// Every field of the project needs at least one value; number fields only
/// accept numeric text. Nothing is returned unless every check passes.
pub fn build(request: &BuildRequest<'_>) -> Result<UploadDocument, BuildError>
{
    if is_blank(request.project_id) {
        return Err(BuildError::MissingProjectID);
    }
    let title = request.title.filter(|t| !t.trim().is_empty()).ok_or(BuildError::MissingTitle)?;
    let credential = request
        .credential
        .filter(|c| c.is_complete())
        .ok_or(BuildError::MissingCredential)?;
    if request.fields.is_empty() {
        return Err(BuildError::SchemaNotLoaded);
    }
    if request.values.is_empty() {
        return Err(BuildError::NoData);
    }

    let contributor_name = request
        .contributor_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(request.default_contributor_name);

    let mut data = Map::new();
    for field in request.fields {
        let values = request
            .values
            .get(&field.name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BuildError::FieldHasNoData(field.name.clone()))?;

        let array = values
            .iter()
            .map(|value| convert_value(field, value))
            .collect::<Result<Vec<_>, _>>()?;

        data.insert(field.id.clone(), JsonValue::Array(array));
    }

    let contribution_key = match credential {
        Credential::Key(key) => Some(key.as_str()),
        Credential::Account { .. } => None,
    };

    Ok(UploadDocument::new(
        title,
        contribution_key,
        contributor_name,
        request.dataset_id,
        data,
    ))
}

fn is_blank(value: Option<&str>) -> bool
{
    value.map_or(true, |v| v.trim().is_empty())
}

fn convert_value(field: &FieldDescriptor, value: &str) -> Result<JsonValue, BuildError>
{
    match field.field_type {
        FieldType::Number => parse_number(value).map(JsonValue::Number).ok_or_else(|| {
            BuildError::InvalidNumber {
                field: field.name.clone(),
                value: value.to_string(),
            }
        }),
        FieldType::Timestamp | FieldType::Text | FieldType::Latitude | FieldType::Longitude => {
            Ok(JsonValue::String(value.to_string()))
        }
    }
}

/// Integers stay integers; anything else must be a finite float.
///
/// Integers outside the i64/u64 range are rejected rather than rounded.
fn parse_number(text: &str) -> Option<Number>
{
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(int) = text.parse::<u64>() {
        return Some(Number::from(int));
    }
    if is_integer_text(text) {
        return None;
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn is_integer_text(text: &str) -> bool
{
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
