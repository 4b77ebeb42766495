//! Shared type definitions for project schemas, credentials and upload documents.
//!
//! These types are the stable interface between the schema parser (which
//! produces descriptors), the document builder and the session.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// The type of a project field, as encoded by the service's integer `type` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType
{
    Timestamp,
    Number,
    Text,
    Latitude,
    Longitude,
}

impl FieldType
{
    /// Maps a service type code (1-5) to a field type.
    pub fn from_code(code: u64) -> Option<Self>
    {
        match code {
            1 => Some(Self::Timestamp),
            2 => Some(Self::Number),
            3 => Some(Self::Text),
            4 => Some(Self::Latitude),
            5 => Some(Self::Longitude),
            _ => None,
        }
    }

    /// The service's integer code for this type.
    pub fn code(self) -> u64
    {
        match self {
            Self::Timestamp => 1,
            Self::Number => 2,
            Self::Text => 3,
            Self::Latitude => 4,
            Self::Longitude => 5,
        }
    }
}

impl fmt::Display for FieldType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            Self::Timestamp => "timestamp",
            Self::Number => "number",
            Self::Text => "text",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        };
        f.write_str(name)
    }
}

/// One field of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor
{
    /// Opaque field ID, kept verbatim. Upload documents are keyed by it.
    pub id: String,
    /// Human readable name, used to look up pushed values.
    pub name: String,
    /// The field's type.
    pub field_type: FieldType,
}

/// A fetched project: its name (when the service reports one) and its ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project
{
    pub name: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

/// How a contributor identifies itself to the service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential
{
    /// A project contributor key
    Key(String),
    /// An iSENSE account
    Account
    {
        email: String,
        password: String,
    },
}

impl Credential
{
    /// Whether every part of the credential has been filled in.
    pub fn is_complete(&self) -> bool
    {
        match self {
            Self::Key(key) => !key.trim().is_empty(),
            Self::Account { email, password } => !email.trim().is_empty() && !password.is_empty(),
        }
    }
}

// Keeps secrets out of debug output and logs.
impl fmt::Debug for Credential
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Key(_) => f.debug_tuple("Key").field(&"********").finish(),
            Self::Account { email, .. } => f
                .debug_struct("Account")
                .field("email", email)
                .field("password", &"********")
                .finish(),
        }
    }
}

/// The JSON payload posted to the service.
///
/// ```json
/// { "title": "...", "contribution_key": "...", "contributor_name": "...", "data": { "<field id>": [...] } }
/// ```
///
/// Append documents additionally carry the target dataset `id`. Object keys are
/// serialized in sorted order, so identical inputs give identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UploadDocument
{
    value: JsonValue,
}

impl UploadDocument
{
    pub(crate) fn new(
        title: &str,
        contribution_key: Option<&str>,
        contributor_name: &str,
        dataset_id: Option<&str>,
        data: Map<String, JsonValue>,
    ) -> Self
    {
        let mut root = Map::new();
        root.insert("title".to_string(), JsonValue::from(title));
        if let Some(key) = contribution_key {
            root.insert("contribution_key".to_string(), JsonValue::from(key));
        }
        root.insert("contributor_name".to_string(), JsonValue::from(contributor_name));
        if let Some(id) = dataset_id {
            root.insert("id".to_string(), JsonValue::from(id));
        }
        root.insert("data".to_string(), JsonValue::Object(data));

        Self {
            value: JsonValue::Object(root),
        }
    }

    pub fn title(&self) -> &str
    {
        self.value["title"].as_str().unwrap_or_default()
    }

    pub fn contribution_key(&self) -> Option<&str>
    {
        self.value.get("contribution_key").and_then(JsonValue::as_str)
    }

    pub fn contributor_name(&self) -> &str
    {
        self.value["contributor_name"].as_str().unwrap_or_default()
    }

    /// Target dataset of an append document.
    pub fn dataset_id(&self) -> Option<&str>
    {
        self.value.get("id").and_then(JsonValue::as_str)
    }

    /// The `data` object: field ID to array of values.
    pub fn data(&self) -> Option<&Map<String, JsonValue>>
    {
        self.value.get("data").and_then(JsonValue::as_object)
    }

    /// Values uploaded for one field ID.
    pub fn field(&self, field_id: &str) -> Option<&Vec<JsonValue>>
    {
        self.data()?.get(field_id)?.as_array()
    }

    pub fn as_json(&self) -> &JsonValue
    {
        &self.value
    }

    /// Compact UTF-8 JSON text of the document.
    pub fn to_json_bytes(&self) -> Vec<u8>
    {
        self.value.to_string().into_bytes()
    }
}

impl fmt::Display for UploadDocument
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.value)
    }
}

/// A successful answer from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response
{
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response
{
    /// ID of the dataset the service created or appended to, when the body reports one.
    pub fn dataset_id(&self) -> Option<String>
    {
        let body: JsonValue = serde_json::from_slice(&self.body).ok()?;
        match &body["id"] {
            JsonValue::String(id) => Some(id.clone()),
            JsonValue::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn body_text(&self) -> String
    {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
