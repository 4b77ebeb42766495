//! Client-side accumulation of values awaiting upload.

use std::collections::BTreeMap;

/// Values pushed per field name, each field keeping its push order.
///
/// Nothing is checked against the project's fields here; the document
/// builder validates names and types when the upload is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues
{
    values: BTreeMap<String, Vec<String>>,
}

impl FieldValues
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Appends `value` to the sequence for `field_name`, creating it if needed.
    pub fn push(&mut self, field_name: impl Into<String>, value: impl Into<String>)
    {
        self.values.entry(field_name.into()).or_default().push(value.into());
    }

    /// Values pushed for `field_name`, in push order.
    pub fn get(&self, field_name: &str) -> Option<&[String]>
    {
        self.values.get(field_name).map(Vec::as_slice)
    }

    pub fn clear(&mut self)
    {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool
    {
        self.values.is_empty()
    }

    /// Number of distinct field names with pushed values.
    pub fn len(&self) -> usize
    {
        self.values.len()
    }

    /// Field names and their values, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])>
    {
        self.values.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
