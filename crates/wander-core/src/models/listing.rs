//! Listing item model

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable server-provided key for a listing (Mongo-style string or numeric id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for ListingId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// An opaque listing record (place, guide, or photographer).
///
/// Only the key is interpreted; every other field is kept verbatim so screens
/// can render whatever the server sends. The key is `_id` when present, else
/// `id`. When a record carries both, `id` stays in `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ListingItem {
    pub id: ListingId,
    pub fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for ListingItem {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let raw = fields
            .remove("_id")
            .or_else(|| fields.remove("id"))
            .ok_or_else(|| "listing record has no `_id` or `id`".to_string())?;
        let id = serde_json::from_value(raw)
            .map_err(|error| format!("listing id must be a string or integer: {error}"))?;
        Ok(Self { id, fields })
    }
}

impl ListingItem {
    /// Create an item with no fields besides its id
    #[must_use]
    pub fn new(id: impl Into<ListingId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter, mostly useful in tests and fixtures
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Text rendering of a field for display and matching.
    ///
    /// Strings are returned as-is, numbers are formatted, and arrays of
    /// strings are joined with spaces. Other shapes yield `None`.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Array(values) => {
                let parts = values
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            _ => None,
        }
    }

    /// Display name (`name`, falling back to `title`)
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.text_field("name").or_else(|| self.text_field("title"))
    }

    /// Stored image path (`image`, falling back to the first of `images`)
    #[must_use]
    pub fn image_path(&self) -> Option<&str> {
        if let Some(path) = self.fields.get("image").and_then(Value::as_str) {
            return Some(path);
        }
        self.fields
            .get("images")
            .and_then(Value::as_array)
            .and_then(|images| images.first())
            .and_then(Value::as_str)
    }
}
