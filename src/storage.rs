//! Settings file formats
//!
//! A settings file holds one table per setting group:
//!
//! ```json
//! {
//!   "main": { "file_extension": "jpg", "autocrop": true },
//!   "gui": { "dialog_position": [120, 80] }
//! }
//! ```
//!
//! A [`StorageBackend`] only turns that document into text and back. Reading
//! and writing the file itself is done by [`FileSource`](crate::FileSource).

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Settings document: group name to that group's stored values
pub type GroupDocument = Map<String, Value>;

/// Text encoding of a settings file
pub trait StorageBackend: Clone {
    /// File extension of the format, used for the default file name
    fn extension(&self) -> &str;

    fn encode(&self, document: &GroupDocument) -> Result<String>;

    /// Parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or a group entry is not a table.
    fn decode(&self, content: &str) -> Result<GroupDocument>;
}

/// Every top-level entry of a settings file must be a group table.
fn check_groups(document: GroupDocument) -> Result<GroupDocument> {
    if let Some((group, _)) = document.iter().find(|(_, values)| !values.is_object()) {
        return Err(Error::Parse(format!("group '{group}' is not a table")));
    }
    Ok(document)
}

// =============================================================================
// JSON
// =============================================================================

/// JSON settings file (default)
#[derive(Debug, Clone)]
pub struct JsonStorage {
    pretty: bool,
}

impl Default for JsonStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStorage {
    /// Indented output, one setting per line
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn encode(&self, document: &GroupDocument) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(text)
    }

    fn decode(&self, content: &str) -> Result<GroupDocument> {
        if content.trim().is_empty() {
            return Ok(GroupDocument::new());
        }
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Object(document) => check_groups(document),
            _ => Err(Error::Parse("settings file must hold a table of groups".into())),
        }
    }
}

// =============================================================================
// TOML
// =============================================================================

/// TOML settings file
///
/// TOML has no null. Null entries are left out when encoding, so such a
/// setting falls back to its default on the next load.
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl TomlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "toml")]
fn without_nulls(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(without_nulls).collect())),
        Value::Object(entries) => Some(Value::Object(
            entries
                .iter()
                .filter_map(|(k, v)| without_nulls(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn encode(&self, document: &GroupDocument) -> Result<String> {
        let document = without_nulls(&Value::Object(document.clone()))
            .unwrap_or_else(|| Value::Object(GroupDocument::new()));
        toml::to_string_pretty(&document).map_err(|e| Error::Parse(e.to_string()))
    }

    fn decode(&self, content: &str) -> Result<GroupDocument> {
        let document: GroupDocument =
            toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        check_groups(document)
    }
}

// =============================================================================
// Tests
// =============================================================================
