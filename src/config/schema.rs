//! Setting metadata and option types
//!
//! # Overview
//!
//! A [`SettingMetadata`] is the declaration of one setting: its semantic type,
//! default value, enumerated options, display strings and the flags that
//! control how the setting takes part in its group (initial enabled state,
//! group reset, procedure registration).
//!
//! Metadata is built with type-specific constructors followed by builder
//! methods:
//!
//! ```rust
//! use layer_export_settings::{SettingMetadata, opt};
//!
//! let autocrop = SettingMetadata::boolean(false)
//!     .display_name("Autocrop layers")
//!     .description("If enabled, layers will be autocropped before being exported.");
//!
//! // Enumerated settings require options at construction
//! let strip_mode = SettingMetadata::enumerated("identical", vec![
//!     opt("always", "Always strip file extension"),
//!     opt("identical", "Strip identical file extension"),
//!     opt("never", "Never strip file extension"),
//! ]);
//!
//! assert!(autocrop.validate_schema().is_ok());
//! assert!(strip_mode.validate_schema().is_ok());
//! ```
//!
//! # Schema Validation
//!
//! `validate_schema()` rejects declarations that can never hold a valid
//! value, most importantly an enumerated default that is not one of the
//! declared option keys:
//!
//! ```rust
//! use layer_export_settings::{SettingMetadata, opt};
//!
//! let invalid = SettingMetadata::enumerated("sideways", vec![opt("normal", "Normal")]);
//! assert!(invalid.validate_schema().is_err());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Setting Types
// =============================================================================

/// Semantic type of a setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    /// Boolean toggle
    Boolean,
    /// One of a fixed, ordered set of option keys
    Enumerated,
    /// File extension, with or without the leading period
    FileExtension,
    /// Directory path
    Directory,
    /// Opaque host image identifier (or null)
    Image,
    /// Any JSON value
    #[default]
    Generic,
}

impl SettingType {
    /// Lowercase name used in error messages
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Boolean => "boolean",
            SettingType::Enumerated => "enumerated",
            SettingType::FileExtension => "file_extension",
            SettingType::Directory => "directory",
            SettingType::Image => "image",
            SettingType::Generic => "generic",
        }
    }
}

// =============================================================================
// Setting Option
// =============================================================================

/// Option of an enumerated setting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingOption {
    /// Symbolic key stored as the setting value
    pub key: String,
    /// Display label
    pub label: String,
    /// Numeric code understood by the host, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl SettingOption {
    /// Create an option without a host code
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            code: None,
        }
    }

    /// Create an option carrying a host code
    pub fn with_code(key: impl Into<String>, label: impl Into<String>, code: i64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            code: Some(code),
        }
    }
}

/// Shorthand for creating a `SettingOption`
///
/// # Example
/// ```rust
/// use layer_export_settings::opt;
/// let options = vec![opt("normal", "Treat as normal layers"), opt("ignore", "Ignore")];
/// ```
pub fn opt(key: impl Into<String>, label: impl Into<String>) -> SettingOption {
    SettingOption::new(key, label)
}

// =============================================================================
// Setting Metadata
// =============================================================================

/// Declaration of a single setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingMetadata {
    /// Semantic type
    #[serde(rename = "type")]
    pub setting_type: SettingType,

    /// Default value
    pub default: Value,

    /// Options for enumerated settings, in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SettingOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Enabled flag the setting starts with and returns to on group reset
    pub enabled: bool,

    /// Whether a group reset restores this setting
    pub resettable_by_group: bool,

    /// Whether the setting is exposed as a plug-in procedure argument
    pub registrable: bool,

    /// Whether `validate_schema()` checks the default value
    pub validate_default: bool,

    /// Initial error-message table keyed by failure kind
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub error_messages: IndexMap<String, String>,
}

impl Default for SettingMetadata {
    fn default() -> Self {
        Self {
            setting_type: SettingType::Generic,
            default: Value::Null,
            options: None,
            display_name: None,
            description: None,
            enabled: true,
            resettable_by_group: true,
            registrable: true,
            validate_default: true,
            error_messages: IndexMap::new(),
        }
    }
}

impl SettingMetadata {
    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    /// Create a boolean setting
    pub fn boolean(default: bool) -> Self {
        Self {
            setting_type: SettingType::Boolean,
            default: Value::Bool(default),
            ..Default::default()
        }
    }

    /// Create an enumerated setting
    ///
    /// **Options are required** - the default must be one of their keys.
    pub fn enumerated(default: impl Into<String>, options: Vec<SettingOption>) -> Self {
        Self {
            setting_type: SettingType::Enumerated,
            default: Value::String(default.into()),
            options: Some(options),
            ..Default::default()
        }
    }

    /// Create a file extension setting
    pub fn file_extension(default: impl Into<String>) -> Self {
        Self {
            setting_type: SettingType::FileExtension,
            default: Value::String(default.into()),
            ..Default::default()
        }
    }

    /// Create a directory setting
    pub fn directory(default: impl Into<String>) -> Self {
        Self {
            setting_type: SettingType::Directory,
            default: Value::String(default.into()),
            ..Default::default()
        }
    }

    /// Create an image setting with no image selected
    pub fn image() -> Self {
        Self {
            setting_type: SettingType::Image,
            default: Value::Null,
            ..Default::default()
        }
    }

    /// Create a setting holding an arbitrary JSON value
    pub fn generic(default: Value) -> Self {
        Self {
            setting_type: SettingType::Generic,
            default,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Start out (and reset to) disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Exclude from group resets
    #[must_use]
    pub fn not_resettable(mut self) -> Self {
        self.resettable_by_group = false;
        self
    }

    /// Exclude from procedure argument registration
    #[must_use]
    pub fn not_registrable(mut self) -> Self {
        self.registrable = false;
        self
    }

    /// Skip default-value validation (for defaults only the host can supply)
    #[must_use]
    pub fn skip_default_validation(mut self) -> Self {
        self.validate_default = false;
        self
    }

    /// Add an entry to the initial error-message table
    #[must_use]
    pub fn error_message(mut self, kind: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_messages.insert(kind.into(), message.into());
        self
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Look up an option by key
    pub fn option(&self, key: &str) -> Option<&SettingOption> {
        self.options
            .as_ref()
            .and_then(|options| options.iter().find(|o| o.key == key))
    }

    /// Whether `key` is one of the declared option keys
    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check that `value` has the shape this setting type requires
    ///
    /// Checks:
    /// - Boolean settings hold booleans
    /// - Enumerated settings hold one of their option keys
    /// - File extension and directory settings hold strings
    /// - Image settings hold null or a non-negative integer id
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self.setting_type {
            SettingType::Boolean => {
                if !value.is_boolean() {
                    return Err("Value must be a boolean".to_string());
                }
            }
            SettingType::Enumerated => {
                let key = value
                    .as_str()
                    .ok_or_else(|| "Value must be an option key".to_string())?;
                if !self.has_option(key) {
                    return Err(format!("'{key}' is not one of the available options"));
                }
            }
            SettingType::FileExtension | SettingType::Directory => {
                if !value.is_string() {
                    return Err("Value must be a string".to_string());
                }
            }
            SettingType::Image => {
                if !value.is_null() && value.as_u64().is_none() {
                    return Err("Value must be an image id or null".to_string());
                }
            }
            SettingType::Generic => {}
        }
        Ok(())
    }

    /// Validate the declaration itself
    ///
    /// Checks:
    /// - Enumerated type has at least one option
    /// - Option keys are unique
    /// - Only enumerated settings declare options
    /// - Default value is valid (unless switched off)
    pub fn validate_schema(&self) -> Result<(), String> {
        match (&self.setting_type, &self.options) {
            (SettingType::Enumerated, None) => {
                return Err("Enumerated type must have options defined".to_string());
            }
            (SettingType::Enumerated, Some(options)) => {
                if options.is_empty() {
                    return Err("Enumerated type must have at least one option".to_string());
                }
                for (idx, option) in options.iter().enumerate() {
                    if options[..idx].iter().any(|o| o.key == option.key) {
                        return Err(format!("Duplicate option key '{}'", option.key));
                    }
                }
            }
            (other, Some(_)) => {
                return Err(format!("Type '{}' cannot declare options", other.as_str()));
            }
            (_, None) => {}
        }

        if self.validate_default {
            self.validate(&self.default)
                .map_err(|e| format!("Default value is invalid: {e}"))?;
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_builder() {
        let setting = SettingMetadata::boolean(true)
            .display_name("Ignore invisible layers")
            .description("Skip hidden layers")
            .not_resettable();

        assert_eq!(setting.setting_type, SettingType::Boolean);
        assert_eq!(setting.default, Value::Bool(true));
        assert_eq!(setting.display_name.as_deref(), Some("Ignore invisible layers"));
        assert!(setting.enabled);
        assert!(!setting.resettable_by_group);
        assert!(setting.registrable);
    }

    #[test]
    fn test_enumerated_validation() {
        let setting = SettingMetadata::enumerated(
            "normal",
            vec![opt("normal", "Normal"), opt("background", "Background")],
        );

        assert!(setting.validate(&json!("background")).is_ok());
        assert!(setting.validate(&json!("ignore")).is_err());
        assert!(setting.validate(&json!(1)).is_err());
    }

    #[test]
    fn test_option_codes() {
        let setting = SettingMetadata::enumerated(
            "skip",
            vec![
                SettingOption::with_code("replace", "Replace", 0),
                SettingOption::with_code("skip", "Skip", 1),
            ],
        );

        assert_eq!(setting.option("skip").and_then(|o| o.code), Some(1));
        assert!(setting.option("cancel").is_none());
    }

    #[test]
    fn test_image_validation() {
        let setting = SettingMetadata::image();
        assert!(setting.validate(&Value::Null).is_ok());
        assert!(setting.validate(&json!(7)).is_ok());
        assert!(setting.validate(&json!(-1)).is_err());
        assert!(setting.validate(&json!("7")).is_err());
    }

    #[test]
    fn test_schema_validation() {
        let invalid_default = SettingMetadata::enumerated("x", vec![opt("a", "A")]);
        assert!(invalid_default.validate_schema().is_err());

        let empty = SettingMetadata::enumerated("a", vec![]);
        assert!(empty.validate_schema().is_err());

        let duplicate =
            SettingMetadata::enumerated("a", vec![opt("a", "A"), opt("a", "Also A")]);
        assert!(
            duplicate
                .validate_schema()
                .unwrap_err()
                .contains("Duplicate")
        );

        let mut options_on_bool = SettingMetadata::boolean(false);
        options_on_bool.options = Some(vec![opt("a", "A")]);
        assert!(options_on_bool.validate_schema().is_err());
    }

    #[test]
    fn test_skip_default_validation() {
        let mut setting = SettingMetadata::boolean(false);
        setting.default = json!("not a bool");
        assert!(setting.validate_schema().is_err());
        assert!(setting.skip_default_validation().validate_schema().is_ok());
    }

    #[test]
    fn test_serialization() {
        let setting = SettingMetadata::file_extension("png")
            .display_name("File extension")
            .error_message("default_needed", "Specify a default");

        let json = serde_json::to_string(&setting).unwrap();
        let deserialized: SettingMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(setting, deserialized);
        assert!(json.contains("\"type\":\"file_extension\""));
    }
}
