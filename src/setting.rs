//! Runtime state of a single setting

use crate::config::{SettingMetadata, SettingType};
use crate::error::{Error, Result};
use crate::validation::{DirectoryValidator, FileExtensionValidator, StringValidator};
use indexmap::IndexMap;
use serde_json::Value;

/// A declared setting together with its current value, enabled flag and
/// error-message table.
///
/// Values are changed through [`SettingGroup`](crate::SettingGroup) so that
/// streamline rules run; a `Setting` on its own is read-only to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    name: String,
    metadata: SettingMetadata,
    value: Value,
    enabled: bool,
    error_messages: IndexMap<String, String>,
}

impl Setting {
    pub(crate) fn new(name: impl Into<String>, metadata: SettingMetadata) -> Self {
        Self {
            name: name.into(),
            value: metadata.default.clone(),
            enabled: metadata.enabled,
            error_messages: metadata.error_messages.clone(),
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &SettingMetadata {
        &self.metadata
    }

    pub fn setting_type(&self) -> SettingType {
        self.metadata.setting_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn default_value(&self) -> &Value {
        &self.metadata.default
    }

    /// Whether the current value equals the declared default
    pub fn is_default(&self) -> bool {
        self.value == self.metadata.default
    }

    /// Whether the setting is editable / taken into account by the export
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Display name, falling back to the setting name
    pub fn display_name(&self) -> &str {
        self.metadata.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Host code of the currently selected option (enumerated settings only)
    pub fn option_code(&self) -> Option<i64> {
        self.as_str()
            .and_then(|key| self.metadata.option(key))
            .and_then(|option| option.code)
    }

    /// Display label of the currently selected option (enumerated settings only)
    pub fn option_label(&self) -> Option<&str> {
        self.as_str()
            .and_then(|key| self.metadata.option(key))
            .map(|option| option.label.as_str())
    }

    pub fn error_messages(&self) -> &IndexMap<String, String> {
        &self.error_messages
    }

    pub fn error_message(&self, kind: &str) -> Option<&str> {
        self.error_messages.get(kind).map(String::as_str)
    }

    // =========================================================================
    // Mutation (crate-internal, driven by SettingGroup)
    // =========================================================================

    /// Store a new value after checking it against the setting type.
    ///
    /// Returns the previous value.
    pub(crate) fn store(&mut self, value: Value) -> Result<Value> {
        self.metadata
            .validate(&value)
            .map_err(|reason| Error::InvalidSettingValue {
                key: self.name.clone(),
                reason,
            })?;
        Ok(std::mem::replace(&mut self.value, value))
    }

    /// Put back a value previously returned by [`store`](Self::store)
    pub(crate) fn restore(&mut self, value: Value) {
        self.value = value;
    }

    /// Returns `true` if the flag changed
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    pub(crate) fn set_error_message(&mut self, kind: impl Into<String>, message: impl Into<String>) {
        self.error_messages.insert(kind.into(), message.into());
    }

    /// Restore default value, initial enabled flag and error-message table
    pub(crate) fn reset(&mut self) {
        self.value = self.metadata.default.clone();
        self.enabled = self.metadata.enabled;
        self.error_messages = self.metadata.error_messages.clone();
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the current value's content.
    ///
    /// Only file extension and directory settings have content rules. Every
    /// failure is reported: each message comes from the error-message table
    /// when a non-empty entry exists for the failure kind, otherwise the
    /// validator's own message is used. Messages are joined by newlines and
    /// the error carries the kind of the first failure.
    pub fn validate(&self) -> Result<()> {
        let text = self.as_str().unwrap_or_default();
        let failures = match self.setting_type() {
            SettingType::FileExtension => FileExtensionValidator.failures(text),
            SettingType::Directory => DirectoryValidator.failures(text),
            _ => return Ok(()),
        };

        let Some(first) = failures.first() else {
            return Ok(());
        };
        let kind = first.kind.to_string();
        let message = failures
            .into_iter()
            .map(|failure| match self.error_message(failure.kind) {
                Some(message) if !message.is_empty() => message.to_string(),
                _ => failure.default_message,
            })
            .collect::<Vec<_>>()
            .join("\n");

        Err(Error::ValidationFailed {
            key: self.name.clone(),
            kind,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::opt;
    use crate::validation::kind;
    use serde_json::json;

    #[test]
    fn test_new_setting_uses_defaults() {
        let setting = Setting::new("autocrop", SettingMetadata::boolean(false).disabled());
        assert_eq!(setting.value(), &json!(false));
        assert!(!setting.is_enabled());
        assert!(setting.is_default());
        assert_eq!(setting.display_name(), "autocrop");
    }

    #[test]
    fn test_store_rejects_wrong_type() {
        let mut setting = Setting::new(
            "strip_mode",
            SettingMetadata::enumerated("never", vec![opt("never", "Never")]),
        );
        let err = setting.store(json!("always")).unwrap_err();
        assert!(matches!(err, Error::InvalidSettingValue { .. }));
        assert_eq!(setting.as_str(), Some("never"));
    }

    #[test]
    fn test_validate_uses_override_message() {
        let mut setting = Setting::new("file_extension", SettingMetadata::file_extension(""));
        let err = setting.validate().unwrap_err();
        assert_eq!(err.validation_message(), Some("File extension is not specified."));

        setting.set_error_message(kind::IS_EMPTY, "Need a default");
        let err = setting.validate().unwrap_err();
        assert_eq!(err.validation_message(), Some("Need a default"));

        setting.set_error_message(kind::IS_EMPTY, "");
        let err = setting.validate().unwrap_err();
        assert_eq!(err.validation_message(), Some("File extension is not specified."));
    }

    #[test]
    fn test_validate_reports_every_failure() {
        let mut setting = Setting::new("output_directory", SettingMetadata::directory("\t"));
        let err = setting.validate().unwrap_err();

        assert!(matches!(err, Error::ValidationFailed { kind: ref failed, .. } if failed == kind::IS_EMPTY));
        assert_eq!(
            err.validation_message(),
            Some("Directory is not specified.\nDirectory \"\t\" contains invalid characters.")
        );

        setting.set_error_message(kind::HAS_INVALID_CHARACTERS, "Bad path");
        let err = setting.validate().unwrap_err();
        assert_eq!(
            err.validation_message(),
            Some("Directory is not specified.\nBad path")
        );
    }

    #[test]
    fn test_reset_restores_error_messages() {
        let mut setting = Setting::new(
            "file_extension",
            SettingMetadata::file_extension("png").error_message(kind::DEFAULT_NEEDED, "x"),
        );
        setting.set_error_message(kind::IS_EMPTY, "y");
        setting.store(json!("jpg")).unwrap();
        setting.reset();

        assert_eq!(setting.as_str(), Some("png"));
        assert_eq!(setting.error_message(kind::IS_EMPTY), None);
        assert_eq!(setting.error_message(kind::DEFAULT_NEEDED), Some("x"));
    }
}
