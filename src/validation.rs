//! Value validators for path-like settings
//!
//! A validator checks a string and reports every failure as a named kind plus
//! a default message. Settings keep an error-message table keyed by the same
//! kinds so the message shown to the user can be overridden at runtime.

use regex::Regex;
use std::sync::LazyLock;

/// Well-known validation failure kinds and error-message table keys.
pub mod kind {
    /// The value is empty
    pub const IS_EMPTY: &str = "is_empty";
    /// The value contains characters not allowed in file names or paths
    pub const HAS_INVALID_CHARACTERS: &str = "has_invalid_characters";
    /// Message shown when a default file extension is required
    pub const DEFAULT_NEEDED: &str = "default_needed";
}

static FILE_EXTENSION_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\x00-\x1f\x7f\\/:*?"<>|]"#).expect("static regex"));

static DIRECTORY_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\x00-\x1f\x7f*?"<>|]"#).expect("static regex"));

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Failure kind (one of the [`kind`] constants)
    pub kind: &'static str,
    /// Message used when the setting does not override it
    pub default_message: String,
}

impl ValidationFailure {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            default_message: message.into(),
        }
    }
}

/// Validates a path-like string value
pub trait StringValidator {
    /// Return every failure found in `value`, empty if the value is valid
    fn failures(&self, value: &str) -> Vec<ValidationFailure>;

    fn is_valid(&self, value: &str) -> bool {
        self.failures(value).is_empty()
    }
}

/// Validator for file extensions, typed with or without the leading period
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtensionValidator;

impl StringValidator for FileExtensionValidator {
    fn failures(&self, value: &str) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        let extension = value.strip_prefix('.').unwrap_or(value);

        if extension.is_empty() {
            failures.push(ValidationFailure::new(
                kind::IS_EMPTY,
                "File extension is not specified.",
            ));
        }
        if FILE_EXTENSION_INVALID.is_match(extension) {
            failures.push(ValidationFailure::new(
                kind::HAS_INVALID_CHARACTERS,
                format!("File extension \"{value}\" contains invalid characters."),
            ));
        }
        failures
    }
}

/// Validator for directory paths
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryValidator;

impl StringValidator for DirectoryValidator {
    fn failures(&self, value: &str) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if value.trim().is_empty() {
            failures.push(ValidationFailure::new(
                kind::IS_EMPTY,
                "Directory is not specified.",
            ));
        }
        if DIRECTORY_INVALID.is_match(value) {
            failures.push(ValidationFailure::new(
                kind::HAS_INVALID_CHARACTERS,
                format!("Directory \"{value}\" contains invalid characters."),
            ));
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_valid() {
        let validator = FileExtensionValidator;
        assert!(validator.is_valid("png"));
        assert!(validator.is_valid(".jpg"));
        assert!(validator.is_valid("tar.gz"));
    }

    #[test]
    fn test_file_extension_empty() {
        let failures = FileExtensionValidator.failures("");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, kind::IS_EMPTY);

        // A lone period is still empty
        let failures = FileExtensionValidator.failures(".");
        assert_eq!(failures[0].kind, kind::IS_EMPTY);
    }

    #[test]
    fn test_file_extension_invalid_characters() {
        let failures = FileExtensionValidator.failures("pn/g");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, kind::HAS_INVALID_CHARACTERS);
        assert!(failures[0].default_message.contains("pn/g"));
    }

    #[test]
    fn test_directory_validator() {
        assert!(DirectoryValidator.is_valid("/home/user/Documents"));
        assert_eq!(DirectoryValidator.failures("  ")[0].kind, kind::IS_EMPTY);
        assert_eq!(
            DirectoryValidator.failures("/tmp/a?b")[0].kind,
            kind::HAS_INVALID_CHARACTERS
        );
    }
}
