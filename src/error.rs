//! Error types for the settings registry

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the settings registry
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Schema Errors (fatal at registration time)
    // -------------------------------------------------------------------------
    #[error("Invalid schema for '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },

    #[error("Streamline rule for '{trigger}' tried to modify undeclared setting '{target}'")]
    UndeclaredDependent { trigger: String, target: String },

    // -------------------------------------------------------------------------
    // Settings Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("Setting group not found: {0}")]
    GroupNotFound(String),

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    #[error("Validation of '{key}' failed ({kind}): {message}")]
    ValidationFailed {
        key: String,
        kind: String,
        message: String,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SettingNotFound(_) | Error::GroupNotFound(_))
    }

    /// Check if this error was raised while declaring settings or rules
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSchema { .. } | Error::UndeclaredDependent { .. }
        )
    }

    /// The human-readable message of a validation failure, if this is one
    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            Error::ValidationFailed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn schema(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSchema {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        assert!(Error::SettingNotFound("autocrop".into()).is_not_found());
        assert!(Error::schema("strip_mode", "duplicate").is_schema_error());
        assert!(
            Error::UndeclaredDependent {
                trigger: "autocrop".into(),
                target: "image".into(),
            }
            .is_schema_error()
        );
        assert!(!Error::Config("x".into()).is_schema_error());
    }

    #[test]
    fn test_validation_message() {
        let err = Error::ValidationFailed {
            key: "file_extension".into(),
            kind: "is_empty".into(),
            message: "needed".into(),
        };
        assert_eq!(err.validation_message(), Some("needed"));
        assert_eq!(Error::Parse("bad".into()).validation_message(), None);
    }
}
