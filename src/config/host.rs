//! Values supplied by the plug-in host
//!
//! The settings schema never hard-codes host constants. Numeric codes for run
//! modes and overwrite modes, and the default output directory, are asked for
//! through [`HostEnvironment`] when the groups are built.

use crate::plugin::{OverwriteMode, RunMode};
use std::path::PathBuf;

/// Host-provided constants and directories
pub trait HostEnvironment {
    /// Directory exports go to unless the user picks another one
    fn default_output_directory(&self) -> PathBuf;

    /// Host code for a run mode
    fn run_mode_code(&self, mode: RunMode) -> i64;

    /// Export engine code for an overwrite mode
    fn overwrite_mode_code(&self, mode: OverwriteMode) -> i64;
}

/// Host environment using the user's documents directory and ordinal codes
#[derive(Debug, Clone, Default)]
pub struct DefaultHost {
    output_directory: Option<PathBuf>,
}

impl DefaultHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default output directory
    #[must_use]
    pub fn with_output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(path.into());
        self
    }
}

impl HostEnvironment for DefaultHost {
    fn default_output_directory(&self) -> PathBuf {
        self.output_directory
            .clone()
            .or_else(dirs::document_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn run_mode_code(&self, mode: RunMode) -> i64 {
        match mode {
            RunMode::Interactive => 0,
            RunMode::NonInteractive => 1,
            RunMode::RunWithLastVals => 2,
        }
    }

    fn overwrite_mode_code(&self, mode: OverwriteMode) -> i64 {
        match mode {
            OverwriteMode::Replace => 0,
            OverwriteMode::Skip => 1,
            OverwriteMode::RenameNew => 2,
            OverwriteMode::RenameExisting => 3,
            OverwriteMode::Cancel => 4,
        }
    }
}
