//! Host Integration Tests
//!
//! Tests for the boundary with the host:
//! - Injected run-mode and overwrite-mode codes
//! - Procedure argument descriptors

mod common;

use common::TestFixture;
use layer_export_settings::plugin::{OverwriteMode, RunMode};
use layer_export_settings::{HostEnvironment, ParamType, PluginSettings};
use std::path::PathBuf;

/// Host with non-ordinal engine constants
struct OffsetHost;

impl HostEnvironment for OffsetHost {
    fn default_output_directory(&self) -> PathBuf {
        PathBuf::from("/srv/exports")
    }

    fn run_mode_code(&self, mode: RunMode) -> i64 {
        100 + RunMode::ALL.iter().position(|m| *m == mode).unwrap_or(0) as i64
    }

    fn overwrite_mode_code(&self, mode: OverwriteMode) -> i64 {
        match mode {
            OverwriteMode::Replace => 10,
            OverwriteMode::Skip => 20,
            OverwriteMode::RenameNew => 30,
            OverwriteMode::RenameExisting => 40,
            OverwriteMode::Cancel => 50,
        }
    }
}

#[test]
fn test_injected_codes() {
    let mut settings = PluginSettings::new(&OffsetHost).unwrap();

    assert_eq!(settings.overwrite_mode_code(), Some(30));
    settings.main.set_value("overwrite_mode", "cancel").unwrap();
    assert_eq!(settings.overwrite_mode_code(), Some(50));
    assert_eq!(settings.overwrite_mode(), Some(OverwriteMode::Cancel));

    settings.special.set_value("run_mode", "interactive").unwrap();
    assert_eq!(settings.special.get("run_mode").unwrap().option_code(), Some(100));
    assert_eq!(settings.run_mode(), Some(RunMode::Interactive));

    assert_eq!(settings.output_directory(), Some(PathBuf::from("/srv/exports")));
}

#[test]
fn test_procedure_params() {
    let fixture = TestFixture::new();
    let settings = fixture.settings();
    let params = settings.procedure_params();

    let run_mode = &params[0];
    assert_eq!(run_mode.name, "run_mode");
    assert_eq!(run_mode.param_type, ParamType::Int32);
    assert_eq!(run_mode.description, "The run mode");

    assert_eq!(params[1].param_type, ParamType::Image);

    let output_directory = params.iter().find(|p| p.name == "output_directory").unwrap();
    assert_eq!(output_directory.param_type, ParamType::String);
    assert_eq!(output_directory.description, "Output directory");

    assert!(params.iter().all(|p| p.name != "first_run"));
    assert!(params.iter().all(|p| p.name != "dialog_position"));
}

#[test]
fn test_output_directory_validation() {
    let fixture = TestFixture::new();
    let mut settings = fixture.settings();

    assert!(settings.main.validation_errors().is_empty());

    settings.main.set_value("output_directory", "  ").unwrap();
    let errors = settings.main.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].validation_message(), Some("Directory is not specified."));
}
