//! Common test utilities for the integration tests
//!
//! Provides a fixture with a temporary settings directory and a host whose
//! output directory lives inside it.

#![allow(dead_code)]

use layer_export_settings::{
    DefaultHost, FileSource, JsonStorage, PluginSettings, SessionSource, SettingsConfig,
};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

pub struct TestFixture {
    pub temp_dir: TempDir,
    pub host: DefaultHost,
    pub config: SettingsConfig<JsonStorage>,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let host = DefaultHost::new().with_output_directory(temp_dir.path().join("exports"));
        let config = SettingsConfig::builder()
            .config_dir(temp_dir.path())
            .build();

        Self {
            temp_dir,
            host,
            config,
        }
    }

    /// Fresh plug-in settings for this fixture's host
    pub fn settings(&self) -> PluginSettings {
        PluginSettings::new(&self.host).expect("Failed to declare settings")
    }

    pub fn file_source(&self) -> FileSource {
        FileSource::from_config(&self.config)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("exports")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.json")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read the raw settings JSON file content
pub fn read_settings_file(fixture: &TestFixture) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(fixture.settings_path()).ok()?;
    serde_json::from_str(&content).ok()
}

/// A source pair where nothing has been stored yet
pub fn empty_sources(fixture: &TestFixture) -> (FileSource, SessionSource) {
    (fixture.file_source(), SessionSource::new())
}

/// Enabled flag of a setting in the `main` group
pub fn enabled(settings: &PluginSettings, name: &str) -> bool {
    settings.main.get(name).unwrap().is_enabled()
}
