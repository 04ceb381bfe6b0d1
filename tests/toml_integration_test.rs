//! TOML Storage Integration Tests
//!
//! Tests for saving the plug-in's groups with the TOML backend.

#![cfg(feature = "toml")]

mod common;

use common::TestFixture;
use layer_export_settings::{FileSource, SessionSource, SettingsConfig, TomlStorage};
use serde_json::json;

#[test]
fn test_toml_save_and_load() {
    let fixture = TestFixture::new();
    let config = SettingsConfig::builder()
        .config_dir(fixture.temp_dir.path())
        .storage(TomlStorage::new())
        .build();

    let mut file = FileSource::from_config(&config);
    let mut session = SessionSource::new();

    let mut settings = fixture.settings();
    settings.main.set_value("autocrop", true).unwrap();
    settings
        .main
        .set_value("square_bracketed_mode", "background")
        .unwrap();
    settings.main.set_value("crop_to_background", true).unwrap();
    settings.gui.set_value("dialog_position", json!([4, 8])).unwrap();
    settings.save(&mut file, &mut session).unwrap();

    // Verify file is TOML
    let settings_file = fixture.temp_dir.path().join("settings.toml");
    let content = std::fs::read_to_string(&settings_file).unwrap();
    assert!(content.contains("[main]"));
    assert!(content.contains("autocrop = true"));

    let mut loaded = fixture.settings();
    loaded.load(&file, &session).unwrap();
    assert_eq!(loaded.main.value("crop_to_background").unwrap(), &json!(true));
    assert!(loaded.main.get("crop_to_background").unwrap().is_enabled());
    assert_eq!(loaded.gui.value("dialog_position").unwrap(), &json!([4, 8]));
}
