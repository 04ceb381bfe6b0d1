//! Where the persistent settings file lives

use std::path::{Path, PathBuf};

use crate::storage::{JsonStorage, StorageBackend};

/// Directory name under the system config directory
pub(crate) const APP_DIR_NAME: &str = "export-layers";

/// Location and format of the persistent settings file
#[derive(Debug, Clone)]
pub struct SettingsConfig<S: StorageBackend = JsonStorage> {
    pub config_dir: PathBuf,

    /// File name inside `config_dir`, `settings.<extension>` unless overridden
    pub settings_file: String,

    pub storage: S,
}

impl Default for SettingsConfig<JsonStorage> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<S: StorageBackend> SettingsConfig<S> {
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }
}

impl SettingsConfig<JsonStorage> {
    /// Start from the system config directory and a pretty-printed JSON file
    ///
    /// # Example
    /// ```rust
    /// use layer_export_settings::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder()
    ///     .config_dir("~/.config/export-layers")
    ///     .build();
    /// assert!(config.settings_path().ends_with("export-layers/settings.json"));
    /// ```
    pub fn builder() -> SettingsConfigBuilder<JsonStorage> {
        SettingsConfigBuilder {
            config_dir: None,
            settings_file: None,
            storage: JsonStorage::new(),
        }
    }
}

/// Builder for [`SettingsConfig`]
#[derive(Debug, Clone)]
pub struct SettingsConfigBuilder<S: StorageBackend = JsonStorage> {
    config_dir: Option<PathBuf>,
    settings_file: Option<String>,
    storage: S,
}

impl<S: StorageBackend> SettingsConfigBuilder<S> {
    /// Directory of the settings file; a leading `~` is the home directory
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(expand_home(path.into()));
        self
    }

    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.settings_file = Some(filename.into());
        self
    }

    /// Switch the file format, e.g. to `TomlStorage`
    pub fn storage<T: StorageBackend>(self, storage: T) -> SettingsConfigBuilder<T> {
        SettingsConfigBuilder {
            config_dir: self.config_dir,
            settings_file: self.settings_file,
            storage,
        }
    }

    pub fn build(self) -> SettingsConfig<S> {
        let settings_file = self
            .settings_file
            .unwrap_or_else(|| format!("settings.{}", self.storage.extension()));
        SettingsConfig {
            config_dir: self.config_dir.unwrap_or_else(default_config_dir),
            settings_file,
            storage: self.storage,
        }
    }
}

impl SettingsConfigBuilder<JsonStorage> {
    /// Write single-line JSON
    pub fn compact_json(self) -> Self {
        self.storage(JsonStorage::compact())
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SettingsConfig::default();

        assert_eq!(config.settings_file, "settings.json");
        assert!(config.config_dir.ends_with(APP_DIR_NAME) || config.config_dir == Path::new("."));
    }

    #[test]
    fn test_custom_location() {
        let config = SettingsConfig::builder()
            .config_dir("/tmp/export-layers")
            .settings_file("plugin.json")
            .compact_json()
            .build();

        assert_eq!(config.settings_path(), PathBuf::from("/tmp/export-layers/plugin.json"));
    }

    #[test]
    fn test_home_expansion() {
        let config = SettingsConfig::builder().config_dir("~/plugin").build();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.config_dir, home.join("plugin"));
        }

        // Only a leading component counts
        let config = SettingsConfig::builder().config_dir("/tmp/~x").build();
        assert_eq!(config.config_dir, PathBuf::from("/tmp/~x"));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_storage_picks_file_name() {
        let config = SettingsConfig::builder()
            .config_dir("/tmp/export-layers")
            .storage(crate::storage::TomlStorage::new())
            .build();
        assert_eq!(config.settings_file, "settings.toml");

        let named = SettingsConfig::builder()
            .settings_file("layers.conf")
            .storage(crate::storage::TomlStorage::new())
            .build();
        assert_eq!(named.settings_file, "layers.conf");
    }
}
