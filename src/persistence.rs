//! Saving and restoring setting groups
//!
//! Groups are written to a [`SettingSource`] keyed by group name. Only values
//! that differ from their defaults are written, so changing a default in the
//! schema applies to everyone who never customised that setting.
//!
//! Two sources are provided:
//! - [`FileSource`] keeps all groups in one settings file (JSON or TOML)
//! - [`SessionSource`] keeps them in memory for the lifetime of the host session

use crate::config::SettingsConfig;
use crate::error::{Error, Result};
use crate::group::SettingGroup;
use crate::storage::{GroupDocument, JsonStorage, StorageBackend};

use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// A place group values can be read from and written to
pub trait SettingSource {
    /// Stored values of `group`, or `None` if the group was never written
    fn read(&self, group: &str) -> Result<Option<Map<String, Value>>>;

    /// Replace the stored values of `group`
    fn write(&mut self, group: &str, values: Map<String, Value>) -> Result<()>;
}

// =============================================================================
// File source
// =============================================================================

/// All groups in a single settings file
///
/// Writing one group rewrites the whole file, keeping the other groups. The
/// file is replaced atomically so a crash never leaves a truncated file.
#[derive(Debug, Clone)]
pub struct FileSource<S: StorageBackend = JsonStorage> {
    path: PathBuf,
    storage: S,
}

impl<S: StorageBackend> FileSource<S> {
    pub fn new(path: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            path: path.into(),
            storage,
        }
    }

    /// Source at the configured settings path
    pub fn from_config(config: &SettingsConfig<S>) -> Self {
        Self::new(config.settings_path(), config.storage.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored group; empty if the file does not exist yet
    pub fn read_all(&self) -> Result<GroupDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(GroupDocument::new()),
            Err(source) => {
                return Err(Error::FileRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.storage.decode(&content)
    }

    fn write_all(&self, document: &GroupDocument) -> Result<()> {
        let content = self.storage.encode(document)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut temp_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                Error::Config(format!("settings path '{}' has no file name", self.path.display()))
            })?
            .to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        fs::write(&temp_path, content).map_err(|source| Error::FileWrite {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| Error::FileWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote settings file {}", self.path.display());
        Ok(())
    }
}

impl<S: StorageBackend> SettingSource for FileSource<S> {
    fn read(&self, group: &str) -> Result<Option<Map<String, Value>>> {
        let mut all = self.read_all()?;
        Ok(all.remove(group).and_then(|values| match values {
            Value::Object(values) => Some(values),
            _ => None,
        }))
    }

    fn write(&mut self, group: &str, values: Map<String, Value>) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(group.to_string(), Value::Object(values));
        self.write_all(&all)
    }
}

// =============================================================================
// Session source
// =============================================================================

/// In-memory source for values that only live as long as the host session
#[derive(Debug, Clone, Default)]
pub struct SessionSource {
    groups: HashMap<String, Map<String, Value>>,
}

impl SessionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl SettingSource for SessionSource {
    fn read(&self, group: &str) -> Result<Option<Map<String, Value>>> {
        Ok(self.groups.get(group).cloned())
    }

    fn write(&mut self, group: &str, values: Map<String, Value>) -> Result<()> {
        self.groups.insert(group.to_string(), values);
        Ok(())
    }
}

// =============================================================================
// Save / load
// =============================================================================

/// Outcome of loading a group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the source had any values for the group
    pub found: bool,
    /// Settings whose stored value was applied
    pub applied: Vec<String>,
    /// Stored entries that were not applied, with the reason
    pub skipped: Vec<(String, String)>,
}

/// Write the group's non-default values to `source`
///
/// # Errors
///
/// Returns an error if the source cannot be written.
pub fn save_group(group: &SettingGroup, source: &mut dyn SettingSource) -> Result<()> {
    let values = group.non_default_values();
    debug!("Saving {} value(s) of group '{}'", values.len(), group.name());
    source.write(group.name(), values)?;
    info!("Saved setting group '{}'", group.name());
    Ok(())
}

/// Apply stored values to `group`, then re-apply all streamline rules.
///
/// Stored values bypass enabled flags and rules while loading; the final
/// `streamline()` pass restores consistency. Unknown settings and values that
/// do not fit their setting are skipped and reported.
///
/// # Errors
///
/// Returns an error if the source cannot be read or a rule fails.
pub fn load_group(group: &mut SettingGroup, source: &dyn SettingSource) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    let Some(values) = source.read(group.name())? else {
        debug!("No stored values for group '{}'", group.name());
        return Ok(report);
    };
    report.found = true;

    for (name, value) in values {
        if !group.contains(&name) {
            warn!("Skipping unknown setting '{name}' in group '{}'", group.name());
            report.skipped.push((name, "unknown setting".to_string()));
            continue;
        }
        match group.load_value(&name, value) {
            Ok(()) => report.applied.push(name),
            Err(e) => {
                warn!("Skipping stored value of '{name}': {e}");
                report.skipped.push((name, e.to_string()));
            }
        }
    }

    group.streamline()?;
    info!(
        "Loaded setting group '{}' ({} applied, {} skipped)",
        group.name(),
        report.applied.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingMetadata;
    use serde_json::json;

    fn group() -> SettingGroup {
        SettingGroup::from_settings(
            "main",
            [
                ("autocrop", SettingMetadata::boolean(false)),
                ("file_extension", SettingMetadata::file_extension("png")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_session_source_round_trip() {
        let mut source = SessionSource::new();
        let mut saved = group();
        saved.set_value("autocrop", true).unwrap();
        save_group(&saved, &mut source).unwrap();

        let stored = source.read("main").unwrap().unwrap();
        assert_eq!(stored.len(), 1);

        let mut loaded = group();
        let report = load_group(&mut loaded, &source).unwrap();
        assert!(report.found);
        assert_eq!(report.applied, vec!["autocrop".to_string()]);
        assert_eq!(loaded.value("autocrop").unwrap(), &json!(true));
    }

    #[test]
    fn test_load_missing_group() {
        let source = SessionSource::new();
        let mut loaded = group();
        let report = load_group(&mut loaded, &source).unwrap();
        assert!(!report.found);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn test_load_skips_bad_entries() {
        let mut source = SessionSource::new();
        let mut values = Map::new();
        values.insert("autocrop".into(), json!("yes"));
        values.insert("gone".into(), json!(1));
        values.insert("file_extension".into(), json!("jpg"));
        source.write("main", values).unwrap();

        let mut loaded = group();
        let report = load_group(&mut loaded, &source).unwrap();

        assert_eq!(report.applied, vec!["file_extension".to_string()]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(loaded.value("autocrop").unwrap(), &json!(false));
    }

    #[test]
    fn test_file_source_keeps_other_groups() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileSource::new(dir.path().join("nested/settings.json"), JsonStorage::new());

        let mut main = group();
        main.set_value("file_extension", "jpg").unwrap();
        save_group(&main, &mut source).unwrap();

        let mut gui = Map::new();
        gui.insert("advanced_settings_expanded".into(), json!(true));
        source.write("gui", gui).unwrap();

        let all = source.read_all().unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["main", "gui"]);
        assert_eq!(all["main"], json!({"file_extension": "jpg"}));
        assert!(!dir.path().join("nested/settings.json.tmp").exists());
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("settings.json"), JsonStorage::new());

        assert!(source.read_all().unwrap().is_empty());
        assert_eq!(source.read("main").unwrap(), None);
    }

    #[test]
    fn test_file_source_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"main": "not a table"}"#).unwrap();
        let source = FileSource::new(&path, JsonStorage::new());

        let mut loaded = group();
        assert!(matches!(
            load_group(&mut loaded, &source).unwrap_err(),
            Error::Parse(_)
        ));
        assert_eq!(loaded.value("file_extension").unwrap(), &json!("png"));
    }
}
