//! # layer-export-settings
//!
//! Settings registry for a layer export plug-in. Settings are declared in
//! named groups, carry a value, an enabled flag and a table of error
//! messages, and are kept mutually consistent by streamline rules.
//!
//! ## Features
//!
//! - **Typed settings**: booleans, enumerated options, file extensions, directories and images
//! - **Streamline rules**: a change to one setting adjusts the value, enabled flag
//!   or error messages of the settings it declares as dependents
//! - **Reset**: restore defaults and initial enabled flags, then re-apply rules
//! - **Persistence**: save non-default values to a settings file (JSON or TOML)
//!   or to an in-memory session source
//! - **Procedure registration**: describe registrable settings as host procedure arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use layer_export_settings::{DefaultHost, PluginSettings};
//!
//! # fn example() -> layer_export_settings::Result<()> {
//! let mut settings = PluginSettings::new(&DefaultHost::new())?;
//!
//! settings.main.set_value("layer_groups_as_folders", true)?;
//!
//! let merge = settings.main.get("merge_layer_groups")?;
//! assert!(!merge.is_enabled());
//! assert_eq!(merge.as_bool(), Some(false));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Custom Groups
//!
//! ```rust
//! use layer_export_settings::{Effect, RuleInput, SettingGroup, SettingMetadata};
//!
//! fn only_when_on(input: &RuleInput<'_>) -> Vec<Effect> {
//!     vec![Effect::on("detail").set_enabled(input.is_on())]
//! }
//!
//! # fn example() -> layer_export_settings::Result<()> {
//! let mut group = SettingGroup::from_settings(
//!     "demo",
//!     [
//!         ("feature", SettingMetadata::boolean(false)),
//!         ("detail", SettingMetadata::boolean(false)),
//!     ],
//! )?;
//! group.attach_streamline("feature", only_when_on, &["detail"])?;
//! group.streamline()?;
//!
//! assert!(!group.get("detail")?.is_enabled());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Saving and Loading
//!
//! Only values that differ from their defaults are written. Loading applies
//! stored values without consulting enabled flags or rules, then re-applies
//! every rule of the group.
//!
//! ```rust,no_run
//! use layer_export_settings::{
//!     DefaultHost, FileSource, PluginSettings, SessionSource, SettingsConfig,
//! };
//!
//! # fn example() -> layer_export_settings::Result<()> {
//! let config = SettingsConfig::builder().config_dir("~/.config/export-layers").build();
//! let mut file = FileSource::from_config(&config);
//! let mut session = SessionSource::new();
//!
//! let mut settings = PluginSettings::new(&DefaultHost::new())?;
//! settings.load(&file, &session)?;
//! settings.main.set_value("autocrop", true)?;
//! settings.save(&mut file, &mut session)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod group;
mod persistence;
mod registration;
mod setting;
mod streamline;

pub mod config;
pub mod plugin;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};
pub use events::{ChangeCallback, EventManager, SettingEvent};
pub use group::SettingGroup;
pub use persistence::{FileSource, LoadReport, SessionSource, SettingSource, load_group, save_group};
pub use registration::{ParamType, ProcedureParam, procedure_params, procedure_params_of};
pub use setting::Setting;
pub use streamline::{Effect, RuleFn, RuleInput, RuleTable, StreamlineRule};

pub use config::{
    DefaultHost, HostEnvironment, SettingMetadata, SettingOption, SettingType, SettingsConfig,
    SettingsConfigBuilder, opt,
};
pub use plugin::PluginSettings;
#[cfg(feature = "toml")]
pub use storage::TomlStorage;
pub use storage::{GroupDocument, JsonStorage, StorageBackend};
