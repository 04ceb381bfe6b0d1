//! The export plug-in's settings
//!
//! Four groups are declared here:
//!
//! - `special` - run mode, image and first-run flag, handled apart from the rest
//! - `main` - export behavior, with the streamline rules that keep it consistent
//! - `gui` - persisted dialog state
//! - `gui_session` - per-session map of image ids to their last output folder
//!
//! ```rust
//! use layer_export_settings::{DefaultHost, PluginSettings};
//!
//! let mut settings = PluginSettings::new(&DefaultHost::new()).unwrap();
//!
//! settings.main.set_value("merge_layer_groups", true).unwrap();
//! assert!(!settings.main.get("layer_groups_as_folders").unwrap().is_enabled());
//! ```

mod modes;
mod rules;

pub use modes::{FileExtMode, OverwriteMode, RunMode, SquareBracketedMode, StripMode};
pub use rules::{
    streamline_autocrop, streamline_file_ext_mode, streamline_layer_groups_as_folders,
    streamline_merge_layer_groups, streamline_square_bracketed_mode,
};

use crate::config::{HostEnvironment, SettingMetadata, SettingOption, opt};
use crate::error::{Error, Result};
use crate::group::SettingGroup;
use crate::persistence::{LoadReport, SettingSource, load_group, save_group};
use crate::registration::{ProcedureParam, procedure_params_of};
use crate::validation::kind;

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Setting and group names
pub mod names {
    pub const SPECIAL: &str = "special";
    pub const MAIN: &str = "main";
    pub const GUI: &str = "gui";
    pub const GUI_SESSION: &str = "gui_session";

    pub const RUN_MODE: &str = "run_mode";
    pub const IMAGE: &str = "image";
    pub const FIRST_RUN: &str = "first_run";

    pub const FILE_EXTENSION: &str = "file_extension";
    pub const OUTPUT_DIRECTORY: &str = "output_directory";
    pub const LAYER_GROUPS_AS_FOLDERS: &str = "layer_groups_as_folders";
    pub const IGNORE_INVISIBLE: &str = "ignore_invisible";
    pub const AUTOCROP: &str = "autocrop";
    pub const USE_IMAGE_SIZE: &str = "use_image_size";
    pub const FILE_EXT_MODE: &str = "file_ext_mode";
    pub const STRIP_MODE: &str = "strip_mode";
    pub const SQUARE_BRACKETED_MODE: &str = "square_bracketed_mode";
    pub const CROP_TO_BACKGROUND: &str = "crop_to_background";
    pub const MERGE_LAYER_GROUPS: &str = "merge_layer_groups";
    pub const EMPTY_FOLDERS: &str = "empty_folders";
    pub const IGNORE_LAYER_MODES: &str = "ignore_layer_modes";
    pub const OVERWRITE_MODE: &str = "overwrite_mode";

    pub const DIALOG_POSITION: &str = "dialog_position";
    pub const ADVANCED_SETTINGS_EXPANDED: &str = "advanced_settings_expanded";
    pub const IMAGE_IDS_AND_FOLDERS: &str = "image_ids_and_folders";
}

use names::*;

const FILE_EXTENSION_DISPLAY_NAME: &str = "File extension";

// =============================================================================
// Group declarations
// =============================================================================

/// Settings that need special handling by the plug-in entry point
///
/// # Errors
///
/// Returns `Error::InvalidSchema` if a declaration is invalid.
pub fn create_special_settings(host: &dyn HostEnvironment) -> Result<SettingGroup> {
    let run_mode_options = [
        (RunMode::Interactive, "RUN-INTERACTIVE"),
        (RunMode::NonInteractive, "RUN-NONINTERACTIVE"),
        (RunMode::RunWithLastVals, "RUN-WITH-LAST-VALS"),
    ]
    .into_iter()
    .map(|(mode, label)| SettingOption::with_code(mode.key(), label, host.run_mode_code(mode)))
    .collect();

    SettingGroup::from_settings(
        SPECIAL,
        [
            (
                RUN_MODE,
                SettingMetadata::enumerated(RunMode::NonInteractive.key(), run_mode_options)
                    .display_name("The run mode"),
            ),
            (
                IMAGE,
                SettingMetadata::image()
                    .skip_default_validation()
                    .display_name("Image"),
            ),
            (
                FIRST_RUN,
                SettingMetadata::boolean(true).not_registrable().description(
                    "True if the plug-in successfully ran for the first time \
                     in one host session, False for subsequent runs.",
                ),
            ),
        ],
    )
}

/// Export behavior settings with their streamline rules attached and applied
///
/// # Errors
///
/// Returns `Error::InvalidSchema` if a declaration or rule binding is invalid.
pub fn create_main_settings(host: &dyn HostEnvironment) -> Result<SettingGroup> {
    let file_ext_mode_options = vec![
        opt(FileExtMode::NoSpecialHandling.key(), "No special handling"),
        opt(
            FileExtMode::OnlyMatchingFileExtension.key(),
            "Export only layers matching file extension",
        ),
        opt(FileExtMode::UseAsFileExtensions.key(), "Use as file extensions"),
    ];
    let square_bracketed_mode_options = vec![
        opt(SquareBracketedMode::Normal.key(), "Treat as normal layers"),
        opt(SquareBracketedMode::Background.key(), "Treat as background layers"),
        opt(SquareBracketedMode::Ignore.key(), "Ignore"),
        opt(SquareBracketedMode::IgnoreOther.key(), "Ignore other layers"),
    ];
    let overwrite_mode_options = [
        (OverwriteMode::Replace, "Replace"),
        (OverwriteMode::Skip, "Skip"),
        (OverwriteMode::RenameNew, "Rename new file"),
        (OverwriteMode::RenameExisting, "Rename existing file"),
        (OverwriteMode::Cancel, "Cancel"),
    ]
    .into_iter()
    .map(|(mode, label)| {
        SettingOption::with_code(mode.key(), label, host.overwrite_mode_code(mode))
    })
    .collect();

    let output_directory = host.default_output_directory();

    let mut group = SettingGroup::from_settings(
        MAIN,
        [
            (
                FILE_EXTENSION,
                SettingMetadata::file_extension("png")
                    .display_name(FILE_EXTENSION_DISPLAY_NAME)
                    .description(
                        "Type in file extension (with or without the leading period). \
                         To export in RAW format, type \"data\".",
                    )
                    .error_message(
                        kind::DEFAULT_NEEDED,
                        "You need to specify default file extension for layers with \
                         invalid or no extension.",
                    ),
            ),
            (
                OUTPUT_DIRECTORY,
                SettingMetadata::directory(output_directory.to_string_lossy())
                    .display_name("Output directory"),
            ),
            (
                LAYER_GROUPS_AS_FOLDERS,
                SettingMetadata::boolean(false)
                    .display_name("Treat layer groups as folders")
                    .description(
                        "If enabled, layers will be exported to subfolders corresponding \
                         to the layer groups.\nIf disabled, all layers will be exported to \
                         the output folder on the same level.",
                    ),
            ),
            (
                IGNORE_INVISIBLE,
                SettingMetadata::boolean(false)
                    .display_name("Ignore invisible layers")
                    .description(
                        "If enabled, invisible layers will not be exported. Visible layers \
                         within invisible layer groups will also not be exported.",
                    ),
            ),
            (
                AUTOCROP,
                SettingMetadata::boolean(false)
                    .display_name("Autocrop layers")
                    .description("If enabled, layers will be autocropped before being exported."),
            ),
            (
                USE_IMAGE_SIZE,
                SettingMetadata::boolean(false)
                    .display_name("Use image size")
                    .description(
                        "If enabled, layers will be resized (but not scaled) to the image \
                         size. Layers partially outside the image canvas will be cut off.",
                    ),
            ),
            (
                FILE_EXT_MODE,
                SettingMetadata::enumerated(
                    FileExtMode::NoSpecialHandling.key(),
                    file_ext_mode_options,
                )
                .display_name("File extensions in layer names")
                .description(format!(
                    "If \"Use as file extensions\" is selected, \"{FILE_EXTENSION_DISPLAY_NAME}\" \
                     must still be specified (for layers with invalid or no file extension)."
                )),
            ),
            (
                STRIP_MODE,
                SettingMetadata::enumerated(
                    StripMode::Identical.key(),
                    vec![
                        opt(StripMode::Always.key(), "Always strip file extension"),
                        opt(StripMode::Identical.key(), "Strip identical file extension"),
                        opt(StripMode::Never.key(), "Never strip file extension"),
                    ],
                )
                .display_name("File extension stripping")
                .description(
                    "Determines when to strip file extensions from layer names \
                     (including the period).",
                ),
            ),
            (
                SQUARE_BRACKETED_MODE,
                SettingMetadata::enumerated(
                    SquareBracketedMode::Normal.key(),
                    square_bracketed_mode_options,
                )
                .display_name("Layer names in [square brackets]")
                .description(
                    "\"Treat as background layers\": these layers will be used as a \
                     background for all other layers and will not be exported separately.\n\
                     \"Ignore\": these layers will not be exported.\n\
                     \"Ignore other layers\": all other layers will not be exported.",
                ),
            ),
            (
                CROP_TO_BACKGROUND,
                SettingMetadata::boolean(false)
                    .disabled()
                    .display_name("Crop to background")
                    .description(
                        "If enabled, layers will be cropped to the combined size of the \
                         background layers instead of their own size.",
                    ),
            ),
            (
                MERGE_LAYER_GROUPS,
                SettingMetadata::boolean(false)
                    .display_name("Merge layer groups")
                    .description(
                        "If enabled, each top-level layer group is merged into one layer \
                         named after the layer group.",
                    ),
            ),
            (
                EMPTY_FOLDERS,
                SettingMetadata::boolean(false)
                    .disabled()
                    .display_name("Create folders for empty layer groups")
                    .description("If enabled, subfolders for empty layer groups will be created."),
            ),
            (
                IGNORE_LAYER_MODES,
                SettingMetadata::boolean(false)
                    .display_name("Ignore layer modes")
                    .description(
                        "If enabled, the layer mode for each layer will be set to Normal.",
                    ),
            ),
            (
                OVERWRITE_MODE,
                SettingMetadata::enumerated(OverwriteMode::RenameNew.key(), overwrite_mode_options)
                    .display_name("Overwrite mode (non-interactive run mode only)")
                    .description(
                        "Indicates how to handle conflicting files. Skipped layers \
                         will not be regarded as exported.",
                    ),
            ),
        ],
    )?;

    group.attach_streamline(
        LAYER_GROUPS_AS_FOLDERS,
        streamline_layer_groups_as_folders,
        &[EMPTY_FOLDERS, MERGE_LAYER_GROUPS],
    )?;
    group.attach_streamline(
        FILE_EXT_MODE,
        streamline_file_ext_mode,
        &[FILE_EXTENSION, STRIP_MODE],
    )?;
    group.attach_streamline(
        MERGE_LAYER_GROUPS,
        streamline_merge_layer_groups,
        &[LAYER_GROUPS_AS_FOLDERS],
    )?;
    group.attach_streamline(
        AUTOCROP,
        streamline_autocrop,
        &[SQUARE_BRACKETED_MODE, CROP_TO_BACKGROUND],
    )?;
    group.attach_streamline(
        SQUARE_BRACKETED_MODE,
        streamline_square_bracketed_mode,
        &[AUTOCROP, CROP_TO_BACKGROUND],
    )?;

    group.streamline()?;
    Ok(group)
}

/// Dialog state persisted between runs
///
/// # Errors
///
/// Returns `Error::InvalidSchema` if a declaration is invalid.
pub fn create_gui_settings() -> Result<SettingGroup> {
    SettingGroup::from_settings(
        GUI,
        [
            (
                DIALOG_POSITION,
                SettingMetadata::generic(json!([]))
                    .not_resettable()
                    .not_registrable(),
            ),
            (
                ADVANCED_SETTINGS_EXPANDED,
                SettingMetadata::boolean(false)
                    .not_resettable()
                    .not_registrable(),
            ),
        ],
    )
}

/// Dialog state kept only for the current host session
///
/// # Errors
///
/// Returns `Error::InvalidSchema` if a declaration is invalid.
pub fn create_session_only_gui_settings() -> Result<SettingGroup> {
    SettingGroup::from_settings(
        GUI_SESSION,
        [(
            IMAGE_IDS_AND_FOLDERS,
            SettingMetadata::generic(json!({}))
                .not_resettable()
                .not_registrable(),
        )],
    )
}

// =============================================================================
// PluginSettings
// =============================================================================

/// All setting groups of the plug-in
#[derive(Debug)]
pub struct PluginSettings {
    pub special: SettingGroup,
    pub main: SettingGroup,
    pub gui: SettingGroup,
    pub gui_session: SettingGroup,
}

impl PluginSettings {
    /// Declare every group, asking `host` for host-specific values
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSchema` if a declaration is invalid.
    pub fn new(host: &dyn HostEnvironment) -> Result<Self> {
        Ok(Self {
            special: create_special_settings(host)?,
            main: create_main_settings(host)?,
            gui: create_gui_settings()?,
            gui_session: create_session_only_gui_settings()?,
        })
    }

    /// Look up a group by name
    ///
    /// # Errors
    ///
    /// Returns `Error::GroupNotFound` for unknown names.
    pub fn group(&self, name: &str) -> Result<&SettingGroup> {
        match name {
            SPECIAL => Ok(&self.special),
            MAIN => Ok(&self.main),
            GUI => Ok(&self.gui),
            GUI_SESSION => Ok(&self.gui_session),
            _ => Err(Error::GroupNotFound(name.to_string())),
        }
    }

    /// Look up a group by name for modification
    ///
    /// # Errors
    ///
    /// Returns `Error::GroupNotFound` for unknown names.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut SettingGroup> {
        match name {
            SPECIAL => Ok(&mut self.special),
            MAIN => Ok(&mut self.main),
            GUI => Ok(&mut self.gui),
            GUI_SESSION => Ok(&mut self.gui_session),
            _ => Err(Error::GroupNotFound(name.to_string())),
        }
    }

    /// All groups in declaration order
    pub fn groups(&self) -> [&SettingGroup; 4] {
        [&self.special, &self.main, &self.gui, &self.gui_session]
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    pub fn run_mode(&self) -> Option<RunMode> {
        self.special
            .get(RUN_MODE)
            .ok()
            .and_then(|s| s.as_str())
            .and_then(RunMode::from_key)
    }

    pub fn overwrite_mode(&self) -> Option<OverwriteMode> {
        self.main
            .get(OVERWRITE_MODE)
            .ok()
            .and_then(|s| s.as_str())
            .and_then(OverwriteMode::from_key)
    }

    /// Export engine code of the selected overwrite mode
    pub fn overwrite_mode_code(&self) -> Option<i64> {
        self.main.get(OVERWRITE_MODE).ok().and_then(|s| s.option_code())
    }

    pub fn output_directory(&self) -> Option<PathBuf> {
        self.main
            .get(OUTPUT_DIRECTORY)
            .ok()
            .and_then(|s| s.as_str())
            .map(PathBuf::from)
    }

    // =========================================================================
    // Session folders
    // =========================================================================

    /// Last output folder used for `image_id` in this session
    pub fn image_folder(&self, image_id: u64) -> Option<PathBuf> {
        self.gui_session
            .value(IMAGE_IDS_AND_FOLDERS)
            .ok()
            .and_then(|map| map.get(image_id.to_string()))
            .and_then(Value::as_str)
            .map(PathBuf::from)
    }

    /// Remember the output folder used for `image_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the session group does not hold a folder map.
    pub fn remember_image_folder(&mut self, image_id: u64, folder: &Path) -> Result<()> {
        let mut map = self
            .gui_session
            .value(IMAGE_IDS_AND_FOLDERS)?
            .as_object()
            .cloned()
            .ok_or_else(|| Error::InvalidSettingValue {
                key: IMAGE_IDS_AND_FOLDERS.to_string(),
                reason: "Value must be an object".to_string(),
            })?;
        map.insert(
            image_id.to_string(),
            Value::String(folder.to_string_lossy().into_owned()),
        );
        self.gui_session
            .set_value(IMAGE_IDS_AND_FOLDERS, Value::Object(map))?;
        Ok(())
    }

    // =========================================================================
    // Persistence & registration
    // =========================================================================

    /// Save `special`, `main` and `gui` to `persistent`, `gui_session` to `session`
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a source.
    pub fn save(
        &self,
        persistent: &mut dyn SettingSource,
        session: &mut dyn SettingSource,
    ) -> Result<()> {
        save_group(&self.special, persistent)?;
        save_group(&self.main, persistent)?;
        save_group(&self.gui, persistent)?;
        save_group(&self.gui_session, session)
    }

    /// Load every group from the source it is saved to, in group order
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a source or rule.
    pub fn load(
        &mut self,
        persistent: &dyn SettingSource,
        session: &dyn SettingSource,
    ) -> Result<Vec<LoadReport>> {
        Ok(vec![
            load_group(&mut self.special, persistent)?,
            load_group(&mut self.main, persistent)?,
            load_group(&mut self.gui, persistent)?,
            load_group(&mut self.gui_session, session)?,
        ])
    }

    /// Procedure arguments: the special settings followed by the main settings
    pub fn procedure_params(&self) -> Vec<ProcedureParam> {
        procedure_params_of(&[&self.special, &self.main])
    }
}
