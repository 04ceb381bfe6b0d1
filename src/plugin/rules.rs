//! Streamline rules of the main settings group

use super::modes::{FileExtMode, SquareBracketedMode, StripMode};
use super::names::*;
use crate::streamline::{Effect, RuleInput};
use crate::validation::kind;

/// Empty folders only make sense when layer groups become folders; merging
/// layer groups only when they do not.
pub fn streamline_layer_groups_as_folders(input: &RuleInput<'_>) -> Vec<Effect> {
    if input.is_on() {
        vec![
            Effect::on(EMPTY_FOLDERS).set_enabled(true),
            Effect::on(MERGE_LAYER_GROUPS)
                .set_enabled(false)
                .set_value(false),
        ]
    } else {
        vec![
            Effect::on(EMPTY_FOLDERS).set_value(false).set_enabled(false),
            Effect::on(MERGE_LAYER_GROUPS).set_enabled(true),
        ]
    }
}

/// Extensions in layer names are kept whenever they are used for matching or
/// as the export format. In that mode an empty default extension gets a
/// dedicated error message.
pub fn streamline_file_ext_mode(input: &RuleInput<'_>) -> Vec<Effect> {
    let Some(mode) = FileExtMode::from_key(input.key()) else {
        return Vec::new();
    };

    match mode {
        FileExtMode::NoSpecialHandling => vec![
            Effect::on(STRIP_MODE).set_enabled(true),
            Effect::on(FILE_EXTENSION).set_error_message(kind::IS_EMPTY, ""),
        ],
        FileExtMode::OnlyMatchingFileExtension => vec![
            Effect::on(STRIP_MODE)
                .set_value(StripMode::Never.key())
                .set_enabled(false),
            Effect::on(FILE_EXTENSION).set_error_message(kind::IS_EMPTY, ""),
        ],
        FileExtMode::UseAsFileExtensions => {
            let default_needed = input
                .dependent(FILE_EXTENSION)
                .and_then(|s| s.error_message(kind::DEFAULT_NEEDED))
                .unwrap_or_default();
            vec![
                Effect::on(STRIP_MODE)
                    .set_value(StripMode::Never.key())
                    .set_enabled(false),
                Effect::on(FILE_EXTENSION).set_error_message(kind::IS_EMPTY, default_needed),
            ]
        }
    }
}

pub fn streamline_merge_layer_groups(input: &RuleInput<'_>) -> Vec<Effect> {
    if input.is_on() {
        vec![
            Effect::on(LAYER_GROUPS_AS_FOLDERS)
                .set_value(false)
                .set_enabled(false),
        ]
    } else {
        vec![Effect::on(LAYER_GROUPS_AS_FOLDERS).set_enabled(true)]
    }
}

/// Shared by the `autocrop` and `square_bracketed_mode` rules.
fn crop_to_background_effect(autocrop: bool, square_bracketed_mode: &str) -> Effect {
    if autocrop && square_bracketed_mode == SquareBracketedMode::Background.key() {
        Effect::on(CROP_TO_BACKGROUND).set_enabled(true)
    } else {
        Effect::on(CROP_TO_BACKGROUND)
            .set_value(false)
            .set_enabled(false)
    }
}

pub fn streamline_autocrop(input: &RuleInput<'_>) -> Vec<Effect> {
    let mode = input
        .dependent(SQUARE_BRACKETED_MODE)
        .and_then(|s| s.as_str())
        .unwrap_or_default();
    vec![crop_to_background_effect(input.is_on(), mode)]
}

pub fn streamline_square_bracketed_mode(input: &RuleInput<'_>) -> Vec<Effect> {
    let autocrop = input
        .dependent(AUTOCROP)
        .and_then(|s| s.as_bool())
        .unwrap_or(false);
    vec![crop_to_background_effect(autocrop, input.key())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SettingMetadata, opt};
    use crate::setting::Setting;
    use serde_json::json;

    fn square_bracketed(key: &str) -> Setting {
        let mut setting = Setting::new(
            SQUARE_BRACKETED_MODE,
            SettingMetadata::enumerated(
                "normal",
                vec![opt("normal", "Normal"), opt("background", "Background")],
            ),
        );
        setting.store(json!(key)).unwrap();
        setting
    }

    #[test]
    fn test_layer_groups_as_folders_off() {
        let trigger = Setting::new(LAYER_GROUPS_AS_FOLDERS, SettingMetadata::boolean(false));
        let effects = streamline_layer_groups_as_folders(&RuleInput::new(&trigger, vec![]));

        assert_eq!(
            effects,
            vec![
                Effect::on(EMPTY_FOLDERS).set_value(false).set_enabled(false),
                Effect::on(MERGE_LAYER_GROUPS).set_enabled(true),
            ]
        );
    }

    #[test]
    fn test_autocrop_requires_background_mode() {
        let trigger = Setting::new(AUTOCROP, SettingMetadata::boolean(true));

        let normal = square_bracketed("normal");
        let effects = streamline_autocrop(&RuleInput::new(&trigger, vec![&normal]));
        assert_eq!(effects[0].enabled, Some(false));
        assert_eq!(effects[0].value, Some(json!(false)));

        let background = square_bracketed("background");
        let effects = streamline_autocrop(&RuleInput::new(&trigger, vec![&background]));
        assert_eq!(effects[0].enabled, Some(true));
        assert_eq!(effects[0].value, None);
    }

    #[test]
    fn test_square_bracketed_mode_matches_autocrop_rule() {
        let autocrop = Setting::new(AUTOCROP, SettingMetadata::boolean(true));
        let mode = square_bracketed("background");

        let from_autocrop = streamline_autocrop(&RuleInput::new(&autocrop, vec![&mode]));
        let from_mode = streamline_square_bracketed_mode(&RuleInput::new(&mode, vec![&autocrop]));
        assert_eq!(from_autocrop, from_mode);
    }

    #[test]
    fn test_file_ext_mode_unknown_key_has_no_effect() {
        let trigger = Setting::new(FILE_EXT_MODE, SettingMetadata::generic(json!("bogus")));
        assert!(streamline_file_ext_mode(&RuleInput::new(&trigger, vec![])).is_empty());
    }
}
