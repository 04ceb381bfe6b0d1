//! Procedure argument descriptors
//!
//! When the plug-in registers its procedure with the host, every registrable
//! setting becomes one argument. This module turns a group into the ordered
//! list of argument descriptors.

use crate::config::SettingType;
use crate::group::SettingGroup;

/// Host parameter type of a procedure argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Booleans and enumerated option codes
    Int32,
    /// File extensions, directories and serialized values
    String,
    Image,
}

impl ParamType {
    fn for_setting(setting_type: SettingType) -> Self {
        match setting_type {
            SettingType::Boolean | SettingType::Enumerated => ParamType::Int32,
            SettingType::Image => ParamType::Image,
            SettingType::FileExtension | SettingType::Directory | SettingType::Generic => {
                ParamType::String
            }
        }
    }
}

/// One procedure argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureParam {
    pub param_type: ParamType,
    pub name: String,
    pub description: String,
}

/// Arguments for every registrable setting of `group`, in declaration order
#[must_use]
pub fn procedure_params(group: &SettingGroup) -> Vec<ProcedureParam> {
    group
        .iter()
        .filter(|s| s.metadata().registrable)
        .map(|s| ProcedureParam {
            param_type: ParamType::for_setting(s.setting_type()),
            name: s.name().to_string(),
            description: s.display_name().to_string(),
        })
        .collect()
}

/// Arguments of several groups, concatenated in order
#[must_use]
pub fn procedure_params_of(groups: &[&SettingGroup]) -> Vec<ProcedureParam> {
    groups.iter().flat_map(|g| procedure_params(g)).collect()
}
