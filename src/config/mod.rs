//! Core configuration types
//!
//! This module contains the foundational types for declaring settings:
//! - `SettingMetadata` - Declaration of one setting (type, default, options, flags)
//! - `SettingsConfig` - Where and how setting groups are persisted
//! - `HostEnvironment` - Values only the plug-in host can supply

mod host;
mod schema;
mod types;

pub use schema::{SettingMetadata, SettingOption, SettingType, opt};

pub use host::{DefaultHost, HostEnvironment};
pub use types::{SettingsConfig, SettingsConfigBuilder};
