//! Configuration schema definitions and validation.
//!
//! Defines the complete configuration structure, the general settings
//! plus the cloud music player list and their defaults. All configurations
//! are serializable to/from TOML format.

mod cloud_music;
mod error;
mod general;
mod loading;
mod paths;

#[cfg(test)]
mod tests;

pub use cloud_music::{AutoAdvanceConfig, CloudMusicConfig};
pub use error::{ConfigError, Result};
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Cloud music proxy players.
    #[serde(default)]
    pub cloud_music: CloudMusicConfig,
}
