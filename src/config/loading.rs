use std::{fs, path::Path};

use schemars::{Schema, schema_for};
use tracing::info;

use super::{Config, ConfigError, ConfigPaths, Result};
use crate::services::host::EntityId;

const DEFAULT_CONFIG: &str = r#"# Cloud music proxy configuration

[general]
# error, warn, info, debug or trace
log_level = "info"

[cloud_music]
name = "Cloud Music"
# Target media players, one proxy each
media_players = []
repeat = "all"
shuffle = false

[cloud_music.auto_advance]
enabled = true
debounce_secs = 5
require_repeat = true
"#;

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// A commented default file is written first when `path` does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or read
    /// - The TOML content is invalid
    /// - A configured target is not a valid entity id
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            create_default_config_file(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(&e, path))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::toml_parse(e, Some(path)))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from its standard location.
    ///
    /// The file lives at `$XDG_CONFIG_HOME/cloud-music-proxy/config.toml`
    /// and is created with defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be resolved, or any error
    /// [`Config::load`] returns
    pub fn load_default() -> Result<Config> {
        let path = ConfigPaths::main_config()
            .map_err(|e| ConfigError::io(&e, Path::new("$XDG_CONFIG_HOME")))?;
        Self::load(&path)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a target id is malformed
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::toml_parse(e, None))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid target
    pub fn validate(&self) -> Result<()> {
        for raw in &self.cloud_music.media_players {
            EntityId::parse(raw).map_err(|e| ConfigError::Validation {
                component: "cloud_music.media_players".to_string(),
                details: e.to_string(),
            })?;
        }

        if self.cloud_music.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                component: "cloud_music.name".to_string(),
                details: "name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn schema() -> Schema {
        schema_for!(Config)
    }
}

fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io(&e, parent))?;
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::io(&e, path))?;
    info!(path = %path.display(), "Created default configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }
}
