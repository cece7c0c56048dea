use std::{
    env,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_DIR: &str = "cloud-music-proxy";

/// Locates configuration and data directories.
///
/// Follows the XDG Base Directory specification.
pub struct ConfigPaths;

impl ConfigPaths {
    /// Configuration directory
    ///
    /// Uses `XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
    pub fn config_dir() -> Result<PathBuf, Error> {
        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join(APP_DIR))
    }

    /// Data directory, created if missing
    ///
    /// Uses `XDG_DATA_HOME`, falling back to `$HOME/.local/share`.
    ///
    /// # Errors
    /// Returns an error if neither variable is set or the directory cannot
    /// be created
    pub fn data_dir() -> Result<PathBuf, Error> {
        let data_home = env::var("XDG_DATA_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.local/share")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_DATA_HOME nor HOME environment variable found",
                )
            })?;

        let data_dir = PathBuf::from(data_home).join(APP_DIR);
        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// Log directory, created if missing
    ///
    /// # Errors
    /// Returns error if the directory cannot be resolved or created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let log_dir = Self::data_dir()?.join("logs");
        std::fs::create_dir_all(&log_dir)?;
        Ok(log_dir)
    }

    /// Main configuration file
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be resolved
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
