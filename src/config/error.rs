use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    Validation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    Io {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParse {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = result::Result<T, ConfigError>;

impl ConfigError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        ConfigError::TomlParse {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error with the path it happened on.
    pub fn io(error: &io::Error, path: &Path) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
