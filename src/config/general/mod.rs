mod log_level;

pub use log_level::LogLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// General configuration settings.
///
/// Contains global settings that affect the overall behavior of the process
/// hosting the players, such as logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct GeneralConfig {
    /// Logging level, overridden by `RUST_LOG` when set.
    #[serde(default)]
    pub log_level: LogLevel,
}
