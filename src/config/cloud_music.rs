use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::media_player::RepeatMode;

/// Cloud music proxy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CloudMusicConfig {
    /// Name prefix of every proxy; the target's object id is appended.
    pub name: String,

    /// Target media player entity ids, one proxy each.
    pub media_players: Vec<String>,

    /// Repeat mode a new proxy starts with.
    pub repeat: RepeatMode,

    /// Whether a new proxy starts with shuffle enabled.
    pub shuffle: bool,

    /// Advancing to the next track when the target finishes one.
    pub auto_advance: AutoAdvanceConfig,
}

impl Default for CloudMusicConfig {
    fn default() -> Self {
        Self {
            name: "Cloud Music".to_string(),
            media_players: Vec::new(),
            repeat: RepeatMode::All,
            shuffle: false,
            auto_advance: AutoAdvanceConfig::default(),
        }
    }
}

/// Auto-advance behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AutoAdvanceConfig {
    /// Whether a finished track starts the next one.
    pub enabled: bool,

    /// Seconds after a play or track change during which the target going
    /// idle is ignored.
    pub debounce_secs: u64,

    /// Only advance when repeat is not `off`.
    pub require_repeat: bool,
}

impl Default for AutoAdvanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_secs: 5,
            require_repeat: true,
        }
    }
}
