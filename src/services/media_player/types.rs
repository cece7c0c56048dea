use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::host::EntityId;

/// Integration domain, used for unique ids and device identifiers.
pub const DOMAIN: &str = "cloud_music";

/// Unique identifier of a proxy player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Id of the proxy wrapping `target`, e.g. `cloud_musicmedia_player.tv1`
    ///
    /// Domain and target are joined without a separator so ids stay equal
    /// to the ones hosts have already registered for existing proxies.
    pub fn for_target(target: &EntityId) -> Self {
        Self(format!("{DOMAIN}{target}"))
    }

    /// Id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repeat mode of the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the end of the queue
    Off,
    /// Repeat the current track
    One,
    /// Repeat the whole queue
    #[default]
    All,
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::Off => write!(f, "off"),
            RepeatMode::One => write!(f, "one"),
            RepeatMode::All => write!(f, "all"),
        }
    }
}

/// Media content type of a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// Audio track
    Music,
    /// Playlist
    Playlist,
    /// Video
    Video,
    /// Anything else, by its host name
    Other(String),
}

impl MediaType {
    /// Host name of the content type
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Music => "music",
            MediaType::Playlist => "playlist",
            MediaType::Video => "video",
            MediaType::Other(other) => other,
        }
    }
}

impl From<&str> for MediaType {
    fn from(media_type: &str) -> Self {
        match media_type {
            "music" => Self::Music,
            "playlist" => Self::Playlist,
            "video" => Self::Video,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Device registry entry shared by all proxy players
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, id)` pairs identifying the device
    pub identifiers: Vec<(String, String)>,
    /// Device name
    pub name: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Model
    pub model: String,
    /// Software version
    pub sw_version: String,
}

/// Commands a host can send to a proxy player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Power on the target
    TurnOn,
    /// Power off the target
    TurnOff,
    /// Toggle the target's power
    Toggle,
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Stop playback
    Stop,
    /// Toggle play/pause
    PlayPause,
    /// Seek to an absolute position in seconds
    Seek(f64),
    /// Step the volume up
    VolumeUp,
    /// Step the volume down
    VolumeDown,
    /// Set the volume, 0..1
    SetVolume(f64),
    /// Mute or unmute
    Mute(bool),
    /// Switch input source
    SelectSource(String),
    /// Switch sound mode
    SelectSoundMode(String),
    /// Clear the target's playlist
    ClearPlaylist,
    /// Skip to the next track
    NextTrack,
    /// Go back to the previous track
    PreviousTrack,
    /// Enable or disable shuffle
    SetShuffle(bool),
    /// Change repeat mode
    SetRepeat(RepeatMode),
    /// Play a media item
    PlayMedia {
        /// Requested content type
        media_type: MediaType,
        /// Media id, resolved through the music provider
        media_id: String,
    },
}
