use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use super::{CloudMusicPlayer, DeviceInfo, MediaError, PlayerCommand, PlayerId, RepeatMode};
use crate::services::cloud_music::BrowseMedia;
use crate::services::host::PlayerState;

/// Everything a host displays for a proxy player at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    /// Unique id
    pub unique_id: PlayerId,
    /// Display name
    pub name: String,
    /// Target state
    pub state: PlayerState,
    /// Volume level, 0..1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_level: Option<f64>,
    /// Mute state
    pub is_volume_muted: bool,
    /// Content id last sent with play_media
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_content_id: Option<String>,
    /// Content type of the current media
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_content_type: Option<String>,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_duration: Option<f64>,
    /// Playback position in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_position: Option<f64>,
    /// When the position was last valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_position_updated_at: Option<DateTime<Utc>>,
    /// Cover art
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_image_url: Option<String>,
    /// Whether cover art is reachable without the host
    pub media_image_remotely_accessible: bool,
    /// Entity picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_picture: Option<String>,
    /// Track title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_title: Option<String>,
    /// Track artist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_artist: Option<String>,
    /// Album
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_album_name: Option<String>,
    /// Album artist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_album_artist: Option<String>,
    /// Track number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_track: Option<u32>,
    /// Series title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_series_title: Option<String>,
    /// Season
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_season: Option<String>,
    /// Episode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_episode: Option<String>,
    /// Channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_channel: Option<String>,
    /// Playlist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_playlist: Option<String>,
    /// App id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// App name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Sound mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_mode: Option<String>,
    /// Available sound modes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_mode_list: Option<Vec<String>>,
    /// Input source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Available input sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_list: Option<Vec<String>>,
    /// Shuffle enabled
    pub shuffle: bool,
    /// Repeat mode
    pub repeat: RepeatMode,
    /// Supported feature bits
    pub supported_features: u32,
    /// Whether the target only assumes its state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_state: Option<bool>,
    /// Device class
    pub device_class: &'static str,
    /// Extra state attributes
    pub extra_state_attributes: Map<String, Value>,
    /// Device registry entry
    pub device_info: DeviceInfo,
}

impl CloudMusicPlayer {
    /// Capture every displayed property at once
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            unique_id: self.id().clone(),
            name: self.name().to_string(),
            state: self.state(),
            volume_level: self.volume_level(),
            is_volume_muted: self.is_volume_muted(),
            media_content_id: self.media_content_id(),
            media_content_type: self.media_content_type(),
            media_duration: self.media_duration(),
            media_position: self.media_position(),
            media_position_updated_at: self.media_position_updated_at(),
            media_image_url: self.media_image_url(),
            media_image_remotely_accessible: self.media_image_remotely_accessible(),
            entity_picture: self.entity_picture(),
            media_title: self.media_title(),
            media_artist: self.media_artist(),
            media_album_name: self.media_album_name(),
            media_album_artist: self.media_album_artist(),
            media_track: self.media_track(),
            media_series_title: self.media_series_title(),
            media_season: self.media_season(),
            media_episode: self.media_episode(),
            media_channel: self.media_channel(),
            media_playlist: self.media_playlist(),
            app_id: self.app_id(),
            app_name: self.app_name(),
            sound_mode: self.sound_mode(),
            sound_mode_list: self.sound_mode_list(),
            source: self.source(),
            source_list: self.source_list(),
            shuffle: self.shuffle(),
            repeat: self.repeat(),
            supported_features: self.supported_features().bits(),
            assumed_state: self.assumed_state(),
            device_class: self.device_class(),
            extra_state_attributes: self.extra_state_attributes(),
            device_info: self.device_info(),
        }
    }
}

/// Media player capability interface a host drives.
///
/// Hosts that manage many entity kinds can hold players as
/// `Arc<dyn MediaPlayerEntity>` and dispatch commands without knowing the
/// concrete type.
#[async_trait]
pub trait MediaPlayerEntity: Send + Sync {
    /// Stable unique id
    fn unique_id(&self) -> &PlayerId;

    /// Display name
    fn entity_name(&self) -> &str;

    /// Current display state
    fn state_snapshot(&self) -> PlayerSnapshot;

    /// Re-read the state this entity mirrors
    fn refresh(&self);

    /// Execute a command.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the command cannot be carried out
    async fn handle(&self, command: PlayerCommand) -> Result<(), MediaError>;

    /// Browse media available to this entity.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the node cannot be browsed
    async fn browse(
        &self,
        content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MediaError>;
}

#[async_trait]
impl MediaPlayerEntity for CloudMusicPlayer {
    fn unique_id(&self) -> &PlayerId {
        self.id()
    }

    fn entity_name(&self) -> &str {
        self.name()
    }

    fn state_snapshot(&self) -> PlayerSnapshot {
        self.snapshot()
    }

    fn refresh(&self) {
        self.update();
    }

    #[instrument(skip(self), fields(player = %self.id()))]
    async fn handle(&self, command: PlayerCommand) -> Result<(), MediaError> {
        match command {
            PlayerCommand::TurnOn => self.turn_on().await,
            PlayerCommand::TurnOff => self.turn_off().await,
            PlayerCommand::Toggle => self.toggle().await,
            PlayerCommand::Play => self.media_play().await,
            PlayerCommand::Pause => self.media_pause().await,
            PlayerCommand::Stop => self.media_stop().await,
            PlayerCommand::PlayPause => self.media_play_pause().await,
            PlayerCommand::Seek(position) => self.media_seek(position).await,
            PlayerCommand::VolumeUp => self.volume_up().await,
            PlayerCommand::VolumeDown => self.volume_down().await,
            PlayerCommand::SetVolume(volume) => self.set_volume_level(volume).await,
            PlayerCommand::Mute(mute) => self.mute_volume(mute).await,
            PlayerCommand::SelectSource(source) => self.select_source(&source).await,
            PlayerCommand::SelectSoundMode(mode) => self.select_sound_mode(&mode).await,
            PlayerCommand::ClearPlaylist => self.clear_playlist().await,
            PlayerCommand::NextTrack => self.media_next_track().await,
            PlayerCommand::PreviousTrack => self.media_previous_track().await,
            PlayerCommand::SetShuffle(shuffle) => {
                self.set_shuffle(shuffle);
                Ok(())
            }
            PlayerCommand::SetRepeat(repeat) => {
                self.set_repeat(repeat);
                Ok(())
            }
            PlayerCommand::PlayMedia {
                media_type,
                media_id,
            } => self.play_media(media_type, &media_id).await,
        }
    }

    async fn browse(
        &self,
        content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MediaError> {
        self.browse_media(content_type, content_id).await
    }
}
