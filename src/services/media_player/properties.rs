use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::types::DOMAIN;
use super::{CloudMusicPlayer, DeviceInfo, PlayerId, RepeatMode, SupportedFeatures};
use crate::services::cloud_music::MusicInfo;
use crate::services::host::{EntityId, PlayerState, TargetAttributes, TargetState};

/// Device class reported for every proxy.
const DEVICE_CLASS: &str = "tv";

/// Mute state string some integrations report instead of `true`.
const STATE_ON: &str = "on";

impl CloudMusicPlayer {
    fn target_attr<T>(&self, read: impl FnOnce(&TargetAttributes) -> Option<T>) -> Option<T> {
        self.inner
            .target_state
            .get()
            .and_then(|snapshot| read(&snapshot.attributes))
    }

    fn track_attr<T>(&self, read: impl FnOnce(&MusicInfo) -> T) -> Option<T> {
        self.inner.music_info.get().as_ref().map(read)
    }

    /// Unique id of this proxy
    pub fn id(&self) -> &PlayerId {
        &self.inner.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Entity the proxy forwards to
    pub fn target(&self) -> &EntityId {
        &self.inner.target
    }

    /// Latest target snapshot
    pub fn target_state(&self) -> Option<Arc<TargetState>> {
        self.inner.target_state.get()
    }

    /// Cached current track
    pub fn music_info(&self) -> Option<MusicInfo> {
        self.inner.music_info.get()
    }

    /// Target's state, `unknown` before the first snapshot
    pub fn state(&self) -> PlayerState {
        self.inner
            .target_state
            .get()
            .map_or(PlayerState::Unknown, |snapshot| snapshot.state)
    }

    /// Volume level, 0..1.
    ///
    /// Numeric strings are accepted; anything unparsable reads as `None`.
    pub fn volume_level(&self) -> Option<f64> {
        self.target_attr(|attrs| match attrs.volume_level.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Whether the target is muted
    pub fn is_volume_muted(&self) -> bool {
        self.target_attr(|attrs| match attrs.is_volume_muted.as_ref()? {
            Value::Bool(muted) => Some(*muted),
            Value::String(s) => Some(s == STATE_ON),
            _ => None,
        })
        .unwrap_or(false)
    }

    /// Content id last sent with play_media
    pub fn media_content_id(&self) -> Option<String> {
        self.inner.media_content_id.get()
    }

    /// Content type of the current media
    pub fn media_content_type(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_content_type.clone())
    }

    /// Duration of the current media in seconds
    pub fn media_duration(&self) -> Option<f64> {
        self.target_attr(|attrs| attrs.media_duration)
    }

    /// Cover art of the current track
    pub fn media_image_url(&self) -> Option<String> {
        self.track_attr(|track| track.thumbnail.clone()).flatten()
    }

    /// Entity picture, the current cover art
    pub fn entity_picture(&self) -> Option<String> {
        self.media_image_url()
    }

    /// Cover art URLs point at the public music CDN
    pub fn media_image_remotely_accessible(&self) -> bool {
        true
    }

    /// Title of the current track
    pub fn media_title(&self) -> Option<String> {
        self.track_attr(|track| track.title.clone())
    }

    /// Artist of the current track
    pub fn media_artist(&self) -> Option<String> {
        self.track_attr(|track| track.artist.clone())
    }

    /// Album of the current track
    pub fn media_album_name(&self) -> Option<String> {
        self.track_attr(|track| track.album.clone())
    }

    /// Album artist reported by the target
    pub fn media_album_artist(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_album_artist.clone())
    }

    /// Track number reported by the target
    pub fn media_track(&self) -> Option<u32> {
        self.target_attr(|attrs| attrs.media_track)
    }

    /// Series title reported by the target
    pub fn media_series_title(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_series_title.clone())
    }

    /// Season reported by the target
    pub fn media_season(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_season.clone())
    }

    /// Episode reported by the target
    pub fn media_episode(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_episode.clone())
    }

    /// Channel reported by the target
    pub fn media_channel(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_channel.clone())
    }

    /// Playlist title reported by the target
    pub fn media_playlist(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.media_playlist.clone())
    }

    /// App id reported by the target
    pub fn app_id(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.app_id.clone())
    }

    /// App name shown for the proxy: the current track's artist
    pub fn app_name(&self) -> Option<String> {
        self.media_artist()
    }

    /// Current sound mode
    pub fn sound_mode(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.sound_mode.clone())
    }

    /// Available sound modes
    pub fn sound_mode_list(&self) -> Option<Vec<String>> {
        self.target_attr(|attrs| attrs.sound_mode_list.clone())
    }

    /// Current input source
    pub fn source(&self) -> Option<String> {
        self.target_attr(|attrs| attrs.source.clone())
    }

    /// Available input sources
    pub fn source_list(&self) -> Option<Vec<String>> {
        self.target_attr(|attrs| attrs.source_list.clone())
    }

    /// Playback position in seconds
    pub fn media_position(&self) -> Option<f64> {
        self.target_attr(|attrs| attrs.media_position)
    }

    /// When the playback position was last valid
    pub fn media_position_updated_at(&self) -> Option<DateTime<Utc>> {
        self.target_attr(|attrs| attrs.media_position_updated_at)
    }

    /// Target features plus browse, previous/next, play media, shuffle and repeat
    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::with_proxy(self.target_attr(|attrs| attrs.supported_features))
    }

    /// Whether the target only assumes its state
    pub fn assumed_state(&self) -> Option<bool> {
        self.target_attr(|attrs| attrs.assumed_state)
    }

    /// Whether shuffle is enabled
    pub fn shuffle(&self) -> bool {
        self.inner.shuffle.get()
    }

    /// Current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.inner.repeat.get()
    }

    /// Whether the proxy believes it started playback
    pub fn is_playing(&self) -> bool {
        self.inner.playing.get()
    }

    /// Time of the last play or track change
    pub fn last_action_at(&self) -> DateTime<Utc> {
        self.inner.track_last_at.get()
    }

    /// Device class
    pub fn device_class(&self) -> &'static str {
        DEVICE_CLASS
    }

    /// Extra state attributes published with the entity
    pub fn extra_state_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("platform".to_string(), Value::String(DOMAIN.to_string()));
        attributes
    }

    /// Device registry entry
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), env!("CARGO_PKG_NAME").to_string())],
            name: self.inner.name.clone(),
            manufacturer: "NetEase".to_string(),
            model: "CloudMusic".to_string(),
            sw_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
