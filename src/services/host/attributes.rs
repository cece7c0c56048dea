use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{EntityId, PlayerState};

/// Current volume, 0..1. Some integrations report it as a numeric string.
pub const ATTR_VOLUME_LEVEL: &str = "volume_level";
/// Older spelling of the volume attribute, accepted when reading snapshots.
pub const ATTR_MEDIA_VOLUME_LEVEL: &str = "media_volume_level";
/// Whether the volume is muted, boolean or `"on"`/`"off"`.
pub const ATTR_VOLUME_MUTED: &str = "is_volume_muted";
/// Content type of the current media.
pub const ATTR_MEDIA_CONTENT_TYPE: &str = "media_content_type";
/// Content id sent with `play_media`.
pub const ATTR_MEDIA_CONTENT_ID: &str = "media_content_id";
/// Duration of the current media in seconds.
pub const ATTR_MEDIA_DURATION: &str = "media_duration";
/// Album artist of the current track.
pub const ATTR_MEDIA_ALBUM_ARTIST: &str = "media_album_artist";
/// Track number of the current track.
pub const ATTR_MEDIA_TRACK: &str = "media_track";
/// Series title of the current TV media.
pub const ATTR_MEDIA_SERIES_TITLE: &str = "media_series_title";
/// Season of the current TV media.
pub const ATTR_MEDIA_SEASON: &str = "media_season";
/// Episode of the current TV media.
pub const ATTR_MEDIA_EPISODE: &str = "media_episode";
/// Channel currently playing.
pub const ATTR_MEDIA_CHANNEL: &str = "media_channel";
/// Title of the playlist currently playing.
pub const ATTR_MEDIA_PLAYLIST: &str = "media_playlist";
/// Id of the running app.
pub const ATTR_APP_ID: &str = "app_id";
/// Name of the running app.
pub const ATTR_APP_NAME: &str = "app_name";
/// Current sound mode.
pub const ATTR_SOUND_MODE: &str = "sound_mode";
/// Available sound modes.
pub const ATTR_SOUND_MODE_LIST: &str = "sound_mode_list";
/// Current input source.
pub const ATTR_INPUT_SOURCE: &str = "source";
/// Available input sources.
pub const ATTR_INPUT_SOURCE_LIST: &str = "source_list";
/// Playback position in seconds.
pub const ATTR_MEDIA_POSITION: &str = "media_position";
/// When the playback position was last valid.
pub const ATTR_MEDIA_POSITION_UPDATED_AT: &str = "media_position_updated_at";
/// Seek target in seconds, sent with `media_seek`.
pub const ATTR_MEDIA_SEEK_POSITION: &str = "seek_position";
/// Supported feature bit mask.
pub const ATTR_SUPPORTED_FEATURES: &str = "supported_features";
/// Whether the entity only assumes its state.
pub const ATTR_ASSUMED_STATE: &str = "assumed_state";
/// Target entity of a service call.
pub const ATTR_ENTITY_ID: &str = "entity_id";

/// Known attributes of a media player entity.
///
/// Built from the host's generic attribute mapping. Values with the
/// expected type land in the named fields; everything else, including
/// known keys carrying an unexpected type, stays in `extra`. Volume and
/// mute are kept raw because hosts disagree on their encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetAttributes {
    /// Raw volume value, number or numeric string
    pub volume_level: Option<Value>,
    /// Raw mute value, boolean or state string
    pub is_volume_muted: Option<Value>,
    /// Content type of the current media
    pub media_content_type: Option<String>,
    /// Duration in seconds
    pub media_duration: Option<f64>,
    /// Album artist
    pub media_album_artist: Option<String>,
    /// Track number
    pub media_track: Option<u32>,
    /// Series title
    pub media_series_title: Option<String>,
    /// Season
    pub media_season: Option<String>,
    /// Episode
    pub media_episode: Option<String>,
    /// Channel
    pub media_channel: Option<String>,
    /// Playlist title
    pub media_playlist: Option<String>,
    /// Running app id
    pub app_id: Option<String>,
    /// Running app name
    pub app_name: Option<String>,
    /// Current sound mode
    pub sound_mode: Option<String>,
    /// Available sound modes
    pub sound_mode_list: Option<Vec<String>>,
    /// Current input source
    pub source: Option<String>,
    /// Available input sources
    pub source_list: Option<Vec<String>>,
    /// Playback position in seconds
    pub media_position: Option<f64>,
    /// When the position was last valid
    pub media_position_updated_at: Option<DateTime<Utc>>,
    /// Raw supported feature bits
    pub supported_features: Option<u32>,
    /// Whether the state is assumed
    pub assumed_state: Option<bool>,
    /// Attributes this schema does not know about
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for TargetAttributes {
    fn from(mut raw: Map<String, Value>) -> Self {
        let volume_level = raw
            .remove(ATTR_VOLUME_LEVEL)
            .or_else(|| raw.remove(ATTR_MEDIA_VOLUME_LEVEL));
        let is_volume_muted = raw.remove(ATTR_VOLUME_MUTED);

        let mut attributes = Self {
            volume_level,
            is_volume_muted,
            media_content_type: take(&mut raw, ATTR_MEDIA_CONTENT_TYPE, as_string),
            media_duration: take(&mut raw, ATTR_MEDIA_DURATION, Value::as_f64),
            media_album_artist: take(&mut raw, ATTR_MEDIA_ALBUM_ARTIST, as_string),
            media_track: take(&mut raw, ATTR_MEDIA_TRACK, as_u32),
            media_series_title: take(&mut raw, ATTR_MEDIA_SERIES_TITLE, as_string),
            media_season: take(&mut raw, ATTR_MEDIA_SEASON, as_label),
            media_episode: take(&mut raw, ATTR_MEDIA_EPISODE, as_label),
            media_channel: take(&mut raw, ATTR_MEDIA_CHANNEL, as_string),
            media_playlist: take(&mut raw, ATTR_MEDIA_PLAYLIST, as_string),
            app_id: take(&mut raw, ATTR_APP_ID, as_string),
            app_name: take(&mut raw, ATTR_APP_NAME, as_string),
            sound_mode: take(&mut raw, ATTR_SOUND_MODE, as_string),
            sound_mode_list: take(&mut raw, ATTR_SOUND_MODE_LIST, as_string_list),
            source: take(&mut raw, ATTR_INPUT_SOURCE, as_string),
            source_list: take(&mut raw, ATTR_INPUT_SOURCE_LIST, as_string_list),
            media_position: take(&mut raw, ATTR_MEDIA_POSITION, Value::as_f64),
            media_position_updated_at: take(&mut raw, ATTR_MEDIA_POSITION_UPDATED_AT, as_datetime),
            supported_features: take(&mut raw, ATTR_SUPPORTED_FEATURES, as_u32),
            assumed_state: take(&mut raw, ATTR_ASSUMED_STATE, Value::as_bool),
            extra: Map::new(),
        };

        attributes.extra = raw;
        attributes
    }
}

/// Removes `key` if its value converts, otherwise leaves it in place.
fn take<T>(raw: &mut Map<String, Value>, key: &str, convert: fn(&Value) -> Option<T>) -> Option<T> {
    let converted = raw.get(key).and_then(convert)?;
    raw.remove(key);
    Some(converted)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Seasons and episodes show up both as strings and as numbers.
fn as_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn as_string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Immutable copy of a host entity's state and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetState {
    /// Entity the snapshot belongs to
    pub entity_id: EntityId,
    /// Reported player state
    pub state: PlayerState,
    /// Reported attributes
    pub attributes: TargetAttributes,
    /// When the host last wrote this state
    pub last_updated: DateTime<Utc>,
}

impl TargetState {
    /// Build a snapshot from the host's raw state string and attribute mapping.
    pub fn from_raw(
        entity_id: EntityId,
        state: &str,
        attributes: Map<String, Value>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_id,
            state: PlayerState::from(state),
            attributes: TargetAttributes::from(attributes),
            last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attributes(value: Value) -> TargetAttributes {
        match value {
            Value::Object(map) => TargetAttributes::from(map),
            _ => panic!("attributes must be an object"),
        }
    }

    #[test]
    fn known_keys_are_typed() {
        let attrs = attributes(json!({
            "volume_level": 0.4,
            "is_volume_muted": false,
            "media_content_type": "music",
            "media_duration": 215.5,
            "media_track": 3,
            "media_season": 2,
            "media_episode": "E05",
            "source": "HDMI 1",
            "source_list": ["HDMI 1", "HDMI 2"],
            "media_position": 12.0,
            "media_position_updated_at": "2024-05-01T12:00:00+00:00",
            "supported_features": 21437,
            "assumed_state": true,
        }));

        assert_eq!(attrs.volume_level, Some(json!(0.4)));
        assert_eq!(attrs.media_content_type.as_deref(), Some("music"));
        assert_eq!(attrs.media_duration, Some(215.5));
        assert_eq!(attrs.media_track, Some(3));
        assert_eq!(attrs.media_season.as_deref(), Some("2"));
        assert_eq!(attrs.media_episode.as_deref(), Some("E05"));
        assert_eq!(
            attrs.source_list,
            Some(vec!["HDMI 1".to_string(), "HDMI 2".to_string()])
        );
        assert_eq!(
            attrs.media_position_updated_at.map(|dt| dt.to_rfc3339()),
            Some("2024-05-01T12:00:00+00:00".to_string())
        );
        assert_eq!(attrs.supported_features, Some(21437));
        assert_eq!(attrs.assumed_state, Some(true));
        assert!(attrs.extra.is_empty());
    }

    #[test]
    fn unknown_and_mistyped_keys_stay_in_extra() {
        let attrs = attributes(json!({
            "friendly_name": "Living Room TV",
            "media_track": "three",
            "source_list": ["HDMI 1", 2],
        }));

        assert_eq!(attrs.media_track, None);
        assert_eq!(attrs.source_list, None);
        assert_eq!(attrs.extra.get("friendly_name"), Some(&json!("Living Room TV")));
        assert_eq!(attrs.extra.get("media_track"), Some(&json!("three")));
        assert!(attrs.extra.contains_key("source_list"));
    }

    #[test]
    fn legacy_volume_key_is_accepted() {
        let attrs = attributes(json!({ "media_volume_level": "0.5" }));
        assert_eq!(attrs.volume_level, Some(json!("0.5")));
    }

    #[test]
    fn snapshot_parses_state_string() {
        let id = EntityId::parse("media_player.tv1").unwrap();
        let snapshot = TargetState::from_raw(id.clone(), "paused", Map::new(), Utc::now());

        assert_eq!(snapshot.entity_id, id);
        assert_eq!(snapshot.state, PlayerState::Paused);
        assert_eq!(snapshot.attributes, TargetAttributes::default());
    }
}
