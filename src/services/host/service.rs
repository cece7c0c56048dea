use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::{Map, Value};

use super::{EntityId, HostError, MEDIA_PLAYER_DOMAIN, TargetState};

/// Media player services the proxy forwards to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Power on
    TurnOn,
    /// Power off
    TurnOff,
    /// Toggle power
    Toggle,
    /// Start playback
    MediaPlay,
    /// Pause playback
    MediaPause,
    /// Stop playback
    MediaStop,
    /// Toggle between play and pause
    MediaPlayPause,
    /// Seek to an absolute position
    MediaSeek,
    /// Step the volume up
    VolumeUp,
    /// Step the volume down
    VolumeDown,
    /// Set an absolute volume
    VolumeSet,
    /// Mute or unmute
    VolumeMute,
    /// Switch input source
    SelectSource,
    /// Switch sound mode
    SelectSoundMode,
    /// Clear the player's own playlist
    ClearPlaylist,
    /// Play a media item by URL or id
    PlayMedia,
}

impl Service {
    /// Service name as registered in the host
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Toggle => "toggle",
            Self::MediaPlay => "media_play",
            Self::MediaPause => "media_pause",
            Self::MediaStop => "media_stop",
            Self::MediaPlayPause => "media_play_pause",
            Self::MediaSeek => "media_seek",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::VolumeSet => "volume_set",
            Self::VolumeMute => "volume_mute",
            Self::SelectSource => "select_source",
            Self::SelectSoundMode => "select_sound_mode",
            Self::ClearPlaylist => "clear_playlist",
            Self::PlayMedia => "play_media",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MEDIA_PLAYER_DOMAIN}.{}", self.as_str())
    }
}

/// A single service invocation addressed to one entity
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    /// Service domain
    pub domain: &'static str,
    /// Service to run
    pub service: Service,
    /// Entity the call is addressed to
    pub target: EntityId,
    /// Service payload, always including `entity_id`
    pub data: Map<String, Value>,
}

impl ServiceCall {
    /// Build a `media_player` service call.
    ///
    /// The target entity id is added to the payload.
    pub fn media_player(service: Service, target: EntityId, mut data: Map<String, Value>) -> Self {
        data.insert(
            super::attributes::ATTR_ENTITY_ID.to_string(),
            Value::String(target.to_string()),
        );

        Self {
            domain: MEDIA_PLAYER_DOMAIN,
            service,
            target,
            data,
        }
    }
}

/// Notification that an entity's state was written
#[derive(Debug, Clone, PartialEq)]
pub struct StateChangedEvent {
    /// Entity whose state changed
    pub entity_id: EntityId,
    /// State before the change, if the entity existed
    pub old_state: Option<TargetState>,
    /// State after the change, `None` when the entity was removed
    pub new_state: Option<TargetState>,
}

/// Stream of state changes for one subscribed entity
pub type StateChangeStream = Pin<Box<dyn Stream<Item = StateChangedEvent> + Send>>;

/// The parts of the host runtime the proxy depends on.
#[async_trait]
pub trait HomeHost: Send + Sync {
    /// Current state of an entity, or `None` if the host doesn't know it yet.
    fn state(&self, entity_id: &EntityId) -> Option<TargetState>;

    /// Run a service call and wait until the host reports completion.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the host reports; callers pass it on unchanged.
    async fn call_service(&self, call: ServiceCall) -> Result<(), HostError>;

    /// Subscribe to state changes of a single entity.
    ///
    /// The subscription is active as soon as this returns, and ends when
    /// the stream is dropped.
    fn subscribe_state_changes(&self, entity_id: &EntityId) -> StateChangeStream;
}
