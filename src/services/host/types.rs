use std::fmt;

use serde::{Deserialize, Serialize};

use super::HostError;

/// Service domain every forwarded command is addressed to.
pub const MEDIA_PLAYER_DOMAIN: &str = "media_player";

/// Identifier of a host entity in `domain.object_id` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Parse and validate an entity id such as `media_player.tv1`.
    ///
    /// Both parts must be non-empty and made of lowercase ASCII letters,
    /// digits and underscores, separated by exactly one dot.
    ///
    /// # Errors
    ///
    /// Returns `HostError::InvalidEntityId` if the text is malformed
    pub fn parse(raw: &str) -> Result<Self, HostError> {
        let valid_part = |part: &str| {
            !part.is_empty()
                && !part.starts_with('_')
                && !part.ends_with('_')
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };

        match raw.split_once('.') {
            Some((domain, object_id)) if valid_part(domain) && valid_part(object_id) => {
                Ok(Self(raw.to_string()))
            }
            _ => Err(HostError::InvalidEntityId(raw.to_string())),
        }
    }

    /// Entity domain, e.g. `media_player`
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    /// Object id within the domain, e.g. `tv1`
    pub fn object_id(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, object_id)| object_id)
    }

    /// Full entity id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = HostError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// State of a media player entity as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Powered off
    Off,
    /// Powered on, nothing else known
    On,
    /// On but not playing anything
    Idle,
    /// Playing media
    Playing,
    /// Playback paused
    Paused,
    /// Low power standby
    Standby,
    /// Filling its buffer before playback
    Buffering,
    /// Entity exists but cannot be reached
    Unavailable,
    /// No state known yet
    #[default]
    Unknown,
}

impl PlayerState {
    /// Host state string for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Standby => "standby",
            Self::Buffering => "buffering",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for PlayerState {
    fn from(state: &str) -> Self {
        match state {
            "off" => Self::Off,
            "on" => Self::On,
            "idle" => Self::Idle,
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            "standby" => Self::Standby,
            "buffering" => Self::Buffering,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_entity_id() {
        let id = EntityId::parse("media_player.living_room_tv").unwrap();
        assert_eq!(id.domain(), "media_player");
        assert_eq!(id.object_id(), "living_room_tv");
        assert_eq!(id.to_string(), "media_player.living_room_tv");
    }

    #[test]
    fn rejects_malformed_entity_ids() {
        for raw in [
            "",
            "media_player",
            "media_player.",
            ".tv1",
            "Media_Player.tv1",
            "media_player.tv-1",
            "media_player.tv1.extra",
            "_media.tv1",
            "media_player.tv1_",
        ] {
            assert_eq!(
                EntityId::parse(raw),
                Err(HostError::InvalidEntityId(raw.to_string())),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn entity_id_deserializes_with_validation() {
        let id: EntityId = serde_json::from_str("\"media_player.tv1\"").unwrap();
        assert_eq!(id.object_id(), "tv1");

        assert!(serde_json::from_str::<EntityId>("\"not an id\"").is_err());
    }

    #[test]
    fn unknown_state_strings_map_to_unknown() {
        assert_eq!(PlayerState::from("playing"), PlayerState::Playing);
        assert_eq!(PlayerState::from("idle"), PlayerState::Idle);
        assert_eq!(PlayerState::from("PLAYING"), PlayerState::Unknown);
        assert_eq!(PlayerState::from("rewinding"), PlayerState::Unknown);
    }
}
