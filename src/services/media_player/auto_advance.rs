use chrono::TimeDelta;

use super::RepeatMode;
use crate::config::AutoAdvanceConfig;
use crate::services::host::{PlayerState, StateChangedEvent};

/// Decides when a target going idle means the track ended.
///
/// Some targets report short idle flickers, and a freshly issued play or
/// seek can produce one too, so a transition only counts once the debounce
/// window since the last play/track action has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoAdvance {
    enabled: bool,
    debounce: TimeDelta,
    require_repeat: bool,
}

impl AutoAdvance {
    /// Build the policy from configuration.
    pub fn new(config: &AutoAdvanceConfig) -> Self {
        Self {
            enabled: config.enabled,
            debounce: i64::try_from(config.debounce_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX),
            require_repeat: config.require_repeat,
        }
    }

    /// Minimum time between the last action and an accepted idle transition
    pub fn debounce(&self) -> TimeDelta {
        self.debounce
    }

    /// Whether `event` should trigger a next-track request.
    ///
    /// `since_last_action` is the time elapsed since the proxy last started
    /// playback or changed track.
    pub fn should_advance(
        &self,
        playing: bool,
        repeat: RepeatMode,
        event: &StateChangedEvent,
        since_last_action: TimeDelta,
    ) -> bool {
        if !self.enabled || !playing {
            return false;
        }

        if self.require_repeat && repeat == RepeatMode::Off {
            return false;
        }

        let was_playing = event
            .old_state
            .as_ref()
            .is_some_and(|old| old.state == PlayerState::Playing);
        let now_idle = event
            .new_state
            .as_ref()
            .is_some_and(|new| new.state == PlayerState::Idle);

        was_playing && now_idle && since_last_action >= self.debounce
    }
}

impl Default for AutoAdvance {
    fn default() -> Self {
        Self::new(&AutoAdvanceConfig::default())
    }
}
