use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use super::{CloudMusicPlayer, MediaError, MediaType, RepeatMode};
use crate::services::cloud_music::{BrowseMedia, PlayDirective};
use crate::services::host::attributes::{
    ATTR_INPUT_SOURCE, ATTR_MEDIA_CONTENT_ID, ATTR_MEDIA_CONTENT_TYPE, ATTR_MEDIA_SEEK_POSITION,
    ATTR_SOUND_MODE, ATTR_VOLUME_LEVEL, ATTR_VOLUME_MUTED,
};
use crate::services::host::{Service, ServiceCall};

/// Playback control for the proxy.
///
/// Every command turns into one blocking service call against the target.
/// Without a target snapshot the call is dropped and the command succeeds.
impl CloudMusicPlayer {
    async fn call_target(&self, service: Service, data: Map<String, Value>) -> Result<(), MediaError> {
        let Some(snapshot) = self.inner.target_state.get() else {
            debug!(player = %self.inner.id, %service, "Target state unknown, dropping command");
            return Ok(());
        };

        let call = ServiceCall::media_player(service, snapshot.entity_id.clone(), data);
        self.inner.host.call_service(call).await?;
        Ok(())
    }

    async fn call_target_with(
        &self,
        service: Service,
        key: &str,
        value: Value,
    ) -> Result<(), MediaError> {
        let mut data = Map::new();
        data.insert(key.to_string(), value);
        self.call_target(service, data).await
    }

    fn mark_track_action(&self) {
        self.inner.track_last_at.set(self.inner.clock.now());
    }

    /// Turn the target on.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn turn_on(&self) -> Result<(), MediaError> {
        self.call_target(Service::TurnOn, Map::new()).await
    }

    /// Turn the target off and clear the playing flag.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn turn_off(&self) -> Result<(), MediaError> {
        self.inner.playing.set(false);
        self.call_target(Service::TurnOff, Map::new()).await
    }

    /// Toggle the target's power.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn toggle(&self) -> Result<(), MediaError> {
        self.call_target(Service::Toggle, Map::new()).await
    }

    /// Start playback, set the playing flag and stamp the action time.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_play(&self) -> Result<(), MediaError> {
        self.inner.playing.set(true);
        self.mark_track_action();
        self.call_target(Service::MediaPlay, Map::new()).await
    }

    /// Pause playback and clear the playing flag.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_pause(&self) -> Result<(), MediaError> {
        self.inner.playing.set(false);
        self.call_target(Service::MediaPause, Map::new()).await
    }

    /// Stop playback and clear the playing flag.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_stop(&self) -> Result<(), MediaError> {
        self.inner.playing.set(false);
        self.call_target(Service::MediaStop, Map::new()).await
    }

    /// Toggle between play and pause on the target.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_play_pause(&self) -> Result<(), MediaError> {
        self.call_target(Service::MediaPlayPause, Map::new()).await
    }

    /// Seek to `position` seconds.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_seek(&self, position: f64) -> Result<(), MediaError> {
        self.call_target_with(Service::MediaSeek, ATTR_MEDIA_SEEK_POSITION, json!(position))
            .await
    }

    /// Step the volume up.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn volume_up(&self) -> Result<(), MediaError> {
        self.call_target(Service::VolumeUp, Map::new()).await
    }

    /// Step the volume down.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn volume_down(&self) -> Result<(), MediaError> {
        self.call_target(Service::VolumeDown, Map::new()).await
    }

    /// Set the volume, range 0..1.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn set_volume_level(&self, volume: f64) -> Result<(), MediaError> {
        self.call_target_with(Service::VolumeSet, ATTR_VOLUME_LEVEL, json!(volume))
            .await
    }

    /// Mute or unmute.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn mute_volume(&self, mute: bool) -> Result<(), MediaError> {
        self.call_target_with(Service::VolumeMute, ATTR_VOLUME_MUTED, Value::Bool(mute))
            .await
    }

    /// Switch the target's input source.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn select_source(&self, source: &str) -> Result<(), MediaError> {
        self.call_target_with(Service::SelectSource, ATTR_INPUT_SOURCE, json!(source))
            .await
    }

    /// Switch the target's sound mode.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn select_sound_mode(&self, sound_mode: &str) -> Result<(), MediaError> {
        self.call_target_with(Service::SelectSoundMode, ATTR_SOUND_MODE, json!(sound_mode))
            .await
    }

    /// Clear the target's own playlist.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn clear_playlist(&self) -> Result<(), MediaError> {
        self.call_target(Service::ClearPlaylist, Map::new()).await
    }

    /// Ask the music provider for the next track.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Music` if the provider cannot advance
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_next_track(&self) -> Result<(), MediaError> {
        self.mark_track_action();
        self.inner
            .music
            .next_track(self, self.inner.shuffle.get())
            .await?;
        Ok(())
    }

    /// Ask the music provider for the previous track.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Music` if the provider cannot go back
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn media_previous_track(&self) -> Result<(), MediaError> {
        self.mark_track_action();
        self.inner
            .music
            .previous_track(self, self.inner.shuffle.get())
            .await?;
        Ok(())
    }

    /// Enable or disable shuffle. Local to the proxy.
    pub fn set_shuffle(&self, shuffle: bool) {
        self.inner.shuffle.set(shuffle);
    }

    /// Change the repeat mode. Local to the proxy.
    pub fn set_repeat(&self, repeat: RepeatMode) {
        self.inner.repeat.set(repeat);
    }

    /// Resolve `media_id` through the music provider and play the result.
    ///
    /// The target always receives content type `music`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Music` if the provider rejects the id,
    /// `MediaError::NoCurrentTrack` if it points at an empty queue, and
    /// `MediaError::Host` if the host fails the call
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn play_media(&self, media_type: MediaType, media_id: &str) -> Result<(), MediaError> {
        let directive = self.inner.music.play_media(self, media_id).await?;
        self.refresh_music_info();

        let content_id = match directive {
            None => media_id.to_string(),
            Some(PlayDirective::Url(url)) => url,
            Some(PlayDirective::CurrentIndex | PlayDirective::QueueAppended) => self
                .music_info()
                .map(|track| track.url)
                .ok_or_else(|| MediaError::NoCurrentTrack(self.inner.id.clone()))?,
        };

        info!(requested = media_type.as_str(), content_id = %content_id, "Playing media");
        self.inner.media_content_id.set(Some(content_id.clone()));

        let mut data = Map::new();
        data.insert(
            ATTR_MEDIA_CONTENT_TYPE.to_string(),
            json!(MediaType::Music.as_str()),
        );
        data.insert(ATTR_MEDIA_CONTENT_ID.to_string(), Value::String(content_id));
        self.call_target(Service::PlayMedia, data).await
    }

    /// Browse the music provider's media tree.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Music` if the provider cannot browse `content_id`
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub async fn browse_media(
        &self,
        content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MediaError> {
        Ok(self
            .inner
            .music
            .browse_media(self, content_type, content_id)
            .await?)
    }
}
