use async_trait::async_trait;

use super::{BrowseMedia, MusicError, PlayDirective, PlayQueue};
use crate::services::media_player::{CloudMusicPlayer, PlayerId};

/// Decides what a proxy player plays.
///
/// Calls receive the requesting player so a provider can drive it, for
/// example by calling [`CloudMusicPlayer::play_media`] after moving the
/// queue position.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Handle a play request for `media_id`.
    ///
    /// Returns `None` when the proxy should send `media_id` to its target
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MusicError` if the id cannot be resolved
    async fn play_media(
        &self,
        player: &CloudMusicPlayer,
        media_id: &str,
    ) -> Result<Option<PlayDirective>, MusicError>;

    /// Move to the next track and start playing it.
    ///
    /// # Errors
    ///
    /// Returns `MusicError` if there is nothing to advance to or playback fails
    async fn next_track(&self, player: &CloudMusicPlayer, shuffle: bool)
    -> Result<(), MusicError>;

    /// Move to the previous track and start playing it.
    ///
    /// # Errors
    ///
    /// Returns `MusicError` if there is nothing to go back to or playback fails
    async fn previous_track(
        &self,
        player: &CloudMusicPlayer,
        shuffle: bool,
    ) -> Result<(), MusicError>;

    /// Browse the provider's media tree.
    ///
    /// # Errors
    ///
    /// Returns `MusicError::UnknownMedia` if `content_id` names nothing
    async fn browse_media(
        &self,
        player: &CloudMusicPlayer,
        content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MusicError>;

    /// Current queue of a player, if the provider holds one.
    fn queue(&self, player: &PlayerId) -> Option<PlayQueue>;
}
